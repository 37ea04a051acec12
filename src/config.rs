use crate::{prtls::interp::Interpolation, BcType, Float, MergeDiscipline};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Debug)]
pub struct Config {
    pub species: SpeciesParams,
    #[serde(default)]
    pub parallel: ParallelParams,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SpeciesParams {
    #[serde(default = "default_name")]
    pub name: String,
    pub q: Float,
    pub m_q: Float,
    pub dt: Float,
    pub dx: Float,
    pub nx: usize,
    #[serde(default)]
    pub bc_type: BcType,
    #[serde(default)]
    pub n_sort: u32,
    #[serde(default)]
    pub moving_window: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ParallelParams {
    // 0 means use as many workers as rayon would by default
    #[serde(default)]
    pub n_workers: usize,
    #[serde(default)]
    pub merge: MergeDiscipline,
    #[serde(default)]
    pub interpolation: Interpolation,
}

fn default_name() -> String {
    "electrons".to_string()
}

impl Default for ParallelParams {
    fn default() -> ParallelParams {
        ParallelParams {
            n_workers: 0,
            merge: MergeDiscipline::default(),
            interpolation: Interpolation::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not open the {} file", path.display()))?;
        Config::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Config> {
        toml::from_str(contents).with_context(|| "Could not parse Config file")
    }
}
