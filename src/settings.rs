use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Defaults, overridden by `historico.toml` in the working directory, then
/// by `HISTORICO_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data/historico.sqlite")
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("data/dados_historico.csv")
}

fn default_top_n() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: default_db_path(),
            csv_path: default_csv_path(),
            top_n: default_top_n(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("historico").required(false))
            .add_source(Environment::with_prefix("HISTORICO").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
