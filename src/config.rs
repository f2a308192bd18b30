use crate::store::FileStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Serialize, Deserialize, Debug)]
pub struct Config {
    /// Sessions allowed per calendar day. Enforced when starting, never by
    /// the data layer itself.
    pub daily_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self { daily_limit: 3 }
    }
}

pub fn load_config() -> Result<Config> {
    let mut path = FileStore::get_base_dir()?;
    path.push("config.json");

    if !path.exists() {
        let config = Config::default();
        let data = serde_json::to_string_pretty(&config)?;
        fs::write(&path, data)?;
        return Ok(config);
    }

    let data = fs::read_to_string(&path)?;
    let config = serde_json::from_str(&data)?;
    Ok(config)
}
