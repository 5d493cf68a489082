use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::record::ClinicType;

pub const DEFAULT_MASTER_PATH: &str = "data/clinic_master.sqlite";
const CONFIG_FILE: &str = "clinic_audit";
const ENV_PREFIX: &str = "CLINIC_AUDIT";

#[derive(Debug, Clone, Deserialize)]
struct RawSettings {
    master_path: String,
    clinic_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub master_path: PathBuf,
    pub clinic_type: ClinicType,
}

/// Defaults, then `clinic_audit.toml` if present, then `CLINIC_AUDIT_*`
/// environment variables.
pub fn load() -> Result<Settings> {
    let builder = Config::builder()
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX));
    from_builder(builder)
}

fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Settings> {
    let raw: RawSettings = builder
        .set_default("master_path", DEFAULT_MASTER_PATH)?
        .set_default("clinic_type", ClinicType::AutoDetect.label())?
        .build()
        .context("failed to load configuration")?
        .try_deserialize()
        .context("invalid configuration")?;

    let clinic_type = raw
        .clinic_type
        .parse::<ClinicType>()
        .map_err(anyhow::Error::msg)
        .context("invalid clinic_type in configuration")?;

    Ok(Settings {
        master_path: PathBuf::from(raw.master_path),
        clinic_type,
    })
}
