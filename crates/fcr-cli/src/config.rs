//! # Configuration Resolution
//!
//! Precedence, lowest to highest: config file, environment
//! (`FCR_ADMIN`, `FCR_START_HEIGHT`), command-line flags.

use std::path::Path;

use anyhow::{bail, Context, Result};

use fcr_core::config::ENV_ADMIN;
use fcr_core::{AdminIdentity, HeightConfig, RegistryConfig};

/// Command-line overrides on top of file and environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides<'a> {
    /// `--admin`
    pub admin: Option<&'a str>,
    /// `--start-height`
    pub start_height: Option<u64>,
}

/// Resolve the registry configuration for a run.
pub fn resolve_config(path: Option<&Path>, overrides: &Overrides<'_>) -> Result<RegistryConfig> {
    resolve_with(path, overrides, |var| std::env::var(var).ok())
}

/// [`resolve_config`] with an explicit environment lookup.
pub fn resolve_with(
    path: Option<&Path>,
    overrides: &Overrides<'_>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<RegistryConfig> {
    let base = match path {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            let admin = match (overrides.admin, lookup(ENV_ADMIN)) {
                (Some(admin), _) => admin.to_string(),
                (None, Some(admin)) => admin,
                (None, None) => {
                    bail!("no admin configured: pass --config or --admin, or set {ENV_ADMIN}")
                }
            };
            RegistryConfig::new(AdminIdentity::new(admin).context("invalid admin identity")?)
        }
    };

    let mut config = base
        .with_overrides(lookup)
        .context("invalid environment override")?;

    if let Some(admin) = overrides.admin {
        config.admin = AdminIdentity::new(admin).context("invalid --admin")?;
    }
    if let Some(start) = overrides.start_height {
        config.height = HeightConfig::Manual { start };
    }

    tracing::debug!(admin = %config.admin, height = %config.height, "resolved configuration");
    Ok(config)
}
