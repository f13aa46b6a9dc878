//! `hc2 init`

use std::path::Path;

use anyhow::Context as _;

use crate::args::LoginArgs;
use crate::context;

/// Write the effective settings (existing file plus flags) to `config_path`.
pub fn run(config_path: &Path, login: &LoginArgs) -> anyhow::Result<()> {
    let config = context::load_config(config_path, login)?;
    let bytes = config
        .write(config_path)
        .with_context(|| format!("Failed to write config file {}", config_path.display()))?;
    tracing::info!(path = %config_path.display(), bytes, "Wrote config file");
    Ok(())
}
