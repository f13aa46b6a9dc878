//! `hc2 info`

use std::path::Path;

use anyhow::Context as _;

use crate::args::LoginArgs;
use crate::context;

pub async fn run(config_path: &Path, login: &LoginArgs) -> anyhow::Result<()> {
    let config = context::load_config(config_path, login)?;
    let client = context::connect(&config)?;
    let summary = client
        .connection_summary(2)
        .await
        .context("Failed to query controller settings")?;
    println!("{summary}");
    Ok(())
}
