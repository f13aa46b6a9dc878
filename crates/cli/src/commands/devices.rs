//! `hc2 devices`

use std::path::Path;

use anyhow::Context as _;
use hc2_client::models::Device;

use crate::args::{DevicesArgs, LoginArgs};
use crate::context;

pub async fn run(config_path: &Path, login: &LoginArgs, args: DevicesArgs) -> anyhow::Result<()> {
    let config = context::load_config(config_path, login)?;
    let client = context::connect(&config)?;

    if args.ids.is_empty() {
        let devices = client.devices().await.context("Cannot list devices")?;
        for line in listing(&devices, args.all) {
            println!("{line}");
        }
        return Ok(());
    }

    for id in args.ids {
        match client.device(id).await? {
            Some(device) => println!("{}\n", serde_json::to_string_pretty(&device)?),
            None => tracing::warn!(device_id = id, "No such device"),
        }
    }
    Ok(())
}

/// One numbered line per device; invisible devices only with `all`.
fn listing(devices: &[Device], all: bool) -> Vec<String> {
    devices
        .iter()
        .filter(|d| d.visible || all)
        .enumerate()
        .map(|(i, d)| format!("{} {}: {} with ID: {}", i + 1, d.name, d.device_type, d.id))
        .collect()
}
