//! `hc2 interact`

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context as _};
use hc2_client::Hc2Client;
use hc2_core::{DebugCursor, SceneRecord};

use crate::args::{InteractArgs, LoginArgs};
use crate::context;

/// Delay between debug console polls, and before the first poll after
/// starting a scene.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub async fn run(config_path: &Path, login: &LoginArgs, args: InteractArgs) -> anyhow::Result<()> {
    if args.action.is_none() && !args.get_debug {
        bail!("Nothing to be done. Pass --action and/or --get-debug.");
    }
    let scene_id = target_scene(&args)?;

    let config = context::load_config(config_path, login)?;
    let client = context::connect(&config)?;

    if let Some(action) = args.action {
        client
            .scene_action(scene_id, action)
            .await
            .with_context(|| format!("Failed to trigger action {action} on scene {scene_id}"))?;
        tracing::info!(scene_id, %action, "Triggered scene action");

        if args.get_debug && action.runs_scene() {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    if args.get_debug {
        print_debug(&client, scene_id, args.tail).await?;
    }
    Ok(())
}

/// The scene id from `--scene-id`, or from the header of `--file`.
fn target_scene(args: &InteractArgs) -> anyhow::Result<i64> {
    if let Some(scene_id) = args.scene_id {
        return Ok(scene_id);
    }
    let Some(file) = &args.file else {
        bail!("No scene id and no file given. Aborting.");
    };
    let record = SceneRecord::load_file(file)
        .with_context(|| format!("Cannot read scene file {}", file.display()))?;
    record
        .id
        .with_context(|| format!("No scene id included in file {}. Aborting.", file.display()))
}

async fn print_debug(client: &Hc2Client, scene_id: i64, tail: bool) -> anyhow::Result<()> {
    let mut cursor = DebugCursor::new();
    loop {
        let messages = client
            .debug_messages(scene_id)
            .await
            .context("Failed to fetch debug messages")?;
        for message in cursor.advance(&messages) {
            println!("{}", message.format_line(&chrono::Local));
        }
        if !tail {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Interrupted, stopping debug tail");
                return Ok(());
            }
        }
    }
}
