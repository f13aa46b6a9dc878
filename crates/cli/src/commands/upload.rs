//! `hc2 upload`
//!
//! Command-line values overrule the file's header, which overrules the
//! defaults of a new scene. The header is rewritten only when something
//! changed it, and `require` statements are inlined last.

use std::path::Path;

use anyhow::Context as _;
use hc2_core::sync::{self, apply_overrides};
use hc2_core::{FsSource, IncludeExpander, SceneRecord, UploadOutcome, UploadOverrides};

use crate::args::{LoginArgs, UploadArgs};
use crate::context;

pub async fn run(config_path: &Path, login: &LoginArgs, args: UploadArgs) -> anyhow::Result<()> {
    let record = prepare(&args)?;

    if args.dont_upload {
        match record.id {
            Some(id) => tracing::debug!(scene_id = id, "Would update scene"),
            None => tracing::debug!("Would create a new scene"),
        }
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let config = context::load_config(config_path, login)?;
    let client = context::connect(&config)?;
    let name = record.name.clone();
    let outcome = sync::upload(&client, record)
        .await
        .with_context(|| format!("Failed to upload scene '{name}'"))?;

    match outcome {
        UploadOutcome::Created { id } => tracing::info!(scene_id = id, name = %name, "Created new scene"),
        UploadOutcome::Updated { id } => tracing::info!(scene_id = id, name = %name, "Updated scene"),
    }
    Ok(())
}

/// Load the script and turn it into the record that gets uploaded.
pub fn prepare(args: &UploadArgs) -> anyhow::Result<SceneRecord> {
    let mut record = SceneRecord::load_file(&args.script)
        .with_context(|| format!("Cannot read scene file {}", args.script.display()))?;

    let overrides = UploadOverrides {
        scene_id: args.scene_id,
        room_id: args.room_id,
        name: args.scene_name.clone(),
        create_header: args.create_header,
    };
    if apply_overrides(&mut record, &args.script, &overrides) {
        tracing::debug!(path = %args.script.display(), "Rewriting scene header");
        record.update_header();
    }

    if !args.dont_expand {
        let expander = IncludeExpander::new(&args.expand_path)
            .with_ignore_tag(Some(args.ignore_tag.clone()));
        record.body = expander.expand(&record.body, &FsSource)?;
    }

    Ok(record)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
