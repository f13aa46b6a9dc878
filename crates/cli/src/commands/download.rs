//! `hc2 download`

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use hc2_client::Hc2Client;
use hc2_core::scene::LUA_EXTENSION;
use hc2_core::sync::{self, download_content};
use hc2_core::SceneRecord;

use crate::args::{DownloadArgs, LoginArgs};
use crate::context;

pub async fn run(config_path: &Path, login: &LoginArgs, args: DownloadArgs) -> anyhow::Result<()> {
    let config = context::load_config(config_path, login)?;
    let client = context::connect(&config)?;

    match args.scene_id {
        Some(scene_id) => {
            let scene = sync::fetch_scene(&client, scene_id)
                .await
                .with_context(|| format!("Cannot download scene {scene_id}"))?;
            let (path, bytes) = write_scene(&client, &args.dir, &scene).await?;
            tracing::info!(scene_id, path = %path.display(), bytes, "Downloaded scene");
        }
        None => {
            let scenes = client.all_scenes().await.context("Cannot list scenes")?;
            tracing::info!(count = scenes.len(), "Processing scenes");

            let mut total_bytes = 0;
            let mut files_created = 0;
            for summary in &scenes {
                let Some(scene_id) = summary.id else {
                    continue;
                };
                let scene = sync::fetch_scene(&client, scene_id).await?;
                let (path, bytes) = write_scene(&client, &args.dir, &scene).await?;
                tracing::debug!(scene_id, name = %scene.name, path = %path.display(), "Wrote scene");
                total_bytes += bytes;
                files_created += 1;
            }
            tracing::info!(
                scenes = scenes.len(),
                files_created,
                bytes = total_bytes,
                "Download finished"
            );
        }
    }
    Ok(())
}

/// Write one scene below `base_dir/<section>/<room>/`.
async fn write_scene(
    client: &Hc2Client,
    base_dir: &Path,
    scene: &SceneRecord,
) -> anyhow::Result<(PathBuf, usize)> {
    let room = client.room(scene.room_id).await?;
    let section = match &room {
        Some(room) => client.section(room.section_id).await?,
        None => None,
    };
    let dir = scene_dir(
        base_dir,
        section.as_ref().map_or("", |s| s.name.as_str()),
        room.as_ref().map_or("", |r| r.name.as_str()),
    );
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create directory {}", dir.display()))?;

    let path = unique_path(&dir, &scene.name);
    let content = download_content(scene);
    std::fs::write(&path, &content)
        .with_context(|| format!("Cannot write scene file {}", path.display()))?;
    Ok((path, content.len()))
}

/// `base/<section>/<room>`; empty names add no directory level.
fn scene_dir(base: &Path, section: &str, room: &str) -> PathBuf {
    let mut dir = base.to_path_buf();
    for part in [section, room] {
        if !part.is_empty() {
            dir.push(safe_component(part));
        }
    }
    dir
}

/// `<dir>/<name>.lua`, or the first free `<dir>/<name>_<n>.lua` if taken.
fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let name = safe_component(name);
    let mut path = dir.join(format!("{name}.{LUA_EXTENSION}"));
    let mut n = 0;
    while path.exists() {
        tracing::debug!(path = %path.display(), "File exists, choosing a new name");
        path = dir.join(format!("{name}_{n}.{LUA_EXTENSION}"));
        n += 1;
    }
    path
}

/// A controller-supplied name as a single path component: separators
/// become `_` and leading dots are replaced, so the result never leaves
/// its parent directory.
fn safe_component(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_start_matches('.');
    let dots = replaced.len() - trimmed.len();
    format!("{}{trimmed}", "_".repeat(dots))
}
