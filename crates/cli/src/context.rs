//! Resolving the effective connection settings from file and flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use hc2_client::{ConfigError, Hc2Client, Hc2Config};

use crate::args::LoginArgs;

/// Where the config file lives: `--cfg-file`, else `~/.hc2-tools/config.json`.
pub fn config_path(cfg_file: Option<&Path>) -> anyhow::Result<PathBuf> {
    match cfg_file {
        Some(path) => Ok(path.to_path_buf()),
        None => Hc2Config::default_path()
            .context("Cannot determine the home directory; pass --cfg-file"),
    }
}

/// Combine a config file read attempt with the login flags.
///
/// A readable file is the base and each given flag replaces its field.
/// Without a readable file all three connection flags are required.
pub fn resolve_config(
    path: &Path,
    loaded: Result<Hc2Config, ConfigError>,
    login: &LoginArgs,
) -> anyhow::Result<Hc2Config> {
    let url = non_empty(&login.url);
    let user = non_empty(&login.user);
    let password = non_empty(&login.password);

    let mut config = match loaded {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Config file not usable");
            match (url, user, password) {
                (None, None, None) => bail!(
                    "Could not read config file ({}) and no parameters given. \
                     Consider using `hc2 init` to create a config file",
                    path.display()
                ),
                (Some(_), Some(_), Some(_)) => Hc2Config::default(),
                _ => bail!("Not all login parameters provided. Aborting."),
            }
        }
    };

    if let Some(user) = user {
        tracing::trace!(user, "Configured user from flags");
        config.username = user.to_string();
    }
    if let Some(password) = password {
        config.password = password.to_string();
    }
    if let Some(url) = url {
        config.base_url = url.to_string();
    }
    Ok(config)
}

/// Load the config file at `path` and apply the login flags.
pub fn load_config(path: &Path, login: &LoginArgs) -> anyhow::Result<Hc2Config> {
    resolve_config(path, Hc2Config::load(path), login)
}

/// Build a client for the resolved settings.
pub fn connect(config: &Hc2Config) -> anyhow::Result<Hc2Client> {
    tracing::debug!(url = %config.base_url, user = %config.username, "Connecting to controller");
    Hc2Client::new(config).context("Failed to build HTTP client")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
