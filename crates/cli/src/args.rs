//! Command-line definition for `hc2`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hc2_core::SceneAction;

#[derive(Parser)]
#[command(name = "hc2", about = "Manage Lua scenes on a Fibaro HC2 controller")]
pub struct Cli {
    /// Config file to use (default: ~/.hc2-tools/config.json)
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    pub cfg_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace. Ignored when RUST_LOG is set.
    #[arg(long, short = 'l', global = true, default_value = "info")]
    pub log_level: String,

    #[command(flatten)]
    pub login: LoginArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection parameters that override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct LoginArgs {
    /// URL of the controller, in the form http://...
    #[arg(long, global = true, env = "HC2_URL")]
    pub url: Option<String>,

    /// Username for HC2 authentication
    #[arg(long, global = true, env = "HC2_USER")]
    pub user: Option<String>,

    /// Password for HC2 authentication
    #[arg(long, global = true, env = "HC2_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write the effective connection settings to the config file.
    Init,
    /// Print information about the contacted controller.
    Info,
    /// Upload a Lua scene, creating it when the file carries no scene id.
    Upload(UploadArgs),
    /// Download one or all scenes into a section/room directory tree.
    Download(DownloadArgs),
    /// Trigger a scene action and/or print its debug messages.
    Interact(InteractArgs),
    /// List devices, or print the selected devices in full.
    Devices(DevicesArgs),
    /// Print global variables as JSON.
    Globals(GlobalsArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// The Lua file to upload
    #[arg(value_name = "LUA_SCRIPT")]
    pub script: PathBuf,

    /// Scene id to use. Without one a new scene is created.
    #[arg(long, short = 's')]
    pub scene_id: Option<i64>,

    /// Room id to use
    #[arg(long, short = 'r')]
    pub room_id: Option<i64>,

    /// Scene name to use instead of the header's or the file name
    #[arg(long)]
    pub scene_name: Option<String>,

    /// Write the header block even if the file has none
    #[arg(long)]
    pub create_header: bool,

    /// Print the resulting scene instead of uploading it
    #[arg(long, short = 'd')]
    pub dont_upload: bool,

    /// Leave require statements untouched
    #[arg(long)]
    pub dont_expand: bool,

    /// Directory to search for required libraries
    #[arg(long, short = 'e', value_name = "DIR", default_value = ".")]
    pub expand_path: PathBuf,

    /// Require statements containing this tag are commented out, not inlined.
    /// Pass an empty string to inline everything.
    #[arg(long, default_value = hc2_core::include::DEFAULT_IGNORE_TAG)]
    pub ignore_tag: String,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Scene to download. All scenes when omitted.
    #[arg(long, short = 's')]
    pub scene_id: Option<i64>,

    /// Target directory
    #[arg(long, default_value = "./download")]
    pub dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct InteractArgs {
    /// Scene to interact with
    #[arg(long, short = 's', conflicts_with = "file")]
    pub scene_id: Option<i64>,

    /// Take the scene id from the header of this Lua file
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Action to trigger: start, stop, enable or disable
    #[arg(long, short = 'a')]
    pub action: Option<SceneAction>,

    /// Print the scene's debug messages
    #[arg(long, short = 'g')]
    pub get_debug: bool,

    /// Keep polling for new debug messages
    #[arg(long, short = 't', requires = "get_debug")]
    pub tail: bool,
}

#[derive(Args, Debug)]
pub struct DevicesArgs {
    /// Devices to print. Lists all devices when omitted.
    #[arg(value_name = "DEVICE_ID")]
    pub ids: Vec<i64>,

    /// Include invisible devices in the list
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct GlobalsArgs {
    /// Variables to print. All when omitted.
    #[arg(value_name = "VAR_NAME")]
    pub names: Vec<String>,

    /// Pretty-print the JSON values
    #[arg(long, alias = "prettyprint")]
    pub pretty: bool,
}
