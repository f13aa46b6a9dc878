//! `hc2 globals`

use std::path::Path;

use anyhow::Context as _;
use hc2_client::models::GlobalVariable;

use crate::args::{GlobalsArgs, LoginArgs};
use crate::context;

pub async fn run(config_path: &Path, login: &LoginArgs, args: GlobalsArgs) -> anyhow::Result<()> {
    let config = context::load_config(config_path, login)?;
    let client = context::connect(&config)?;

    let variables = if args.names.is_empty() {
        client
            .global_variables()
            .await
            .context("Cannot list global variables")?
    } else {
        let mut selected = Vec::with_capacity(args.names.len());
        for name in &args.names {
            match client.global_variable(name).await? {
                Some(variable) => selected.push(variable),
                None => tracing::warn!(name = %name, "No such global variable"),
            }
        }
        selected
    };

    for variable in &variables {
        println!("{}", render(variable, args.pretty)?);
    }
    Ok(())
}

fn render(variable: &GlobalVariable, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(variable)
    } else {
        serde_json::to_string(variable)
    }
}
