use clap::Args;
use serde_json::{json, Value};

use crate::config;

/// Arguments for writing the default engine config
#[derive(Args)]
pub struct InitConfigArgs {
    /// Where to write the TOML file
    #[arg(long, default_value = "succession.toml")]
    pub path: String,
}

pub fn run_init_config(args: InitConfigArgs) -> Result<Value, Box<dyn std::error::Error>> {
    config::write_default(&args.path)?;
    Ok(json!({ "path": args.path, "written": true }))
}
