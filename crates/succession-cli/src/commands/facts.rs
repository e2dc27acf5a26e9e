use clap::Args;

use succession_core::Facts;

use crate::input;

/// Arguments shared by every command that works on a full fact snapshot
#[derive(Args)]
pub struct FactsArgs {
    /// Path to JSON facts file
    #[arg(long)]
    pub input: Option<String>,
}

impl FactsArgs {
    pub fn read(&self, what: &str) -> Result<Facts, Box<dyn std::error::Error>> {
        let raw: serde_json::Value = input::read_input(self.input.as_deref(), what)?;
        Ok(Facts::from_value(raw)?)
    }
}
