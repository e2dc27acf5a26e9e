use chrono::Utc;
use serde_json::{json, Value};

use succession_core::export::{build_dossier, plain_summary};
use succession_core::nudges::{self, NudgeContext};
use succession_core::{analyse, compute_report};

use super::facts::FactsArgs;
use crate::config;

pub fn run_report(
    args: FactsArgs,
    config_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let facts = args.read("report")?;
    let config = config::load(config_path)?;
    let result = analyse(&facts, &config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_nudges(
    args: FactsArgs,
    config_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let facts = args.read("nudges")?;
    let config = config::load(config_path)?;
    let normalized = facts.normalize();
    let ctx = NudgeContext::new(&normalized.facts, config.home_jurisdiction);
    Ok(serde_json::to_value(nudges::evaluate(&ctx))?)
}

pub fn run_dossier(
    args: FactsArgs,
    config_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let facts = args.read("dossier")?;
    let config = config::load(config_path)?;
    config.validate()?;
    let report = compute_report(&facts, &config);
    let payload = build_dossier(&facts, &report, Utc::now());
    Ok(serde_json::to_value(payload)?)
}

pub fn run_summary(
    args: FactsArgs,
    config_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let facts = args.read("summary")?;
    let config = config::load(config_path)?;
    config.validate()?;
    let report = compute_report(&facts, &config);
    Ok(json!({ "summary": plain_summary(&facts, &report) }))
}
