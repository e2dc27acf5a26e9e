use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::facts::Facts;
use crate::report::Report;
use crate::sources::{sources_used, Source};

pub const DOSSIER_SCHEMA: &str = "nlfr-succession-dossier/1";
pub const TOOL_NAME: &str = "nlfr-erf-schenkingsrecht";

pub const DISCLAIMER: &str = "Informational tool. International situations, life insurance, \
     step-children and large estates require review by a notary or tax advisor.";

/// Payload handed to the dossier / print collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct DossierPayload<'a> {
    pub schema: &'static str,
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub inputs: &'a Facts,
    pub outputs: &'a Report,
    pub sources_used: Vec<Source>,
    pub disclaimer: &'static str,
}

/// Package facts and report for export. The caller supplies the timestamp so
/// the payload stays reproducible.
pub fn build_dossier<'a>(
    facts: &'a Facts,
    report: &'a Report,
    generated_at: DateTime<Utc>,
) -> DossierPayload<'a> {
    DossierPayload {
        schema: DOSSIER_SCHEMA,
        tool: TOOL_NAME,
        version: env!("CARGO_PKG_VERSION"),
        generated_at,
        inputs: facts,
        outputs: report,
        sources_used: sources_used(report.mode, report.nudges.iter().map(|n| n.source)),
        disclaimer: DISCLAIMER,
    }
}

/// Plain-text summary for copy/paste.
pub fn plain_summary(facts: &Facts, report: &Report) -> String {
    let mut lines = vec![
        "Inheritance / gift tax NL-FR — summary".to_string(),
        format!("Mode: {}", report.mode.label()),
        format!("Net estate: € {}", report.net_estate),
        format!("Relation: {}", facts.family.relation.label()),
        format!("Children: {}", facts.family.children_count),
        String::new(),
    ];

    for r in &report.recipients {
        let tax = if r.result.computed {
            format!("€ {}", r.result.tax)
        } else {
            "not computed".to_string()
        };
        lines.push(format!(
            "{} ({}): gross € {} | tax {} | net € {}",
            r.label, r.relation_label, r.result.gross, tax, r.result.net
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Benchmark ({}): tax € {} | gap € {} [{}]",
        report.gap.benchmark_label,
        report.gap.tax_min,
        report.gap.tax_gap,
        report.gap.severity.label()
    ));
    if let Some(s) = &report.adoption_simple_savings {
        lines.push(format!(
            "Adoption simple: potential savings € {} (third-party tax € {} vs direct line € {})",
            s.savings, s.third_party_total, s.direct_line_total
        ));
    }

    let sources: Vec<&str> = sources_used(report.mode, report.nudges.iter().map(|n| n.source))
        .iter()
        .map(|s| s.name)
        .collect();
    lines.push(format!("Sources: {}", sources.join("; ")));

    lines.join("\n")
}
