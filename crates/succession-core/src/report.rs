use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Instant;

use crate::allocation::{allocate, Allocation, AllocationSplit};
use crate::benchmark::{benchmark, gap, BenchmarkKind, GapResult};
use crate::config::{EngineConfig, UnresolvedPolicy};
use crate::facts::{Facts, Jurisdiction};
use crate::nudges::{self, Nudge, NudgeContext};
use crate::tax::resolver::{resolve, RecipientCategory, TaxResult, TransferMode};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::SuccessionResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientResult {
    pub label: String,
    pub category: RecipientCategory,
    pub relation_label: String,
    #[serde(flatten)]
    pub result: TaxResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_gross: Money,
    pub total_tax: Money,
    pub total_net: Money,
}

impl Totals {
    /// Sums of the already rounded per-recipient figures.
    pub fn of(recipients: &[RecipientResult]) -> Self {
        Self {
            total_gross: recipients.iter().map(|r| r.result.gross).sum(),
            total_tax: recipients.iter().map(|r| r.result.tax).sum(),
            total_net: recipients.iter().map(|r| r.result.net).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkReport {
    pub kind: BenchmarkKind,
    pub label: String,
    pub recipients: Vec<RecipientResult>,
    pub totals: Totals,
}

/// Something the engine saw but deliberately did not compute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotComputed {
    pub subject: String,
    pub reason: String,
}

/// Step-children taxed as strangers versus as direct-line heirs after an
/// adoption simple. Informational: recipient figures are not affected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdoptionSimpleSavings {
    pub children_count: u32,
    pub per_child_gross: Money,
    pub third_party_rate: Rate,
    pub third_party_allowance: Money,
    pub third_party_tax_per_child: Money,
    pub direct_line_tax_per_child: Money,
    pub third_party_total: Money,
    pub direct_line_total: Money,
    pub savings: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub net_estate: Money,
    pub mode: TransferMode,
    pub split: AllocationSplit,
    pub recipients: Vec<RecipientResult>,
    pub totals: Totals,
    pub benchmark: BenchmarkReport,
    pub gap: GapResult,
    pub nudges: Vec<Nudge>,
    pub not_computed: Vec<NotComputed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adoption_simple_savings: Option<AdoptionSimpleSavings>,
    pub input_adjustments: Vec<String>,
    pub assumptions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Report assembly
// ---------------------------------------------------------------------------

/// Full recomputation from one fact snapshot.
///
/// Pure and total: no I/O, no clock, no global state. Out-of-range facts are
/// clamped and listed in `input_adjustments`; recipients the engine cannot
/// place in a statutory category end up in `not_computed`.
pub fn compute_report(facts: &Facts, config: &EngineConfig) -> Report {
    let normalized = facts.normalize();
    let f = &normalized.facts;
    let relation = f.family.relation;
    let children = f.family.children_count;
    let mode = f.scenario.mode;
    let split = f.scenario.split();

    let net_estate = f.estate.net_estate();

    let desired = allocate(net_estate, relation, children, split);
    let recipients = resolve_all(&desired, f, config);
    let totals = Totals::of(&recipients);

    let (kind, alternative) = benchmark(net_estate, relation, children, mode);
    let benchmark_recipients = resolve_all(&alternative, f, config);
    let benchmark_totals = Totals::of(&benchmark_recipients);

    let gap = gap(
        totals.total_tax,
        benchmark_totals.total_tax,
        kind,
        config.gap_warn_threshold,
    );

    let nudges = nudges::evaluate(&NudgeContext::new(f, config.home_jurisdiction));
    let not_computed = not_computed(f, &recipients, config.home_jurisdiction);
    let adoption_simple_savings = adoption_simple_savings(f, &recipients);

    Report {
        net_estate,
        mode,
        split,
        recipients,
        totals,
        benchmark: BenchmarkReport {
            kind,
            label: kind.label().to_string(),
            recipients: benchmark_recipients,
            totals: benchmark_totals,
        },
        gap,
        nudges,
        not_computed,
        adoption_simple_savings,
        input_adjustments: normalized.adjustments,
        assumptions: assumptions(&config.unresolved_policy),
    }
}

/// Validate the configuration, compute the report and wrap it in the standard
/// output envelope.
pub fn analyse(
    facts: &Facts,
    config: &EngineConfig,
) -> SuccessionResult<ComputationOutput<Report>> {
    let start = Instant::now();
    config.validate()?;

    let report = compute_report(facts, config);

    let mut warnings = report.input_adjustments.clone();
    warnings.extend(
        report
            .not_computed
            .iter()
            .map(|n| format!("{}: {}", n.subject, n.reason)),
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "French succession / donation duties: allowance per recipient, marginal \
         brackets on the taxable base, benchmark gap against a low-tax reference",
        &serde_json::json!({
            "mode": report.mode,
            "net_estate": report.net_estate.to_string(),
            "partner_pct": report.split.partner_pct().to_string(),
            "children_count": facts.family.children_count,
            "unresolved_policy": config.unresolved_policy,
            "gap_warn_threshold": config.gap_warn_threshold.to_string(),
        }),
        warnings,
        elapsed,
        report,
    ))
}

fn resolve_all(
    allocations: &[Allocation],
    facts: &Facts,
    config: &EngineConfig,
) -> Vec<RecipientResult> {
    allocations
        .iter()
        .map(|a| {
            let relation_label = match a.category {
                RecipientCategory::Child => "Child",
                _ => facts.family.relation.label(),
            };
            RecipientResult {
                label: a.label.clone(),
                category: a.category,
                relation_label: relation_label.to_string(),
                result: resolve(
                    facts.scenario.mode,
                    a.category,
                    a.gross,
                    facts.scenario.donation_regime,
                    &config.unresolved_policy,
                ),
            }
        })
        .collect()
}

fn not_computed(
    facts: &Facts,
    recipients: &[RecipientResult],
    home: Jurisdiction,
) -> Vec<NotComputed> {
    let mut out: Vec<NotComputed> = recipients
        .iter()
        .filter(|r| !r.result.computed)
        .map(|r| NotComputed {
            subject: r.label.clone(),
            reason: format!(
                "{}: no spousal or direct-line treatment applies; tax not computed",
                r.relation_label
            ),
        })
        .collect();

    let mut push = |subject: &str, reason: &str| {
        out.push(NotComputed {
            subject: subject.to_string(),
            reason: reason.to_string(),
        })
    };

    if facts.family.has_stepchildren {
        push(
            "Step-children",
            "not modeled separately; every child is computed as direct line \
             (see adoption_simple_savings for the third-party comparison)",
        );
    }
    if facts.family.has_adopted_children {
        push(
            "Adopted children",
            "adoption form not modeled; every child is computed as direct line",
        );
    }
    if facts.estate.includes_life_insurance {
        push("Life insurance", "own tax regime; not part of the computed estate");
    }
    if facts.estate.includes_business {
        push("Business assets", "valuation and business reliefs are out of scope");
    }
    if facts.anchors.is_cross_border(home) {
        push(
            "Foreign taxation",
            "only French duties are computed; foreign levies and credits are not",
        );
    }

    for n in &out {
        log::debug!("not computed: {} ({})", n.subject, n.reason);
    }
    out
}

/// Compare the children's direct-line tax with the third-party flat rate they
/// would pay as step-children without an adoption simple.
fn adoption_simple_savings(
    facts: &Facts,
    recipients: &[RecipientResult],
) -> Option<AdoptionSimpleSavings> {
    if !facts.family.has_stepchildren {
        return None;
    }
    let children: Vec<&RecipientResult> = recipients
        .iter()
        .filter(|r| r.category == RecipientCategory::Child)
        .collect();
    let first = children.first()?;

    let policy = UnresolvedPolicy::third_party_default();
    let UnresolvedPolicy::ThirdPartyFlatRate { rate, allowance } = &policy else {
        return None;
    };
    let per_child_gross = first.result.gross;
    let stranger = resolve(
        facts.scenario.mode,
        RecipientCategory::Unknown,
        per_child_gross,
        facts.scenario.donation_regime,
        &policy,
    );

    let count = Decimal::from(children.len() as u64);
    let third_party_total = stranger.tax * count;
    let direct_line_total = first.result.tax * count;
    let savings = (third_party_total - direct_line_total).max(Decimal::ZERO);
    log::debug!(
        "adoption simple: {} child(ren), third party {} vs direct line {}",
        children.len(),
        third_party_total,
        direct_line_total
    );

    Some(AdoptionSimpleSavings {
        children_count: children.len() as u32,
        per_child_gross,
        third_party_rate: *rate,
        third_party_allowance: *allowance,
        third_party_tax_per_child: stranger.tax,
        direct_line_tax_per_child: first.result.tax,
        third_party_total,
        direct_line_total,
        savings,
    })
}

fn assumptions(policy: &UnresolvedPolicy) -> Vec<String> {
    let mut out = vec![
        "Distribution follows the chosen partner / children percentages of the net estate."
            .to_string(),
        "Children share their portion equally.".to_string(),
        "French brackets and allowances as published by Service-Public.".to_string(),
        "Amounts are rounded to cents per recipient; totals add the rounded figures."
            .to_string(),
    ];
    out.push(match policy {
        UnresolvedPolicy::Decline => {
            "Recipients without a statutory category are reported as not computed.".to_string()
        }
        UnresolvedPolicy::ThirdPartyFlatRate { rate, allowance } => format!(
            "Recipients without a statutory category pay a flat {}% after an allowance of {}.",
            (*rate * Decimal::ONE_HUNDRED).normalize(),
            allowance
        ),
    });
    out
}
