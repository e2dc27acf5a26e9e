use rust_decimal::Decimal;
use serde::Serialize;

use crate::allocation::{allocate, Allocation, AllocationSplit};
use crate::facts::Relation;
use crate::tax::resolver::TransferMode;
use crate::types::{Money, Severity};

pub const GAP_NOTE: &str = "The benchmark ignores civil-law constraints such as the reserved share \
     of children. It is a fiscal reference point, not a feasible plan.";

/// Engine-chosen reference distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkKind {
    AllToPartner,
    AllToChildren,
}

impl BenchmarkKind {
    pub fn label(self) -> &'static str {
        match self {
            BenchmarkKind::AllToPartner => "100% to partner",
            BenchmarkKind::AllToChildren => "100% to children",
        }
    }

    pub fn split(self) -> AllocationSplit {
        match self {
            BenchmarkKind::AllToPartner => AllocationSplit::all_to_partner(),
            BenchmarkKind::AllToChildren => AllocationSplit::all_to_children(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapResult {
    pub benchmark: BenchmarkKind,
    pub benchmark_label: String,
    pub tax_desired: Money,
    pub tax_min: Money,
    pub tax_gap: Money,
    pub severity: Severity,
    pub note: String,
}

/// Pick the low-tax reference distribution.
///
/// Without children a partner takes everything in any distribution, so that
/// is the reference. Otherwise a cohabitant has no exemption path and the
/// children are the reference; in a succession a married or PACS partner is
/// fully exempt, so the partner is. Everything else (donations, no partner)
/// benchmarks against the children.
pub fn benchmark_kind(
    relation: Relation,
    children_count: u32,
    mode: TransferMode,
) -> BenchmarkKind {
    match (relation, mode) {
        (r, _) if children_count == 0 && r.has_partner() => BenchmarkKind::AllToPartner,
        (Relation::Cohabiting, _) => BenchmarkKind::AllToChildren,
        (r, TransferMode::Succession) if r.has_partner() => BenchmarkKind::AllToPartner,
        _ => BenchmarkKind::AllToChildren,
    }
}

/// Benchmark allocation for the given facts, with the kind that produced it.
pub fn benchmark(
    net_estate: Money,
    relation: Relation,
    children_count: u32,
    mode: TransferMode,
) -> (BenchmarkKind, Vec<Allocation>) {
    let kind = benchmark_kind(relation, children_count, mode);
    log::debug!("benchmark for {:?} / {:?}: {}", relation, mode, kind.label());
    (
        kind,
        allocate(net_estate, relation, children_count, kind.split()),
    )
}

/// Extra tax paid by the desired distribution over the benchmark.
///
/// Zero is ok, up to `warn_threshold` is a warning, above it is bad.
pub fn gap(
    desired_total_tax: Money,
    benchmark_total_tax: Money,
    kind: BenchmarkKind,
    warn_threshold: Money,
) -> GapResult {
    let tax_gap = (desired_total_tax - benchmark_total_tax).max(Decimal::ZERO);
    let severity = if tax_gap.is_zero() {
        Severity::Ok
    } else if tax_gap <= warn_threshold {
        Severity::Warn
    } else {
        Severity::Bad
    };

    GapResult {
        benchmark: kind,
        benchmark_label: kind.label().to_string(),
        tax_desired: desired_total_tax,
        tax_min: benchmark_total_tax,
        tax_gap,
        severity,
        note: GAP_NOTE.to_string(),
    }
}
