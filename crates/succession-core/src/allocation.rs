use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::facts::Relation;
use crate::tax::resolver::RecipientCategory;
use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Partner / children split of the net estate. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationSplit {
    partner_pct: Percent,
    children_pct: Percent,
}

impl AllocationSplit {
    /// Children receive whatever the partner does not.
    pub fn from_partner_pct(partner_pct: Percent) -> Self {
        let partner_pct = partner_pct.max(Decimal::ZERO).min(dec!(100));
        Self {
            partner_pct,
            children_pct: dec!(100) - partner_pct,
        }
    }

    pub fn all_to_partner() -> Self {
        Self::from_partner_pct(dec!(100))
    }

    pub fn all_to_children() -> Self {
        Self::from_partner_pct(Decimal::ZERO)
    }

    pub fn partner_pct(&self) -> Percent {
        self.partner_pct
    }

    pub fn children_pct(&self) -> Percent {
        self.children_pct
    }
}

/// Gross amount routed to one recipient, before tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub label: String,
    pub category: RecipientCategory,
    pub gross: Money,
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Split the net estate between the partner and equal child shares.
///
/// With no children and a partner present the partner takes everything,
/// whatever the split says. Children all receive the same share. Recipients
/// left with nothing are omitted, so a non-positive estate yields an empty list.
pub fn allocate(
    net_estate: Money,
    relation: Relation,
    children_count: u32,
    split: AllocationSplit,
) -> Vec<Allocation> {
    let mut out = Vec::new();
    if net_estate <= Decimal::ZERO {
        return out;
    }

    let partner_category = relation.partner_category();
    let partner_gross = match partner_category {
        Some(_) if children_count == 0 => net_estate,
        // Fraction first: the product never exceeds the estate.
        Some(_) => net_estate * (split.partner_pct() / dec!(100)),
        None => Decimal::ZERO,
    };
    let children_total = (net_estate - partner_gross).max(Decimal::ZERO);

    log::debug!(
        "allocating {} : partner {} / children {} over {} child(ren)",
        net_estate,
        partner_gross,
        children_total,
        children_count
    );

    if let Some(category) = partner_category {
        if partner_gross > Decimal::ZERO {
            out.push(Allocation {
                label: "Partner".to_string(),
                category,
                gross: partner_gross,
            });
        }
    }

    if children_count > 0 && children_total > Decimal::ZERO {
        let per_child = children_total / Decimal::from(children_count);
        for i in 1..=children_count {
            out.push(Allocation {
                label: format!("Child {}", i),
                category: RecipientCategory::Child,
                gross: per_child,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_always_sums_to_hundred() {
        for pct in [dec!(-20), dec!(0), dec!(37.5), dec!(100), dec!(250)] {
            let split = AllocationSplit::from_partner_pct(pct);
            assert_eq!(split.partner_pct() + split.children_pct(), dec!(100));
        }
        assert_eq!(AllocationSplit::from_partner_pct(dec!(250)).partner_pct(), dec!(100));
    }

    #[test]
    fn test_near_max_estate_does_not_overflow() {
        let out = allocate(
            Decimal::MAX,
            Relation::Married,
            2,
            AllocationSplit::from_partner_pct(dec!(50)),
        );
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|a| a.gross > Decimal::ZERO));
    }

    #[test]
    fn test_zero_estate_empty_allocation() {
        let out = allocate(
            Decimal::ZERO,
            Relation::Married,
            2,
            AllocationSplit::from_partner_pct(dec!(50)),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_no_children_partner_takes_all() {
        let out = allocate(
            dec!(400_000),
            Relation::Married,
            0,
            AllocationSplit::from_partner_pct(dec!(10)),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].category, RecipientCategory::SpouseOrPartner);
        assert_eq!(out[0].gross, dec!(400_000));
    }

    #[test]
    fn test_partner_and_three_children() {
        let out = allocate(
            dec!(300_000),
            Relation::Pacs,
            3,
            AllocationSplit::from_partner_pct(dec!(40)),
        );
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].gross, dec!(120_000));
        for child in &out[1..] {
            assert_eq!(child.category, RecipientCategory::Child);
            assert_eq!(child.gross, dec!(60_000));
        }
        assert_eq!(out[3].label, "Child 3");
        let total: Money = out.iter().map(|a| a.gross).sum();
        assert_eq!(total, dec!(300_000));
    }

    #[test]
    fn test_single_parent_children_share_everything() {
        let out = allocate(
            dec!(90_000),
            Relation::Single,
            2,
            AllocationSplit::from_partner_pct(dec!(70)),
        );
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|a| a.gross == dec!(45_000)));
    }

    #[test]
    fn test_single_without_children_allocates_nothing() {
        let out = allocate(
            dec!(90_000),
            Relation::Single,
            0,
            AllocationSplit::from_partner_pct(dec!(50)),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_cohabiting_partner_is_unresolved() {
        let out = allocate(
            dec!(100_000),
            Relation::Cohabiting,
            1,
            AllocationSplit::from_partner_pct(dec!(50)),
        );
        assert_eq!(out[0].category, RecipientCategory::Unknown);
        assert_eq!(out[1].category, RecipientCategory::Child);
    }

    #[test]
    fn test_uneven_division_within_a_cent() {
        let out = allocate(
            dec!(100_000),
            Relation::Single,
            3,
            AllocationSplit::all_to_children(),
        );
        let total: Money = out.iter().map(|a| a.gross).sum();
        assert!((total - dec!(100_000)).abs() < dec!(0.01));
    }

    #[test]
    fn test_all_to_partner_leaves_children_out() {
        let out = allocate(
            dec!(100_000),
            Relation::Married,
            2,
            AllocationSplit::all_to_partner(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].gross, dec!(100_000));
    }
}
