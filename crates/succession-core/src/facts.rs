use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::allocation::AllocationSplit;
use crate::error::SuccessionError;
use crate::tax::resolver::{DonationRegime, RecipientCategory, TransferMode};
use crate::types::{Money, Percent};
use crate::SuccessionResult;

/// Upper bound on the number of children the engine models.
pub const MAX_CHILDREN: u32 = 20;

/// Upper bound on assets and debts.
pub const MAX_MONEY: Money = dec!(1_000_000_000_000);

// ---------------------------------------------------------------------------
// Family
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Married,
    /// French registered partnership (PACS).
    Pacs,
    #[serde(alias = "cohab")]
    Cohabiting,
    Single,
}

impl Relation {
    pub fn has_partner(self) -> bool {
        !matches!(self, Relation::Single)
    }

    /// Tax category of the partner. Cohabitants get no spousal treatment.
    pub fn partner_category(self) -> Option<RecipientCategory> {
        match self {
            Relation::Married | Relation::Pacs => Some(RecipientCategory::SpouseOrPartner),
            Relation::Cohabiting => Some(RecipientCategory::Unknown),
            Relation::Single => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Relation::Married => "Married",
            Relation::Pacs => "Registered partnership (PACS)",
            Relation::Cohabiting => "Cohabiting",
            Relation::Single => "No partner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyFacts {
    pub relation: Relation,
    pub children_count: u32,
    pub has_stepchildren: bool,
    pub has_adopted_children: bool,
    pub has_minor_children: bool,
    pub has_children_from_earlier_relationship: bool,
}

impl Default for FamilyFacts {
    fn default() -> Self {
        Self {
            relation: Relation::Married,
            children_count: 2,
            has_stepchildren: false,
            has_adopted_children: false,
            has_minor_children: false,
            has_children_from_earlier_relationship: false,
        }
    }
}

impl FamilyFacts {
    pub fn has_partner(&self) -> bool {
        self.relation.has_partner()
    }
}

// ---------------------------------------------------------------------------
// Anchors (connecting factors for applicable law)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    Fr,
    Nl,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetLocation {
    Fr,
    Nl,
    Mixed,
}

impl AssetLocation {
    pub fn is_in(self, jurisdiction: Jurisdiction) -> bool {
        matches!(
            (self, jurisdiction),
            (AssetLocation::Fr, Jurisdiction::Fr) | (AssetLocation::Nl, Jurisdiction::Nl)
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceOfLaw {
    #[default]
    None,
    /// Law of the nationality, chosen by will (EU 650/2012 art. 22).
    Nationality,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Anchors {
    pub habitual_residence: Jurisdiction,
    pub nationality: Jurisdiction,
    pub main_assets_location: AssetLocation,
    pub choice_of_law: ChoiceOfLaw,
}

impl Default for Anchors {
    fn default() -> Self {
        Self {
            habitual_residence: Jurisdiction::Fr,
            nationality: Jurisdiction::Nl,
            main_assets_location: AssetLocation::Fr,
            choice_of_law: ChoiceOfLaw::None,
        }
    }
}

impl Anchors {
    /// True when any connecting factor points outside `home`.
    pub fn is_cross_border(&self, home: Jurisdiction) -> bool {
        self.habitual_residence != home
            || self.nationality != home
            || !self.main_assets_location.is_in(home)
    }
}

// ---------------------------------------------------------------------------
// Estate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstateFacts {
    pub assets_total: Money,
    pub debts_total: Money,
    pub includes_main_home: bool,
    pub includes_life_insurance: bool,
    pub includes_business: bool,
}

impl Default for EstateFacts {
    fn default() -> Self {
        Self {
            assets_total: dec!(500_000),
            debts_total: dec!(50_000),
            includes_main_home: true,
            includes_life_insurance: false,
            includes_business: false,
        }
    }
}

impl EstateFacts {
    /// Assets minus debts, each clamped at zero first, floored at zero.
    pub fn net_estate(&self) -> Money {
        let assets = self.assets_total.max(Decimal::ZERO);
        let debts = self.debts_total.max(Decimal::ZERO);
        (assets - debts).max(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Will & scenario
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WillFacts {
    pub has_will: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioFacts {
    pub mode: TransferMode,
    /// Share of the net estate for the partner; children get the rest.
    pub partner_pct: Percent,
    pub donation_regime: DonationRegime,
}

impl Default for ScenarioFacts {
    fn default() -> Self {
        Self {
            mode: TransferMode::Succession,
            partner_pct: dec!(50),
            donation_regime: DonationRegime::Standard,
        }
    }
}

impl ScenarioFacts {
    pub fn split(&self) -> AllocationSplit {
        AllocationSplit::from_partner_pct(self.partner_pct)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Immutable snapshot of everything the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facts {
    pub family: FamilyFacts,
    pub anchors: Anchors,
    pub estate: EstateFacts,
    pub will: WillFacts,
    pub scenario: ScenarioFacts,
    /// Repairs made to the raw JSON before it could be typed.
    #[serde(skip)]
    pub intake_adjustments: Vec<String>,
}

/// Facts brought into their valid domain, plus a record of every adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFacts {
    pub facts: Facts,
    pub adjustments: Vec<String>,
}

impl Facts {
    /// Parse a JSON fact snapshot.
    pub fn from_json(text: &str) -> SuccessionResult<Facts> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Build facts from an already parsed JSON document.
    ///
    /// Unusable numbers (negative or fractional child counts, text where an
    /// amount belongs) are repaired here and listed in `intake_adjustments`
    /// so they surface with the other input adjustments. Structural problems
    /// still fail, and the retired `mixed` mode is an input error.
    pub fn from_value(mut value: Value) -> SuccessionResult<Facts> {
        if value.pointer("/scenario/mode").and_then(Value::as_str) == Some("mixed") {
            return Err(SuccessionError::InvalidInput {
                field: "scenario.mode".into(),
                reason: "mixed mode is not supported; use succession or donation".into(),
            });
        }

        let mut repairs = Vec::new();
        repair_count(&mut value, "/family/children_count", &mut repairs);
        for pointer in [
            "/estate/assets_total",
            "/estate/debts_total",
            "/scenario/partner_pct",
        ] {
            repair_amount(&mut value, pointer, &mut repairs);
        }

        let mut facts: Facts = serde_json::from_value(value)?;
        facts.intake_adjustments = repairs;
        Ok(facts)
    }

    /// Clamp out-of-range inputs instead of failing. The engine is total over
    /// its input domain; every clamp is reported back as an adjustment.
    pub fn normalize(&self) -> NormalizedFacts {
        let mut facts = self.clone();
        let mut adjustments = std::mem::take(&mut facts.intake_adjustments);

        if facts.estate.assets_total < Decimal::ZERO {
            adjustments.push(format!(
                "assets_total {} is negative; treated as 0",
                facts.estate.assets_total
            ));
            facts.estate.assets_total = Decimal::ZERO;
        }
        if facts.estate.debts_total < Decimal::ZERO {
            adjustments.push(format!(
                "debts_total {} is negative; treated as 0",
                facts.estate.debts_total
            ));
            facts.estate.debts_total = Decimal::ZERO;
        }
        if facts.estate.assets_total > MAX_MONEY {
            adjustments.push(format!(
                "assets_total {} exceeds {}; capped",
                facts.estate.assets_total, MAX_MONEY
            ));
            facts.estate.assets_total = MAX_MONEY;
        }
        if facts.estate.debts_total > MAX_MONEY {
            adjustments.push(format!(
                "debts_total {} exceeds {}; capped",
                facts.estate.debts_total, MAX_MONEY
            ));
            facts.estate.debts_total = MAX_MONEY;
        }
        if facts.family.children_count > MAX_CHILDREN {
            adjustments.push(format!(
                "children_count {} exceeds {}; capped",
                facts.family.children_count, MAX_CHILDREN
            ));
            facts.family.children_count = MAX_CHILDREN;
        }
        let pct = facts.scenario.partner_pct;
        if pct < Decimal::ZERO || pct > dec!(100) {
            let clamped = pct.max(Decimal::ZERO).min(dec!(100));
            adjustments.push(format!(
                "partner_pct {} outside 0..=100; clamped to {}",
                pct, clamped
            ));
            facts.scenario.partner_pct = clamped;
        }
        if facts.estate.net_estate().is_zero() {
            adjustments.push("net estate is zero or negative; nothing to allocate".to_string());
        }

        for adjustment in &adjustments {
            log::warn!("input adjusted: {}", adjustment);
        }

        NormalizedFacts { facts, adjustments }
    }
}

// ---------------------------------------------------------------------------
// Raw JSON repair
// ---------------------------------------------------------------------------

fn field_name(pointer: &str) -> &str {
    pointer.rsplit('/').next().unwrap_or(pointer)
}

/// Child count as a whole number in `0..=MAX_CHILDREN`. Fractions truncate,
/// anything non-numeric counts as zero.
fn repair_count(value: &mut Value, pointer: &str, repairs: &mut Vec<String>) {
    let Some(slot) = value.pointer_mut(pointer) else {
        return;
    };
    if slot.as_u64().is_some_and(|n| n <= u64::from(u32::MAX)) {
        return;
    }

    let whole = match &*slot {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.trunc() as i64),
        _ => None,
    }
    .unwrap_or(0);
    let repaired = whole.clamp(0, i64::from(MAX_CHILDREN));

    repairs.push(format!(
        "{} {} is not a valid count; treated as {}",
        field_name(pointer),
        slot,
        repaired
    ));
    *slot = Value::from(repaired);
}

/// Amount as a decimal. Text that is not a number counts as zero; finite
/// floats too large for a decimal are capped at `MAX_MONEY`.
fn repair_amount(value: &mut Value, pointer: &str, repairs: &mut Vec<String>) {
    let Some(slot) = value.pointer_mut(pointer) else {
        return;
    };

    let parsed = match &*slot {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return;
            }
            match n.as_f64() {
                Some(f) => match Decimal::try_from(f) {
                    Ok(_) => return,
                    Err(_) if f.is_finite() && f > 0.0 => Some(MAX_MONEY),
                    Err(_) => None,
                },
                None => None,
            }
        }
        Value::String(s) => {
            let s = s.trim();
            match Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)) {
                Ok(_) => return,
                Err(_) => None,
            }
        }
        _ => None,
    };
    let repaired = parsed.unwrap_or(Decimal::ZERO);

    repairs.push(format!(
        "{} {} is not a usable amount; treated as {}",
        field_name(pointer),
        slot,
        repaired
    ));
    *slot = Value::String(repaired.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_estate_assets_minus_debts() {
        let estate = EstateFacts {
            assets_total: dec!(533_000),
            debts_total: dec!(50_000),
            ..EstateFacts::default()
        };
        assert_eq!(estate.net_estate(), dec!(483_000));
    }

    #[test]
    fn test_net_estate_never_negative() {
        let estate = EstateFacts {
            assets_total: dec!(10_000),
            debts_total: dec!(25_000),
            ..EstateFacts::default()
        };
        assert_eq!(estate.net_estate(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_debts_ignored() {
        let estate = EstateFacts {
            assets_total: dec!(10_000),
            debts_total: dec!(-5_000),
            ..EstateFacts::default()
        };
        assert_eq!(estate.net_estate(), dec!(10_000));
    }

    #[test]
    fn test_normalize_clamps_and_reports() {
        let mut facts = Facts::default();
        facts.estate.assets_total = dec!(-1);
        facts.family.children_count = 40;
        facts.scenario.partner_pct = dec!(140);
        let normalized = facts.normalize();
        assert_eq!(normalized.facts.estate.assets_total, Decimal::ZERO);
        assert_eq!(normalized.facts.family.children_count, MAX_CHILDREN);
        assert_eq!(normalized.facts.scenario.partner_pct, dec!(100));
        // assets, children, pct, non-positive net estate
        assert_eq!(normalized.adjustments.len(), 4);
    }

    #[test]
    fn test_normalize_valid_facts_untouched() {
        let facts = Facts::default();
        let normalized = facts.normalize();
        assert_eq!(normalized.facts, facts);
        assert!(normalized.adjustments.is_empty());
    }

    #[test]
    fn test_cross_border_detection() {
        let mut anchors = Anchors {
            habitual_residence: Jurisdiction::Fr,
            nationality: Jurisdiction::Fr,
            main_assets_location: AssetLocation::Fr,
            choice_of_law: ChoiceOfLaw::None,
        };
        assert!(!anchors.is_cross_border(Jurisdiction::Fr));
        anchors.main_assets_location = AssetLocation::Mixed;
        assert!(anchors.is_cross_border(Jurisdiction::Fr));
    }

    #[test]
    fn test_cohabiting_partner_is_unknown_category() {
        assert_eq!(
            Relation::Cohabiting.partner_category(),
            Some(RecipientCategory::Unknown)
        );
        assert_eq!(Relation::Single.partner_category(), None);
        assert!(Relation::Cohabiting.has_partner());
    }

    #[test]
    fn test_facts_deserialize_with_defaults_and_alias() {
        let json = r#"{"family": {"relation": "cohab", "children_count": 1}}"#;
        let facts: Facts = serde_json::from_str(json).unwrap();
        assert_eq!(facts.family.relation, Relation::Cohabiting);
        assert_eq!(facts.family.children_count, 1);
        assert_eq!(facts.scenario.partner_pct, dec!(50));
    }

    #[test]
    fn test_mixed_mode_rejected() {
        let json = r#"{"scenario": {"mode": "mixed"}}"#;
        assert!(serde_json::from_str::<Facts>(json).is_err());
        assert!(matches!(
            Facts::from_json(json),
            Err(SuccessionError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let facts = Facts::from_json(r#"{"family": {"relation": "pacs"}}"#).unwrap();
        assert_eq!(facts.family.relation, Relation::Pacs);
        assert_eq!(facts.family.children_count, 2);
        assert_eq!(facts.estate, EstateFacts::default());
    }

    #[test]
    fn test_from_json_negative_child_count_clamped() {
        let facts = Facts::from_json(r#"{"family": {"children_count": -1}}"#).unwrap();
        assert_eq!(facts.family.children_count, 0);
        assert_eq!(facts.intake_adjustments.len(), 1);
        assert!(facts.intake_adjustments[0].contains("children_count -1"));
    }

    #[test]
    fn test_from_json_fractional_and_text_counts() {
        let facts = Facts::from_json(r#"{"family": {"children_count": 2.7}}"#).unwrap();
        assert_eq!(facts.family.children_count, 2);

        let facts = Facts::from_json(r#"{"family": {"children_count": "3"}}"#).unwrap();
        assert_eq!(facts.family.children_count, 3);

        let facts = Facts::from_json(r#"{"family": {"children_count": 999}}"#).unwrap();
        assert_eq!(facts.family.children_count, 999);
        assert!(facts.intake_adjustments.is_empty());
        assert_eq!(facts.normalize().facts.family.children_count, MAX_CHILDREN);
    }

    #[test]
    fn test_from_json_non_numeric_amount_is_zero() {
        let facts = Facts::from_json(r#"{"estate": {"assets_total": "lots"}}"#).unwrap();
        assert_eq!(facts.estate.assets_total, Decimal::ZERO);
        assert_eq!(facts.estate.debts_total, dec!(50_000));

        let normalized = facts.normalize();
        assert!(normalized.adjustments[0].contains("assets_total \"lots\""));
        assert!(normalized.facts.intake_adjustments.is_empty());
    }

    #[test]
    fn test_from_json_numeric_strings_and_numbers_untouched() {
        let facts = Facts::from_json(
            r#"{"estate": {"assets_total": "533000", "debts_total": 50000.5}}"#,
        )
        .unwrap();
        assert_eq!(facts.estate.assets_total, dec!(533_000));
        assert_eq!(facts.estate.debts_total, dec!(50_000.5));
        assert!(facts.intake_adjustments.is_empty());
    }

    #[test]
    fn test_from_json_structural_errors_still_fail() {
        let err = Facts::from_json(r#"{"family": "two kids"}"#).unwrap_err();
        assert!(matches!(err, SuccessionError::SerializationError(_)));
    }

    #[test]
    fn test_normalize_caps_huge_amounts() {
        let mut facts = Facts::default();
        facts.estate.assets_total = Decimal::MAX;
        facts.estate.debts_total = Decimal::MAX;
        let normalized = facts.normalize();
        assert_eq!(normalized.facts.estate.assets_total, MAX_MONEY);
        assert_eq!(normalized.facts.estate.debts_total, MAX_MONEY);
        assert!(normalized.adjustments.iter().any(|a| a.starts_with("assets_total")));
        assert!(normalized.adjustments.iter().any(|a| a.starts_with("debts_total")));
    }
}
