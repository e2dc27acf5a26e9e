//! Contextual legal warnings.
//!
//! Every nudge is one row of [`RULES`]: a pure predicate over the fact
//! snapshot plus the record it emits. Rules are independent of each other and
//! of the tax figures, so each can be exercised on its own through
//! [`NudgeRule::applies`].

use rust_decimal::Decimal;
use serde::Serialize;

use crate::facts::{ChoiceOfLaw, Facts, Jurisdiction, Relation};
use crate::sources::SourceId;
use crate::tax::resolver::{DonationRegime, TransferMode};
use crate::types::{Money, Severity};

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct NudgeContext<'a> {
    pub facts: &'a Facts,
    pub net_estate: Money,
    pub home: Jurisdiction,
}

impl<'a> NudgeContext<'a> {
    pub fn new(facts: &'a Facts, home: Jurisdiction) -> Self {
        Self {
            facts,
            net_estate: facts.estate.net_estate(),
            home,
        }
    }
}

pub struct NudgeRule {
    pub id: &'static str,
    pub severity: Severity,
    pub title: &'static str,
    pub body: &'static str,
    pub source: SourceId,
    pub applies: fn(&NudgeContext<'_>) -> bool,
}

impl NudgeRule {
    pub fn applies(&self, ctx: &NudgeContext<'_>) -> bool {
        (self.applies)(ctx)
    }

    fn to_nudge(&self) -> Nudge {
        Nudge {
            id: self.id,
            severity: self.severity,
            title: self.title,
            body: self.body,
            source: self.source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nudge {
    pub id: &'static str,
    pub severity: Severity,
    pub title: &'static str,
    pub body: &'static str,
    pub source: SourceId,
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn pacs_without_will(c: &NudgeContext<'_>) -> bool {
    c.facts.family.relation == Relation::Pacs && !c.facts.will.has_will
}

fn pacs_in_succession(c: &NudgeContext<'_>) -> bool {
    c.facts.family.relation == Relation::Pacs && c.facts.scenario.mode == TransferMode::Succession
}

fn has_children(c: &NudgeContext<'_>) -> bool {
    c.facts.family.children_count > 0
}

fn children_from_earlier_relationship(c: &NudgeContext<'_>) -> bool {
    c.facts.family.has_children_from_earlier_relationship
}

fn cohabiting(c: &NudgeContext<'_>) -> bool {
    c.facts.family.relation == Relation::Cohabiting
}

fn life_insurance(c: &NudgeContext<'_>) -> bool {
    c.facts.estate.includes_life_insurance
}

fn stepchildren(c: &NudgeContext<'_>) -> bool {
    c.facts.family.has_stepchildren
}

fn adopted_children(c: &NudgeContext<'_>) -> bool {
    c.facts.family.has_adopted_children
}

fn business(c: &NudgeContext<'_>) -> bool {
    c.facts.estate.includes_business
}

fn cross_border(c: &NudgeContext<'_>) -> bool {
    c.facts.anchors.is_cross_border(c.home)
}

fn minor_children(c: &NudgeContext<'_>) -> bool {
    c.facts.family.has_minor_children
}

fn non_positive_estate(c: &NudgeContext<'_>) -> bool {
    c.net_estate <= Decimal::ZERO
}

fn no_will(c: &NudgeContext<'_>) -> bool {
    !c.facts.will.has_will
}

fn choice_of_nationality_law(c: &NudgeContext<'_>) -> bool {
    c.facts.anchors.choice_of_law == ChoiceOfLaw::Nationality
}

fn donation_to_children(c: &NudgeContext<'_>) -> bool {
    c.facts.scenario.mode == TransferMode::Donation && c.facts.family.children_count > 0
}

fn cash_gift_selected(c: &NudgeContext<'_>) -> bool {
    c.facts.scenario.mode == TransferMode::Donation
        && c.facts.scenario.donation_regime == DonationRegime::CashGift
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

pub static RULES: &[NudgeRule] = &[
    NudgeRule {
        id: "pacs_without_will",
        severity: Severity::Warn,
        title: "PACS partners do not inherit automatically",
        body: "A registered partner only receives part of the estate under a will. \
               The succession tax exemption does not change that civil-law rule.",
        source: SourceId::SpPacs2026,
        applies: pacs_without_will,
    },
    NudgeRule {
        id: "pacs_tax_exemption",
        severity: Severity::Ok,
        title: "PACS partner exempt from succession duties",
        body: "A registered partner can be exempt from succession duties. The exemption \
               says nothing about the civil-law division without a will.",
        source: SourceId::SpPacs2026,
        applies: pacs_in_succession,
    },
    NudgeRule {
        id: "reserved_share",
        severity: Severity::Warn,
        title: "Children hold a reserved share",
        body: "With reserved heirs (usually children) not everything can be freely \
               allocated. Plan scenarios with the reserved share and disposable \
               portion in mind.",
        source: SourceId::LegiCc912,
        applies: has_children,
    },
    NudgeRule {
        id: "blended_family",
        severity: Severity::Warn,
        title: "Children from an earlier relationship",
        body: "Children from an earlier relationship keep their reserved share against \
               the surviving partner. Expect more complex planning and have the \
               division reviewed.",
        source: SourceId::LegiCc912,
        applies: children_from_earlier_relationship,
    },
    NudgeRule {
        id: "cohabiting",
        severity: Severity::Bad,
        title: "Cohabiting partners are treated as strangers",
        body: "Without marriage or PACS both civil protection and tax treatment can be \
               very unfavourable. The engine does not compute this case exactly; see a \
               notary or tax advisor for significant amounts.",
        source: SourceId::SpSuccession2025,
        applies: cohabiting,
    },
    NudgeRule {
        id: "life_insurance",
        severity: Severity::Warn,
        title: "Life insurance follows its own regime",
        body: "Life-insurance proceeds (assurance-vie) usually fall outside the ordinary \
               estate rules. No reliable tax figure is given for them.",
        source: SourceId::SpSuccession2025,
        applies: life_insurance,
    },
    NudgeRule {
        id: "stepchildren",
        severity: Severity::Warn,
        title: "Step-children are not direct line",
        body: "Step-children are not treated as direct-line heirs unless legally \
               equalised, for instance through an adoption simple. Without it a much \
               higher rate can apply.",
        source: SourceId::SpDonation2024,
        applies: stepchildren,
    },
    NudgeRule {
        id: "adopted_children",
        severity: Severity::Warn,
        title: "Adoption form may change allowances",
        body: "Allowances can depend on the form of adoption. The engine does not \
               distinguish adoption forms.",
        source: SourceId::SpDonation2024,
        applies: adopted_children,
    },
    NudgeRule {
        id: "business_assets",
        severity: Severity::Warn,
        title: "Business interests not computed",
        body: "Company shares and business assets have their own valuation and relief \
               rules. They are out of scope and not computed.",
        source: SourceId::SpSuccession2025,
        applies: business,
    },
    NudgeRule {
        id: "cross_border",
        severity: Severity::Warn,
        title: "Cross-border: applicable law versus taxation",
        body: "In cross-border situations the applicable succession law and the tax \
               levy must be assessed separately. The figures assume French tax only.",
        source: SourceId::EurLex650_2012,
        applies: cross_border,
    },
    NudgeRule {
        id: "minor_children",
        severity: Severity::Warn,
        title: "Minor children need extra planning",
        body: "Guardianship, executorship and asset administration for minors are a \
               separate legal layer. Address them explicitly in the deed.",
        source: SourceId::LegiCc912,
        applies: minor_children,
    },
    NudgeRule {
        id: "non_positive_estate",
        severity: Severity::Bad,
        title: "Net estate is zero or negative",
        body: "With the current assets and debts there is no positive estate to \
               distribute. Check the input.",
        source: SourceId::SpSuccession2025,
        applies: non_positive_estate,
    },
    NudgeRule {
        id: "no_will",
        severity: Severity::Warn,
        title: "No will: statutory rules apply",
        body: "Without a will the default statutory division applies and the desired \
               split may not be executable.",
        source: SourceId::LegiCc912,
        applies: no_will,
    },
    NudgeRule {
        id: "choice_of_law",
        severity: Severity::Warn,
        title: "Choice of law is civil, not fiscal",
        body: "Choosing the law of your nationality changes the civil-law rules, not \
               where tax is levied. For international successions French law can still \
               grant children a compensatory claim on French assets.",
        source: SourceId::EurLex650_2012,
        applies: choice_of_nationality_law,
    },
    NudgeRule {
        id: "donation_allowance_renewal",
        severity: Severity::Ok,
        title: "Gift allowances renew every 15 years",
        body: "The child allowance on lifetime gifts becomes available again 15 years \
               after the previous gift. Spreading gifts over time can lower the total tax.",
        source: SourceId::SpDonation2024,
        applies: donation_to_children,
    },
    NudgeRule {
        id: "cash_gift_conditions",
        severity: Severity::Warn,
        title: "Cash-gift allowance has conditions",
        body: "The extra 31,865 allowance for family cash gifts only applies under age \
               and relationship conditions. It is applied here indicatively.",
        source: SourceId::SpDonation2024,
        applies: cash_gift_selected,
    },
];

/// Look a rule up by id.
pub fn rule(id: &str) -> Option<&'static NudgeRule> {
    RULES.iter().find(|r| r.id == id)
}

/// Evaluate every rule once, in table order.
pub fn evaluate(ctx: &NudgeContext<'_>) -> Vec<Nudge> {
    RULES
        .iter()
        .filter(|r| r.applies(ctx))
        .map(NudgeRule::to_nudge)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{Anchors, AssetLocation};
    use rust_decimal_macros::dec;

    /// French resident, French national, married, no children, will in place:
    /// fires no warning rule.
    fn quiet_facts() -> Facts {
        let mut f = Facts::default();
        f.family.children_count = 0;
        f.will.has_will = true;
        f.anchors = Anchors {
            habitual_residence: Jurisdiction::Fr,
            nationality: Jurisdiction::Fr,
            main_assets_location: AssetLocation::Fr,
            choice_of_law: ChoiceOfLaw::None,
        };
        f
    }

    fn fires(id: &str, facts: &Facts) -> bool {
        let ctx = NudgeContext::new(facts, Jurisdiction::Fr);
        rule(id).unwrap().applies(&ctx)
    }

    #[test]
    fn test_rule_ids_unique() {
        for (i, a) in RULES.iter().enumerate() {
            for b in &RULES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_quiet_facts_fire_nothing() {
        let facts = quiet_facts();
        let ctx = NudgeContext::new(&facts, Jurisdiction::Fr);
        assert!(evaluate(&ctx).is_empty());
    }

    #[test]
    fn test_pacs_without_will() {
        let mut f = quiet_facts();
        f.family.relation = Relation::Pacs;
        assert!(!fires("pacs_without_will", &f));
        f.will.has_will = false;
        assert!(fires("pacs_without_will", &f));
        assert!(fires("pacs_tax_exemption", &f));
    }

    #[test]
    fn test_children_reserved_share() {
        let mut f = quiet_facts();
        assert!(!fires("reserved_share", &f));
        f.family.children_count = 1;
        assert!(fires("reserved_share", &f));
    }

    #[test]
    fn test_cohabiting_is_bad() {
        let mut f = quiet_facts();
        f.family.relation = Relation::Cohabiting;
        let ctx = NudgeContext::new(&f, Jurisdiction::Fr);
        let nudges = evaluate(&ctx);
        let n = nudges.iter().find(|n| n.id == "cohabiting").unwrap();
        assert_eq!(n.severity, Severity::Bad);
    }

    #[test]
    fn test_flags_map_to_rules() {
        let mut f = quiet_facts();
        f.family.has_stepchildren = true;
        f.family.has_adopted_children = true;
        f.family.has_minor_children = true;
        f.family.has_children_from_earlier_relationship = true;
        f.estate.includes_life_insurance = true;
        f.estate.includes_business = true;
        for id in [
            "stepchildren",
            "adopted_children",
            "minor_children",
            "blended_family",
            "life_insurance",
            "business_assets",
        ] {
            assert!(fires(id, &f), "rule {} should fire", id);
        }
    }

    #[test]
    fn test_any_foreign_anchor_is_cross_border() {
        let mut f = quiet_facts();
        f.anchors.nationality = Jurisdiction::Nl;
        assert!(fires("cross_border", &f));

        let mut f = quiet_facts();
        f.anchors.main_assets_location = AssetLocation::Mixed;
        assert!(fires("cross_border", &f));
    }

    #[test]
    fn test_home_jurisdiction_is_configurable() {
        let mut f = quiet_facts();
        f.anchors.habitual_residence = Jurisdiction::Nl;
        f.anchors.nationality = Jurisdiction::Nl;
        f.anchors.main_assets_location = AssetLocation::Nl;
        let ctx = NudgeContext::new(&f, Jurisdiction::Nl);
        assert!(!rule("cross_border").unwrap().applies(&ctx));
    }

    #[test]
    fn test_non_positive_estate() {
        let mut f = quiet_facts();
        f.estate.assets_total = dec!(10_000);
        f.estate.debts_total = dec!(10_000);
        assert!(fires("non_positive_estate", &f));
    }

    #[test]
    fn test_no_will_and_choice_of_law() {
        let mut f = quiet_facts();
        f.will.has_will = false;
        assert!(fires("no_will", &f));
        f.anchors.choice_of_law = ChoiceOfLaw::Nationality;
        assert!(fires("choice_of_law", &f));
    }

    #[test]
    fn test_donation_rules() {
        let mut f = quiet_facts();
        f.scenario.mode = TransferMode::Donation;
        assert!(!fires("donation_allowance_renewal", &f));
        f.family.children_count = 2;
        assert!(fires("donation_allowance_renewal", &f));
        assert!(!fires("cash_gift_conditions", &f));
        f.scenario.donation_regime = DonationRegime::CashGift;
        assert!(fires("cash_gift_conditions", &f));
    }

    #[test]
    fn test_cash_gift_ignored_outside_donation() {
        let mut f = quiet_facts();
        f.scenario.donation_regime = DonationRegime::CashGift;
        assert!(!fires("cash_gift_conditions", &f));
    }
}
