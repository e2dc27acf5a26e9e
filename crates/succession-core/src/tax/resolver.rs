use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::brackets::{progressive_tax, BracketTable, DIRECT_LINE, SPOUSE_PARTNER_GIFT};
use crate::config::UnresolvedPolicy;
use crate::types::{round_cents, Money};

/// Child allowance, succession and donation alike (CGI art. 779 I).
pub const CHILD_ALLOWANCE: Money = dec!(100_000);

/// Spouse / registered partner allowance on lifetime gifts (CGI art. 790 E/F).
pub const SPOUSE_GIFT_ALLOWANCE: Money = dec!(80_724);

/// Family cash-gift allowance on top of the child allowance (CGI art. 790 G).
pub const CASH_GIFT_ALLOWANCE: Money = dec!(31_865);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// Transfer on death.
    Succession,
    /// Lifetime gift.
    Donation,
}

impl TransferMode {
    pub fn label(self) -> &'static str {
        match self {
            TransferMode::Succession => "Succession (on death)",
            TransferMode::Donation => "Donation (lifetime gift)",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationRegime {
    #[default]
    Standard,
    /// Family cash gift with the extra 31,865 allowance.
    #[serde(alias = "cash_gift_31865")]
    CashGift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientCategory {
    SpouseOrPartner,
    Child,
    /// Cohabitants, unreconciled step-children and anything else without a
    /// modeled statutory path.
    Unknown,
}

impl RecipientCategory {
    pub fn label(self) -> &'static str {
        match self {
            RecipientCategory::SpouseOrPartner => "Spouse / partner",
            RecipientCategory::Child => "Child",
            RecipientCategory::Unknown => "Unresolved",
        }
    }
}

/// Tax outcome for one recipient. All amounts are rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub gross: Money,
    pub allowance: Money,
    pub taxable: Money,
    pub tax: Money,
    pub net: Money,
    /// False when the engine declined to compute tax for this recipient.
    pub computed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

impl TaxResult {
    fn finalize(gross: Money, allowance: Money, taxable: Money, tax: Money) -> Self {
        Self {
            gross: round_cents(gross),
            allowance: round_cents(allowance),
            taxable: round_cents(taxable),
            tax: round_cents(tax),
            net: round_cents((gross - tax).max(Decimal::ZERO)),
            computed: true,
            notes: Vec::new(),
        }
    }

    fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolve allowance, taxable base and tax for one recipient.
///
/// | mode       | category          | allowance          | table               |
/// |------------|-------------------|--------------------|---------------------|
/// | succession | spouse/partner    | full gross         | exempt              |
/// | succession | child             | 100,000            | direct line         |
/// | donation   | spouse/partner    | 80,724             | spouse/partner gift |
/// | donation   | child             | 100,000 (+31,865)  | direct line         |
/// | any        | unknown           | per `policy`       | per `policy`        |
pub fn resolve(
    mode: TransferMode,
    category: RecipientCategory,
    gross: Money,
    regime: DonationRegime,
    policy: &UnresolvedPolicy,
) -> TaxResult {
    let gross = gross.max(Decimal::ZERO);

    match (mode, category) {
        (TransferMode::Succession, RecipientCategory::SpouseOrPartner) => {
            TaxResult::finalize(gross, gross, Decimal::ZERO, Decimal::ZERO)
                .with_note("Surviving spouse / partner exempt from succession duties")
        }
        (TransferMode::Succession, RecipientCategory::Child) => {
            with_allowance(gross, CHILD_ALLOWANCE, &DIRECT_LINE)
        }
        (TransferMode::Donation, RecipientCategory::SpouseOrPartner) => {
            with_allowance(gross, SPOUSE_GIFT_ALLOWANCE, &SPOUSE_PARTNER_GIFT)
        }
        (TransferMode::Donation, RecipientCategory::Child) => {
            let taxable = (gross - CHILD_ALLOWANCE).max(Decimal::ZERO);
            match regime {
                DonationRegime::Standard => with_allowance(gross, CHILD_ALLOWANCE, &DIRECT_LINE),
                DonationRegime::CashGift => {
                    let extra = CASH_GIFT_ALLOWANCE.min(taxable);
                    let taxable = taxable - extra;
                    let tax = progressive_tax(taxable, &DIRECT_LINE);
                    TaxResult::finalize(gross, CHILD_ALLOWANCE + extra, taxable, tax).with_note(
                        "Cash-gift allowance applied indicatively; statutory conditions not checked",
                    )
                }
            }
        }
        (_, RecipientCategory::Unknown) => resolve_unknown(gross, policy),
    }
}

fn with_allowance(gross: Money, allowance: Money, table: &BracketTable) -> TaxResult {
    let taxable = (gross - allowance).max(Decimal::ZERO);
    let tax = progressive_tax(taxable, table);
    TaxResult::finalize(gross, allowance, taxable, tax)
}

fn resolve_unknown(gross: Money, policy: &UnresolvedPolicy) -> TaxResult {
    match policy {
        UnresolvedPolicy::Decline => {
            let mut result = TaxResult::finalize(gross, Decimal::ZERO, gross, Decimal::ZERO)
                .with_note("No statutory path modeled for this relationship; tax not computed");
            result.computed = false;
            result
        }
        UnresolvedPolicy::ThirdPartyFlatRate { rate, allowance } => {
            let taxable = (gross - *allowance).max(Decimal::ZERO);
            let tax = round_cents(taxable * *rate);
            TaxResult::finalize(gross, *allowance, taxable, tax).with_note(format!(
                "Third-party flat rate of {}% applied; indicative only",
                (*rate * dec!(100)).normalize()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decline() -> UnresolvedPolicy {
        UnresolvedPolicy::Decline
    }

    #[test]
    fn test_succession_spouse_fully_exempt() {
        let r = resolve(
            TransferMode::Succession,
            RecipientCategory::SpouseOrPartner,
            dec!(500_000),
            DonationRegime::Standard,
            &decline(),
        );
        assert_eq!(r.tax, Decimal::ZERO);
        assert_eq!(r.allowance, dec!(500_000));
        assert_eq!(r.taxable, Decimal::ZERO);
        assert_eq!(r.net, dec!(500_000));
        assert!(r.computed);
    }

    #[test]
    fn test_succession_child_allowance_and_direct_line() {
        let r = resolve(
            TransferMode::Succession,
            RecipientCategory::Child,
            dec!(150_000),
            DonationRegime::Standard,
            &decline(),
        );
        assert_eq!(r.allowance, dec!(100_000));
        assert_eq!(r.taxable, dec!(50_000));
        assert_eq!(r.tax, progressive_tax(dec!(50_000), &DIRECT_LINE));
        assert_eq!(r.net, dec!(150_000) - r.tax);
    }

    #[test]
    fn test_child_below_allowance_pays_nothing() {
        let r = resolve(
            TransferMode::Succession,
            RecipientCategory::Child,
            dec!(60_000),
            DonationRegime::Standard,
            &decline(),
        );
        assert_eq!(r.taxable, Decimal::ZERO);
        assert_eq!(r.tax, Decimal::ZERO);
        assert_eq!(r.net, dec!(60_000));
    }

    #[test]
    fn test_donation_spouse_uses_gift_table() {
        let r = resolve(
            TransferMode::Donation,
            RecipientCategory::SpouseOrPartner,
            dec!(100_724),
            DonationRegime::Standard,
            &decline(),
        );
        assert_eq!(r.allowance, dec!(80_724));
        assert_eq!(r.taxable, dec!(20_000));
        assert_eq!(r.tax, progressive_tax(dec!(20_000), &SPOUSE_PARTNER_GIFT));
    }

    #[test]
    fn test_donation_child_cash_gift_extra_allowance() {
        let r = resolve(
            TransferMode::Donation,
            RecipientCategory::Child,
            dec!(140_000),
            DonationRegime::CashGift,
            &decline(),
        );
        assert_eq!(r.taxable, dec!(8135));
        assert_eq!(r.allowance, dec!(131_865));
        assert_eq!(r.tax, progressive_tax(dec!(8135), &DIRECT_LINE));
        assert!(!r.notes.is_empty());
    }

    #[test]
    fn test_cash_gift_never_pushes_taxable_negative() {
        let r = resolve(
            TransferMode::Donation,
            RecipientCategory::Child,
            dec!(110_000),
            DonationRegime::CashGift,
            &decline(),
        );
        assert_eq!(r.taxable, Decimal::ZERO);
        assert_eq!(r.allowance, dec!(110_000));
        assert_eq!(r.tax, Decimal::ZERO);
    }

    #[test]
    fn test_cash_gift_ignored_in_succession() {
        let standard = resolve(
            TransferMode::Succession,
            RecipientCategory::Child,
            dec!(140_000),
            DonationRegime::Standard,
            &decline(),
        );
        let cash = resolve(
            TransferMode::Succession,
            RecipientCategory::Child,
            dec!(140_000),
            DonationRegime::CashGift,
            &decline(),
        );
        assert_eq!(standard, cash);
    }

    #[test]
    fn test_unknown_declined_by_default() {
        let r = resolve(
            TransferMode::Succession,
            RecipientCategory::Unknown,
            dec!(200_000),
            DonationRegime::Standard,
            &decline(),
        );
        assert!(!r.computed);
        assert_eq!(r.allowance, Decimal::ZERO);
        assert_eq!(r.taxable, dec!(200_000));
        assert_eq!(r.tax, Decimal::ZERO);
        assert_eq!(r.net, dec!(200_000));
    }

    #[test]
    fn test_unknown_third_party_flat_rate() {
        let policy = UnresolvedPolicy::ThirdPartyFlatRate {
            rate: dec!(0.60),
            allowance: dec!(1594),
        };
        let r = resolve(
            TransferMode::Succession,
            RecipientCategory::Unknown,
            dec!(101_594),
            DonationRegime::Standard,
            &policy,
        );
        assert!(r.computed);
        assert_eq!(r.taxable, dec!(100_000));
        assert_eq!(r.tax, dec!(60_000));
        assert_eq!(r.net, dec!(41_594));
        assert!(r.notes[0].contains("60%"));
    }

    #[test]
    fn test_negative_gross_clamped() {
        let r = resolve(
            TransferMode::Donation,
            RecipientCategory::Child,
            dec!(-5),
            DonationRegime::Standard,
            &decline(),
        );
        assert_eq!(r.gross, Decimal::ZERO);
        assert_eq!(r.net, Decimal::ZERO);
        assert_eq!(r.tax, Decimal::ZERO);
    }

    #[test]
    fn test_fields_rounded_to_cents() {
        let r = resolve(
            TransferMode::Succession,
            RecipientCategory::Child,
            dec!(100_000.005),
            DonationRegime::Standard,
            &decline(),
        );
        assert_eq!(r.gross, dec!(100_000.01));
        assert_eq!(r.taxable, dec!(0.01));
    }
}
