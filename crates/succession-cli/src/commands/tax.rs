use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;

use succession_core::tax::{resolve, DonationRegime, RecipientCategory, TransferMode};
use succession_core::with_metadata;

use crate::config;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Succession,
    Donation,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    /// Married spouse or PACS partner
    Spouse,
    Child,
    /// Cohabitant or any recipient without a modeled statutory path
    Unknown,
}

/// Arguments for a single-recipient tax computation
#[derive(Args)]
pub struct TaxArgs {
    /// Path to JSON request ({"mode", "category", "gross", "donation_regime"})
    #[arg(long, conflicts_with_all = ["mode", "category", "gross"])]
    pub input: Option<String>,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,

    /// Gross amount received, in euros
    #[arg(long)]
    pub gross: Option<Decimal>,

    /// Apply the family cash-gift allowance (donation only)
    #[arg(long)]
    pub cash_gift: bool,
}

#[derive(Debug, Deserialize)]
pub struct TaxRequest {
    pub mode: TransferMode,
    pub category: RecipientCategory,
    pub gross: Decimal,
    #[serde(default)]
    pub donation_regime: DonationRegime,
}

impl TaxArgs {
    fn request(&self) -> Result<TaxRequest, Box<dyn std::error::Error>> {
        match (self.mode, self.category, self.gross) {
            (Some(mode), Some(category), Some(gross)) => Ok(TaxRequest {
                mode: match mode {
                    ModeArg::Succession => TransferMode::Succession,
                    ModeArg::Donation => TransferMode::Donation,
                },
                category: match category {
                    CategoryArg::Spouse => RecipientCategory::SpouseOrPartner,
                    CategoryArg::Child => RecipientCategory::Child,
                    CategoryArg::Unknown => RecipientCategory::Unknown,
                },
                gross,
                donation_regime: if self.cash_gift {
                    DonationRegime::CashGift
                } else {
                    DonationRegime::Standard
                },
            }),
            (None, None, None) => input::read_input(self.input.as_deref(), "tax"),
            _ => Err("--mode, --category and --gross must be given together".into()),
        }
    }
}

pub fn run_tax(
    args: TaxArgs,
    config_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let req = args.request()?;
    let config = config::load(config_path)?;
    config.validate()?;

    let result = resolve(
        req.mode,
        req.category,
        req.gross,
        req.donation_regime,
        &config.unresolved_policy,
    );

    let mut warnings = Vec::new();
    if req.donation_regime == DonationRegime::CashGift && req.mode == TransferMode::Succession {
        warnings.push("cash-gift allowance ignored outside donation mode".to_string());
    }
    if !result.computed {
        warnings.push(format!("{}: tax not computed", req.category.label()));
    }

    let output = with_metadata(
        "Allowance per recipient, then marginal brackets on the taxable base",
        &serde_json::json!({
            "mode": req.mode,
            "category": req.category,
            "donation_regime": req.donation_regime,
            "unresolved_policy": config.unresolved_policy,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn args(mode: ModeArg, category: CategoryArg, gross: Decimal, cash_gift: bool) -> TaxArgs {
        TaxArgs {
            input: None,
            mode: Some(mode),
            category: Some(category),
            gross: Some(gross),
            cash_gift,
        }
    }

    #[test]
    fn test_child_succession_from_flags() {
        let v = run_tax(
            args(ModeArg::Succession, CategoryArg::Child, dec!(120750), false),
            None,
        )
        .unwrap();
        assert_eq!(v["result"]["tax"], "2344.35");
        assert_eq!(v["result"]["computed"], true);
    }

    #[test]
    fn test_cash_gift_flag_maps_regime() {
        let req = args(ModeArg::Donation, CategoryArg::Child, dec!(140000), true)
            .request()
            .unwrap();
        assert_eq!(req.donation_regime, DonationRegime::CashGift);
        assert_eq!(req.category, RecipientCategory::Child);
    }

    #[test]
    fn test_partial_flags_rejected() {
        let a = TaxArgs {
            input: None,
            mode: Some(ModeArg::Donation),
            category: None,
            gross: Some(dec!(1000)),
            cash_gift: false,
        };
        assert!(a.request().is_err());
    }

    #[test]
    fn test_unknown_category_warns() {
        let v = run_tax(
            args(ModeArg::Succession, CategoryArg::Unknown, dec!(50000), false),
            None,
        )
        .unwrap();
        assert_eq!(v["result"]["computed"], false);
        assert!(v["warnings"][0].as_str().unwrap().contains("not computed"));
    }
}
