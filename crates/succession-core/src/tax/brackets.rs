use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::SuccessionError;
use crate::types::{round_cents, Money, Rate};
use crate::SuccessionResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One marginal bracket. `upper_bound == None` marks the open top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bracket {
    pub upper_bound: Option<Money>,
    pub rate: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    pub name: &'static str,
    pub brackets: &'static [Bracket],
}

const fn bracket(upper_bound: Option<Money>, rate: Rate) -> Bracket {
    Bracket { upper_bound, rate }
}

// ---------------------------------------------------------------------------
// Published tables (CGI art. 777, Service-Public)
// ---------------------------------------------------------------------------

/// Direct line: children, in both succession and donation.
pub const DIRECT_LINE: BracketTable = BracketTable {
    name: "direct_line",
    brackets: &[
        bracket(Some(dec!(8072)), dec!(0.05)),
        bracket(Some(dec!(12109)), dec!(0.10)),
        bracket(Some(dec!(15932)), dec!(0.15)),
        bracket(Some(dec!(552324)), dec!(0.20)),
        bracket(Some(dec!(902838)), dec!(0.30)),
        bracket(Some(dec!(1805677)), dec!(0.40)),
        bracket(None, dec!(0.45)),
    ],
};

/// Gifts between spouses or registered partners.
pub const SPOUSE_PARTNER_GIFT: BracketTable = BracketTable {
    name: "spouse_partner_gift",
    brackets: &[
        bracket(Some(dec!(8072)), dec!(0.05)),
        bracket(Some(dec!(15932)), dec!(0.10)),
        bracket(Some(dec!(31865)), dec!(0.15)),
        bracket(Some(dec!(552324)), dec!(0.20)),
        bracket(Some(dec!(902838)), dec!(0.30)),
        bracket(Some(dec!(1805677)), dec!(0.40)),
        bracket(None, dec!(0.45)),
    ],
};

impl BracketTable {
    /// Bounds strictly ascending, rates within [0, 1], only the last bracket open.
    pub fn validate(&self) -> SuccessionResult<()> {
        let Some(last) = self.brackets.last() else {
            return Err(SuccessionError::InvalidConfig(format!(
                "bracket table '{}' is empty",
                self.name
            )));
        };
        if last.upper_bound.is_some() {
            return Err(SuccessionError::InvalidConfig(format!(
                "bracket table '{}' has no open top bracket",
                self.name
            )));
        }

        let mut previous = Decimal::ZERO;
        for (i, b) in self.brackets.iter().enumerate() {
            if b.rate < Decimal::ZERO || b.rate > Decimal::ONE {
                return Err(SuccessionError::InvalidConfig(format!(
                    "bracket table '{}' rate {} at index {} outside [0, 1]",
                    self.name, b.rate, i
                )));
            }
            match b.upper_bound {
                Some(bound) if bound <= previous => {
                    return Err(SuccessionError::InvalidConfig(format!(
                        "bracket table '{}' bound {} at index {} is not ascending",
                        self.name, bound, i
                    )));
                }
                Some(bound) => previous = bound,
                None if i + 1 != self.brackets.len() => {
                    return Err(SuccessionError::InvalidConfig(format!(
                        "bracket table '{}' has an open bracket before the top",
                        self.name
                    )));
                }
                None => {}
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Progressive tax
// ---------------------------------------------------------------------------

/// Marginal-bracket tax on `amount`.
///
/// Each bracket taxes the slice of `amount` between the previous upper bound
/// and its own. Intermediate products keep full precision; only the total is
/// rounded to cents. Non-positive amounts yield zero.
pub fn progressive_tax(amount: Money, table: &BracketTable) -> Money {
    let mut remaining = amount.max(Decimal::ZERO);
    let mut tax = Decimal::ZERO;
    let mut last_bound = Decimal::ZERO;

    for b in table.brackets {
        if remaining <= Decimal::ZERO {
            break;
        }
        let slice = match b.upper_bound {
            Some(bound) => remaining.min(bound - last_bound),
            None => remaining,
        };
        if slice > Decimal::ZERO {
            tax += slice * b.rate;
            remaining -= slice;
        }
        if let Some(bound) = b.upper_bound {
            last_bound = bound;
        }
    }

    round_cents(tax)
}
