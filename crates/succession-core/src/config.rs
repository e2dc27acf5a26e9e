use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::SuccessionError;
use crate::facts::Jurisdiction;
use crate::tax::brackets::{DIRECT_LINE, SPOUSE_PARTNER_GIFT};
use crate::types::{Money, Rate};
use crate::SuccessionResult;

/// How the resolver treats recipients without a modeled statutory path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    #[default]
    /// Record the recipient as "not computed": zero tax, net equals gross.
    Decline,
    /// Flat third-party rate after a small allowance (60% after 1,594 in the
    /// historical variant of the wizard).
    ThirdPartyFlatRate { rate: Rate, allowance: Money },
}

impl UnresolvedPolicy {
    pub fn third_party_default() -> Self {
        UnresolvedPolicy::ThirdPartyFlatRate {
            rate: dec!(0.60),
            allowance: dec!(1594),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gaps above this amount are flagged as bad, below as warn.
    pub gap_warn_threshold: Money,
    /// Jurisdiction the tax model is written for; other anchors are cross-border.
    pub home_jurisdiction: Jurisdiction,
    pub unresolved_policy: UnresolvedPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gap_warn_threshold: dec!(5000),
            home_jurisdiction: Jurisdiction::Fr,
            unresolved_policy: UnresolvedPolicy::Decline,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> SuccessionResult<()> {
        if self.gap_warn_threshold < Decimal::ZERO {
            return Err(SuccessionError::InvalidConfig(format!(
                "gap_warn_threshold must be non-negative, got {}",
                self.gap_warn_threshold
            )));
        }
        if let UnresolvedPolicy::ThirdPartyFlatRate { rate, allowance } = &self.unresolved_policy {
            if *rate < Decimal::ZERO || *rate > Decimal::ONE {
                return Err(SuccessionError::InvalidConfig(format!(
                    "third-party rate must be within [0, 1], got {}",
                    rate
                )));
            }
            if *allowance < Decimal::ZERO {
                return Err(SuccessionError::InvalidConfig(format!(
                    "third-party allowance must be non-negative, got {}",
                    allowance
                )));
            }
        }
        DIRECT_LINE.validate()?;
        SPOUSE_PARTNER_GIFT.validate()?;
        Ok(())
    }
}
