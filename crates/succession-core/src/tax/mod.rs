pub mod brackets;
pub mod resolver;

pub use brackets::{progressive_tax, Bracket, BracketTable, DIRECT_LINE, SPOUSE_PARTNER_GIFT};
pub use resolver::{resolve, DonationRegime, RecipientCategory, TaxResult, TransferMode};
