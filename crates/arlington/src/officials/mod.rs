//! Disclosure-domain vocabulary for public-official transactions.
//!
//! This module provides the categorical attributes carried on disclosed
//! trades: political party affiliation and transaction type. Raw disclosure
//! data spells these inconsistently, so both types parse tolerantly and
//! preserve unrecognized spellings rather than dropping rows.

pub mod party;
pub mod transaction;

pub use party::Party;
pub use transaction::TransactionType;
