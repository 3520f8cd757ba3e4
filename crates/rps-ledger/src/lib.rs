//! RPS Ledger Library
//!
//! Primitives the game registry consumes from its execution environment:
//! - Caller identity (`Address`)
//! - Value transfer (`Ledger` trait and `MockLedger`)
//! - Trusted time (`Clock` trait, `SystemClock`, `ManualClock`)

pub mod address;
pub mod clock;
pub mod ledger;

pub use address::{Address, AddressParseError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::{Ledger, LedgerError, MockLedger, Payout, Transfer, TransferKind};
