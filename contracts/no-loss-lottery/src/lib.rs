#![no_std]
//! No-loss lottery contract.
//!
//! Participants deposit principal into a round; the principal earns yield in
//! an external reserve; a randomness oracle picks one depositor, weighted by
//! principal, to receive the yield. Principal is always reclaimable in full.

mod contract;
mod errors;
mod events;
mod guard;
mod ledger;
mod randomness;
mod reserve;
mod round;
mod settlement;
mod storage;
mod types;

pub use contract::{NoLossLottery, NoLossLotteryClient};
pub use errors::{ContractError, ErrorKind};
pub use randomness::{Randomifier, RandomifierClient};
pub use reserve::{Reserve, ReserveClient};
pub use types::{Config, RandomnessRequest, Round, RoundState, Settlement, Ticket};

#[cfg(test)]
mod tests;
