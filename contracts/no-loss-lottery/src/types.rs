//! Type definitions for the no-loss lottery.

use soroban_sdk::{contracttype, Address};

/// Round duration used until the admin configures one (one week).
pub const DEFAULT_ROUND_DURATION: u64 = 7 * 24 * 60 * 60;

/// Pause between a resolved round and the next keeper-started round.
pub const DEFAULT_COOLDOWN_PERIOD: u64 = 60 * 60;

/// How long a randomness request may stay unanswered before the admin can
/// cancel it.
pub const DEFAULT_RANDOMNESS_TIMEOUT: u64 = 24 * 60 * 60;

/// Upper bound on distinct depositors per round; keeps the draw bounded.
#[cfg(not(test))]
pub const MAX_ENTRIES_PER_ROUND: u32 = 1_000;
#[cfg(test)]
pub const MAX_ENTRIES_PER_ROUND: u32 = 16;

/// Persistent storage TTL in ledgers (~30 days at 5s/ledger).
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

/// Lifecycle of the current round
#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RoundState {
    Idle = 0,
    Active = 1,
    Ended = 2,
    AwaitingRandomness = 3,
    Resolved = 4,
}

/// Storage keys for contract data
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // instance(): configuration and the live round
    Admin,
    Asset,
    Reserve,
    Randomifier,
    RoundDuration,
    CooldownPeriod,
    RandomnessTimeout,
    NextRoundStart,
    NextTicketId,
    OutstandingPrincipal,
    CurrentRound,
    PendingRequest,
    Busy,
    // persistent(): per-round and per-user records
    Ticket(u64),
    UserTickets(Address),
    RoundTickets(u64, Address),
    Entries(u64),
    Shares(u64, Address),
    PrincipalClaimed(u64, Address),
    Settlement(u64),
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Round {
    pub round_id: u64,
    pub state: RoundState,
    pub start_timestamp: u64,
    pub end_timestamp: u64,
    pub total_principal: i128, // Sum of ticket principals in this round
    pub reserve_shares: i128,  // Shares credited by the reserve for those deposits
    pub entry_count: u32,      // Distinct depositors
}

impl Round {
    pub fn idle(round_id: u64) -> Self {
        Round {
            round_id,
            state: RoundState::Idle,
            start_timestamp: 0,
            end_timestamp: 0,
            total_principal: 0,
            reserve_shares: 0,
            entry_count: 0,
        }
    }
}

/// An immutable record binding principal to a depositor within one round.
/// Only `claimed` ever changes after minting.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Ticket {
    pub ticket_id: u64,
    pub owner: Address,
    pub round_id: u64,
    pub round_end_timestamp: u64,
    pub principal: i128,
    pub claimed: bool,
}

/// The one in-flight randomness request, if any.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct RandomnessRequest {
    pub round_id: u64,
    pub request_id: u64,
    pub requested_at: u64,
}

/// Outcome of a resolved round. Written once by settlement; afterwards only
/// `prize_claimed` flips.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Settlement {
    pub round_id: u64,
    pub winner: Option<Address>,
    pub random_value: u128,
    pub total_principal: i128,
    pub redeemable_value: i128,
    pub prize_amount_redeemed: i128,
    pub prize_shares_redeemed: i128,
    pub shortfall: i128, // Principal the reserve could not cover; shared pro rata on reclaim
    pub prize_claimed: bool,
    pub principal_reclaimed: i128,
    pub value_reclaimed: i128,
    pub resolved_at: u64,
}

/// Read-only snapshot of the contract configuration.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub admin: Address,
    pub asset: Address,
    pub reserve: Address,
    pub randomifier: Address,
    pub round_duration: u64,
    pub cooldown_period: u64,
    pub randomness_timeout: u64,
    pub next_round_start: u64,
}
