//! Error definitions for the no-loss lottery contract.

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    OnlyRandomifier = 4,
    InvalidAmount = 5,
    InvalidDuration = 6,
    RoundNotActive = 7,
    RoundActive = 8,
    RoundNotEndedOrAwaiting = 9,
    RoundNotEnded = 10,
    RoundNotResolved = 11,
    RandomnessPending = 12,
    StaleOrUnknownRequest = 13,
    RequestNotStale = 14,
    AlreadyClaimed = 15,
    NoEntries = 16,
    NotWinner = 17,
    NothingToReclaim = 18,
    RoundFull = 19,
    CooldownNotElapsed = 20,
    OperationInFlight = 21,
    Overflow = 22,
}

/// Coarse classification of [`ContractError`] for callers that only care
/// about the family of failure.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    StateViolation,
    AuthorizationViolation,
    ValidationViolation,
    IdempotencyViolation,
    ProtocolViolation,
    AccountingAnomaly,
    Configuration,
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        use ContractError::*;

        match self {
            RoundNotActive | RoundActive | RoundNotEndedOrAwaiting | RoundNotEnded
            | RoundNotResolved | RandomnessPending | CooldownNotElapsed | OperationInFlight
            | RoundFull => ErrorKind::StateViolation,
            Unauthorized | OnlyRandomifier | NotWinner => ErrorKind::AuthorizationViolation,
            InvalidAmount | InvalidDuration => ErrorKind::ValidationViolation,
            AlreadyClaimed | AlreadyInitialized => ErrorKind::IdempotencyViolation,
            StaleOrUnknownRequest | RequestNotStale => ErrorKind::ProtocolViolation,
            NoEntries | NothingToReclaim | Overflow => ErrorKind::AccountingAnomaly,
            NotInitialized => ErrorKind::Configuration,
        }
    }
}
