//! Round lifecycle: Idle → Active → Ended → AwaitingRandomness → Resolved → Idle.
//!
//! The live round is a single [`Round`] value tagged with a [`RoundState`];
//! each transition checks the tag and fails loudly on anything unexpected.
//! The randomness half of the machine lives in `randomness.rs`.

use soroban_sdk::{symbol_short, Env};

use crate::errors::ContractError;
use crate::types::{DataKey, Round, RoundState, DEFAULT_COOLDOWN_PERIOD, DEFAULT_ROUND_DURATION};
use crate::{events, randomness, storage};

pub(crate) fn round_duration(env: &Env) -> u64 {
    storage::get_u64(env, &DataKey::RoundDuration, DEFAULT_ROUND_DURATION)
}

pub(crate) fn cooldown_period(env: &Env) -> u64 {
    storage::get_u64(env, &DataKey::CooldownPeriod, DEFAULT_COOLDOWN_PERIOD)
}

pub(crate) fn next_round_start(env: &Env) -> u64 {
    storage::get_u64(env, &DataKey::NextRoundStart, 0)
}

pub(crate) fn set_round_duration(env: &Env, seconds: u64) -> Result<(), ContractError> {
    if seconds == 0 {
        return Err(ContractError::InvalidDuration);
    }
    storage::set_instance(env, &DataKey::RoundDuration, &seconds);
    events::config_updated(env, symbol_short!("duration"), seconds);
    Ok(())
}

pub(crate) fn set_cooldown_period(env: &Env, seconds: u64) {
    storage::set_instance(env, &DataKey::CooldownPeriod, &seconds);
    events::config_updated(env, symbol_short!("cooldown"), seconds);
}

/// Opens the next round for deposits. Requires the machine to be Idle.
pub(crate) fn start_round(env: &Env, duration: u64) -> Result<Round, ContractError> {
    if duration == 0 {
        return Err(ContractError::InvalidDuration);
    }

    let current = storage::current_round(env)?;
    if current.state != RoundState::Idle {
        return Err(ContractError::RoundActive);
    }

    let now = env.ledger().timestamp();
    let round_id = current
        .round_id
        .checked_add(1)
        .ok_or(ContractError::Overflow)?;
    let end_timestamp = now.checked_add(duration).ok_or(ContractError::Overflow)?;

    let round = Round {
        round_id,
        state: RoundState::Active,
        start_timestamp: now,
        end_timestamp,
        total_principal: 0,
        reserve_shares: 0,
        entry_count: 0,
    };
    storage::set_current_round(env, &round);

    events::round_started(env, round_id, end_timestamp);

    Ok(round)
}

/// Freezes entries. `enforce_deadline` is false only for the admin override.
pub(crate) fn close_round(env: &Env, enforce_deadline: bool) -> Result<Round, ContractError> {
    let mut round = storage::current_round(env)?;
    if round.state != RoundState::Active {
        return Err(ContractError::RoundNotActive);
    }
    if enforce_deadline && env.ledger().timestamp() < round.end_timestamp {
        return Err(ContractError::RoundNotEnded);
    }

    round.state = RoundState::Ended;
    storage::set_current_round(env, &round);

    events::round_closed(env, round.round_id, round.total_principal, round.entry_count);

    Ok(round)
}

/// Drops the current-round pointer after settlement. Tickets, shares, claim
/// flags and the settlement record stay in persistent storage under the old
/// round id, so nothing owed to users is lost.
pub(crate) fn reset_round_state(env: &Env) -> Result<Round, ContractError> {
    let round = storage::current_round(env)?;
    match round.state {
        RoundState::Resolved => {}
        RoundState::Active => return Err(ContractError::RoundActive),
        RoundState::Idle | RoundState::Ended | RoundState::AwaitingRandomness => {
            return Err(ContractError::RoundNotResolved)
        }
    }

    let idle = Round::idle(round.round_id);
    storage::set_current_round(env, &idle);

    let next_start = env
        .ledger()
        .timestamp()
        .checked_add(cooldown_period(env))
        .ok_or(ContractError::Overflow)?;
    storage::set_instance(env, &DataKey::NextRoundStart, &next_start);

    events::round_reset(env, round.round_id, next_start);

    Ok(idle)
}

/// Keeper entry point: starts a round with the configured duration once the
/// cooldown has elapsed, resetting a resolved round first.
pub(crate) fn auto_start_round(env: &Env) -> Result<Round, ContractError> {
    let current = storage::current_round(env)?;
    let now = env.ledger().timestamp();

    match current.state {
        RoundState::Idle => {}
        RoundState::Resolved => {
            let resolved_at = storage::settlement(env, current.round_id)
                .map(|s| s.resolved_at)
                .unwrap_or(0);
            let ready_at = resolved_at
                .checked_add(cooldown_period(env))
                .ok_or(ContractError::Overflow)?;
            if now < ready_at {
                return Err(ContractError::CooldownNotElapsed);
            }
            reset_round_state(env)?;
            return start_round(env, round_duration(env));
        }
        _ => return Err(ContractError::RoundActive),
    }

    if now < next_round_start(env) {
        return Err(ContractError::CooldownNotElapsed);
    }
    start_round(env, round_duration(env))
}

/// Keeper entry point: closes an expired round and asks the oracle for
/// randomness in the same call. Returns the oracle request id.
pub(crate) fn auto_close_round(env: &Env) -> Result<u64, ContractError> {
    close_round(env, true)?;
    randomness::request(env)
}
