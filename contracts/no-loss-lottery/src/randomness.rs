//! Two-phase randomness protocol with the external randomifier.
//!
//! `request` records exactly one outstanding request id; the oracle later
//! delivers `fulfill` as a separate invocation, which is matched against that
//! id before settlement runs.

use soroban_sdk::{contractclient, log, symbol_short, Address, Env};

use crate::errors::ContractError;
use crate::types::{DataKey, RandomnessRequest, RoundState, DEFAULT_RANDOMNESS_TIMEOUT};
use crate::{events, guard, settlement, storage};

/// Interface of the external randomness provider.
#[contractclient(name = "RandomifierClient")]
pub trait Randomifier {
    /// Queues a request; the provider answers by invoking
    /// `fulfill_randomness` on `requester`. Returns the request id.
    fn request_randomness(env: Env, requester: Address) -> u64;
}

pub(crate) fn randomness_timeout(env: &Env) -> u64 {
    storage::get_u64(env, &DataKey::RandomnessTimeout, DEFAULT_RANDOMNESS_TIMEOUT)
}

pub(crate) fn set_randomness_timeout(env: &Env, seconds: u64) -> Result<(), ContractError> {
    if seconds == 0 {
        return Err(ContractError::InvalidDuration);
    }
    storage::set_instance(env, &DataKey::RandomnessTimeout, &seconds);
    events::config_updated(env, symbol_short!("timeout"), seconds);
    Ok(())
}

pub(crate) fn set_randomifier(env: &Env, randomifier: &Address) -> Result<(), ContractError> {
    if storage::pending_request(env).is_some() {
        return Err(ContractError::RandomnessPending);
    }
    storage::set_instance(env, &DataKey::Randomifier, randomifier);
    events::randomifier_updated(env, randomifier);
    Ok(())
}

/// Ended → AwaitingRandomness. Returns the oracle's request id.
pub(crate) fn request(env: &Env) -> Result<u64, ContractError> {
    let mut round = storage::current_round(env)?;
    match round.state {
        RoundState::Ended => {}
        RoundState::AwaitingRandomness => return Err(ContractError::RandomnessPending),
        _ => return Err(ContractError::RoundNotEndedOrAwaiting),
    }
    if storage::pending_request(env).is_some() {
        return Err(ContractError::RandomnessPending);
    }

    let randomifier = storage::randomifier(env)?;

    guard::enter(env)?;

    round.state = RoundState::AwaitingRandomness;
    storage::set_current_round(env, &round);

    let request_id =
        RandomifierClient::new(env, &randomifier).request_randomness(&env.current_contract_address());

    storage::set_pending_request(
        env,
        &RandomnessRequest {
            round_id: round.round_id,
            request_id,
            requested_at: env.ledger().timestamp(),
        },
    );

    guard::exit(env);

    events::randomness_requested(env, round.round_id, request_id);

    Ok(request_id)
}

/// Oracle callback: AwaitingRandomness → Resolved, settling the round in the
/// same invocation.
pub(crate) fn fulfill(
    env: &Env,
    caller: &Address,
    request_id: u64,
    random_value: u128,
) -> Result<(), ContractError> {
    let randomifier = storage::randomifier(env)?;
    if *caller != randomifier {
        return Err(ContractError::OnlyRandomifier);
    }
    caller.require_auth();

    let round = storage::current_round(env)?;
    let pending = storage::pending_request(env).ok_or(ContractError::StaleOrUnknownRequest)?;
    if round.state != RoundState::AwaitingRandomness
        || pending.round_id != round.round_id
        || pending.request_id != request_id
    {
        return Err(ContractError::StaleOrUnknownRequest);
    }

    guard::enter(env)?;

    storage::clear_pending_request(env);
    settlement::settle(env, round, random_value)?;

    guard::exit(env);

    Ok(())
}

/// Admin recovery for an oracle that never answered: once the timeout has
/// passed, the request is forgotten and the round drops back to Ended so a
/// new request can be issued.
pub(crate) fn cancel_stale(env: &Env) -> Result<u64, ContractError> {
    let mut round = storage::current_round(env)?;
    let pending = match storage::pending_request(env) {
        Some(p) if round.state == RoundState::AwaitingRandomness => p,
        _ => return Err(ContractError::RoundNotEndedOrAwaiting),
    };

    let stale_at = pending
        .requested_at
        .checked_add(randomness_timeout(env))
        .ok_or(ContractError::Overflow)?;
    if env.ledger().timestamp() < stale_at {
        return Err(ContractError::RequestNotStale);
    }

    storage::clear_pending_request(env);
    round.state = RoundState::Ended;
    storage::set_current_round(env, &round);

    log!(env, "randomness request cancelled", pending.round_id, pending.request_id);
    events::randomness_cancelled(env, pending.round_id, pending.request_id);

    Ok(pending.request_id)
}
