//! Per-user share and ticket bookkeeping.
//!
//! Shares are 1:1 with deposited principal and double as draw weight. Every
//! record is keyed by round id, so a user's reclaim right does not depend on
//! which round is currently live.

use soroban_sdk::{Address, Env};

use crate::errors::ContractError;
use crate::types::{RoundState, Settlement, Ticket, MAX_ENTRIES_PER_ROUND};
use crate::{events, guard, reserve, storage};

/// Mints a ticket for `amount` in the active round and forwards the principal
/// to the reserve. Returns the new ticket id.
pub(crate) fn deposit(env: &Env, user: &Address, amount: i128) -> Result<u64, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let mut round = storage::current_round(env)?;
    if round.state != RoundState::Active {
        return Err(ContractError::RoundNotActive);
    }
    if env.ledger().timestamp() >= round.end_timestamp {
        return Err(ContractError::RoundNotActive);
    }

    guard::enter(env)?;

    let round_id = round.round_id;
    let previous_shares = storage::shares(env, round_id, user);

    if previous_shares == 0 {
        if round.entry_count >= MAX_ENTRIES_PER_ROUND {
            return Err(ContractError::RoundFull);
        }
        let mut entries = storage::entries(env, round_id);
        entries.push_back(user.clone());
        storage::set_entries(env, round_id, &entries);
        round.entry_count = round
            .entry_count
            .checked_add(1)
            .ok_or(ContractError::Overflow)?;
    }

    let new_shares = previous_shares
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    storage::set_shares(env, round_id, user, new_shares);

    round.total_principal = round
        .total_principal
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;

    let outstanding = storage::outstanding_principal(env)
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    storage::set_outstanding_principal(env, outstanding);

    let ticket_id = storage::next_ticket_id(env)?;
    let ticket = Ticket {
        ticket_id,
        owner: user.clone(),
        round_id,
        round_end_timestamp: round.end_timestamp,
        principal: amount,
        claimed: false,
    };
    storage::set_ticket(env, &ticket);

    let mut history = storage::user_tickets(env, user);
    history.push_back(ticket_id);
    storage::set_user_tickets(env, user, &history);

    let mut in_round = storage::round_tickets(env, round_id, user);
    in_round.push_back(ticket_id);
    storage::set_round_tickets(env, round_id, user, &in_round);

    storage::set_current_round(env, &round);

    let reserve_shares = reserve::deposit_principal(env, user, round_id, amount)?;

    round.reserve_shares = round
        .reserve_shares
        .checked_add(reserve_shares)
        .ok_or(ContractError::Overflow)?;
    storage::set_current_round(env, &round);

    guard::exit(env);

    events::deposited(env, user, amount, round_id, ticket_id);

    Ok(ticket_id)
}

/// Returns `user`'s principal for a resolved round, or their pro-rata share
/// of what the reserve still held if the round settled with a shortfall. The
/// claim flag and the tickets are marked before the reserve pays out.
pub(crate) fn reclaim_principal(
    env: &Env,
    user: &Address,
    round_id: u64,
) -> Result<i128, ContractError> {
    let mut settlement = storage::settlement(env, round_id).ok_or(ContractError::RoundNotResolved)?;
    if storage::principal_claimed(env, round_id, user) {
        return Err(ContractError::AlreadyClaimed);
    }

    let shares = storage::shares(env, round_id, user);
    if shares == 0 {
        return Err(ContractError::NothingToReclaim);
    }
    let amount = reclaim_amount(&settlement, shares)?;

    guard::enter(env)?;

    storage::set_principal_claimed(env, round_id, user);

    for ticket_id in storage::round_tickets(env, round_id, user).iter() {
        if let Some(mut ticket) = storage::ticket(env, ticket_id) {
            ticket.claimed = true;
            storage::set_ticket(env, &ticket);
        }
    }

    settlement.principal_reclaimed = settlement
        .principal_reclaimed
        .checked_add(shares)
        .ok_or(ContractError::Overflow)?;
    settlement.value_reclaimed = settlement
        .value_reclaimed
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    storage::set_settlement(env, &settlement);

    let outstanding = storage::outstanding_principal(env)
        .checked_sub(amount)
        .ok_or(ContractError::Overflow)?;
    storage::set_outstanding_principal(env, outstanding);

    reserve::withdraw_principal(env, user, round_id, amount)?;

    guard::exit(env);

    events::reclaimed(env, user, amount, round_id);

    Ok(amount)
}

/// Value owed for `shares` of a settled round. Without a shortfall that is the
/// principal itself. After a loss each depositor gets `shares / total` of what
/// was recovered, rounded down, and the last one out takes the remainder so
/// nothing is left behind in the reserve.
fn reclaim_amount(settlement: &Settlement, shares: i128) -> Result<i128, ContractError> {
    if settlement.shortfall == 0 {
        return Ok(shares);
    }

    let recovered = settlement
        .total_principal
        .checked_sub(settlement.shortfall)
        .ok_or(ContractError::Overflow)?;

    let reclaimed_after = settlement
        .principal_reclaimed
        .checked_add(shares)
        .ok_or(ContractError::Overflow)?;
    if reclaimed_after >= settlement.total_principal {
        return recovered
            .checked_sub(settlement.value_reclaimed)
            .ok_or(ContractError::Overflow);
    }

    shares
        .checked_mul(recovered)
        .and_then(|v| v.checked_div(settlement.total_principal))
        .ok_or(ContractError::Overflow)
}
