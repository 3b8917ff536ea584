//! Weighted winner draw and prize settlement.

use soroban_sdk::{log, Address, Env, Vec};

use crate::errors::ContractError;
use crate::types::{DataKey, Round, RoundState, Settlement};
use crate::{events, guard, reserve, round, storage};

/// Picks the entry whose share range contains `random_value mod total`.
///
/// Entries own contiguous ranges of `[0, total)` in insertion order, so an
/// entry's odds are its shares over `total`. Returns `None` for an empty pool.
pub(crate) fn weighted_draw<F>(
    entries: &Vec<Address>,
    total: i128,
    random_value: u128,
    shares_of: F,
) -> Option<Address>
where
    F: Fn(&Address) -> i128,
{
    if total <= 0 {
        return None;
    }

    let pick = random_value % (total as u128);
    let mut upper: u128 = 0;
    for entry in entries.iter() {
        let weight = shares_of(&entry);
        if weight <= 0 {
            continue;
        }
        upper = upper.saturating_add(weight as u128);
        if pick < upper {
            return Some(entry);
        }
    }
    None
}

/// Draws the winner, redeems the round's yield and marks the round Resolved.
/// Called by the randomness coordinator with the pending request cleared.
pub(crate) fn settle(
    env: &Env,
    mut current: Round,
    random_value: u128,
) -> Result<Settlement, ContractError> {
    let round_id = current.round_id;
    let now = env.ledger().timestamp();

    let mut settlement = Settlement {
        round_id,
        winner: None,
        random_value,
        total_principal: current.total_principal,
        redeemable_value: 0,
        prize_amount_redeemed: 0,
        prize_shares_redeemed: 0,
        shortfall: 0,
        prize_claimed: false,
        principal_reclaimed: 0,
        value_reclaimed: 0,
        resolved_at: now,
    };

    if current.total_principal == 0 {
        log!(env, "round resolved without entries", round_id);
        events::no_entries(env, round_id);
    } else {
        let entries = storage::entries(env, round_id);
        let winner = weighted_draw(&entries, current.total_principal, random_value, |user| {
            storage::shares(env, round_id, user)
        })
        .ok_or(ContractError::NoEntries)?;

        let report = reserve::redeemable_yield(env, round_id, current.total_principal)?;
        if report.shortfall > 0 {
            // Written off here; depositors share the loss on reclaim
            let outstanding = storage::outstanding_principal(env)
                .checked_sub(report.shortfall)
                .ok_or(ContractError::Overflow)?;
            storage::set_outstanding_principal(env, outstanding);
            events::yield_shortfall(env, round_id, report.shortfall);
        }

        settlement.redeemable_value = report.redeemable_value;
        settlement.shortfall = report.shortfall;
        settlement.prize_amount_redeemed = report.prize;
        settlement.prize_shares_redeemed = reserve::redeem_prize(env, round_id, report.prize)?;
        settlement.winner = Some(winner);
    }

    storage::set_settlement(env, &settlement);

    current.state = RoundState::Resolved;
    storage::set_current_round(env, &current);

    let next_start = now
        .checked_add(round::cooldown_period(env))
        .ok_or(ContractError::Overflow)?;
    storage::set_instance(env, &DataKey::NextRoundStart, &next_start);

    events::round_resolved(
        env,
        round_id,
        &settlement.winner,
        settlement.prize_amount_redeemed,
        random_value,
    );

    Ok(settlement)
}

/// Pays the round's redeemed yield to its winner, once.
pub(crate) fn claim_prize(env: &Env, user: &Address, round_id: u64) -> Result<i128, ContractError> {
    let mut settlement = storage::settlement(env, round_id).ok_or(ContractError::RoundNotResolved)?;

    let winner = settlement.winner.clone().ok_or(ContractError::NoEntries)?;
    if *user != winner {
        return Err(ContractError::NotWinner);
    }
    if settlement.prize_claimed {
        return Err(ContractError::AlreadyClaimed);
    }

    guard::enter(env)?;

    settlement.prize_claimed = true;
    storage::set_settlement(env, &settlement);

    let amount = settlement.prize_amount_redeemed;
    reserve::pay_prize(env, &winner, amount)?;

    guard::exit(env);

    events::prize_claimed(env, &winner, amount, round_id);

    Ok(amount)
}
