//! Reserve gateway: forwards principal to the yield-bearing reserve and
//! reads back what the lottery's position is worth.
//!
//! The gateway keeps no state of its own. Principal is pushed to the reserve's
//! address with a token transfer made by this contract, then credited through
//! `deposit`; the reserve pays withdrawals straight to the recipient.

use soroban_sdk::{contractclient, log, token, Address, Env};

use crate::errors::ContractError;
use crate::storage;

/// Interface of the external reserve/vault.
#[contractclient(name = "ReserveClient")]
pub trait Reserve {
    /// Credits `amount` of already-transferred principal to `from`'s position
    /// for `round_id`. Returns the shares minted.
    fn deposit(env: Env, from: Address, round_id: u64, amount: i128) -> i128;

    /// Pays `amount` of the underlying asset out of `owner`'s `round_id`
    /// position to `to`. Returns the shares burned.
    fn withdraw(env: Env, owner: Address, to: Address, round_id: u64, amount: i128) -> i128;

    /// Underlying value currently redeemable from `owner`'s `round_id`
    /// position: principal plus yield, or less than principal after a loss.
    fn redeemable(env: Env, owner: Address, round_id: u64) -> i128;
}

/// Yield figures for a round, derived from the reserve's redeemable value.
pub(crate) struct YieldReport {
    pub redeemable_value: i128,
    pub prize: i128,
    pub shortfall: i128,
}

fn client(env: &Env) -> Result<ReserveClient<'_>, ContractError> {
    let reserve = storage::reserve(env)?;
    Ok(ReserveClient::new(env, &reserve))
}

/// Pulls `amount` from `user` into the contract and forwards it to the
/// reserve. Returns the reserve shares credited for the round.
pub(crate) fn deposit_principal(
    env: &Env,
    user: &Address,
    round_id: u64,
    amount: i128,
) -> Result<i128, ContractError> {
    let asset = storage::asset(env)?;
    let reserve = storage::reserve(env)?;
    let this = env.current_contract_address();

    let token = token::TokenClient::new(env, &asset);
    token.transfer(user, &this, &amount);
    token.transfer(&this, &reserve, &amount);

    Ok(ReserveClient::new(env, &reserve).deposit(&this, &round_id, &amount))
}

/// Pays `amount` from the round's reserve position to `to`.
pub(crate) fn withdraw_principal(
    env: &Env,
    to: &Address,
    round_id: u64,
    amount: i128,
) -> Result<i128, ContractError> {
    if amount == 0 {
        return Ok(0);
    }
    let this = env.current_contract_address();
    Ok(client(env)?.withdraw(&this, to, &round_id, &amount))
}

/// Splits the reserve's redeemable value for the round into yield and
/// shortfall. A loss never produces a negative prize.
pub(crate) fn redeemable_yield(
    env: &Env,
    round_id: u64,
    total_principal: i128,
) -> Result<YieldReport, ContractError> {
    let this = env.current_contract_address();
    let redeemable_value = client(env)?.redeemable(&this, &round_id);

    let surplus = redeemable_value
        .checked_sub(total_principal)
        .ok_or(ContractError::Overflow)?;

    if surplus < 0 {
        let shortfall = surplus.checked_neg().ok_or(ContractError::Overflow)?;
        log!(env, "reserve shortfall", round_id, shortfall);
        return Ok(YieldReport {
            redeemable_value,
            prize: 0,
            shortfall,
        });
    }

    Ok(YieldReport {
        redeemable_value,
        prize: surplus,
        shortfall: 0,
    })
}

/// Moves `prize` of yield out of the reserve into this contract so the winner
/// can claim it later. Returns the shares burned.
pub(crate) fn redeem_prize(env: &Env, round_id: u64, prize: i128) -> Result<i128, ContractError> {
    if prize == 0 {
        return Ok(0);
    }
    let this = env.current_contract_address();
    Ok(client(env)?.withdraw(&this, &this, &round_id, &prize))
}

/// Sends already-redeemed prize tokens held by the contract to the winner.
pub(crate) fn pay_prize(env: &Env, winner: &Address, amount: i128) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    let asset = storage::asset(env)?;
    token::TokenClient::new(env, &asset).transfer(&env.current_contract_address(), winner, &amount);
    Ok(())
}
