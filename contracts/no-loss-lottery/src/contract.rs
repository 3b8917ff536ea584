//! Core contract implementation for the no-loss lottery.
//!
//! Depositors lock principal for one round; the reserve's yield on the pooled
//! principal is paid to a single winner drawn with oracle randomness, weighted
//! by deposit size. Every depositor reclaims their full principal afterwards.

use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

use crate::errors::ContractError;
use crate::types::{
    Config, DataKey, RandomnessRequest, Round, Settlement, Ticket, DEFAULT_COOLDOWN_PERIOD,
    DEFAULT_RANDOMNESS_TIMEOUT, DEFAULT_ROUND_DURATION,
};
use crate::{events, ledger, randomness, round, settlement, storage};

#[contract]
pub struct NoLossLottery;

#[contractimpl]
impl NoLossLottery {
    /// Initializes the contract with its admin and collaborators (one-time only)
    pub fn initialize(
        env: Env,
        admin: Address,
        asset: Address,
        reserve: Address,
        randomifier: Address,
    ) -> Result<(), ContractError> {
        admin.require_auth();

        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }

        storage::set_instance(&env, &DataKey::Admin, &admin);
        storage::set_instance(&env, &DataKey::Asset, &asset);
        storage::set_instance(&env, &DataKey::Reserve, &reserve);
        storage::set_instance(&env, &DataKey::Randomifier, &randomifier);

        // Default schedule
        storage::set_instance(&env, &DataKey::RoundDuration, &DEFAULT_ROUND_DURATION);
        storage::set_instance(&env, &DataKey::CooldownPeriod, &DEFAULT_COOLDOWN_PERIOD);
        storage::set_instance(&env, &DataKey::RandomnessTimeout, &DEFAULT_RANDOMNESS_TIMEOUT);

        storage::set_current_round(&env, &Round::idle(0));

        events::initialized(&env, &admin, &reserve, &randomifier);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Admin surface
    // -----------------------------------------------------------------------

    pub fn set_randomifier(env: Env, caller: Address, randomifier: Address) -> Result<(), ContractError> {
        Self::_require_admin(&env, &caller)?;
        randomness::set_randomifier(&env, &randomifier)
    }

    /// Sets the duration used by keeper-started rounds
    pub fn set_round_duration(env: Env, caller: Address, seconds: u64) -> Result<(), ContractError> {
        Self::_require_admin(&env, &caller)?;
        round::set_round_duration(&env, seconds)
    }

    pub fn set_cooldown_period(env: Env, caller: Address, seconds: u64) -> Result<(), ContractError> {
        Self::_require_admin(&env, &caller)?;
        round::set_cooldown_period(&env, seconds);
        Ok(())
    }

    /// Sets how long an unanswered randomness request blocks the round
    pub fn set_randomness_timeout(env: Env, caller: Address, seconds: u64) -> Result<(), ContractError> {
        Self::_require_admin(&env, &caller)?;
        randomness::set_randomness_timeout(&env, seconds)
    }

    /// Opens a new round lasting `duration` seconds (admin only)
    pub fn start_round(env: Env, caller: Address, duration: u64) -> Result<Round, ContractError> {
        Self::_require_admin(&env, &caller)?;
        round::start_round(&env, duration)
    }

    /// Closes the active round once its deadline has passed (admin only)
    pub fn close_round(env: Env, caller: Address) -> Result<Round, ContractError> {
        Self::_require_admin(&env, &caller)?;
        round::close_round(&env, true)
    }

    /// Closes the active round before its deadline (admin override)
    pub fn force_close_round(env: Env, caller: Address) -> Result<Round, ContractError> {
        Self::_require_admin(&env, &caller)?;
        round::close_round(&env, false)
    }

    /// Returns a resolved round to Idle; per-round claims stay redeemable
    pub fn reset_round_state(env: Env, caller: Address) -> Result<Round, ContractError> {
        Self::_require_admin(&env, &caller)?;
        round::reset_round_state(&env)
    }

    /// Drops a randomness request the oracle never answered (admin only)
    pub fn cancel_stale_request(env: Env, caller: Address) -> Result<u64, ContractError> {
        Self::_require_admin(&env, &caller)?;
        randomness::cancel_stale(&env)
    }

    // -----------------------------------------------------------------------
    // Keeper surface (permissionless, timing-gated)
    // -----------------------------------------------------------------------

    pub fn auto_start_round(env: Env) -> Result<Round, ContractError> {
        round::auto_start_round(&env)
    }

    pub fn auto_close_round(env: Env) -> Result<u64, ContractError> {
        round::auto_close_round(&env)
    }

    /// Asks the randomifier for entropy for an ended round
    pub fn request_randomness(env: Env) -> Result<u64, ContractError> {
        randomness::request(&env)
    }

    /// Randomifier callback delivering the value for `request_id`
    pub fn fulfill_randomness(
        env: Env,
        caller: Address,
        request_id: u64,
        random_value: u128,
    ) -> Result<(), ContractError> {
        randomness::fulfill(&env, &caller, request_id, random_value)
    }

    // -----------------------------------------------------------------------
    // User surface
    // -----------------------------------------------------------------------

    /// Deposits principal into the active round. Returns the ticket id.
    pub fn deposit(env: Env, user: Address, amount: i128) -> Result<u64, ContractError> {
        user.require_auth();
        ledger::deposit(&env, &user, amount)
    }

    /// Withdraws the user's full principal from a resolved round
    pub fn reclaim_principal(env: Env, user: Address, round_id: u64) -> Result<i128, ContractError> {
        user.require_auth();
        ledger::reclaim_principal(&env, &user, round_id)
    }

    /// Pays the round's yield to its winner
    pub fn claim_prize(env: Env, user: Address, round_id: u64) -> Result<i128, ContractError> {
        user.require_auth();
        settlement::claim_prize(&env, &user, round_id)
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn get_config(env: Env) -> Result<Config, ContractError> {
        Ok(Config {
            admin: storage::admin(&env)?,
            asset: storage::asset(&env)?,
            reserve: storage::reserve(&env)?,
            randomifier: storage::randomifier(&env)?,
            round_duration: round::round_duration(&env),
            cooldown_period: round::cooldown_period(&env),
            randomness_timeout: randomness::randomness_timeout(&env),
            next_round_start: round::next_round_start(&env),
        })
    }

    pub fn get_round(env: Env) -> Result<Round, ContractError> {
        storage::current_round(&env)
    }

    pub fn get_ticket(env: Env, ticket_id: u64) -> Option<Ticket> {
        storage::ticket(&env, ticket_id)
    }

    /// Every ticket id the user ever received, oldest first
    pub fn get_user_tickets(env: Env, user: Address) -> Vec<u64> {
        storage::user_tickets(&env, &user)
    }

    /// Depositors of a round in draw order
    pub fn get_entries(env: Env, round_id: u64) -> Vec<Address> {
        storage::entries(&env, round_id)
    }

    pub fn shares_of(env: Env, round_id: u64, user: Address) -> i128 {
        storage::shares(&env, round_id, &user)
    }

    /// Principal deposited into the live round
    pub fn total_principal(env: Env) -> Result<i128, ContractError> {
        Ok(storage::current_round(&env)?.total_principal)
    }

    /// Unreclaimed principal across every round
    pub fn outstanding_principal(env: Env) -> i128 {
        storage::outstanding_principal(&env)
    }

    pub fn get_settlement(env: Env, round_id: u64) -> Option<Settlement> {
        storage::settlement(&env, round_id)
    }

    pub fn get_pending_request(env: Env) -> Option<RandomnessRequest> {
        storage::pending_request(&env)
    }

    pub fn awaiting_randomness(env: Env) -> bool {
        storage::pending_request(&env).is_some()
    }

    pub fn has_reclaimed(env: Env, round_id: u64, user: Address) -> bool {
        storage::principal_claimed(&env, round_id, &user)
    }

    fn _require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let admin = storage::admin(env)?;
        caller.require_auth();
        if *caller != admin {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }
}
