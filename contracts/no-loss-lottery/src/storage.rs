//! Typed access to contract storage.
//!
//! Configuration and the live round sit in `instance()` storage. Everything
//! keyed by round or user (tickets, shares, claim flags, settlements) is a
//! `persistent()` entry whose TTL is extended on every write, so unclaimed
//! entitlements outlive the current-round pointer.

use soroban_sdk::{Address, Env, IntoVal, TryFromVal, Val, Vec};

use crate::errors::ContractError;
use crate::types::{DataKey, RandomnessRequest, Round, Settlement, Ticket, PERSISTENT_BUMP_LEDGERS};

pub(crate) fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

fn set_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

fn get_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: TryFromVal<Env, Val>,
{
    env.storage().persistent().get(key)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub(crate) fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub(crate) fn admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(ContractError::NotInitialized)
}

pub(crate) fn asset(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Asset)
        .ok_or(ContractError::NotInitialized)
}

pub(crate) fn reserve(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Reserve)
        .ok_or(ContractError::NotInitialized)
}

pub(crate) fn randomifier(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Randomifier)
        .ok_or(ContractError::NotInitialized)
}

pub(crate) fn get_u64(env: &Env, key: &DataKey, default: u64) -> u64 {
    env.storage().instance().get(key).unwrap_or(default)
}

pub(crate) fn set_instance<V>(env: &Env, key: &DataKey, value: &V)
where
    V: IntoVal<Env, Val>,
{
    env.storage().instance().set(key, value);
    bump_instance(env);
}

// ---------------------------------------------------------------------------
// Live round and randomness request
// ---------------------------------------------------------------------------

pub(crate) fn current_round(env: &Env) -> Result<Round, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::CurrentRound)
        .ok_or(ContractError::NotInitialized)
}

pub(crate) fn set_current_round(env: &Env, round: &Round) {
    set_instance(env, &DataKey::CurrentRound, round);
}

pub(crate) fn pending_request(env: &Env) -> Option<RandomnessRequest> {
    env.storage().instance().get(&DataKey::PendingRequest)
}

pub(crate) fn set_pending_request(env: &Env, request: &RandomnessRequest) {
    set_instance(env, &DataKey::PendingRequest, request);
}

pub(crate) fn clear_pending_request(env: &Env) {
    env.storage().instance().remove(&DataKey::PendingRequest);
}

pub(crate) fn outstanding_principal(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::OutstandingPrincipal)
        .unwrap_or(0)
}

pub(crate) fn set_outstanding_principal(env: &Env, amount: i128) {
    set_instance(env, &DataKey::OutstandingPrincipal, &amount);
}

/// Hands out the next ticket id; ids are never reused.
pub(crate) fn next_ticket_id(env: &Env) -> Result<u64, ContractError> {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::NextTicketId)
        .unwrap_or(1);
    let next = id.checked_add(1).ok_or(ContractError::Overflow)?;
    set_instance(env, &DataKey::NextTicketId, &next);
    Ok(id)
}

// ---------------------------------------------------------------------------
// Per-round, per-user records
// ---------------------------------------------------------------------------

pub(crate) fn ticket(env: &Env, ticket_id: u64) -> Option<Ticket> {
    get_persistent(env, &DataKey::Ticket(ticket_id))
}

pub(crate) fn set_ticket(env: &Env, ticket: &Ticket) {
    set_persistent(env, &DataKey::Ticket(ticket.ticket_id), ticket);
}

pub(crate) fn user_tickets(env: &Env, user: &Address) -> Vec<u64> {
    get_persistent(env, &DataKey::UserTickets(user.clone())).unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn set_user_tickets(env: &Env, user: &Address, ids: &Vec<u64>) {
    set_persistent(env, &DataKey::UserTickets(user.clone()), ids);
}

pub(crate) fn round_tickets(env: &Env, round_id: u64, user: &Address) -> Vec<u64> {
    get_persistent(env, &DataKey::RoundTickets(round_id, user.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn set_round_tickets(env: &Env, round_id: u64, user: &Address, ids: &Vec<u64>) {
    set_persistent(env, &DataKey::RoundTickets(round_id, user.clone()), ids);
}

pub(crate) fn entries(env: &Env, round_id: u64) -> Vec<Address> {
    get_persistent(env, &DataKey::Entries(round_id)).unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn set_entries(env: &Env, round_id: u64, entries: &Vec<Address>) {
    set_persistent(env, &DataKey::Entries(round_id), entries);
}

pub(crate) fn shares(env: &Env, round_id: u64, user: &Address) -> i128 {
    get_persistent(env, &DataKey::Shares(round_id, user.clone())).unwrap_or(0)
}

pub(crate) fn set_shares(env: &Env, round_id: u64, user: &Address, amount: i128) {
    set_persistent(env, &DataKey::Shares(round_id, user.clone()), &amount);
}

pub(crate) fn principal_claimed(env: &Env, round_id: u64, user: &Address) -> bool {
    get_persistent(env, &DataKey::PrincipalClaimed(round_id, user.clone())).unwrap_or(false)
}

pub(crate) fn set_principal_claimed(env: &Env, round_id: u64, user: &Address) {
    set_persistent(env, &DataKey::PrincipalClaimed(round_id, user.clone()), &true);
}

pub(crate) fn settlement(env: &Env, round_id: u64) -> Option<Settlement> {
    get_persistent(env, &DataKey::Settlement(round_id))
}

pub(crate) fn set_settlement(env: &Env, settlement: &Settlement) {
    set_persistent(env, &DataKey::Settlement(settlement.round_id), settlement);
}
