//! Ledger events consumed by off-chain observers.
//!
//! Topics are `(subject, action)`; user-facing events carry the user, amount
//! and round id in the data tuple.

#![allow(deprecated)]

use soroban_sdk::{symbol_short, Address, Env, Symbol};

pub(crate) fn initialized(env: &Env, admin: &Address, reserve: &Address, randomifier: &Address) {
    env.events().publish(
        (symbol_short!("lottery"), symbol_short!("init")),
        (admin.clone(), reserve.clone(), randomifier.clone()),
    );
}

pub(crate) fn deposited(env: &Env, user: &Address, amount: i128, round_id: u64, ticket_id: u64) {
    env.events().publish(
        (symbol_short!("principal"), symbol_short!("deposit")),
        (user.clone(), amount, round_id, ticket_id),
    );
}

pub(crate) fn reclaimed(env: &Env, user: &Address, amount: i128, round_id: u64) {
    env.events().publish(
        (symbol_short!("principal"), symbol_short!("reclaim")),
        (user.clone(), amount, round_id),
    );
}

pub(crate) fn prize_claimed(env: &Env, winner: &Address, amount: i128, round_id: u64) {
    env.events().publish(
        (symbol_short!("prize"), symbol_short!("claimed")),
        (winner.clone(), amount, round_id),
    );
}

pub(crate) fn round_started(env: &Env, round_id: u64, end_timestamp: u64) {
    env.events().publish(
        (symbol_short!("round"), symbol_short!("started")),
        (round_id, end_timestamp),
    );
}

pub(crate) fn round_closed(env: &Env, round_id: u64, total_principal: i128, entry_count: u32) {
    env.events().publish(
        (symbol_short!("round"), symbol_short!("closed")),
        (round_id, total_principal, entry_count),
    );
}

pub(crate) fn round_reset(env: &Env, round_id: u64, next_round_start: u64) {
    env.events().publish(
        (symbol_short!("round"), symbol_short!("reset")),
        (round_id, next_round_start),
    );
}

pub(crate) fn randomness_requested(env: &Env, round_id: u64, request_id: u64) {
    env.events().publish(
        (symbol_short!("random"), symbol_short!("request")),
        (round_id, request_id),
    );
}

pub(crate) fn randomness_cancelled(env: &Env, round_id: u64, request_id: u64) {
    env.events().publish(
        (symbol_short!("random"), symbol_short!("cancel")),
        (round_id, request_id),
    );
}

pub(crate) fn round_resolved(
    env: &Env,
    round_id: u64,
    winner: &Option<Address>,
    prize: i128,
    random_value: u128,
) {
    env.events().publish(
        (symbol_short!("round"), symbol_short!("resolved")),
        (round_id, winner.clone(), prize, random_value),
    );
}

pub(crate) fn no_entries(env: &Env, round_id: u64) {
    env.events().publish(
        (symbol_short!("round"), symbol_short!("empty")),
        round_id,
    );
}

pub(crate) fn yield_shortfall(env: &Env, round_id: u64, shortfall: i128) {
    env.events().publish(
        (symbol_short!("reserve"), symbol_short!("shortfall")),
        (round_id, shortfall),
    );
}

pub(crate) fn config_updated(env: &Env, setting: Symbol, value: u64) {
    env.events().publish(
        (symbol_short!("config"), setting),
        value,
    );
}

pub(crate) fn randomifier_updated(env: &Env, randomifier: &Address) {
    env.events().publish(
        (symbol_short!("config"), symbol_short!("random")),
        randomifier.clone(),
    );
}
