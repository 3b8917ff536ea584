//! Tests for the randomness request/fulfill protocol.

use soroban_sdk::{testutils::Address as _, Address, Env};

use super::setup::{advance_time, setup, ROUND_DURATION};
use crate::errors::ContractError;
use crate::types::{RoundState, DEFAULT_RANDOMNESS_TIMEOUT};

#[test]
fn test_request_records_pending_request() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();

    let request_id = ctx.close_and_request();

    let pending = ctx.client.get_pending_request().expect("request should be pending");
    assert_eq!(pending.request_id, request_id);
    assert_eq!(pending.round_id, 1);
    assert!(ctx.client.awaiting_randomness());
    assert_eq!(ctx.randomifier.request_count(), 1);
}

#[test]
fn test_request_requires_ended_round() {
    let env = Env::default();
    let ctx = setup(&env);

    let result = ctx.client.try_request_randomness();
    assert_eq!(result, Err(Ok(ContractError::RoundNotEndedOrAwaiting)));

    ctx.start_round();
    let result = ctx.client.try_request_randomness();
    assert_eq!(result, Err(Ok(ContractError::RoundNotEndedOrAwaiting)));
    assert!(!ctx.client.awaiting_randomness());
}

#[test]
fn test_second_request_fails_and_keeps_pending_id() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();

    let request_id = ctx.close_and_request();

    let result = ctx.client.try_request_randomness();
    assert_eq!(result, Err(Ok(ContractError::RandomnessPending)));

    assert!(ctx.client.awaiting_randomness());
    assert_eq!(ctx.client.get_pending_request().unwrap().request_id, request_id);
    assert_eq!(ctx.randomifier.request_count(), 1);
}

#[test]
fn test_fulfill_with_wrong_request_id_fails() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();

    let request_id = ctx.close_and_request();

    let result = ctx
        .client
        .try_fulfill_randomness(&ctx.randomifier.address, &(request_id + 1), &42);
    assert_eq!(result, Err(Ok(ContractError::StaleOrUnknownRequest)));

    assert_eq!(ctx.client.get_round().state, RoundState::AwaitingRandomness);
    assert_eq!(ctx.client.get_pending_request().unwrap().request_id, request_id);
    assert!(ctx.client.get_settlement(&1).is_none());
}

#[test]
fn test_fulfill_from_non_randomifier_fails() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();

    let request_id = ctx.close_and_request();
    let imposter = Address::generate(&env);

    let result = ctx.client.try_fulfill_randomness(&imposter, &request_id, &42);
    assert_eq!(result, Err(Ok(ContractError::OnlyRandomifier)));
    assert_eq!(ctx.client.get_round().state, RoundState::AwaitingRandomness);
}

#[test]
fn test_fulfill_without_request_fails() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();

    let result = ctx.client.try_fulfill_randomness(&ctx.randomifier.address, &1, &42);
    assert_eq!(result, Err(Ok(ContractError::StaleOrUnknownRequest)));
    assert_eq!(ctx.client.get_round().state, RoundState::Active);
}

#[test]
fn test_fulfill_twice_fails() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();
    let alice = ctx.funded_user(1_000);
    ctx.client.deposit(&alice, &100);

    let request_id = ctx.resolve_with(5);
    let settlement = ctx.client.get_settlement(&1).unwrap();

    let result = ctx
        .client
        .try_fulfill_randomness(&ctx.randomifier.address, &request_id, &6);
    assert_eq!(result, Err(Ok(ContractError::StaleOrUnknownRequest)));
    assert_eq!(ctx.client.get_settlement(&1).unwrap(), settlement);
}

#[test]
fn test_fulfill_clears_pending_request() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();

    ctx.resolve_with(5);

    assert!(!ctx.client.awaiting_randomness());
    assert!(ctx.client.get_pending_request().is_none());
    assert_eq!(ctx.client.get_round().state, RoundState::Resolved);
}

#[test]
fn test_cancel_stale_request_before_timeout_fails() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();
    ctx.close_and_request();

    advance_time(&env, DEFAULT_RANDOMNESS_TIMEOUT - 1);
    let result = ctx.client.try_cancel_stale_request(&ctx.admin);
    assert_eq!(result, Err(Ok(ContractError::RequestNotStale)));
    assert!(ctx.client.awaiting_randomness());
}

#[test]
fn test_cancel_stale_request_allows_fresh_request() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();
    let alice = ctx.funded_user(1_000);
    ctx.client.deposit(&alice, &100);

    let stale_id = ctx.close_and_request();

    advance_time(&env, DEFAULT_RANDOMNESS_TIMEOUT);
    let cancelled = ctx.client.cancel_stale_request(&ctx.admin);
    assert_eq!(cancelled, stale_id);
    assert_eq!(ctx.client.get_round().state, RoundState::Ended);
    assert!(!ctx.client.awaiting_randomness());

    // A late answer to the cancelled request is rejected
    let result = ctx
        .client
        .try_fulfill_randomness(&ctx.randomifier.address, &stale_id, &9);
    assert_eq!(result, Err(Ok(ContractError::StaleOrUnknownRequest)));

    let fresh_id = ctx.client.request_randomness();
    assert_ne!(fresh_id, stale_id);

    ctx.randomifier.fulfill(&fresh_id, &9);
    let settlement = ctx.client.get_settlement(&1).unwrap();
    assert_eq!(settlement.winner, Some(alice));
    assert_eq!(settlement.random_value, 9);
}

#[test]
fn test_cancel_stale_request_without_request_fails() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();

    let result = ctx.client.try_cancel_stale_request(&ctx.admin);
    assert_eq!(result, Err(Ok(ContractError::RoundNotEndedOrAwaiting)));
}

#[test]
fn test_cancel_stale_request_is_admin_only() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();
    ctx.close_and_request();
    advance_time(&env, DEFAULT_RANDOMNESS_TIMEOUT);

    let keeper = Address::generate(&env);
    let result = ctx.client.try_cancel_stale_request(&keeper);
    assert_eq!(result, Err(Ok(ContractError::Unauthorized)));
    assert!(ctx.client.awaiting_randomness());
}

#[test]
fn test_set_randomifier_blocked_while_request_pending() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();
    ctx.close_and_request();

    let other = Address::generate(&env);
    let result = ctx.client.try_set_randomifier(&ctx.admin, &other);
    assert_eq!(result, Err(Ok(ContractError::RandomnessPending)));
    assert_eq!(ctx.client.get_config().randomifier, ctx.randomifier.address);
}

#[test]
fn test_failed_oracle_call_leaves_round_ended() {
    let env = Env::default();
    let ctx = setup(&env);
    ctx.start_round();
    advance_time(&env, ROUND_DURATION);
    ctx.client.close_round(&ctx.admin);

    // Point the lottery at an address with no contract behind it
    let missing = Address::generate(&env);
    ctx.client.set_randomifier(&ctx.admin, &missing);

    let result = ctx.client.try_request_randomness();
    assert!(result.is_err());
    assert_eq!(ctx.client.get_round().state, RoundState::Ended);
    assert!(ctx.client.get_pending_request().is_none());

    ctx.client.set_randomifier(&ctx.admin, &ctx.randomifier.address);
    let request_id = ctx.client.request_randomness();
    assert_eq!(ctx.client.get_round().state, RoundState::AwaitingRandomness);
    assert_eq!(ctx.client.get_pending_request().unwrap().request_id, request_id);
}
