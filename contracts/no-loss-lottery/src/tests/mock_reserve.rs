//! In-test reserve that tracks one position per (owner, round) and lets a test
//! add yield or book a loss.

use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env};

#[contracttype]
#[derive(Clone)]
pub enum MockReserveKey {
    Asset,
    Position(Address, u64),
}

#[contract]
pub struct MockReserve;

#[contractimpl]
impl MockReserve {
    pub fn init(env: Env, asset: Address) {
        env.storage().instance().set(&MockReserveKey::Asset, &asset);
    }

    pub fn deposit(env: Env, from: Address, round_id: u64, amount: i128) -> i128 {
        from.require_auth();
        let key = MockReserveKey::Position(from, round_id);
        let value: i128 = env.storage().persistent().get(&key).unwrap_or(0);
        env.storage().persistent().set(&key, &(value + amount));
        amount
    }

    pub fn withdraw(env: Env, owner: Address, to: Address, round_id: u64, amount: i128) -> i128 {
        owner.require_auth();
        let key = MockReserveKey::Position(owner, round_id);
        let value: i128 = env.storage().persistent().get(&key).unwrap_or(0);
        if amount > value {
            panic!("position too small");
        }
        env.storage().persistent().set(&key, &(value - amount));

        let asset: Address = env.storage().instance().get(&MockReserveKey::Asset).unwrap();
        token::TokenClient::new(&env, &asset).transfer(&env.current_contract_address(), &to, &amount);
        amount
    }

    pub fn redeemable(env: Env, owner: Address, round_id: u64) -> i128 {
        env.storage()
            .persistent()
            .get(&MockReserveKey::Position(owner, round_id))
            .unwrap_or(0)
    }

    /// Moves a position's value by `delta`; negative books a loss.
    pub fn accrue(env: Env, owner: Address, round_id: u64, delta: i128) {
        let key = MockReserveKey::Position(owner, round_id);
        let value: i128 = env.storage().persistent().get(&key).unwrap_or(0);
        env.storage().persistent().set(&key, &(value + delta));
    }
}
