//! Busy flag held while the contract talks to the token, reserve or oracle.
//!
//! A failing invocation is rolled back by the host, flag included, so only the
//! success path needs to call [`exit`].

use soroban_sdk::Env;

use crate::errors::ContractError;
use crate::types::DataKey;

pub(crate) fn enter(env: &Env) -> Result<(), ContractError> {
    let busy: bool = env.storage().instance().get(&DataKey::Busy).unwrap_or(false);
    if busy {
        return Err(ContractError::OperationInFlight);
    }
    env.storage().instance().set(&DataKey::Busy, &true);
    Ok(())
}

pub(crate) fn exit(env: &Env) {
    env.storage().instance().remove(&DataKey::Busy);
}

