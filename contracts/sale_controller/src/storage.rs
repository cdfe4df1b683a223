//! # Storage
//!
//! Everything the controller keeps is small and read on every mint, so it all
//! lives in instance storage.
//!
//! | Key      | Type               | Description                                |
//! |----------|--------------------|--------------------------------------------|
//! | `Config` | `ControllerConfig` | Owner, token ledger, data store            |
//! | `Flags`  | `ControllerFlags`  | paused / minting finished / killed         |
//! | `Admins` | `Vec<Address>`     | Campaigns allowed to mint, in insertion order |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.

use soroban_sdk::{contracttype, Address, Env, Vec};

use sale_common::Error;

use crate::types::{ControllerConfig, ControllerFlags};

const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    Flags,
    Admins,
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &ControllerConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<ControllerConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn save_flags(env: &Env, flags: &ControllerFlags) {
    env.storage().instance().set(&DataKey::Flags, flags);
    bump_instance(env);
}

pub fn load_flags(env: &Env) -> Result<ControllerFlags, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Flags)
        .ok_or(Error::NotInitialized)
}

pub fn load_admins(env: &Env) -> Vec<Address> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Admins)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn save_admins(env: &Env, admins: &Vec<Address>) {
    env.storage().instance().set(&DataKey::Admins, admins);
    bump_instance(env);
}
