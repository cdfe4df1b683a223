//! # Storage
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key      | Type           | Description                              |
//! |----------|----------------|------------------------------------------|
//! | `Config` | `EscrowConfig` | Fronts, beneficiary and payment asset    |
//! | `Ledger` | `EscrowLedger` | Lifecycle state and recorded balance     |
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                 | Type   | Description                   |
//! |---------------------|--------|-------------------------------|
//! | `Deposit(address)`  | `i128` | Contribution held per payer   |
//!
//! Deposits live in persistent storage because a refund can be claimed long
//! after the sale ended.

use soroban_sdk::{contracttype, Address, Env};

use sale_common::{Error, EscrowState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 30 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    Ledger,
    Deposit(Address),
}

/// Who may touch the escrow and where the money goes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowConfig {
    /// Main front; the only address allowed to resolve the escrow.
    pub main: Address,
    /// Secondary front, registered once by `main`.
    pub secondary: Option<Address>,
    /// Wallet receiving the balance when the goal is met.
    pub beneficiary: Address,
    /// Asset the contributions are denominated in.
    pub payment_token: Address,
}

/// Mutable escrow state, rewritten on every deposit.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowLedger {
    pub state: EscrowState,
    /// Sum of all outstanding deposits.
    pub total: i128,
}

impl EscrowConfig {
    pub fn is_front(&self, address: &Address) -> bool {
        self.main == *address || self.secondary.as_ref() == Some(address)
    }
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &EscrowConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<EscrowConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn save_ledger(env: &Env, ledger: &EscrowLedger) {
    env.storage().instance().set(&DataKey::Ledger, ledger);
    bump_instance(env);
}

pub fn load_ledger(env: &Env) -> Result<EscrowLedger, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Ledger)
        .ok_or(Error::NotInitialized)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Amount held for `contributor`; zero when nothing was ever deposited.
pub fn deposit_of(env: &Env, contributor: &Address) -> i128 {
    let key = DataKey::Deposit(contributor.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

/// Overwrite the amount held for `contributor`. Zero removes the entry.
pub fn set_deposit(env: &Env, contributor: &Address, amount: i128) {
    let key = DataKey::Deposit(contributor.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}
