//! # Storage
//!
//! All front state is per-contract and bounded, so it lives in instance
//! storage:
//!
//! | Key      | Type         | Description                          |
//! |----------|--------------|--------------------------------------|
//! | `Config` | `SaleConfig` | Parties, window, rate, cap, goal     |
//! | `Totals` | `SaleTotals` | Raised / minted / finalized          |
//! | `Link`   | `FrontLink`  | Role, peer front, escrow             |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! Purchases only rewrite `Totals`; the config entry stays untouched on the
//! hot path.

use soroban_sdk::{contracttype, Env};

use sale_common::Error;

use crate::types::{Campaign, FrontLink, SaleConfig, SaleTotals};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    Totals,
    Link,
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

/// Write all three entries of a freshly initialised front.
pub fn save_front(env: &Env, config: &SaleConfig, link: &FrontLink) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage()
        .instance()
        .set(&DataKey::Totals, &SaleTotals::default());
    env.storage().instance().set(&DataKey::Link, link);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<SaleConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn save_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_totals(env: &Env) -> Result<SaleTotals, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Totals)
        .ok_or(Error::NotInitialized)
}

pub fn save_totals(env: &Env, totals: &SaleTotals) {
    env.storage().instance().set(&DataKey::Totals, totals);
    bump_instance(env);
}

pub fn load_link(env: &Env) -> Result<FrontLink, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Link)
        .ok_or(Error::NotInitialized)
}

pub fn save_link(env: &Env, link: &FrontLink) {
    env.storage().instance().set(&DataKey::Link, link);
    bump_instance(env);
}

/// Load the full `Campaign` by combining config, totals and link.
pub fn load_campaign(env: &Env) -> Result<Campaign, Error> {
    let config = load_config(env)?;
    let totals = load_totals(env)?;
    let link = load_link(env)?;
    Ok(Campaign {
        owner: config.owner,
        controller: config.controller,
        wallet: config.wallet,
        payment_token: config.payment_token,
        start_time: config.start_time,
        end_time: config.end_time,
        rate: config.rate,
        token_cap: config.token_cap,
        goal: config.goal,
        cap_scale: config.cap_scale,
        raised: totals.raised,
        minted: totals.minted,
        finalized: totals.finalized,
        role: link.role,
        peer: link.peer,
        escrow: link.escrow,
    })
}
