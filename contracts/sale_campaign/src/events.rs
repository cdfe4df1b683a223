//! Campaign events.
//!
//! | Topic                       | Payload            |
//! |-----------------------------|--------------------|
//! | `("purchase", beneficiary)` | [`TokenPurchase`]  |
//! | `("finalized", front)`      | [`Finalized`]      |
//! | `("refunded", contributor)` | `i128` amount      |
//! | `("rate", front)`           | `i128` new rate    |
//! | `("extended", front)`       | `u64` new end time |
//! | `("diluted", front)`        | `i128` new cap     |
//! | `("linked", main)`          | secondary address  |

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenPurchase {
    pub contributor: Address,
    pub beneficiary: Address,
    /// Contribution units paid.
    pub value: i128,
    /// Sale tokens minted.
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Finalized {
    /// Pooled raised amount at finalization.
    pub raised: i128,
    pub goal_reached: bool,
}

pub fn emit_purchase(
    env: &Env,
    contributor: Address,
    beneficiary: Address,
    value: i128,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("purchase"), beneficiary.clone()),
        TokenPurchase {
            contributor,
            beneficiary,
            value,
            amount,
        },
    );
}

pub fn emit_finalized(env: &Env, raised: i128, goal_reached: bool) {
    let front = env.current_contract_address();
    env.events().publish(
        (symbol_short!("finalized"), front),
        Finalized {
            raised,
            goal_reached,
        },
    );
}

/// Emitted by the front the refund was claimed through; the deposit may have
/// been taken by its peer. The escrow's `withdrawn` event is authoritative.
pub fn emit_refunded(env: &Env, contributor: Address, amount: i128) {
    env.events()
        .publish((symbol_short!("refunded"), contributor), amount);
}

pub fn emit_rate_changed(env: &Env, new_rate: i128) {
    let front = env.current_contract_address();
    env.events().publish((symbol_short!("rate"), front), new_rate);
}

pub fn emit_extended(env: &Env, new_end_time: u64) {
    let front = env.current_contract_address();
    env.events()
        .publish((symbol_short!("extended"), front), new_end_time);
}

pub fn emit_diluted(env: &Env, new_cap: i128) {
    let front = env.current_contract_address();
    env.events().publish((symbol_short!("diluted"), front), new_cap);
}

pub fn emit_linked(env: &Env, secondary: Address) {
    let main = env.current_contract_address();
    env.events().publish((symbol_short!("linked"), main), secondary);
}
