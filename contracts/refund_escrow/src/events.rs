//! Escrow events. Topics are `(symbol, subject)`; payloads are the structs
//! below.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowOpened {
    pub main: Address,
    pub beneficiary: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposited {
    pub front: Address,
    pub contributor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowClosed {
    pub beneficiary: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawn {
    pub contributor: Address,
    pub amount: i128,
}

pub fn emit_opened(env: &Env, main: Address, beneficiary: Address) {
    env.events().publish(
        (symbol_short!("opened"), main.clone()),
        EscrowOpened { main, beneficiary },
    );
}

pub fn emit_front_registered(env: &Env, front: Address) {
    env.events().publish((symbol_short!("front"), front.clone()), front);
}

pub fn emit_deposited(env: &Env, front: Address, contributor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("deposited"), contributor.clone()),
        Deposited {
            front,
            contributor,
            amount,
        },
    );
}

pub fn emit_closed(env: &Env, beneficiary: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("closed"), beneficiary.clone()),
        EscrowClosed {
            beneficiary,
            amount,
        },
    );
}

pub fn emit_refunds_enabled(env: &Env, main: Address) {
    env.events().publish((symbol_short!("refunds"), main.clone()), main);
}

pub fn emit_withdrawn(env: &Env, contributor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("withdrawn"), contributor.clone()),
        Withdrawn {
            contributor,
            amount,
        },
    );
}
