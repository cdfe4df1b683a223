//! # Sale Common
//!
//! Pieces shared by every contract of the crowdsale core:
//!
//! | Item                     | Used by                                        |
//! |--------------------------|------------------------------------------------|
//! | [`Error`]                | all contracts; one code space across calls     |
//! | [`FrontTotals`], [`EscrowState`] | campaign fronts, escrow                |
//! | [`interfaces`]           | typed clients for cross-contract calls         |
//! | [`settle`], [`transfer`] | folding sub-invocation results into [`Error`]  |
//!
//! Every contract returns the same [`Error`] enum, so when a sub-invocation
//! fails with a contract error the caller can hand the very same variant back
//! to its own invoker.

#![no_std]

use soroban_sdk::{contracterror, token, Address, Env};

pub mod interfaces;
mod types;

pub use interfaces::{
    DataStoreClient, EscrowClient, MintGateClient, RateTargetClient, SaleFrontClient,
};
pub use types::{EscrowState, FrontTotals};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    Unauthorized = 1,
    InvalidState = 2,
    InvalidTime = 3,
    CapExceeded = 4,
    ZeroValue = 5,
    NoDeposit = 6,
    NotRefunding = 7,
    TransferFailed = 8,
    AlreadyFinalized = 9,
    Paused = 10,
    MintingFinished = 11,
    Killed = 12,
    AlreadyInitialized = 13,
    NotInitialized = 14,
    Overflow = 15,
}

/// Fold the result of a generated `try_*` client call back into [`Error`].
///
/// A callee that failed with one of our contract errors yields that error
/// unchanged. Host-level failures (traps, conversion errors, foreign error
/// codes) become `fallback`.
pub fn settle<T, C, I>(
    result: Result<Result<T, C>, Result<Error, I>>,
    fallback: Error,
) -> Result<T, Error> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(err)) => Err(err),
        _ => Err(fallback),
    }
}

/// Move `amount` of `asset` from `from` to `to`.
///
/// Any rejection by the token contract (insufficient balance, missing
/// authorization, frozen account) surfaces as [`Error::TransferFailed`].
pub fn transfer(
    env: &Env,
    asset: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), Error> {
    let client = token::Client::new(env, asset);
    match client.try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}
