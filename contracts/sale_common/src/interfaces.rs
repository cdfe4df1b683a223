//! Client interfaces for every cross-contract call the core makes.
//!
//! The contracts never link each other's code; they talk through these
//! traits, which generate `*Client` types with both panicking and `try_*`
//! call variants. Callers use the `try_*` variants together with
//! [`crate::settle`].

use soroban_sdk::{contractclient, Address, Env};

use crate::{Error, FrontTotals};

/// Mint entry point of the controller.
#[contractclient(name = "MintGateClient")]
pub trait MintGate {
    fn mint(env: Env, caller: Address, to: Address, amount: i128) -> Result<(), Error>;
}

/// Rate setter the controller broadcasts to its admin campaigns.
#[contractclient(name = "RateTargetClient")]
pub trait RateTarget {
    fn set_rate(env: Env, controller: Address, new_rate: i128) -> Result<(), Error>;
}

/// Peer surface of a sale front.
#[contractclient(name = "SaleFrontClient")]
pub trait SaleFront {
    fn front_totals(env: Env) -> Result<FrontTotals, Error>;

    fn attach_to_main(
        env: Env,
        main: Address,
        escrow: Option<Address>,
        token_cap: i128,
        goal: i128,
        start_time: u64,
        end_time: u64,
    ) -> Result<(), Error>;
}

/// Refund escrow shared by the fronts of one campaign.
#[contractclient(name = "EscrowClient")]
pub trait Escrow {
    fn init(
        env: Env,
        main: Address,
        beneficiary: Address,
        payment_token: Address,
    ) -> Result<(), Error>;

    fn register_front(env: Env, main: Address, front: Address) -> Result<(), Error>;

    fn deposit(env: Env, front: Address, contributor: Address, amount: i128)
        -> Result<(), Error>;

    fn close(env: Env, main: Address) -> Result<i128, Error>;

    fn enable_refunds(env: Env, main: Address) -> Result<(), Error>;

    fn withdraw(env: Env, contributor: Address) -> Result<i128, Error>;
}

/// Ownership hand-over of the external data store.
#[contractclient(name = "DataStoreClient")]
pub trait DataStore {
    fn transfer_ownership(env: Env, new_owner: Address);
}
