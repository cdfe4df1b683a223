//! # Refund Escrow Contract
//!
//! Holds contributions of a goal-backed sale until the sale is finalized.
//!
//! | Phase     | Entry Point(s)                         | Caller                |
//! |-----------|----------------------------------------|-----------------------|
//! | Bootstrap | [`RefundEscrow::init`], `register_front` | Main front          |
//! | Funding   | [`RefundEscrow::deposit`]              | registered front      |
//! | Outcome   | `close`, `enable_refunds`              | Main front            |
//! | Refunds   | [`RefundEscrow::withdraw`]             | anyone, pays the payer|
//! | Queries   | `state`, `deposit_of`, `balance`, ...  | anyone                |
//!
//! The fronts move the contribution into the escrow's own token balance
//! first and then call `deposit` to book it against the contributor. The
//! escrow only ever pays out what it has booked.

#![no_std]

use soroban_sdk::{contract, contractimpl, Address, Env};

use sale_common::{transfer, Error, EscrowState};

mod events;
mod storage;


pub use storage::{EscrowConfig, EscrowLedger};

#[contract]
pub struct RefundEscrow;

#[contractimpl]
impl RefundEscrow {
    /// Bind the escrow to its Main front.
    ///
    /// Called by the Main front from its own `init`, which is what makes the
    /// Main the creator of the escrow.
    pub fn init(
        env: Env,
        main: Address,
        beneficiary: Address,
        payment_token: Address,
    ) -> Result<(), Error> {
        main.require_auth();
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        storage::save_config(
            &env,
            &EscrowConfig {
                main: main.clone(),
                secondary: None,
                beneficiary: beneficiary.clone(),
                payment_token,
            },
        );
        storage::save_ledger(
            &env,
            &EscrowLedger {
                state: EscrowState::Active,
                total: 0,
            },
        );

        events::emit_opened(&env, main, beneficiary);
        Ok(())
    }

    /// Allow a second front to book deposits. One-time.
    pub fn register_front(env: Env, main: Address, front: Address) -> Result<(), Error> {
        main.require_auth();
        let mut config = storage::load_config(&env)?;
        if config.main != main {
            return Err(Error::Unauthorized);
        }
        if config.secondary.is_some() || front == config.main {
            return Err(Error::InvalidState);
        }

        config.secondary = Some(front.clone());
        storage::save_config(&env, &config);

        events::emit_front_registered(&env, front);
        Ok(())
    }

    /// Book `amount` against `contributor`.
    ///
    /// The tokens must already sit in this contract's balance.
    pub fn deposit(
        env: Env,
        front: Address,
        contributor: Address,
        amount: i128,
    ) -> Result<(), Error> {
        front.require_auth();
        let config = storage::load_config(&env)?;
        if !config.is_front(&front) {
            return Err(Error::Unauthorized);
        }

        let mut ledger = storage::load_ledger(&env)?;
        if ledger.state != EscrowState::Active {
            return Err(Error::InvalidState);
        }
        if amount <= 0 {
            return Err(Error::ZeroValue);
        }

        let held = storage::deposit_of(&env, &contributor)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        ledger.total = ledger.total.checked_add(amount).ok_or(Error::Overflow)?;

        storage::set_deposit(&env, &contributor, held);
        storage::save_ledger(&env, &ledger);

        events::emit_deposited(&env, front, contributor, amount);
        Ok(())
    }

    /// Goal met: pay the whole booked balance to the beneficiary.
    ///
    /// Returns the amount forwarded.
    pub fn close(env: Env, main: Address) -> Result<i128, Error> {
        main.require_auth();
        let config = storage::load_config(&env)?;
        if config.main != main {
            return Err(Error::Unauthorized);
        }

        let mut ledger = storage::load_ledger(&env)?;
        if ledger.state != EscrowState::Active {
            return Err(Error::InvalidState);
        }

        let amount = ledger.total;
        ledger.state = EscrowState::Closed;
        ledger.total = 0;
        storage::save_ledger(&env, &ledger);

        if amount > 0 {
            transfer(
                &env,
                &config.payment_token,
                &env.current_contract_address(),
                &config.beneficiary,
                amount,
            )?;
        }

        events::emit_closed(&env, config.beneficiary, amount);
        Ok(amount)
    }

    /// Goal missed: open the escrow for per-contributor withdrawals.
    pub fn enable_refunds(env: Env, main: Address) -> Result<(), Error> {
        main.require_auth();
        let config = storage::load_config(&env)?;
        if config.main != main {
            return Err(Error::Unauthorized);
        }

        let mut ledger = storage::load_ledger(&env)?;
        if ledger.state != EscrowState::Active {
            return Err(Error::InvalidState);
        }
        ledger.state = EscrowState::Refunding;
        storage::save_ledger(&env, &ledger);

        events::emit_refunds_enabled(&env, main);
        Ok(())
    }

    /// Pay `contributor` everything booked for them and zero the entry.
    pub fn withdraw(env: Env, contributor: Address) -> Result<i128, Error> {
        let config = storage::load_config(&env)?;
        let mut ledger = storage::load_ledger(&env)?;
        if ledger.state != EscrowState::Refunding {
            return Err(Error::NotRefunding);
        }

        let amount = storage::deposit_of(&env, &contributor);
        if amount == 0 {
            return Err(Error::NoDeposit);
        }

        storage::set_deposit(&env, &contributor, 0);
        ledger.total -= amount;
        storage::save_ledger(&env, &ledger);

        transfer(
            &env,
            &config.payment_token,
            &env.current_contract_address(),
            &contributor,
            amount,
        )?;

        events::emit_withdrawn(&env, contributor, amount);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn state(env: Env) -> Result<EscrowState, Error> {
        Ok(storage::load_ledger(&env)?.state)
    }

    /// Booked balance still held for contributors or the beneficiary.
    pub fn balance(env: Env) -> Result<i128, Error> {
        Ok(storage::load_ledger(&env)?.total)
    }

    pub fn deposit_of(env: Env, contributor: Address) -> i128 {
        storage::deposit_of(&env, &contributor)
    }

    pub fn config(env: Env) -> Result<EscrowConfig, Error> {
        storage::load_config(&env)
    }

    pub fn beneficiary(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.beneficiary)
    }

    pub fn main_front(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.main)
    }

    pub fn secondary_front(env: Env) -> Result<Option<Address>, Error> {
        Ok(storage::load_config(&env)?.secondary)
    }
}
