//! # Sale Controller Contract
//!
//! Sole gatekeeper of sale-token supply. The controller is the admin of the
//! token ledger (a Stellar Asset Contract) and owner of the data store; every
//! mint goes through it, and only addresses on its admin allowlist (plus the
//! owner, for initial allocations) may ask for one.
//!
//! | Phase       | Entry Point(s)                                           |
//! |-------------|----------------------------------------------------------|
//! | Bootstrap   | [`SaleController::init`] (starts paused)                 |
//! | Allowlist   | `add_admin`, `remove_admin`, `replace_admin`             |
//! | Supply      | [`SaleController::mint`], `finish_minting`, `start_minting` |
//! | Rates       | [`SaleController::change_rate`] (broadcast to all admins) |
//! | Emergency   | `pause`, `unpause`                                       |
//! | Migration   | `set_contracts`, [`SaleController::kill`], `transfer_ownership` |
//! | Queries     | `info`, `is_admin`, `admins`, `is_paused`, ...           |
//!
//! Once killed, the controller has handed the ledger and data store to its
//! successor and refuses every further mutation with `Error::Killed`.

#![no_std]

use soroban_sdk::{contract, contractimpl, token, Address, Env, Vec};

use sale_common::{settle, DataStoreClient, Error, RateTargetClient};

mod events;
mod storage;
mod types;


pub use types::{ControllerConfig, ControllerFlags, ControllerInfo};

#[contract]
pub struct SaleController;

#[contractimpl]
impl SaleController {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Bind the controller to a token ledger and data store.
    ///
    /// The controller starts paused; `unpause` before the first mint. Both
    /// external contracts must already name this controller as their
    /// admin/owner for mint and `kill` to succeed.
    pub fn init(
        env: Env,
        owner: Address,
        token: Address,
        data_store: Address,
    ) -> Result<(), Error> {
        owner.require_auth();
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        storage::save_config(
            &env,
            &ControllerConfig {
                owner,
                token,
                data_store,
            },
        );
        storage::save_flags(
            &env,
            &ControllerFlags {
                paused: true,
                ..ControllerFlags::default()
            },
        );
        storage::save_admins(&env, &Vec::new(&env));
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Supply
    // ─────────────────────────────────────────────────────────

    /// Mint `amount` sale tokens to `to`.
    ///
    /// `caller` must be the owner or on the admin allowlist.
    pub fn mint(env: Env, caller: Address, to: Address, amount: i128) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_config(&env)?;
        let flags = storage::load_flags(&env)?;

        if flags.killed {
            return Err(Error::Killed);
        }
        if caller != config.owner && Self::admin_position(&env, &caller).is_none() {
            return Err(Error::Unauthorized);
        }
        if flags.paused {
            return Err(Error::Paused);
        }
        if flags.minting_finished {
            return Err(Error::MintingFinished);
        }
        if amount <= 0 {
            return Err(Error::ZeroValue);
        }

        // The ledger rejects the call when we are not its admin.
        let ledger = token::StellarAssetClient::new(&env, &config.token);
        if !matches!(ledger.try_mint(&to, &amount), Ok(Ok(()))) {
            return Err(Error::Unauthorized);
        }

        events::emit_minted(&env, caller, to, amount);
        Ok(())
    }

    pub fn finish_minting(env: Env, caller: Address) -> Result<(), Error> {
        Self::set_minting_finished(&env, &caller, true)
    }

    /// Reopen minting after `finish_minting`.
    pub fn start_minting(env: Env, caller: Address) -> Result<(), Error> {
        Self::set_minting_finished(&env, &caller, false)
    }

    // ─────────────────────────────────────────────────────────
    // Admin allowlist
    // ─────────────────────────────────────────────────────────

    /// Authorize `admin` to mint. Fails `InvalidState` if already present.
    pub fn add_admin(env: Env, caller: Address, admin: Address) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;
        if Self::admin_position(&env, &admin).is_some() {
            return Err(Error::InvalidState);
        }

        let mut admins = storage::load_admins(&env);
        admins.push_back(admin.clone());
        storage::save_admins(&env, &admins);

        events::emit_admin_added(&env, admin);
        Ok(())
    }

    /// Revoke `admin`. Fails `InvalidState` if absent.
    pub fn remove_admin(env: Env, caller: Address, admin: Address) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;
        let index = Self::admin_position(&env, &admin).ok_or(Error::InvalidState)?;

        let mut admins = storage::load_admins(&env);
        admins.remove(index);
        storage::save_admins(&env, &admins);

        events::emit_admin_removed(&env, admin);
        Ok(())
    }

    /// Swap `old` for `new` in one step, so the allowlist is never empty
    /// in between.
    pub fn replace_admin(
        env: Env,
        caller: Address,
        old: Address,
        new: Address,
    ) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;
        let index = Self::admin_position(&env, &old).ok_or(Error::InvalidState)?;
        if Self::admin_position(&env, &new).is_some() {
            return Err(Error::InvalidState);
        }

        let mut admins = storage::load_admins(&env);
        admins.set(index, new.clone());
        storage::save_admins(&env, &admins);

        events::emit_admin_replaced(&env, old, new);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Rates
    // ─────────────────────────────────────────────────────────

    /// Push `new_rate` to every campaign on the allowlist.
    ///
    /// Broadcasting keeps both fronts of a dual-front campaign on one rate.
    /// A single failing target fails the whole call.
    pub fn change_rate(env: Env, caller: Address, new_rate: i128) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;
        if new_rate <= 0 {
            return Err(Error::ZeroValue);
        }

        let admins = storage::load_admins(&env);
        if admins.is_empty() {
            return Err(Error::InvalidState);
        }

        let this = env.current_contract_address();
        for admin in admins.iter() {
            let campaign = RateTargetClient::new(&env, &admin);
            settle(campaign.try_set_rate(&this, &new_rate), Error::InvalidState)?;
        }

        events::emit_rate_changed(&env, new_rate);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Emergency control
    // ─────────────────────────────────────────────────────────

    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;
        let mut flags = storage::load_flags(&env)?;
        if flags.paused {
            return Err(Error::InvalidState);
        }
        flags.paused = true;
        storage::save_flags(&env, &flags);

        events::emit_paused(&env, caller);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;
        let mut flags = storage::load_flags(&env)?;
        if !flags.paused {
            return Err(Error::InvalidState);
        }
        flags.paused = false;
        storage::save_flags(&env, &flags);

        events::emit_unpaused(&env, caller);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Migration
    // ─────────────────────────────────────────────────────────

    /// Rebind the token ledger and data store. Only while paused.
    pub fn set_contracts(
        env: Env,
        caller: Address,
        token: Address,
        data_store: Address,
    ) -> Result<(), Error> {
        let mut config = Self::require_owner(&env, &caller)?;
        Self::require_paused(&env)?;

        config.token = token.clone();
        config.data_store = data_store.clone();
        storage::save_config(&env, &config);

        events::emit_contracts_set(&env, token, data_store);
        Ok(())
    }

    /// Retire this controller in favour of `successor`. Only while paused.
    ///
    /// The killed flag is written before ownership of the ledger and data
    /// store moves, and both hand-overs must succeed or nothing happens.
    pub fn kill(env: Env, caller: Address, successor: Address) -> Result<(), Error> {
        let config = Self::require_owner(&env, &caller)?;
        let mut flags = Self::require_paused(&env)?;

        flags.killed = true;
        storage::save_flags(&env, &flags);

        let ledger = token::StellarAssetClient::new(&env, &config.token);
        if !matches!(ledger.try_set_admin(&successor), Ok(Ok(()))) {
            return Err(Error::Unauthorized);
        }
        let data_store = DataStoreClient::new(&env, &config.data_store);
        if !matches!(data_store.try_transfer_ownership(&successor), Ok(Ok(()))) {
            return Err(Error::Unauthorized);
        }

        events::emit_killed(&env, successor);
        Ok(())
    }

    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        let mut config = Self::require_owner(&env, &caller)?;
        config.owner = new_owner.clone();
        storage::save_config(&env, &config);

        events::emit_owner_changed(&env, new_owner);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn info(env: Env) -> Result<ControllerInfo, Error> {
        let config = storage::load_config(&env)?;
        let flags = storage::load_flags(&env)?;
        Ok(ControllerInfo {
            owner: config.owner,
            token: config.token,
            data_store: config.data_store,
            admins: storage::load_admins(&env),
            paused: flags.paused,
            minting_finished: flags.minting_finished,
            killed: flags.killed,
        })
    }

    pub fn is_admin(env: Env, address: Address) -> bool {
        Self::admin_position(&env, &address).is_some()
    }

    pub fn admins(env: Env) -> Vec<Address> {
        storage::load_admins(&env)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.owner)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.token)
    }

    pub fn data_store(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.data_store)
    }

    pub fn is_paused(env: Env) -> Result<bool, Error> {
        Ok(storage::load_flags(&env)?.paused)
    }

    pub fn minting_finished(env: Env) -> Result<bool, Error> {
        Ok(storage::load_flags(&env)?.minting_finished)
    }

    pub fn is_killed(env: Env) -> Result<bool, Error> {
        Ok(storage::load_flags(&env)?.killed)
    }
}

impl SaleController {
    /// Authenticate `caller` and check it is the live controller's owner.
    fn require_owner(env: &Env, caller: &Address) -> Result<ControllerConfig, Error> {
        caller.require_auth();
        let config = storage::load_config(env)?;
        if storage::load_flags(env)?.killed {
            return Err(Error::Killed);
        }
        if *caller != config.owner {
            return Err(Error::Unauthorized);
        }
        Ok(config)
    }

    fn require_paused(env: &Env) -> Result<ControllerFlags, Error> {
        let flags = storage::load_flags(env)?;
        if !flags.paused {
            return Err(Error::InvalidState);
        }
        Ok(flags)
    }

    fn admin_position(env: &Env, address: &Address) -> Option<u32> {
        storage::load_admins(env).first_index_of(address.clone())
    }

    fn set_minting_finished(env: &Env, caller: &Address, finished: bool) -> Result<(), Error> {
        Self::require_owner(env, caller)?;
        let mut flags = storage::load_flags(env)?;
        if flags.minting_finished == finished {
            return Err(Error::InvalidState);
        }
        flags.minting_finished = finished;
        storage::save_flags(env, &flags);

        events::emit_minting_toggled(env, finished);
        Ok(())
    }
}
