//! # Sale Campaign Contract
//!
//! One timed sale phase. Contributors pay in `payment_token`, receive
//! `value × rate` sale tokens minted through the controller, and the proceeds
//! go either straight to the wallet or, when the phase has a funding goal,
//! into a refund escrow until [`SaleCampaign::finalize`].
//!
//! A campaign may run on two fronts that share one cap, one goal and one
//! escrow. The Standalone front that calls `link_peer` becomes the Main; the
//! other front is deployed with `init_secondary` and attached by the Main.
//!
//! | Phase       | Entry Point(s)                                         |
//! |-------------|--------------------------------------------------------|
//! | Bootstrap   | [`SaleCampaign::init`], `init_secondary`, `link_peer`  |
//! | Sale        | [`SaleCampaign::buy_tokens`]                           |
//! | Owner       | `extend_end_time`, `dilute_cap`                        |
//! | Controller  | `set_rate`                                             |
//! | Outcome     | [`SaleCampaign::finalize`], `claim_refund`             |
//! | Peer        | `front_totals`, `attach_to_main`                       |
//! | Queries     | `get_campaign`, `phase`, `raised_amount`, ...          |
//!
//! Every check runs before the first state change, and a failure anywhere in
//! a purchase (transfer, escrow booking, mint) rolls the whole call back.

#![no_std]

use soroban_sdk::{contract, contractimpl, Address, Env};

use sale_common::{
    settle, transfer, EscrowClient, Error, FrontTotals, MintGateClient, SaleFrontClient,
};

mod events;
mod pooling;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_dual_front;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_refunds;
#[cfg(test)]
mod testutil;

pub use events::{Finalized, TokenPurchase};
pub use types::{
    Campaign, CapScale, FrontLink, FrontRole, SaleConfig, SalePhase, SaleParams, SaleTotals,
    CAP_DILUTION,
};

use pooling::Pool;

#[contract]
pub struct SaleCampaign;

#[contractimpl]
impl SaleCampaign {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Deploy a Standalone front.
    ///
    /// With `params.goal > 0` the front adopts `escrow` as its refund escrow
    /// and initialises it with `wallet` as beneficiary; without a goal no
    /// escrow may be given.
    pub fn init(
        env: Env,
        owner: Address,
        controller: Address,
        wallet: Address,
        payment_token: Address,
        params: SaleParams,
        escrow: Option<Address>,
    ) -> Result<(), Error> {
        let config =
            Self::prepare(&env, owner, controller, wallet, payment_token, params, &escrow)?;

        if let Some(escrow) = &escrow {
            let client = EscrowClient::new(&env, escrow);
            settle(
                client.try_init(
                    &env.current_contract_address(),
                    &config.wallet,
                    &config.payment_token,
                ),
                Error::InvalidState,
            )?;
        }

        storage::save_front(
            &env,
            &config,
            &FrontLink {
                role: FrontRole::Standalone,
                peer: None,
                escrow,
            },
        );
        Ok(())
    }

    /// Deploy the Secondary front of a dual-front campaign.
    ///
    /// `escrow` must be the Main's escrow; it is only recorded here. The
    /// front refuses purchases until the Main attaches it.
    pub fn init_secondary(
        env: Env,
        owner: Address,
        controller: Address,
        wallet: Address,
        payment_token: Address,
        params: SaleParams,
        escrow: Option<Address>,
    ) -> Result<(), Error> {
        let config =
            Self::prepare(&env, owner, controller, wallet, payment_token, params, &escrow)?;

        storage::save_front(
            &env,
            &config,
            &FrontLink {
                role: FrontRole::Secondary,
                peer: None,
                escrow,
            },
        );
        Ok(())
    }

    /// Pair this Standalone front with `secondary` and become the Main.
    ///
    /// The Secondary checks that it was deployed against the same escrow, cap,
    /// goal and window, and the escrow starts accepting its deposits.
    pub fn link_peer(env: Env, caller: Address, secondary: Address) -> Result<(), Error> {
        let config = Self::require_owner(&env, &caller)?;
        let mut link = storage::load_link(&env)?;
        let this = env.current_contract_address();
        if link.role != FrontRole::Standalone || link.peer.is_some() || secondary == this {
            return Err(Error::InvalidState);
        }

        link.role = FrontRole::Main;
        link.peer = Some(secondary.clone());
        storage::save_link(&env, &link);

        let peer = SaleFrontClient::new(&env, &secondary);
        settle(
            peer.try_attach_to_main(
                &this,
                &link.escrow,
                &config.token_cap,
                &config.goal,
                &config.start_time,
                &config.end_time,
            ),
            Error::InvalidState,
        )?;

        if let Some(escrow) = &link.escrow {
            let client = EscrowClient::new(&env, escrow);
            settle(
                client.try_register_front(&this, &secondary),
                Error::InvalidState,
            )?;
        }

        events::emit_linked(&env, secondary);
        Ok(())
    }

    /// Accept `main` as this Secondary's peer. One-time.
    ///
    /// From here on the Main's cap, goal and end time govern this front.
    pub fn attach_to_main(
        env: Env,
        main: Address,
        escrow: Option<Address>,
        token_cap: i128,
        goal: i128,
        start_time: u64,
        end_time: u64,
    ) -> Result<(), Error> {
        main.require_auth();
        let config = storage::load_config(&env)?;
        let mut link = storage::load_link(&env)?;

        if link.role != FrontRole::Secondary || link.peer.is_some() {
            return Err(Error::InvalidState);
        }
        if link.escrow != escrow || config.token_cap != token_cap || config.goal != goal {
            return Err(Error::InvalidState);
        }
        if config.start_time != start_time || config.end_time != end_time {
            return Err(Error::InvalidState);
        }

        link.peer = Some(main);
        storage::save_link(&env, &link);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Sale
    // ─────────────────────────────────────────────────────────

    /// Buy sale tokens for `beneficiary` with `value` units of the payment
    /// token taken from `contributor`.
    ///
    /// Returns the number of tokens minted.
    pub fn buy_tokens(
        env: Env,
        contributor: Address,
        beneficiary: Address,
        value: i128,
    ) -> Result<i128, Error> {
        contributor.require_auth();
        let config = storage::load_config(&env)?;
        let mut totals = storage::load_totals(&env)?;
        let link = storage::load_link(&env)?;

        if totals.finalized {
            return Err(Error::AlreadyFinalized);
        }
        let pool = pooling::pool(&env, &config, &totals, &link)?;
        let now = env.ledger().timestamp();
        if now < config.start_time || now >= pool.end_time {
            return Err(Error::InvalidTime);
        }
        if value <= 0 {
            return Err(Error::ZeroValue);
        }
        if link.role == FrontRole::Secondary && link.peer.is_none() {
            return Err(Error::InvalidState);
        }

        let amount = value.checked_mul(config.rate).ok_or(Error::Overflow)?;
        let minted_after = pool.minted.checked_add(amount).ok_or(Error::Overflow)?;
        if minted_after > pool.cap {
            return Err(Error::CapExceeded);
        }

        totals.raised = totals.raised.checked_add(value).ok_or(Error::Overflow)?;
        totals.minted = totals.minted.checked_add(amount).ok_or(Error::Overflow)?;
        storage::save_totals(&env, &totals);

        let this = env.current_contract_address();
        match &link.escrow {
            Some(escrow) => {
                transfer(&env, &config.payment_token, &contributor, escrow, value)?;
                let client = EscrowClient::new(&env, escrow);
                settle(
                    client.try_deposit(&this, &contributor, &value),
                    Error::TransferFailed,
                )?;
            }
            None => {
                transfer(&env, &config.payment_token, &contributor, &config.wallet, value)?;
            }
        }

        let controller = MintGateClient::new(&env, &config.controller);
        settle(
            controller.try_mint(&this, &beneficiary, &amount),
            Error::Unauthorized,
        )?;

        events::emit_purchase(&env, contributor, beneficiary, value, amount);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Owner and controller
    // ─────────────────────────────────────────────────────────

    /// Push the sale's end further out. Only while the sale is open.
    ///
    /// Main/Standalone only; a Secondary closes when its Main does.
    pub fn extend_end_time(env: Env, caller: Address, new_end_time: u64) -> Result<(), Error> {
        let mut config = Self::require_owner(&env, &caller)?;
        let totals = storage::load_totals(&env)?;
        let link = storage::load_link(&env)?;

        if link.role == FrontRole::Secondary {
            return Err(Error::InvalidState);
        }
        if Self::phase_of(&env, &config, &totals, &link)? != SalePhase::Open {
            return Err(Error::InvalidState);
        }
        if new_end_time <= config.end_time {
            return Err(Error::InvalidTime);
        }

        config.end_time = new_end_time;
        storage::save_config(&env, &config);

        events::emit_extended(&env, new_end_time);
        Ok(())
    }

    /// Switch the cap and the goal to their diluted unit, `/ CAP_DILUTION`.
    ///
    /// One-time and Main/Standalone only; a Secondary follows the Main's cap.
    /// Refused when the goal would dilute to nothing.
    pub fn dilute_cap(env: Env, caller: Address) -> Result<(), Error> {
        let mut config = Self::require_owner(&env, &caller)?;
        let totals = storage::load_totals(&env)?;
        let link = storage::load_link(&env)?;

        if link.role == FrontRole::Secondary || config.cap_scale == CapScale::Diluted {
            return Err(Error::InvalidState);
        }

        config.cap_scale = CapScale::Diluted;
        if config.has_goal() && config.effective_goal() <= 0 {
            return Err(Error::InvalidState);
        }
        let pool = pooling::pool(&env, &config, &totals, &link)?;
        if pool.minted > pool.cap {
            return Err(Error::CapExceeded);
        }
        storage::save_config(&env, &config);

        events::emit_diluted(&env, pool.cap);
        Ok(())
    }

    /// Rate update pushed by the bound controller.
    pub fn set_rate(env: Env, controller: Address, new_rate: i128) -> Result<(), Error> {
        controller.require_auth();
        let mut config = storage::load_config(&env)?;
        if controller != config.controller {
            return Err(Error::Unauthorized);
        }
        if new_rate <= 0 {
            return Err(Error::ZeroValue);
        }

        config.rate = new_rate;
        storage::save_config(&env, &config);

        events::emit_rate_changed(&env, new_rate);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Outcome
    // ─────────────────────────────────────────────────────────

    /// Close the sale once its window ended or the cap is reached.
    ///
    /// The Main (or a Standalone front) resolves the escrow: pooled raised at
    /// or above the goal releases the funds to the wallet, anything less opens
    /// refunds. A Secondary only marks itself finalized.
    pub fn finalize(env: Env) -> Result<(), Error> {
        let config = storage::load_config(&env)?;
        let mut totals = storage::load_totals(&env)?;
        let link = storage::load_link(&env)?;

        if totals.finalized {
            return Err(Error::AlreadyFinalized);
        }
        let pool = pooling::pool(&env, &config, &totals, &link)?;
        if !Self::window_closed(&env, &pool) {
            return Err(Error::InvalidTime);
        }

        totals.finalized = true;
        storage::save_totals(&env, &totals);

        let goal_reached = pool.goal_reached();
        if link.role != FrontRole::Secondary {
            if let Some(escrow) = &link.escrow {
                let this = env.current_contract_address();
                let client = EscrowClient::new(&env, escrow);
                if goal_reached {
                    settle(client.try_close(&this), Error::InvalidState)?;
                } else {
                    settle(client.try_enable_refunds(&this), Error::InvalidState)?;
                }
            }
        }

        events::emit_finalized(&env, pool.raised, goal_reached);
        Ok(())
    }

    /// Return `contributor`'s escrowed contribution after a missed goal.
    pub fn claim_refund(env: Env, contributor: Address) -> Result<i128, Error> {
        contributor.require_auth();
        let link = storage::load_link(&env)?;
        let escrow = link.escrow.ok_or(Error::NotRefunding)?;

        let client = EscrowClient::new(&env, &escrow);
        let amount = settle(client.try_withdraw(&contributor), Error::TransferFailed)?;

        events::emit_refunded(&env, contributor, amount);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Peer surface
    // ─────────────────────────────────────────────────────────

    /// This front's own counters with its effective cap, goal and end time.
    pub fn front_totals(env: Env) -> Result<FrontTotals, Error> {
        let config = storage::load_config(&env)?;
        let totals = storage::load_totals(&env)?;
        Ok(pooling::own_totals(&config, &totals))
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_campaign(env: Env) -> Result<Campaign, Error> {
        storage::load_campaign(&env)
    }

    pub fn phase(env: Env) -> Result<SalePhase, Error> {
        let config = storage::load_config(&env)?;
        let totals = storage::load_totals(&env)?;
        let link = storage::load_link(&env)?;
        Self::phase_of(&env, &config, &totals, &link)
    }

    /// Contribution units raised across both fronts.
    pub fn raised_amount(env: Env) -> Result<i128, Error> {
        Ok(Self::current_pool(&env)?.raised)
    }

    /// Tokens minted across both fronts.
    pub fn total_supply(env: Env) -> Result<i128, Error> {
        Ok(Self::current_pool(&env)?.minted)
    }

    pub fn individual_raised(env: Env) -> Result<i128, Error> {
        Ok(storage::load_totals(&env)?.raised)
    }

    pub fn individual_supply(env: Env) -> Result<i128, Error> {
        Ok(storage::load_totals(&env)?.minted)
    }

    pub fn rate(env: Env) -> Result<i128, Error> {
        Ok(storage::load_config(&env)?.rate)
    }

    pub fn start_time(env: Env) -> Result<u64, Error> {
        Ok(storage::load_config(&env)?.start_time)
    }

    /// End of the sale window; for a linked Secondary, the Main's.
    pub fn end_time(env: Env) -> Result<u64, Error> {
        Ok(Self::current_pool(&env)?.end_time)
    }

    pub fn token_cap(env: Env) -> Result<i128, Error> {
        Ok(storage::load_config(&env)?.token_cap)
    }

    /// Cap enforced on purchases; for a Secondary, the Main's.
    pub fn effective_cap(env: Env) -> Result<i128, Error> {
        Ok(Self::current_pool(&env)?.cap)
    }

    pub fn goal(env: Env) -> Result<i128, Error> {
        Ok(storage::load_config(&env)?.goal)
    }

    /// Goal checked at finalize, in the unit of `effective_cap`.
    pub fn effective_goal(env: Env) -> Result<i128, Error> {
        Ok(Self::current_pool(&env)?.goal)
    }

    pub fn wallet(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.wallet)
    }

    pub fn escrow(env: Env) -> Result<Option<Address>, Error> {
        Ok(storage::load_link(&env)?.escrow)
    }

    pub fn peer(env: Env) -> Result<Option<Address>, Error> {
        Ok(storage::load_link(&env)?.peer)
    }

    pub fn role(env: Env) -> Result<FrontRole, Error> {
        Ok(storage::load_link(&env)?.role)
    }

    /// Window over: end time passed or the pooled cap is reached.
    pub fn has_ended(env: Env) -> Result<bool, Error> {
        let pool = Self::current_pool(&env)?;
        Ok(Self::window_closed(&env, &pool))
    }

    pub fn goal_reached(env: Env) -> Result<bool, Error> {
        Ok(Self::current_pool(&env)?.goal_reached())
    }

    pub fn is_finalized(env: Env) -> Result<bool, Error> {
        Ok(storage::load_totals(&env)?.finalized)
    }
}

impl SaleCampaign {
    /// Authenticate `owner`, validate deployment parameters and build the
    /// config shared by both init paths.
    fn prepare(
        env: &Env,
        owner: Address,
        controller: Address,
        wallet: Address,
        payment_token: Address,
        params: SaleParams,
        escrow: &Option<Address>,
    ) -> Result<SaleConfig, Error> {
        owner.require_auth();
        if storage::is_initialized(env) {
            return Err(Error::AlreadyInitialized);
        }

        if params.start_time >= params.end_time
            || params.end_time <= env.ledger().timestamp()
        {
            return Err(Error::InvalidTime);
        }
        if params.rate <= 0 || params.token_cap <= 0 {
            return Err(Error::ZeroValue);
        }
        let config = SaleConfig {
            owner,
            controller,
            wallet,
            payment_token,
            start_time: params.start_time,
            end_time: params.end_time,
            rate: params.rate,
            token_cap: params.token_cap,
            goal: params.goal,
            cap_scale: params.cap_scale,
        };
        if config.goal < 0 || config.has_goal() != escrow.is_some() {
            return Err(Error::InvalidState);
        }
        if config.effective_cap() <= 0 || (config.has_goal() && config.effective_goal() <= 0) {
            return Err(Error::ZeroValue);
        }
        Ok(config)
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<SaleConfig, Error> {
        caller.require_auth();
        let config = storage::load_config(env)?;
        if *caller != config.owner {
            return Err(Error::Unauthorized);
        }
        Ok(config)
    }

    fn current_pool(env: &Env) -> Result<Pool, Error> {
        let config = storage::load_config(env)?;
        let totals = storage::load_totals(env)?;
        let link = storage::load_link(env)?;
        pooling::pool(env, &config, &totals, &link)
    }

    fn window_closed(env: &Env, pool: &Pool) -> bool {
        env.ledger().timestamp() >= pool.end_time || pool.cap_reached()
    }

    fn phase_of(
        env: &Env,
        config: &SaleConfig,
        totals: &SaleTotals,
        link: &FrontLink,
    ) -> Result<SalePhase, Error> {
        if totals.finalized {
            return Ok(SalePhase::Finalized);
        }
        if env.ledger().timestamp() < config.start_time {
            return Ok(SalePhase::Pending);
        }
        let pool = pooling::pool(env, config, totals, link)?;
        if Self::window_closed(env, &pool) {
            Ok(SalePhase::Closed)
        } else {
            Ok(SalePhase::Open)
        }
    }
}
