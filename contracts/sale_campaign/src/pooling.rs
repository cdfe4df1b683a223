//! # Pooling
//!
//! Both fronts of a dual-front campaign admit purchases against the *sum* of
//! their counters. The peer's counters are read synchronously at call time,
//! before this front changes any state, so two purchases that each fit but
//! together overflow can never both land.
//!
//! The terms are owned by the Main: a Secondary enforces whatever effective
//! cap, goal and end time the Main reports, which keeps a later `dilute_cap`
//! or `extend_end_time` on the Main in force on both fronts.

use soroban_sdk::{Address, Env};

use sale_common::{settle, Error, FrontTotals, SaleFrontClient};

use crate::types::{FrontLink, FrontRole, SaleConfig, SaleTotals};

/// Counters and terms seen across both fronts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub raised: i128,
    pub minted: i128,
    pub cap: i128,
    pub goal: i128,
    pub end_time: u64,
}

impl Pool {
    pub fn cap_reached(&self) -> bool {
        self.minted >= self.cap
    }

    pub fn goal_reached(&self) -> bool {
        self.raised >= self.goal
    }
}

pub fn own_totals(config: &SaleConfig, totals: &SaleTotals) -> FrontTotals {
    FrontTotals {
        raised: totals.raised,
        minted: totals.minted,
        cap: config.effective_cap(),
        goal: config.effective_goal(),
        end_time: config.end_time,
    }
}

pub fn peer_totals(env: &Env, peer: &Address) -> Result<FrontTotals, Error> {
    let client = SaleFrontClient::new(env, peer);
    settle(client.try_front_totals(), Error::InvalidState)
}

pub fn pool(
    env: &Env,
    config: &SaleConfig,
    totals: &SaleTotals,
    link: &FrontLink,
) -> Result<Pool, Error> {
    let own = own_totals(config, totals);
    let peer = match &link.peer {
        Some(peer) => peer,
        None => {
            return Ok(Pool {
                raised: own.raised,
                minted: own.minted,
                cap: own.cap,
                goal: own.goal,
                end_time: own.end_time,
            })
        }
    };

    let other = peer_totals(env, peer)?;
    let terms = match link.role {
        FrontRole::Secondary => &other,
        FrontRole::Standalone | FrontRole::Main => &own,
    };
    Ok(Pool {
        raised: own.raised.checked_add(other.raised).ok_or(Error::Overflow)?,
        minted: own.minted.checked_add(other.minted).ok_or(Error::Overflow)?,
        cap: terms.cap,
        goal: terms.goal,
        end_time: terms.end_time,
    })
}
