//! # Types
//!
//! ## Config / Totals / Link split
//!
//! A campaign front is stored as three instance entries:
//!
//! - [`SaleConfig`]: written at init; touched again only by
//!   `extend_end_time`, `set_rate` and `dilute_cap`.
//! - [`SaleTotals`]: rewritten on every purchase and on finalize.
//! - [`FrontLink`]: role, peer and escrow; written at init and once more
//!   when the fronts are linked.
//!
//! [`Campaign`] is the reconstructed read model.
//!
//! ## Phases
//!
//! ```text
//! Pending ──► Open ──► Closed ──► Finalized
//!               └─(cap reached)──►┘
//! ```

use soroban_sdk::{contracttype, Address};

/// Divisor applied to `token_cap` and `goal` once the cap is diluted.
pub const CAP_DILUTION: i128 = 1_000_000;

/// Unit in which the token cap is enforced.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CapScale {
    /// Cap enforced as configured.
    Full,
    /// Cap enforced as `token_cap / CAP_DILUTION`, goal as
    /// `goal / CAP_DILUTION`.
    Diluted,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SalePhase {
    Pending,
    Open,
    Closed,
    Finalized,
}

/// Position of a front in a (possibly dual-front) campaign.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrontRole {
    /// Single front; becomes `Main` when it links a peer.
    Standalone,
    /// Owns the escrow outcome and the pooled cap.
    Main,
    /// Sells against the Main's cap and escrow; finalize is local only.
    Secondary,
}

/// Deployment parameters of one sale phase.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleParams {
    pub start_time: u64,
    pub end_time: u64,
    /// Tokens per contribution unit.
    pub rate: i128,
    pub token_cap: i128,
    /// Funding goal in contribution units; 0 disables the goal and escrow.
    pub goal: i128,
    pub cap_scale: CapScale,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    pub owner: Address,
    pub controller: Address,
    /// Multisig wallet receiving the proceeds.
    pub wallet: Address,
    /// Asset contributions are paid in.
    pub payment_token: Address,
    pub start_time: u64,
    pub end_time: u64,
    pub rate: i128,
    pub token_cap: i128,
    pub goal: i128,
    pub cap_scale: CapScale,
}

impl SaleConfig {
    /// Cap this front enforces, after dilution.
    pub fn effective_cap(&self) -> i128 {
        match self.cap_scale {
            CapScale::Full => self.token_cap,
            CapScale::Diluted => self.token_cap / CAP_DILUTION,
        }
    }

    /// Goal in the same unit as [`SaleConfig::effective_cap`].
    pub fn effective_goal(&self) -> i128 {
        match self.cap_scale {
            CapScale::Full => self.goal,
            CapScale::Diluted => self.goal / CAP_DILUTION,
        }
    }

    pub fn has_goal(&self) -> bool {
        self.goal > 0
    }
}

/// This front's own counters.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SaleTotals {
    pub raised: i128,
    pub minted: i128,
    pub finalized: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrontLink {
    pub role: FrontRole,
    pub peer: Option<Address>,
    pub escrow: Option<Address>,
}

/// Full read model of a front. Counters are this front's own.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    pub owner: Address,
    pub controller: Address,
    pub wallet: Address,
    pub payment_token: Address,
    pub start_time: u64,
    pub end_time: u64,
    pub rate: i128,
    pub token_cap: i128,
    pub goal: i128,
    pub cap_scale: CapScale,
    pub raised: i128,
    pub minted: i128,
    pub finalized: bool,
    pub role: FrontRole,
    pub peer: Option<Address>,
    pub escrow: Option<Address>,
}
