#![allow(dead_code)]

extern crate std;

use crate::types::{Campaign, SalePhase};

/// Minted supply across the fronts never exceeds the shared cap.
pub fn assert_pooled_cap(fronts: &[&Campaign], cap: i128) {
    let minted: i128 = fronts.iter().map(|c| c.minted).sum();
    assert!(
        minted <= cap,
        "pooled cap violated: {} minted against cap {}",
        minted,
        cap
    );
}

/// Counters never go negative.
pub fn assert_counters_non_negative(campaign: &Campaign) {
    assert!(
        campaign.raised >= 0 && campaign.minted >= 0,
        "negative counters: raised {} minted {}",
        campaign.raised,
        campaign.minted
    );
}

/// With a constant rate every contribution unit produced exactly `rate`
/// tokens.
pub fn assert_minted_at_rate(campaign: &Campaign) {
    assert_eq!(
        campaign.minted,
        campaign.raised * campaign.rate,
        "minted {} does not match raised {} at rate {}",
        campaign.minted,
        campaign.raised,
        campaign.rate
    );
}

/// A purchase moves the sale counters by exactly the paid value.
pub fn assert_purchase_delta(before: &Campaign, after: &Campaign, value: i128, amount: i128) {
    assert_eq!(after.raised, before.raised + value, "raised delta");
    assert_eq!(after.minted, before.minted + amount, "minted delta");
}

/// Phases only move forward.
///   Pending -> Open | Closed | Finalized
///   Open    -> Closed | Finalized
///   Closed  -> Finalized
pub fn assert_valid_phase_transition(from: SalePhase, to: SalePhase) {
    let rank = |phase: SalePhase| match phase {
        SalePhase::Pending => 0,
        SalePhase::Open => 1,
        SalePhase::Closed => 2,
        SalePhase::Finalized => 3,
    };
    assert!(
        rank(to) >= rank(from),
        "phase moved backwards: {:?} -> {:?}",
        from,
        to
    );
}
