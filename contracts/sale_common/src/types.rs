use soroban_sdk::contracttype;

/// One sale front's own counters plus the terms it enforces.
///
/// This is the whole payload peers exchange: a front adds the other front's
/// `raised` and `minted` to its own before admitting a purchase, and a
/// Secondary takes `cap`, `goal` and `end_time` from its Main.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrontTotals {
    /// Contribution units received by this front.
    pub raised: i128,
    /// Tokens minted through this front.
    pub minted: i128,
    /// Effective token cap of this front (after any dilution).
    pub cap: i128,
    /// Effective funding goal, scaled with the cap; 0 when disabled.
    pub goal: i128,
    pub end_time: u64,
}

/// Lifecycle of the refund escrow.
///
/// ```text
/// Active ──► Closed      (goal met, balance paid to beneficiary)
///    └─────► Refunding   (goal missed, contributors withdraw)
/// ```
///
/// Both `Closed` and `Refunding` are terminal.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EscrowState {
    Active,
    Refunding,
    Closed,
}
