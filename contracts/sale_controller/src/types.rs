use soroban_sdk::{contracttype, Address, Vec};

/// Addresses the controller is bound to.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ControllerConfig {
    pub owner: Address,
    /// Sale token ledger (a Stellar Asset Contract administered by us).
    pub token: Address,
    /// External data store owned by us.
    pub data_store: Address,
}

/// Switches consulted on every mint.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ControllerFlags {
    pub paused: bool,
    pub minting_finished: bool,
    /// Set by `kill`; never cleared.
    pub killed: bool,
}

/// Full controller view returned by `info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ControllerInfo {
    pub owner: Address,
    pub token: Address,
    pub data_store: Address,
    pub admins: Vec<Address>,
    pub paused: bool,
    pub minting_finished: bool,
    pub killed: bool,
}
