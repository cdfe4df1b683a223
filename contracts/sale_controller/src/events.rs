use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Minted {
    pub caller: Address,
    pub to: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminReplaced {
    pub old: Address,
    pub new: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContractsSet {
    pub token: Address,
    pub data_store: Address,
}

pub fn emit_minted(env: &Env, caller: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("minted"), to.clone()),
        Minted { caller, to, amount },
    );
}

pub fn emit_admin_added(env: &Env, admin: Address) {
    env.events()
        .publish((symbol_short!("admin_add"), admin.clone()), admin);
}

pub fn emit_admin_removed(env: &Env, admin: Address) {
    env.events()
        .publish((symbol_short!("admin_del"), admin.clone()), admin);
}

pub fn emit_admin_replaced(env: &Env, old: Address, new: Address) {
    env.events().publish(
        (symbol_short!("admin_rep"), new.clone()),
        AdminReplaced { old, new },
    );
}

pub fn emit_rate_changed(env: &Env, rate: i128) {
    env.events().publish((symbol_short!("rate"),), rate);
}

pub fn emit_paused(env: &Env, owner: Address) {
    env.events().publish((symbol_short!("paused"),), owner);
}

pub fn emit_unpaused(env: &Env, owner: Address) {
    env.events().publish((symbol_short!("unpaused"),), owner);
}

pub fn emit_minting_toggled(env: &Env, finished: bool) {
    let topic = if finished {
        symbol_short!("mint_fin")
    } else {
        symbol_short!("mint_on")
    };
    env.events().publish((topic,), finished);
}

pub fn emit_contracts_set(env: &Env, token: Address, data_store: Address) {
    env.events().publish(
        (symbol_short!("contracts"),),
        ContractsSet { token, data_store },
    );
}

pub fn emit_killed(env: &Env, successor: Address) {
    env.events()
        .publish((symbol_short!("killed"), successor.clone()), successor);
}

pub fn emit_owner_changed(env: &Env, new_owner: Address) {
    env.events()
        .publish((symbol_short!("owner"), new_owner.clone()), new_owner);
}
