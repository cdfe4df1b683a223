//! Shared setup for the campaign test modules: a live controller that owns the
//! sale token, a payment asset, and helpers to deploy single and dual fronts.

#![allow(dead_code)]

extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env,
};

use refund_escrow::{RefundEscrow, RefundEscrowClient};
use sale_controller::{SaleController, SaleControllerClient};

use crate::{CapScale, SaleCampaign, SaleCampaignClient, SaleParams};

pub const START: u64 = 1_000;
pub const END: u64 = 10_000;

pub struct Setup {
    pub env: Env,
    pub owner: Address,
    pub wallet: Address,
    pub controller: SaleControllerClient<'static>,
    pub sale_token: token::Client<'static>,
    pub pay_token: token::Client<'static>,
    pub pay_issuer: token::StellarAssetClient<'static>,
}

impl Setup {
    /// Controller unpaused and admin of the sale token; clock before `START`.
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let owner = Address::generate(&env);
        let wallet = Address::generate(&env);

        let controller_id = env.register(SaleController, ());
        let controller = SaleControllerClient::new(&env, &controller_id);

        let sale_sac = env.register_stellar_asset_contract_v2(controller_id.clone());
        let sale_token = token::Client::new(&env, &sale_sac.address());

        let issuer = Address::generate(&env);
        let pay_sac = env.register_stellar_asset_contract_v2(issuer);
        let pay_token = token::Client::new(&env, &pay_sac.address());
        let pay_issuer = token::StellarAssetClient::new(&env, &pay_sac.address());

        let data_store = Address::generate(&env);
        controller.init(&owner, &sale_token.address, &data_store);
        controller.unpause(&owner);

        Setup {
            env,
            owner,
            wallet,
            controller,
            sale_token,
            pay_token,
            pay_issuer,
        }
    }

    pub fn params(&self, rate: i128, token_cap: i128, goal: i128) -> SaleParams {
        SaleParams {
            start_time: START,
            end_time: END,
            rate,
            token_cap,
            goal,
            cap_scale: CapScale::Full,
        }
    }

    /// Register a campaign contract without initialising it.
    pub fn register_campaign(&self) -> SaleCampaignClient<'static> {
        let id = self.env.register(SaleCampaign, ());
        SaleCampaignClient::new(&self.env, &id)
    }

    pub fn register_escrow(&self) -> RefundEscrowClient<'static> {
        let id = self.env.register(RefundEscrow, ());
        RefundEscrowClient::new(&self.env, &id)
    }

    /// A Standalone front allowed to mint; with an escrow when `params` has
    /// a goal.
    pub fn standalone(&self, params: &SaleParams) -> SaleCampaignClient<'static> {
        let campaign = self.register_campaign();
        let escrow = (params.goal > 0).then(|| self.register_escrow().address);
        campaign.init(
            &self.owner,
            &self.controller.address,
            &self.wallet,
            &self.pay_token.address,
            params,
            &escrow,
        );
        self.controller.add_admin(&self.owner, &campaign.address);
        campaign
    }

    /// Main and Secondary fronts sharing `params`, linked and allowed to mint.
    pub fn dual(
        &self,
        params: &SaleParams,
    ) -> (SaleCampaignClient<'static>, SaleCampaignClient<'static>) {
        let main = self.register_campaign();
        let secondary = self.register_campaign();
        let escrow = (params.goal > 0).then(|| self.register_escrow().address);

        main.init(
            &self.owner,
            &self.controller.address,
            &self.wallet,
            &self.pay_token.address,
            params,
            &escrow,
        );
        secondary.init_secondary(
            &self.owner,
            &self.controller.address,
            &self.wallet,
            &self.pay_token.address,
            params,
            &escrow,
        );
        main.link_peer(&self.owner, &secondary.address);

        self.controller.add_admin(&self.owner, &main.address);
        self.controller.add_admin(&self.owner, &secondary.address);
        (main, secondary)
    }

    pub fn escrow_of(&self, campaign: &SaleCampaignClient) -> RefundEscrowClient<'static> {
        let id = campaign.escrow().expect("campaign has no escrow");
        RefundEscrowClient::new(&self.env, &id)
    }

    /// Fresh contributor holding `funds` of the payment asset.
    pub fn contributor(&self, funds: i128) -> Address {
        let contributor = Address::generate(&self.env);
        if funds > 0 {
            self.pay_issuer.mint(&contributor, &funds);
        }
        contributor
    }

    pub fn warp(&self, timestamp: u64) {
        self.env.ledger().with_mut(|li| li.timestamp = timestamp);
    }

    pub fn open(&self) {
        self.warp(START);
    }

    pub fn close(&self) {
        self.warp(END);
    }
}
