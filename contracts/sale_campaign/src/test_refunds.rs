extern crate std;

use sale_common::{Error, EscrowState};

use crate::testutil::Setup;
use crate::CapScale;

#[test]
fn test_goal_missed_refunds_exact_deposit() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(1, 1_000_000, 1500));
    let alice = s.contributor(1499);
    s.open();

    campaign.buy_tokens(&alice, &alice, &1499);
    assert_eq!(s.pay_token.balance(&alice), 0);
    assert_eq!(s.pay_token.balance(&s.wallet), 0);

    s.close();
    assert!(!campaign.goal_reached());
    campaign.finalize();

    let escrow = s.escrow_of(&campaign);
    assert_eq!(escrow.state(), EscrowState::Refunding);

    assert_eq!(campaign.claim_refund(&alice), 1499);
    assert_eq!(s.pay_token.balance(&alice), 1499);
    assert_eq!(escrow.balance(), 0);

    assert_eq!(
        campaign.try_claim_refund(&alice),
        Err(Ok(Error::NoDeposit))
    );
    // Sale tokens are not clawed back.
    assert_eq!(s.sale_token.balance(&alice), 1499);
}

#[test]
fn test_goal_met_releases_funds_to_wallet() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(1, 1_000_000, 1500));
    let alice = s.contributor(1000);
    let bob = s.contributor(500);
    s.open();

    campaign.buy_tokens(&alice, &alice, &1000);
    campaign.buy_tokens(&bob, &bob, &500);
    s.close();

    assert!(campaign.goal_reached());
    campaign.finalize();

    let escrow = s.escrow_of(&campaign);
    assert_eq!(escrow.state(), EscrowState::Closed);
    assert_eq!(s.pay_token.balance(&s.wallet), 1500);
    assert_eq!(s.pay_token.balance(&escrow.address), 0);

    assert_eq!(
        campaign.try_claim_refund(&alice),
        Err(Ok(Error::NotRefunding))
    );
}

#[test]
fn test_refund_before_finalize_fails() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(1, 1_000_000, 1500));
    let alice = s.contributor(10);
    s.open();

    campaign.buy_tokens(&alice, &alice, &10);
    assert_eq!(
        campaign.try_claim_refund(&alice),
        Err(Ok(Error::NotRefunding))
    );
    assert_eq!(s.escrow_of(&campaign).deposit_of(&alice), 10);
}

#[test]
fn test_refund_without_goal_fails() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(1, 1_000, 0));
    let alice = s.contributor(10);
    s.open();

    campaign.buy_tokens(&alice, &alice, &10);
    s.close();
    campaign.finalize();

    assert_eq!(
        campaign.try_claim_refund(&alice),
        Err(Ok(Error::NotRefunding))
    );
    assert_eq!(s.pay_token.balance(&s.wallet), 10);
}

#[test]
fn test_refund_for_non_contributor_fails() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(1, 1_000_000, 1500));
    let alice = s.contributor(10);
    let stranger = s.contributor(0);
    s.open();

    campaign.buy_tokens(&alice, &alice, &10);
    s.close();
    campaign.finalize();

    assert_eq!(
        campaign.try_claim_refund(&stranger),
        Err(Ok(Error::NoDeposit))
    );
    assert_eq!(s.escrow_of(&campaign).balance(), 10);
}

#[test]
fn test_refund_goes_to_payer_not_beneficiary() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(1, 1_000_000, 1500));
    let alice = s.contributor(40);
    let friend = s.contributor(0);
    s.open();

    campaign.buy_tokens(&alice, &friend, &40);
    s.close();
    campaign.finalize();

    assert_eq!(
        campaign.try_claim_refund(&friend),
        Err(Ok(Error::NoDeposit))
    );
    assert_eq!(campaign.claim_refund(&alice), 40);
    assert_eq!(s.pay_token.balance(&alice), 40);
}

// ── Diluted goal ─────────────────────────────────────────────

#[test]
fn test_diluted_goal_met_forwards_funds_after_end() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(1000, 10_000_000_000_000, 1_500_000_000));
    let alice = s.contributor(1500);
    s.open();

    assert_eq!(campaign.effective_goal(), 1_500_000_000);
    campaign.dilute_cap(&s.owner);
    assert_eq!(campaign.effective_cap(), 10_000_000);
    assert_eq!(campaign.effective_goal(), 1500);
    assert_eq!(campaign.goal(), 1_500_000_000);

    campaign.buy_tokens(&alice, &alice, &1500);
    s.close();

    assert!(campaign.goal_reached());
    campaign.finalize();

    let escrow = s.escrow_of(&campaign);
    assert_eq!(escrow.state(), EscrowState::Closed);
    assert_eq!(s.pay_token.balance(&s.wallet), 1500);
}

#[test]
fn test_diluted_goal_from_deployment_missed() {
    let s = Setup::new();
    let mut params = s.params(1000, 10_000_000_000_000, 1_500_000_000);
    params.cap_scale = CapScale::Diluted;
    let campaign = s.standalone(&params);
    let alice = s.contributor(1499);
    s.open();

    assert_eq!(campaign.effective_goal(), 1500);
    campaign.buy_tokens(&alice, &alice, &1499);
    s.close();

    assert!(!campaign.goal_reached());
    campaign.finalize();
    assert_eq!(s.escrow_of(&campaign).state(), EscrowState::Refunding);
    assert_eq!(campaign.claim_refund(&alice), 1499);
}

#[test]
fn test_goal_too_small_to_dilute() {
    let s = Setup::new();

    let campaign = s.standalone(&s.params(1, 10_000_000_000, 999_999));
    assert_eq!(
        campaign.try_dilute_cap(&s.owner),
        Err(Ok(Error::InvalidState))
    );
    assert_eq!(campaign.get_campaign().cap_scale, CapScale::Full);

    let mut params = s.params(1, 10_000_000_000, 999_999);
    params.cap_scale = CapScale::Diluted;
    let fresh = s.register_campaign();
    let escrow = s.register_escrow();
    assert_eq!(
        fresh.try_init(
            &s.owner,
            &s.controller.address,
            &s.wallet,
            &s.pay_token.address,
            &params,
            &Some(escrow.address.clone()),
        ),
        Err(Ok(Error::ZeroValue))
    );
}
