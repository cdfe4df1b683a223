extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use sale_common::{Error, EscrowState};

use crate::invariants::assert_pooled_cap;
use crate::testutil::{Setup, END, START};
use crate::{FrontRole, SalePhase};

#[test]
fn test_link_peer_assigns_roles() {
    let s = Setup::new();
    let (main, secondary) = s.dual(&s.params(1700, 17_000, 10));

    assert_eq!(main.role(), FrontRole::Main);
    assert_eq!(secondary.role(), FrontRole::Secondary);
    assert_eq!(main.peer(), Some(secondary.address.clone()));
    assert_eq!(secondary.peer(), Some(main.address.clone()));
    assert_eq!(main.escrow(), secondary.escrow());

    let escrow = s.escrow_of(&main);
    assert_eq!(escrow.main_front(), main.address);
    assert_eq!(escrow.secondary_front(), Some(secondary.address.clone()));
}

#[test]
fn test_purchases_pool_across_fronts() {
    let s = Setup::new();
    let (main, secondary) = s.dual(&s.params(1700, 17_000, 10));
    let alice = s.contributor(2);
    let bob = s.contributor(1);
    s.open();

    main.buy_tokens(&alice, &alice, &2);
    secondary.buy_tokens(&bob, &bob, &1);

    for front in [&main, &secondary] {
        assert_eq!(front.raised_amount(), 3);
        assert_eq!(front.total_supply(), 5100);
    }
    assert_eq!(main.individual_raised(), 2);
    assert_eq!(main.individual_supply(), 3400);
    assert_eq!(secondary.individual_raised(), 1);
    assert_eq!(secondary.individual_supply(), 1700);

    let escrow = s.escrow_of(&main);
    assert_eq!(escrow.balance(), 3);
    assert_eq!(s.pay_token.balance(&escrow.address), 3);
    assert_eq!(escrow.deposit_of(&alice), 2);
    assert_eq!(escrow.deposit_of(&bob), 1);
    assert_eq!(s.sale_token.balance(&alice), 3400);
    assert_eq!(s.sale_token.balance(&bob), 1700);
}

#[test]
fn test_joint_cap_rejects_overflowing_purchase() {
    let s = Setup::new();
    let (main, secondary) = s.dual(&s.params(1700, 17_000, 0));
    let alice = s.contributor(6);
    let bob = s.contributor(5);
    s.open();

    main.buy_tokens(&alice, &alice, &6);

    // 10_200 + 8_500 would pass either front's cap on its own counters.
    assert_eq!(
        secondary.try_buy_tokens(&bob, &bob, &5),
        Err(Ok(Error::CapExceeded))
    );
    assert_eq!(s.pay_token.balance(&bob), 5);

    secondary.buy_tokens(&bob, &bob, &4);
    assert_eq!(main.total_supply(), 17_000);
    assert_pooled_cap(&[&main.get_campaign(), &secondary.get_campaign()], 17_000);

    assert_eq!(main.phase(), SalePhase::Closed);
    assert_eq!(secondary.phase(), SalePhase::Closed);
    assert_eq!(
        main.try_buy_tokens(&alice, &alice, &1),
        Err(Ok(Error::CapExceeded))
    );
    assert_eq!(s.pay_token.balance(&s.wallet), 10);
}

#[test]
fn test_unlinked_secondary_refuses_purchases() {
    let s = Setup::new();
    let params = s.params(10, 1_000, 0);
    let secondary = s.register_campaign();
    secondary.init_secondary(
        &s.owner,
        &s.controller.address,
        &s.wallet,
        &s.pay_token.address,
        &params,
        &None,
    );
    s.controller.add_admin(&s.owner, &secondary.address);
    let alice = s.contributor(10);
    s.open();

    assert_eq!(secondary.role(), FrontRole::Secondary);
    assert_eq!(
        secondary.try_buy_tokens(&alice, &alice, &1),
        Err(Ok(Error::InvalidState))
    );
}

#[test]
fn test_link_peer_is_owner_only_and_one_time() {
    let s = Setup::new();
    let params = s.params(10, 1_000, 0);
    let (main, secondary) = s.dual(&params);

    let other = s.register_campaign();
    other.init_secondary(
        &s.owner,
        &s.controller.address,
        &s.wallet,
        &s.pay_token.address,
        &params,
        &None,
    );
    assert_eq!(
        main.try_link_peer(&s.owner, &other.address),
        Err(Ok(Error::InvalidState))
    );
    assert_eq!(main.peer(), Some(secondary.address.clone()));

    let fresh = s.standalone(&params);
    let stranger = Address::generate(&s.env);
    assert_eq!(
        fresh.try_link_peer(&stranger, &other.address),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        fresh.try_link_peer(&s.owner, &fresh.address),
        Err(Ok(Error::InvalidState))
    );
}

#[test]
fn test_secondary_cannot_be_attached_twice() {
    let s = Setup::new();
    let params = s.params(10, 1_000, 0);
    let (_main, secondary) = s.dual(&params);

    let second_main = s.standalone(&params);
    assert_eq!(
        second_main.try_link_peer(&s.owner, &secondary.address),
        Err(Ok(Error::InvalidState))
    );
    assert_eq!(second_main.role(), FrontRole::Standalone);
    assert_eq!(second_main.peer(), None);
}

#[test]
fn test_mismatched_secondary_is_rejected() {
    let s = Setup::new();
    let main = s.standalone(&s.params(10, 1_000, 0));

    let secondary = s.register_campaign();
    secondary.init_secondary(
        &s.owner,
        &s.controller.address,
        &s.wallet,
        &s.pay_token.address,
        &s.params(10, 2_000, 0),
        &None,
    );

    assert_eq!(
        main.try_link_peer(&s.owner, &secondary.address),
        Err(Ok(Error::InvalidState))
    );
    assert_eq!(main.role(), FrontRole::Standalone);
    assert_eq!(main.peer(), None);
    assert_eq!(secondary.peer(), None);
}

#[test]
fn test_dilution_on_main_binds_secondary() {
    let s = Setup::new();
    let (main, secondary) = s.dual(&s.params(2125, 2_125_000_000_000, 0));
    let alice = s.contributor(1_000);
    s.open();

    assert_eq!(
        secondary.try_dilute_cap(&s.owner),
        Err(Ok(Error::InvalidState))
    );

    main.dilute_cap(&s.owner);
    assert_eq!(secondary.effective_cap(), 2_125_000);

    main.buy_tokens(&alice, &alice, &600);
    assert_eq!(
        secondary.try_buy_tokens(&alice, &alice, &401),
        Err(Ok(Error::CapExceeded))
    );
    secondary.buy_tokens(&alice, &alice, &400);
    assert_eq!(secondary.total_supply(), 2_125_000);
}

#[test]
fn test_rate_change_reaches_both_fronts() {
    let s = Setup::new();
    let (main, secondary) = s.dual(&s.params(1700, 17_000_000, 0));
    let alice = s.contributor(2);
    s.open();

    s.controller.change_rate(&s.owner, &2000);
    assert_eq!(main.rate(), 2000);
    assert_eq!(secondary.rate(), 2000);

    assert_eq!(main.buy_tokens(&alice, &alice, &1), 2000);
    assert_eq!(secondary.buy_tokens(&alice, &alice, &1), 2000);
}

#[test]
fn test_secondary_finalize_leaves_escrow_alone() {
    let s = Setup::new();
    let (main, secondary) = s.dual(&s.params(10, 1_000, 3));
    let alice = s.contributor(2);
    let bob = s.contributor(1);
    s.open();

    main.buy_tokens(&alice, &alice, &2);
    secondary.buy_tokens(&bob, &bob, &1);
    s.close();

    let escrow = s.escrow_of(&main);
    secondary.finalize();
    assert!(secondary.is_finalized());
    assert!(!main.is_finalized());
    assert_eq!(escrow.state(), EscrowState::Active);
    assert_eq!(escrow.balance(), 3);

    // Goal met on the pooled amount even though neither front reached it.
    assert!(main.goal_reached());
    main.finalize();
    assert_eq!(escrow.state(), EscrowState::Closed);
    assert_eq!(s.pay_token.balance(&s.wallet), 3);
}

#[test]
fn test_main_finalize_opens_refunds_for_both_fronts() {
    let s = Setup::new();
    let (main, secondary) = s.dual(&s.params(10, 1_000, 5));
    let alice = s.contributor(2);
    let bob = s.contributor(1);
    s.open();

    main.buy_tokens(&alice, &alice, &2);
    secondary.buy_tokens(&bob, &bob, &1);
    s.close();

    main.finalize();
    assert_eq!(s.escrow_of(&main).state(), EscrowState::Refunding);

    assert_eq!(secondary.claim_refund(&bob), 1);
    assert_eq!(main.claim_refund(&alice), 2);
    assert_eq!(s.pay_token.balance(&alice), 2);
    assert_eq!(s.pay_token.balance(&bob), 1);
}

#[test]
fn test_joint_cap_breach_leaves_escrow_and_balances_untouched() {
    let s = Setup::new();
    let (main, secondary) = s.dual(&s.params(1700, 17_000, 10));
    let alice = s.contributor(6);
    let bob = s.contributor(5);
    let beneficiary = Address::generate(&s.env);
    s.open();

    main.buy_tokens(&alice, &alice, &6);
    let escrow = s.escrow_of(&main);

    assert_eq!(
        secondary.try_buy_tokens(&bob, &beneficiary, &5),
        Err(Ok(Error::CapExceeded))
    );
    assert_eq!(escrow.balance(), 6);
    assert_eq!(s.pay_token.balance(&escrow.address), 6);
    assert_eq!(escrow.deposit_of(&alice), 6);
    assert_eq!(escrow.deposit_of(&bob), 0);
    assert_eq!(s.pay_token.balance(&s.wallet), 0);
    assert_eq!(s.pay_token.balance(&bob), 5);
    assert_eq!(s.sale_token.balance(&beneficiary), 0);
    assert_eq!(secondary.individual_raised(), 0);
    assert_eq!(secondary.total_supply(), 10_200);
}

#[test]
fn test_secondary_window_must_match_main() {
    let s = Setup::new();
    let params = s.params(10, 1_000, 5);
    let main = s.standalone(&params);

    let mut late_end = params.clone();
    late_end.end_time = 2 * END;
    let mut late_start = params.clone();
    late_start.start_time = START + 1;

    for other in [late_end, late_start] {
        let secondary = s.register_campaign();
        secondary.init_secondary(
            &s.owner,
            &s.controller.address,
            &s.wallet,
            &s.pay_token.address,
            &other,
            &main.escrow(),
        );
        assert_eq!(
            main.try_link_peer(&s.owner, &secondary.address),
            Err(Ok(Error::InvalidState))
        );
        assert_eq!(secondary.peer(), None);
    }
    assert_eq!(main.role(), FrontRole::Standalone);
    assert_eq!(s.escrow_of(&main).secondary_front(), None);
}

#[test]
fn test_main_extension_carries_secondary() {
    let s = Setup::new();
    let (main, secondary) = s.dual(&s.params(10, 1_000, 5));
    let alice = s.contributor(10);
    s.open();

    assert_eq!(
        secondary.try_extend_end_time(&s.owner, &(END + 500)),
        Err(Ok(Error::InvalidState))
    );
    main.extend_end_time(&s.owner, &(END + 500));
    assert_eq!(secondary.end_time(), END + 500);

    s.close();
    assert_eq!(secondary.phase(), SalePhase::Open);
    secondary.buy_tokens(&alice, &alice, &1);
    assert_eq!(main.try_finalize(), Err(Ok(Error::InvalidTime)));

    s.warp(END + 500);
    assert_eq!(secondary.phase(), SalePhase::Closed);
    assert_eq!(
        secondary.try_buy_tokens(&alice, &alice, &1),
        Err(Ok(Error::InvalidTime))
    );

    main.finalize();
    secondary.finalize();
    assert_eq!(s.escrow_of(&main).state(), EscrowState::Refunding);
    assert_eq!(secondary.claim_refund(&alice), 1);
}
