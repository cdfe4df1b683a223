extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, IntoVal, TryIntoVal,
};

use crate::testutil::Setup;
use crate::{Finalized, TokenPurchase};

#[test]
fn test_purchase_event() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(2125, 2_000_000, 0));
    let alice = s.contributor(2);
    let beneficiary = Address::generate(&s.env);
    s.open();

    campaign.buy_tokens(&alice, &beneficiary, &2);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, campaign.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("purchase").into_val(&s.env),
        beneficiary.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: TokenPurchase = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        TokenPurchase {
            contributor: alice,
            beneficiary,
            value: 2,
            amount: 4250,
        }
    );
}

#[test]
fn test_finalized_event() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(1, 1_000_000, 1500));
    let alice = s.contributor(1499);
    s.open();
    campaign.buy_tokens(&alice, &alice, &1499);
    s.close();

    campaign.finalize();

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, campaign.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("finalized").into_val(&s.env),
        campaign.address.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Finalized = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        Finalized {
            raised: 1499,
            goal_reached: false,
        }
    );
}

#[test]
fn test_refunded_event() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(1, 1_000_000, 1500));
    let alice = s.contributor(30);
    s.open();
    campaign.buy_tokens(&alice, &alice, &30);
    s.close();
    campaign.finalize();

    campaign.claim_refund(&alice);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &s.env,
        symbol_short!("refunded").into_val(&s.env),
        alice.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let amount: i128 = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(amount, 30);
}

#[test]
fn test_rate_event() {
    let s = Setup::new();
    let campaign = s.standalone(&s.params(10, 1_000, 0));

    campaign.set_rate(&s.controller.address, &25);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &s.env,
        symbol_short!("rate").into_val(&s.env),
        campaign.address.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let rate: i128 = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(rate, 25);
}

#[test]
fn test_linked_event() {
    let s = Setup::new();
    let params = s.params(10, 1_000, 0);
    let main = s.standalone(&params);
    let secondary = s.register_campaign();
    secondary.init_secondary(
        &s.owner,
        &s.controller.address,
        &s.wallet,
        &s.pay_token.address,
        &params,
        &None,
    );

    main.link_peer(&s.owner, &secondary.address);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, main.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("linked").into_val(&s.env),
        main.address.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let peer: Address = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(peer, secondary.address);
}
