//! Timing scenarios for awaitable checks, driven by a virtual clock.

use correlator::{CheckKind, ListenerPolicy, SettledBy};
use ipc_schema::{CheckResult, InboundEvent};

use crate::harness::{loopback, Rig};

#[test]
fn check_answered_at_100ms_resolves_with_reply() {
    let mut rig = Rig::new();
    let (bridge, host) = loopback();
    let correlator = rig.correlator(Some(host), ListenerPolicy::Route);

    let check = rig.spawn(correlator.request(CheckKind::SystemInfo));
    rig.advance_ms(100);
    assert!(check.borrow().is_none());

    bridge
        .deliver(&InboundEvent::SystemCheckResult(CheckResult::passed()))
        .unwrap();
    rig.settle();

    let settlement = check.borrow_mut().take().expect("settled at 100ms");
    assert_eq!(settlement.via, SettledBy::Event);
    assert_eq!(settlement.value, CheckResult::passed());

    // The armed timer firing later changes nothing.
    rig.advance_ms(10_000);
    assert_eq!(correlator.stats().settled_by_timeout, 0);
    assert_eq!(correlator.stats().settled_by_event, 1);
}

#[test]
fn unanswered_screenshot_check_times_out_at_exactly_5000ms() {
    let mut rig = Rig::new();
    let (bridge, host) = loopback();
    let correlator = rig.correlator(Some(host), ListenerPolicy::Route);

    let check = rig.spawn(correlator.request(CheckKind::Screenshot));
    assert_eq!(bridge.emitted_channels(), vec!["checkScreenshot"]);

    rig.advance_ms(4_999);
    assert!(check.borrow().is_none(), "settled before the deadline");

    rig.advance_ms(1);
    let settlement = check.borrow_mut().take().expect("settled at 5000ms");
    assert!(settlement.timed_out());
    assert_eq!(
        settlement.value,
        CheckResult::failed("Screenshot check timed out, please retry")
    );

    // A reply after the deadline is counted and dropped.
    bridge
        .deliver(&InboundEvent::ScreenshotCheckResult(CheckResult::passed()))
        .unwrap();
    rig.settle();
    assert_eq!(correlator.stats().unsolicited_events, 1);
}

#[test]
fn concurrent_browser_checks_are_answered_in_order_when_routed() {
    let mut rig = Rig::new();
    let (bridge, host) = loopback();
    let correlator = rig.correlator(Some(host), ListenerPolicy::Route);

    let first = rig.spawn(correlator.request(CheckKind::Browser));
    let second = rig.spawn(correlator.request(CheckKind::Browser));
    rig.settle();
    assert_eq!(bridge.listener_count("browserCheckResult"), 1);

    bridge
        .deliver(&InboundEvent::BrowserCheckResult(CheckResult::passed()))
        .unwrap();
    rig.settle();
    assert_eq!(
        first.borrow().as_ref().map(|s| s.value.clone()),
        Some(CheckResult::passed())
    );
    assert!(second.borrow().is_none());

    bridge
        .deliver(&InboundEvent::BrowserCheckResult(CheckResult::failed("no engine")))
        .unwrap();
    rig.settle();
    assert_eq!(
        second.borrow().as_ref().map(|s| s.value.clone()),
        Some(CheckResult::failed("no engine"))
    );
}

#[test]
fn concurrent_browser_checks_share_one_reply_when_accumulating() {
    let mut rig = Rig::new();
    let (bridge, host) = loopback();
    let correlator = rig.correlator(Some(host), ListenerPolicy::Accumulate);

    let first = rig.spawn(correlator.request(CheckKind::Browser));
    let second = rig.spawn(correlator.request(CheckKind::Browser));
    rig.settle();
    assert_eq!(bridge.listener_count("browserCheckResult"), 2);

    bridge
        .deliver(&InboundEvent::BrowserCheckResult(CheckResult::passed()))
        .unwrap();
    rig.settle();

    for slot in [&first, &second] {
        let settlement = slot.borrow_mut().take().expect("both settled");
        assert_eq!(settlement.via, SettledBy::Event);
        assert!(settlement.value.success);
    }

    // The second reply finds only spent listeners.
    bridge
        .deliver(&InboundEvent::BrowserCheckResult(CheckResult::passed()))
        .unwrap();
    rig.settle();
    assert_eq!(correlator.stats().late_events, 2);
}

#[test]
fn missing_bridge_degrades_to_timeouts() {
    let mut rig = Rig::new();
    let correlator = rig.correlator(None, ListenerPolicy::Route);

    let checks: Vec<_> = CheckKind::ALL
        .into_iter()
        .map(|kind| (kind, rig.spawn(correlator.request(kind))))
        .collect();
    rig.advance_ms(5_000);

    for (kind, slot) in checks {
        let settlement = slot.borrow_mut().take().expect("settled by timeout");
        assert!(settlement.timed_out());
        assert_eq!(settlement.value.message.as_deref(), Some(kind.timeout_message()));
    }
    assert_eq!(correlator.stats().settled_by_timeout, 3);
}

#[test]
fn routed_listener_count_stays_flat_across_many_calls() {
    let mut rig = Rig::new();
    let (bridge, host) = loopback();
    let correlator = rig.correlator(Some(host), ListenerPolicy::Route);

    for _ in 0..50 {
        let check = rig.spawn(correlator.request(CheckKind::SystemInfo));
        bridge
            .deliver(&InboundEvent::SystemCheckResult(CheckResult::passed()))
            .unwrap();
        rig.settle();
        assert!(check.borrow().is_some());
    }

    assert_eq!(bridge.listener_count("systemCheckResult"), 1);
    assert_eq!(bridge.total_listeners(), 1);
    assert_eq!(correlator.stats().issued, 50);
}
