use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_test::assert_ok;

use weekstay::config::ScheduleConfig;
use weekstay::engine::{resolve_prices, ChannelObserver, SelectionController, CONTIGUITY_MESSAGE};
use weekstay::listings::parse_listings;
use weekstay::model::*;
use weekstay::session::SessionManager;

// ── Test infrastructure ──────────────────────────────────────

fn day(i: u8) -> Day {
    Day::new(i).unwrap()
}

fn open(config: ScheduleConfig) -> (Arc<SelectionController>, UnboundedReceiver<ControllerEvent>, SessionManager) {
    let sessions = SessionManager::new(config);
    let (observer, rx) = ChannelObserver::new();
    let id = assert_ok!(sessions.open(Arc::new(observer)));
    let controller = assert_ok!(sessions.get(&id));
    (controller, rx, sessions)
}

fn drain(rx: &mut UnboundedReceiver<ControllerEvent>) -> Vec<ControllerEvent> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

fn changed(indices: &[u8]) -> ControllerEvent {
    ControllerEvent::SelectionChange {
        days: indices.iter().map(|&i| day(i)).collect(),
    }
}

const LISTINGS: &str = r#"[
    {"id": "harbor-loft", "price2": 180, "price3": 165, "price4": 150, "price5": 140, "price7": 120, "weekly": 840, "standardizedMinimumNightlyPrice": 190},
    {"id": "garden-flat", "weekly": 721, "standardizedMinimumNightlyPrice": 110},
    {"id": "attic-room", "standardizedMinimumNightlyPrice": 75}
]"#;

// ── Scenarios ────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn weekend_drag_then_pricing() {
    let (c, mut rx, _sessions) = open(ScheduleConfig::default());
    let listings = parse_listings(LISTINGS).unwrap();

    // Nothing selected: everyone shows their fallback rate.
    let prices: Vec<f64> = resolve_prices(&listings, 0).iter().map(|p| p.nightly).collect();
    assert_eq!(prices, vec![120.0, 103.0, 75.0]);

    // Fri → Mon across the week boundary.
    c.pointer_down(day(5));
    c.pointer_enter(day(6));
    c.pointer_enter(day(0));
    c.pointer_enter(day(1));
    c.pointer_up();

    assert_eq!(drain(&mut rx), vec![changed(&[5, 6, 0, 1])]);
    let snap = c.snapshot();
    assert_eq!(snap.night_count(), 3);
    assert_eq!(snap.check_in(), Some(Day::FRIDAY));
    assert_eq!(snap.check_out(), Some(Day::MONDAY));
    assert_eq!(snap.summary(), "Fri - Mon (3 nights)");

    let prices: Vec<f64> = resolve_prices(&listings, snap.len()).iter().map(|p| p.nightly).collect();
    assert_eq!(prices, vec![165.0, 103.0, 75.0]);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn click_building_a_broken_week() {
    let (c, mut rx, _sessions) = open(ScheduleConfig::default());

    for i in [1, 2, 4] {
        c.pointer_down(day(i));
        c.pointer_up();
    }
    assert_eq!(
        drain(&mut rx),
        vec![
            changed(&[1]),
            changed(&[1, 2]),
            changed(&[1, 2, 4]),
            ControllerEvent::Error { message: CONTIGUITY_MESSAGE.to_string() },
        ]
    );

    // Fill the gap before the deferred check runs.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    c.pointer_down(day(3));
    c.pointer_up();
    assert_eq!(drain(&mut rx), vec![changed(&[1, 2, 3, 4])]);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(drain(&mut rx).is_empty());
    assert!(c.validate().is_valid());
}

#[tokio::test(start_paused = true)]
async fn oversized_drag_is_cleared() {
    let (c, mut rx, _sessions) = open(ScheduleConfig {
        max_nights: 3,
        ..ScheduleConfig::default()
    });
    c.pointer_down(day(1));
    c.pointer_enter(day(6));
    c.pointer_up();

    assert!(c.snapshot().is_empty());
    assert_eq!(
        drain(&mut rx),
        vec![
            changed(&[]),
            ControllerEvent::Error { message: "Please select no more than 3 nights".to_string() },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn closing_session_silences_pending_warning() {
    let (c, mut rx, sessions) = open(ScheduleConfig::default());
    let (observer, mut second_rx) = ChannelObserver::new();
    let id = sessions.open(Arc::new(observer)).unwrap();
    let second = sessions.get(&id).unwrap();
    second.pointer_down(day(3));
    second.pointer_up();
    sessions.close(&id).unwrap();
    assert!(second.is_disposed());

    c.pointer_down(day(3));
    c.pointer_up();
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(
        drain(&mut rx),
        vec![
            changed(&[3]),
            ControllerEvent::Error { message: "Please select at least 2 nights".to_string() },
        ]
    );
    assert_eq!(sessions.len(), 1);

    // The closed session reported its click, then nothing once its timer was due.
    assert_eq!(drain(&mut second_rx), vec![changed(&[3])]);
}
