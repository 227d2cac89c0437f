use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use starsync_core::{
    AlignmentEvent, AppEvent, EventBus, EventCategory, EventFilter, NotificationEvent,
    NotificationLevel, SettingsEvent,
};
use tokio::sync::broadcast::error::RecvError;

fn count_event(count: usize) -> AppEvent {
    AppEvent::Alignment(AlignmentEvent::PointCountChanged { count })
}

#[test]
fn test_category_filter() {
    let bus = EventBus::new();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::Notification]),
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );

    bus.publish_all([
        count_event(1),
        AppEvent::Settings(SettingsEvent::ConfigurationApplied),
        AppEvent::Notification(NotificationEvent::new(NotificationLevel::Warning, "flat")),
    ]);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_handlers_run_in_subscription_order() {
    let bus = EventBus::new();
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
    for tag in ["first", "second"] {
        let order = order.clone();
        bus.subscribe(EventFilter::All, move |_| order.lock().push(tag));
    }

    assert_eq!(bus.publish(count_event(1)), 2);
    assert_eq!(*order.lock(), vec!["first", "second"]);
}

#[test]
fn test_history_is_bounded() {
    let bus = EventBus::with_history(3);
    for n in 0..5 {
        bus.publish(count_event(n));
    }
    assert_eq!(
        bus.history(),
        vec![count_event(2), count_event(3), count_event(4)]
    );
}

#[test]
fn test_history_disabled_by_default() {
    let bus = EventBus::new();
    bus.publish(count_event(1));
    assert!(bus.history().is_empty());
}

#[tokio::test]
async fn test_receiver_sees_events_in_order() {
    let bus = EventBus::new();
    let mut rx = bus.receiver();

    assert_eq!(bus.publish(count_event(3)), 1);
    bus.publish(AppEvent::Alignment(AlignmentEvent::TransformStateChanged {
        enabled: true,
    }));

    assert_eq!(rx.recv().await.unwrap(), count_event(3));
    let second = rx.recv().await.unwrap();
    assert_eq!(second.description(), "Alignment transform enabled");

    drop(bus);
    assert!(matches!(rx.recv().await, Err(RecvError::Closed)));
}

#[test]
fn test_event_serializes() {
    let event = AppEvent::Alignment(AlignmentEvent::DegenerateGeometry { ids: vec![1, 2, 3] });
    let json = serde_json::to_string(&event).unwrap();
    let back: AppEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
