use crate::integration::support::{credentials, Bridge};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use twitch_bridge::platform::memory::MemoryConnectionFactory;
use twitch_bridge::{AdapterError, ConnectionProvider, ConnectionStatus};

#[test]
fn concurrent_starts_build_one_connection() {
    let factory =
        Arc::new(MemoryConnectionFactory::new().with_build_delay(Duration::from_millis(25)));
    let provider = Arc::new(ConnectionProvider::new(factory.clone()));
    let adapters = 8;
    let barrier = Arc::new(Barrier::new(adapters));

    let handles: Vec<_> = (0..adapters)
        .map(|_| {
            let factory = Arc::clone(&factory);
            let provider = Arc::clone(&provider);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let bridge = Bridge::sharing(factory, provider);
                barrier.wait();
                bridge.protocol.start(&credentials()).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), ConnectionStatus::Connected);
    }
    assert_eq!(factory.builds(), 1);
    assert_eq!(provider.constructions(), 1);
}

#[test]
fn adapters_share_the_event_stream() {
    let first = Bridge::started();
    let second = Bridge::sharing(first.factory.clone(), first.provider.clone());
    second.protocol.start(&credentials()).unwrap();

    let link = twitch_bridge::AgentLink::new(twitch_bridge::Command::SubUserRaid);
    first.protocol.link_attribute("E", "raids", &link);
    second.protocol.link_attribute("F", "raids", &link);

    first.factory.events().publish(&twitch_bridge::platform::PlatformEvent::new(
        twitch_bridge::platform::EventKind::ChannelRaid,
        serde_json::json!({"viewers": 10}),
    ));

    assert_eq!(first.sink.len(), 1);
    assert_eq!(second.sink.len(), 1);
    assert_eq!(first.factory.builds(), 1);

    // Stopping one adapter leaves the other's subscription alone
    first.protocol.stop();
    first.factory.events().publish(&twitch_bridge::platform::PlatformEvent::new(
        twitch_bridge::platform::EventKind::ChannelRaid,
        serde_json::json!({"viewers": 20}),
    ));
    assert_eq!(first.sink.len(), 1);
    assert_eq!(second.sink.len(), 2);
}

#[test]
fn failed_build_can_be_retried() {
    let bridge = Bridge::new();
    bridge.factory.fail_builds(true);

    let err = bridge.protocol.start(&credentials()).unwrap_err();
    assert!(matches!(err, AdapterError::Connection(_)));
    assert_eq!(bridge.protocol.connection_status(), ConnectionStatus::Error);
    assert!(bridge.provider.current().is_none());

    bridge.factory.fail_builds(false);
    assert_eq!(
        bridge.protocol.start(&credentials()).unwrap(),
        ConnectionStatus::Connected
    );
    assert_eq!(bridge.factory.builds(), 1);
    assert_eq!(
        bridge.factory.seen_client_ids(),
        vec!["client-abc".to_string(), "client-abc".to_string()]
    );
}
