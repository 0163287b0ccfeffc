use crate::integration::support::{credentials, Bridge};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use twitch_bridge::platform::{EventKind, PlatformEvent};
use twitch_bridge::{
    AgentCredentials, AgentLink, AttributeRef, Command, ConnectionStatus, LinkState,
};

#[test]
fn status_follows_start_and_stop() {
    let bridge = Bridge::new();
    assert_eq!(bridge.protocol.connection_status(), ConnectionStatus::Disconnected);

    let status = bridge.protocol.start(&credentials()).unwrap();
    assert_eq!(status, ConnectionStatus::Connected);

    bridge.protocol.stop();
    assert_eq!(bridge.protocol.connection_status(), ConnectionStatus::Stopped);

    // Restart reuses the existing connection
    bridge.protocol.start(&credentials()).unwrap();
    assert_eq!(bridge.factory.builds(), 1);
}

#[test]
fn start_without_token_connects_but_links_stay_inert() {
    let bridge = Bridge::new();
    let creds = AgentCredentials::default()
        .with_client("client-abc", "secret")
        .with_user_id("U1");

    let status = bridge.protocol.start(&creds).unwrap();
    assert_eq!(status, ConnectionStatus::Connected);
    assert_eq!(bridge.factory.builds(), 0);

    let link = AgentLink::new(Command::PostCreateClip);
    assert_eq!(
        bridge.protocol.link_attribute("E1", "clip", &link),
        LinkState::Inert
    );
}

#[test]
fn link_before_start_can_be_relinked_after() {
    let bridge = Bridge::new();
    let link = AgentLink::new(Command::PostCreateClip);

    assert_eq!(
        bridge.protocol.link_attribute("E1", "clip", &link),
        LinkState::Inert
    );

    bridge.protocol.start(&credentials()).unwrap();
    assert_eq!(
        bridge.protocol.link_attribute("E1", "clip", &link),
        LinkState::LinkedPull
    );
}

#[test]
fn missing_identity_never_calls_remote() {
    let bridge = Bridge::new();
    let creds = AgentCredentials::default()
        .with_client("client-abc", "secret")
        .with_access_token("token-xyz");
    bridge.protocol.start(&creds).unwrap();

    for (attribute, command) in [
        ("user", Command::GetUserInfo),
        ("clip", Command::PostCreateClip),
        ("chat", Command::SubChatMessages),
    ] {
        let link = AgentLink::new(command);
        assert_eq!(
            bridge.protocol.link_attribute("E1", attribute, &link),
            LinkState::Inert
        );
        bridge.write(&link, "E1", attribute, json!(true)).unwrap();
    }

    assert!(bridge.sink.is_empty());
    assert!(bridge.factory.helix().calls().is_empty());
    assert!(bridge.factory.chat().join_attempts().is_empty());
}

#[test]
fn relinking_push_keeps_one_subscription() {
    let bridge = Bridge::started();
    let link = AgentLink::new(Command::SubUserBan);

    bridge.protocol.link_attribute("E", "bans", &link);
    bridge.protocol.link_attribute("E", "bans", &link);

    assert_eq!(
        bridge
            .factory
            .events()
            .subscriber_count(Some(EventKind::ChannelBan)),
        1
    );
    bridge
        .factory
        .events()
        .publish(&PlatformEvent::new(EventKind::ChannelBan, json!({"user": "x"})));
    assert_eq!(bridge.sink.len(), 1);
}

#[test]
fn relink_from_push_to_pull_cancels_subscription() {
    let bridge = Bridge::started();
    bridge
        .protocol
        .link_attribute("E", "a", &AgentLink::new(Command::SubUserRaid));
    bridge
        .protocol
        .link_attribute("E", "a", &AgentLink::new(Command::PostCreateClip));

    assert_eq!(bridge.factory.events().subscriber_count(None), 0);
    assert_eq!(
        bridge.protocol.link_state(&AttributeRef::new("E", "a")),
        LinkState::LinkedPull
    );
}

#[test]
fn no_writes_after_unlink_under_concurrent_delivery() {
    let bridge = Arc::new(Bridge::started());
    let link = AgentLink::new(Command::SubUserFollow);
    bridge.protocol.link_attribute("E", "follows", &link);

    let running = Arc::new(AtomicBool::new(true));
    let publisher = {
        let bridge = Arc::clone(&bridge);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut n = 0u64;
            while running.load(Ordering::SeqCst) {
                bridge.factory.events().publish(&PlatformEvent::new(
                    EventKind::ChannelFollow,
                    json!({ "n": n }),
                ));
                n += 1;
            }
        })
    };

    thread::sleep(Duration::from_millis(20));
    bridge.protocol.unlink_attribute("E", "follows", &link);
    let after_unlink = bridge.sink.len();

    thread::sleep(Duration::from_millis(20));
    running.store(false, Ordering::SeqCst);
    publisher.join().unwrap();

    assert_eq!(bridge.sink.len(), after_unlink);
    assert_eq!(bridge.factory.events().subscriber_count(None), 0);
}

#[test]
fn stop_cancels_every_subscription_and_action() {
    let bridge = Bridge::started();
    let push_commands: Vec<Command> = Command::all()
        .filter(|c| c.mode() == twitch_bridge::Mode::Push)
        .collect();
    for (i, command) in push_commands.iter().enumerate() {
        bridge
            .protocol
            .link_attribute("E", &format!("push{}", i), &AgentLink::new(*command));
    }
    let clip = AgentLink::new(Command::PostCreateClip);
    bridge.protocol.link_attribute("E", "clip", &clip);
    assert_eq!(bridge.protocol.registry().push_count(), push_commands.len());

    bridge.protocol.stop();

    assert_eq!(bridge.factory.events().subscriber_count(None), 0);
    bridge.write(&clip, "E", "clip", json!(true)).unwrap();
    assert!(bridge.sink.is_empty());
    assert!(bridge.factory.helix().calls().is_empty());
}

#[test]
fn unlink_of_unknown_attribute_is_harmless() {
    let bridge = Bridge::started();
    bridge
        .protocol
        .unlink_attribute("E", "never-linked", &AgentLink::default());
    assert_eq!(
        bridge.protocol.link_state(&AttributeRef::new("E", "never-linked")),
        LinkState::Unlinked
    );
}
