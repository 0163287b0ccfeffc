use crate::integration::support::{credentials, StepClock};
use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{mpsc, Arc};
use std::thread;
use twitch_bridge::platform::HelixConfig;
use twitch_bridge::{
    AdapterError, AgentLink, AttributeEvent, AttributeRef, Command, ConnectionProvider,
    ConnectionStatus, RecordingSink, RemoteError, TwitchProtocol,
};

/// Serve the given responses in order, one per connection, reporting each request head.
fn stub_helix(responses: Vec<(&'static str, &'static str)>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status_line, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            tx.send(String::from_utf8_lossy(&buf).to_string()).unwrap();
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
    });

    (format!("http://{}/helix", addr), rx)
}

fn adapter_for(base_url: String) -> (TwitchProtocol, Arc<RecordingSink>) {
    let provider = Arc::new(ConnectionProvider::with_helix(HelixConfig {
        base_url,
        timeout_ms: 5_000,
        system_proxy: false,
    }));
    let sink = Arc::new(RecordingSink::new());
    let protocol = TwitchProtocol::new(provider, sink.clone(), Arc::new(StepClock::starting_at(0)));
    (protocol, sink)
}

#[test]
fn clip_creation_writes_clip_data() {
    let (url, requests) = stub_helix(vec![(
        "HTTP/1.1 202 Accepted",
        r#"{"data":[{"id":"FiveWordsForClipSlug","edit_url":"https://clips.twitch.tv/FiveWordsForClipSlug/edit"}]}"#,
    )]);
    let (protocol, sink) = adapter_for(url);

    assert_eq!(protocol.start(&credentials()).unwrap(), ConnectionStatus::Connected);
    let link = AgentLink::new(Command::PostCreateClip);
    protocol.link_attribute("E1", "clip", &link);

    let event = AttributeEvent::new(AttributeRef::new("E1", "clip"), json!(true), 0);
    protocol.attribute_write(&link, &event, json!(true)).unwrap();

    let head = requests.recv().unwrap();
    assert!(head.starts_with("POST /helix/clips?broadcaster_id=U1&has_delay=false"));
    assert!(head.to_ascii_lowercase().contains("client-id: client-abc"));
    assert!(head.to_ascii_lowercase().contains("authorization: bearer token-xyz"));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].attribute_ref, AttributeRef::new("E1", "clip"));
    assert_eq!(events[0].value[0]["id"], "FiveWordsForClipSlug");
    assert_eq!(
        events[0].value[0]["edit_url"],
        "https://clips.twitch.tv/FiveWordsForClipSlug/edit"
    );
}

#[test]
fn user_lookup_routes_profile_and_echoes() {
    let (url, requests) = stub_helix(vec![(
        "HTTP/1.1 200 OK",
        r#"{"data":[{"id":"U1","login":"streamer","display_name":"Streamer","type":"","broadcaster_type":"partner","description":"","profile_image_url":"","offline_image_url":"","created_at":"2016-12-14T20:32:28Z"}]}"#,
    )]);
    let (protocol, sink) = adapter_for(url);
    protocol.start(&credentials()).unwrap();
    let link = AgentLink::new(Command::GetUserInfo).with_output_attribute("profile");
    protocol.link_attribute("E1", "refresh", &link);

    let event = AttributeEvent::new(AttributeRef::new("E1", "refresh"), json!("now"), 0);
    protocol.attribute_write(&link, &event, json!("now")).unwrap();

    assert!(requests.recv().unwrap().starts_with("GET /helix/users?id=U1"));
    let profile = sink.events_for(&AttributeRef::new("E1", "profile"));
    assert_eq!(profile[0].value["broadcaster_type"], "partner");
    assert_eq!(profile[0].value["type"], "");
    assert_eq!(sink.events_for(&AttributeRef::new("E1", "refresh"))[0].value, json!("now"));
}

#[test]
fn unauthorized_clip_surfaces_http_error() {
    let (url, _requests) = stub_helix(vec![(
        "HTTP/1.1 401 Unauthorized",
        r#"{"error":"Unauthorized","status":401,"message":"Invalid OAuth token"}"#,
    )]);
    let (protocol, sink) = adapter_for(url);
    protocol.start(&credentials()).unwrap();
    let link = AgentLink::new(Command::PostCreateClip);
    protocol.link_attribute("E1", "clip", &link);

    let event = AttributeEvent::new(AttributeRef::new("E1", "clip"), json!(true), 0);
    let err = protocol.attribute_write(&link, &event, json!(true)).unwrap_err();

    assert!(matches!(
        err,
        AdapterError::Remote(RemoteError::Http { status: 401, .. })
    ));
    assert!(sink.is_empty());
}
