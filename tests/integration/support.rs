use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use twitch_bridge::platform::memory::MemoryConnectionFactory;
use twitch_bridge::{
    AgentCredentials, AgentLink, AttributeEvent, AttributeRef, Clock, ConnectionProvider,
    RecordingSink, Timestamp, TwitchProtocol,
};

/// Clock that advances one millisecond per reading.
pub struct StepClock(AtomicI64);

impl StepClock {
    pub fn starting_at(ms: Timestamp) -> Self {
        Self(AtomicI64::new(ms))
    }
}

impl Clock for StepClock {
    fn now_millis(&self) -> Timestamp {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

pub struct Bridge {
    pub factory: Arc<MemoryConnectionFactory>,
    pub provider: Arc<ConnectionProvider>,
    pub sink: Arc<RecordingSink>,
    pub protocol: TwitchProtocol,
}

impl Bridge {
    pub fn new() -> Self {
        let factory = Arc::new(MemoryConnectionFactory::new());
        let provider = Arc::new(ConnectionProvider::new(factory.clone()));
        Self::sharing(factory, provider)
    }

    /// A second adapter on the same provider.
    pub fn sharing(
        factory: Arc<MemoryConnectionFactory>,
        provider: Arc<ConnectionProvider>,
    ) -> Self {
        let sink = Arc::new(RecordingSink::new());
        let protocol = TwitchProtocol::new(
            provider.clone(),
            sink.clone(),
            Arc::new(StepClock::starting_at(1_000)),
        );
        Self {
            factory,
            provider,
            sink,
            protocol,
        }
    }

    pub fn started() -> Self {
        let bridge = Self::new();
        bridge
            .protocol
            .start(&credentials())
            .expect("start succeeds");
        bridge
    }

    pub fn write(
        &self,
        link: &AgentLink,
        entity: &str,
        attribute: &str,
        value: Value,
    ) -> Result<(), twitch_bridge::AdapterError> {
        let event = AttributeEvent::new(AttributeRef::new(entity, attribute), value.clone(), 0);
        self.protocol.attribute_write(link, &event, value)
    }
}

pub fn credentials() -> AgentCredentials {
    AgentCredentials::default()
        .with_client("client-abc", "secret")
        .with_access_token("token-xyz")
        .with_user_id("U1")
        .with_username("streamer")
}
