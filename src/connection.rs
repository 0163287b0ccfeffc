//! Shared remote-platform connection.
//!
//! One `ConnectionProvider` is created by the host and handed to every
//! adapter instance. The first adapter to start with usable credentials
//! builds the connection; later starts reuse it. The connection is never
//! torn down by an adapter stopping.

use crate::error::AdapterError;
use crate::platform::{ChannelRoster, ChatChannels, EventHub, HelixApi, HelixClient, HelixConfig};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Authenticated session exposing the three platform facades.
pub struct Connection {
    helix: Arc<dyn HelixApi>,
    events: EventHub,
    chat: Arc<dyn ChatChannels>,
}

impl Connection {
    pub fn new(helix: Arc<dyn HelixApi>, events: EventHub, chat: Arc<dyn ChatChannels>) -> Self {
        Self {
            helix,
            events,
            chat,
        }
    }

    /// Request facade
    pub fn helix(&self) -> &dyn HelixApi {
        self.helix.as_ref()
    }

    /// Event stream facade
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    /// Chat membership facade
    pub fn chat(&self) -> &dyn ChatChannels {
        self.chat.as_ref()
    }
}

/// Credentials a connection is built from.
#[derive(Clone, Copy)]
pub struct ConnectionCredentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub access_token: &'a str,
}

/// Builds connections. Implementations may perform network I/O.
pub trait ConnectionFactory: Send + Sync {
    fn build(&self, credentials: ConnectionCredentials<'_>) -> Result<Connection, AdapterError>;
}

/// Production factory: Helix over HTTP, an event hub for the socket
/// transport to feed, and a chat channel roster.
pub struct HelixConnectionFactory {
    config: HelixConfig,
}

impl HelixConnectionFactory {
    pub fn new(config: HelixConfig) -> Self {
        Self { config }
    }
}

impl ConnectionFactory for HelixConnectionFactory {
    fn build(&self, credentials: ConnectionCredentials<'_>) -> Result<Connection, AdapterError> {
        let helix = HelixClient::new(
            &self.config,
            credentials.client_id,
            credentials.access_token,
        )
        .map_err(|e| AdapterError::Connection(e.to_string()))?;
        info!(base_url = %helix.base_url(), "Helix client created");

        Ok(Connection::new(
            Arc::new(helix),
            EventHub::new(),
            Arc::new(ChannelRoster::new()),
        ))
    }
}

/// Mutex-guarded lazy initializer for the shared connection.
pub struct ConnectionProvider {
    factory: Arc<dyn ConnectionFactory>,
    slot: Mutex<Option<Arc<Connection>>>,
    constructions: AtomicUsize,
}

impl ConnectionProvider {
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        Self {
            factory,
            slot: Mutex::new(None),
            constructions: AtomicUsize::new(0),
        }
    }

    pub fn with_helix(config: HelixConfig) -> Self {
        Self::new(Arc::new(HelixConnectionFactory::new(config)))
    }

    /// Return the shared connection, building it on first use.
    ///
    /// Returns `Ok(None)` when no connection exists and one of the three
    /// credentials is missing. A factory error leaves the slot empty.
    pub fn ensure(
        &self,
        client_id: Option<&str>,
        client_secret: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<Option<Arc<Connection>>, AdapterError> {
        let mut slot = self.slot.lock();
        if let Some(existing) = slot.as_ref() {
            debug!("Reusing shared connection");
            return Ok(Some(Arc::clone(existing)));
        }

        let (client_id, client_secret, access_token) =
            match (client_id, client_secret, access_token) {
                (Some(id), Some(secret), Some(token)) => (id, secret, token),
                _ => return Ok(None),
            };

        let connection = Arc::new(self.factory.build(ConnectionCredentials {
            client_id,
            client_secret,
            access_token,
        })?);
        self.constructions.fetch_add(1, Ordering::SeqCst);
        *slot = Some(Arc::clone(&connection));
        info!("Shared connection established");
        Ok(Some(connection))
    }

    /// The connection, if one has been built.
    pub fn current(&self) -> Option<Arc<Connection>> {
        self.slot.lock().clone()
    }

    /// Number of connections ever built by this provider.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }
}
