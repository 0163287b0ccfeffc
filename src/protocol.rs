//! Twitch protocol adapter.
//!
//! Implements the host lifecycle (start, stop, link, unlink, write) on top
//! of the shared connection, the command table, the link registry and the
//! value router. Configuration problems are reported through the connection
//! status or the log; only remote call failures during a write are returned
//! to the caller.

use crate::command::{self, LinkContext, Mode};
use crate::concurrency::RefLockManager;
use crate::connection::ConnectionProvider;
use crate::credentials::AgentCredentials;
use crate::error::AdapterError;
use crate::link::AgentLink;
use crate::registry::{LinkRegistry, LinkState};
use crate::router::{AttributeSink, Clock, SystemClock, ValueRouter};
use crate::types::{AttributeEvent, AttributeRef, AttributeValue};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const PROTOCOL_DISPLAY_NAME: &str = "Twitch";

/// Connection status reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
    Stopped,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionStatus::Disconnected => "DISCONNECTED",
            ConnectionStatus::Connecting => "CONNECTING",
            ConnectionStatus::Connected => "CONNECTED",
            ConnectionStatus::Error => "ERROR",
            ConnectionStatus::Stopped => "STOPPED",
        };
        f.write_str(name)
    }
}

/// One adapter instance, bound to one agent.
pub struct TwitchProtocol {
    connections: Arc<ConnectionProvider>,
    router: ValueRouter,
    registry: LinkRegistry,
    locks: RefLockManager,
    credentials: RwLock<AgentCredentials>,
    status: RwLock<ConnectionStatus>,
}

impl TwitchProtocol {
    pub fn new(
        connections: Arc<ConnectionProvider>,
        sink: Arc<dyn AttributeSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connections,
            router: ValueRouter::new(sink, clock),
            registry: LinkRegistry::new(),
            locks: RefLockManager::new(),
            credentials: RwLock::new(AgentCredentials::default()),
            status: RwLock::new(ConnectionStatus::Disconnected),
        }
    }

    /// Adapter timestamping with the wall clock.
    pub fn with_system_clock(
        connections: Arc<ConnectionProvider>,
        sink: Arc<dyn AttributeSink>,
    ) -> Self {
        Self::new(connections, sink, Arc::new(SystemClock))
    }

    pub fn protocol_name(&self) -> &'static str {
        PROTOCOL_DISPLAY_NAME
    }

    pub fn protocol_instance_uri(&self) -> &'static str {
        ""
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        *self.status.read()
    }

    pub fn link_state(&self, attribute_ref: &AttributeRef) -> LinkState {
        self.registry.state(attribute_ref)
    }

    pub fn registry(&self) -> &LinkRegistry {
        &self.registry
    }

    fn set_status(&self, status: ConnectionStatus) {
        *self.status.write() = status;
        info!(status = %status, "Connection status changed");
    }

    /// Record the agent credentials and make sure the shared connection exists.
    ///
    /// Missing client id or secret reports `Error`. A connection that cannot
    /// be built is returned as an error with the status set to `Error`.
    pub fn start(&self, credentials: &AgentCredentials) -> Result<ConnectionStatus, AdapterError> {
        *self.credentials.write() = credentials.clone();

        if !credentials.has_client_credentials() {
            error!("Cannot start: client id or client secret is empty");
            self.set_status(ConnectionStatus::Error);
            return Ok(ConnectionStatus::Error);
        }

        self.set_status(ConnectionStatus::Connecting);
        match self.connections.ensure(
            credentials.client_id(),
            credentials.client_secret(),
            credentials.access_token(),
        ) {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("No access token; linked commands stay inert until a connection exists")
            }
            Err(e) => {
                error!(error = %e, "Failed to establish connection");
                self.set_status(ConnectionStatus::Error);
                return Err(e);
            }
        }

        self.set_status(ConnectionStatus::Connected);
        Ok(ConnectionStatus::Connected)
    }

    /// Drop every pull action and cancel every subscription.
    ///
    /// The shared connection stays up for other adapters.
    pub fn stop(&self) {
        self.registry.drain();
        self.locks.prune();
        self.set_status(ConnectionStatus::Stopped);
    }

    /// Register the link's command for an attribute.
    ///
    /// Linking an already linked attribute replaces its registration.
    pub fn link_attribute(
        &self,
        entity_id: &str,
        attribute_name: &str,
        link: &AgentLink,
    ) -> LinkState {
        let attribute_ref = AttributeRef::new(entity_id, attribute_name);
        let lock = self.locks.get_lock(&attribute_ref);
        let _guard = lock.lock();

        let Some(command) = link.command else {
            self.registry.mark_inert(attribute_ref);
            return LinkState::Inert;
        };

        let Some(connection) = self.connections.current() else {
            error!(
                attribute = %attribute_ref,
                command = %command,
                "Cannot link: no connection to the platform"
            );
            self.registry.mark_inert(attribute_ref);
            return LinkState::Inert;
        };

        let credentials = self.credentials.read().clone();
        let ctx = LinkContext {
            spec: command.spec(),
            connection: &connection,
            credentials: &credentials,
            link,
            origin: &attribute_ref,
            router: &self.router,
        };

        match command::register(&ctx) {
            Ok(registration) => {
                let state = match registration.mode() {
                    Mode::Pull => LinkState::LinkedPull,
                    Mode::Push => LinkState::LinkedPush,
                };
                info!(attribute = %attribute_ref, command = %command, "Attribute linked");
                self.registry.install(attribute_ref, registration);
                state
            }
            Err(e) if e.is_config() => {
                error!(
                    attribute = %attribute_ref,
                    command = %command,
                    error = %e,
                    "Link left inert"
                );
                self.registry.mark_inert(attribute_ref);
                LinkState::Inert
            }
            Err(e) => {
                error!(attribute = %attribute_ref, command = %command, error = %e, "Link failed");
                self.registry.remove(&attribute_ref);
                LinkState::Unlinked
            }
        }
    }

    /// Forget the attribute. No value is written for it after this returns.
    pub fn unlink_attribute(&self, entity_id: &str, attribute_name: &str, _link: &AgentLink) {
        let attribute_ref = AttributeRef::new(entity_id, attribute_name);
        {
            let lock = self.locks.get_lock(&attribute_ref);
            let _guard = lock.lock();

            if self.registry.remove(&attribute_ref) {
                info!(attribute = %attribute_ref, "Attribute unlinked");
            }
        }
        self.locks.prune();
    }

    /// Run the pull action bound to the written attribute, if any.
    ///
    /// Blocks for the remote call. When the link has an output override the
    /// incoming value is echoed to the written attribute after the action
    /// succeeds; the remote result goes to the override.
    pub fn attribute_write(
        &self,
        link: &AgentLink,
        event: &AttributeEvent,
        processed_value: AttributeValue,
    ) -> Result<(), AdapterError> {
        let attribute_ref = &event.attribute_ref;
        if self.registry.action(attribute_ref).is_none() {
            return Ok(());
        }

        let lock = self.locks.get_lock(attribute_ref);
        let _guard = lock.lock();

        // Re-read under the lock; an unlink may have won the race
        let Some(action) = self.registry.action(attribute_ref) else {
            return Ok(());
        };

        info!(attribute = %attribute_ref, "Processing linked attribute write");
        action()?;

        if link.has_output_override() {
            self.router.write(attribute_ref.clone(), processed_value);
        }
        Ok(())
    }
}
