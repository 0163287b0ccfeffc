//! Twitch Bridge: attribute-link adapter for the Twitch platform
//!
//! Binds asset attributes to Twitch API calls and event streams. A PULL
//! link runs a Helix call when its attribute is written; a PUSH link keeps a
//! subscription open and writes every matching event into the store. All
//! adapters share one lazily built connection.

pub mod command;
pub mod concurrency;
pub mod config;
pub mod connection;
pub mod credentials;
pub mod error;
pub mod link;
pub mod logging;
pub mod platform;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod tooling;
pub mod types;

pub use command::{Command, Mode};
pub use connection::{Connection, ConnectionFactory, ConnectionProvider};
pub use credentials::AgentCredentials;
pub use error::{AdapterError, RemoteError};
pub use link::AgentLink;
pub use protocol::{ConnectionStatus, TwitchProtocol};
pub use registry::LinkState;
pub use router::{AttributeSink, Clock, RecordingSink, SystemClock, ValueRouter};
pub use types::{AttributeEvent, AttributeRef, AttributeValue, Timestamp};
