//! Value routing into the attribute store.

use crate::link::AgentLink;
use crate::types::{AttributeEvent, AttributeRef, AttributeValue, Timestamp};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Write primitive of the attribute store.
pub trait AttributeSink: Send + Sync {
    fn publish(&self, event: AttributeEvent);
}

/// Logical clock used to timestamp published values.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> Timestamp;
}

/// Wall clock in UTC milliseconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> Timestamp {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Sink that keeps every published event in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AttributeEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AttributeEvent> {
        self.events.lock().clone()
    }

    /// Events published to one attribute, in publish order.
    pub fn events_for(&self, attribute_ref: &AttributeRef) -> Vec<AttributeEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| &e.attribute_ref == attribute_ref)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl AttributeSink for RecordingSink {
    fn publish(&self, event: AttributeEvent) {
        self.events.lock().push(event);
    }
}

/// Decides which attribute receives a produced value and publishes it.
#[derive(Clone)]
pub struct ValueRouter {
    sink: Arc<dyn AttributeSink>,
    clock: Arc<dyn Clock>,
}

impl ValueRouter {
    pub fn new(sink: Arc<dyn AttributeSink>, clock: Arc<dyn Clock>) -> Self {
        Self { sink, clock }
    }

    /// Attribute a value produced for `origin` is written to.
    pub fn target(link: &AgentLink, origin: &AttributeRef) -> AttributeRef {
        match link.output_attribute() {
            Some(name) => origin.sibling(name),
            None => origin.clone(),
        }
    }

    /// Publish `value` to the link's output attribute, or to `origin` when
    /// the link has no override. Returns the reference written.
    pub fn route(
        &self,
        link: &AgentLink,
        origin: &AttributeRef,
        value: AttributeValue,
    ) -> AttributeRef {
        let target = Self::target(link, origin);
        if &target == origin {
            info!(attribute = %target, "Writing value to linked attribute");
        } else {
            info!(attribute = %target, origin = %origin, "Writing value to output attribute");
        }
        self.write(target.clone(), value);
        target
    }

    /// Publish `value` to exactly `attribute_ref`.
    pub fn write(&self, attribute_ref: AttributeRef, value: AttributeValue) {
        let event = AttributeEvent::new(attribute_ref, value, self.clock.now_millis());
        self.sink.publish(event);
    }
}
