//! Link Registry
//!
//! Holds the pull actions and push subscriptions of one adapter, keyed by
//! attribute reference. Every removal path cancels the subscription it
//! removes. Subscriptions are cancelled after the map lock is released.

use crate::command::{PendingAction, Registration};
use crate::platform::Subscription;
use crate::types::AttributeRef;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Lifecycle state of one attribute reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    Unlinked,
    /// Linked with a pull action that runs on write
    LinkedPull,
    /// Linked with an active subscription
    LinkedPush,
    /// Linked, but nothing was registered (no command or a configuration error)
    Inert,
}

#[derive(Default)]
pub struct LinkRegistry {
    pulls: Mutex<HashMap<AttributeRef, PendingAction>>,
    pushes: Mutex<HashMap<AttributeRef, Subscription>>,
    inert: Mutex<HashSet<AttributeRef>>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a registration, replacing whatever the reference held before.
    pub fn install(&self, attribute_ref: AttributeRef, registration: Registration) {
        let previous = self.take(&attribute_ref);
        match registration {
            Registration::Pull(action) => {
                self.pulls.lock().insert(attribute_ref, action);
            }
            Registration::Push(subscription) => {
                self.pushes.lock().insert(attribute_ref, subscription);
            }
        }
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    /// Record a reference as linked with nothing registered.
    pub fn mark_inert(&self, attribute_ref: AttributeRef) {
        let previous = self.take(&attribute_ref);
        self.inert.lock().insert(attribute_ref);
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    /// Forget a reference entirely. Returns whether it was known.
    pub fn remove(&self, attribute_ref: &AttributeRef) -> bool {
        let had_pull = self.pulls.lock().remove(attribute_ref).is_some();
        let had_inert = self.inert.lock().remove(attribute_ref);
        let subscription = self.pushes.lock().remove(attribute_ref);
        let had_push = subscription.is_some();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
        had_pull || had_push || had_inert
    }

    /// Discard every action and cancel every subscription.
    pub fn drain(&self) {
        let actions = {
            let mut pulls = self.pulls.lock();
            let count = pulls.len();
            pulls.clear();
            count
        };
        self.inert.lock().clear();
        let subscriptions: Vec<Subscription> =
            self.pushes.lock().drain().map(|(_, sub)| sub).collect();
        debug!(
            actions,
            subscriptions = subscriptions.len(),
            "Draining link registry"
        );
        for subscription in &subscriptions {
            subscription.cancel();
        }
    }

    pub fn action(&self, attribute_ref: &AttributeRef) -> Option<PendingAction> {
        self.pulls.lock().get(attribute_ref).cloned()
    }

    pub fn state(&self, attribute_ref: &AttributeRef) -> LinkState {
        if self.pulls.lock().contains_key(attribute_ref) {
            LinkState::LinkedPull
        } else if self.pushes.lock().contains_key(attribute_ref) {
            LinkState::LinkedPush
        } else if self.inert.lock().contains(attribute_ref) {
            LinkState::Inert
        } else {
            LinkState::Unlinked
        }
    }

    pub fn pull_count(&self) -> usize {
        self.pulls.lock().len()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.lock().len()
    }

    /// Remove the reference from every map, handing back any subscription.
    fn take(&self, attribute_ref: &AttributeRef) -> Option<Subscription> {
        self.pulls.lock().remove(attribute_ref);
        self.inert.lock().remove(attribute_ref);
        self.pushes.lock().remove(attribute_ref)
    }
}
