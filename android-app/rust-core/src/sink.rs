//! Event delivery to the Kotlin app layer.
//!
//! Events are handed over as their JSON form (`{"name", "payload"}`). A
//! failing delivery is logged and dropped; the bridge never retries.

use log::warn;
use serde_json::{json, Value};

use navsdk_shared::session::ReadyObserver;
use navsdk_shared::{Event, EventSink};

use crate::facade::JavaFacade;

pub struct JniEventSink {
    facade: JavaFacade,
}

impl JniEventSink {
    pub fn new(facade: JavaFacade) -> Self {
        Self { facade }
    }
}

impl EventSink for JniEventSink {
    fn emit(&mut self, event: &Event) {
        let value = serde_json::to_value(event).unwrap_or(Value::Null);
        if let Err(e) = self.facade.call_unit("emit", value) {
            warn!("Failed to deliver {}: {}", event.name(), e);
        }
    }
}

/// Readiness observer forwarding to a Kotlin listener facade
pub fn ready_observer(facade: JavaFacade) -> ReadyObserver {
    Box::new(move |ready| {
        if let Err(e) = facade.call_unit("onNavigationReady", json!({ "ready": ready })) {
            warn!("{} rejected readiness update: {}", facade.name(), e);
        }
    })
}
