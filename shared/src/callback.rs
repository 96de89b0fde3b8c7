//! # Native Callback Marshalling
//!
//! Native SDK callbacks fire on arbitrary threads. They are never applied
//! where they arrive: each one is pushed onto an unbounded queue and the
//! main context drains it in FIFO order.
//!
//! ```text
//!  SDK thread A ──┐
//!  SDK thread B ──┼──► CallbackSender ──► mpsc ──► CallbackQueue ──► NavBridge
//!  tokio worker ──┘        (Clone + Send)              (main context only)
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::command::ViewTarget;
use crate::model::{ArrivalEvent, LatLng, Location, NavInfo};
use crate::overlay::OverlayKind;
use crate::routing::RouteStatus;
use crate::session::RouteRequestId;

/// Something the native side reports back. The JSON form is tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NativeCallback {
    MapReady {
        view_id: ViewTarget,
    },
    OverlayClick {
        view_id: ViewTarget,
        kind: OverlayKind,
        native_id: String,
    },
    InfoWindowClick {
        view_id: ViewTarget,
        native_id: String,
    },
    MapClick {
        view_id: ViewTarget,
        position: LatLng,
    },
    RecenterButtonClick {
        view_id: ViewTarget,
    },
    TermsResponse {
        accepted: bool,
    },
    NavigatorReady,
    NavigatorError {
        error_code: i32,
    },
    #[serde(rename = "routeStatus")]
    RouteStatusResult {
        request: RouteRequestId,
        code: RouteStatus,
    },
    Arrival(ArrivalEvent),
    RouteChanged,
    TrafficUpdated,
    ReroutingRequestedByOffRoute,
    RemainingTimeOrDistanceChanged,
    Location(Location),
    RawLocation(Location),
    NavInfo(NavInfo),
    StyleLoaded {
        view_id: ViewTarget,
        generation: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    CustomAutoEvent {
        event_type: String,
        #[serde(default)]
        data: Value,
    },
}

#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("malformed callback: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("callback queue closed")]
    Closed,
}

/// Producer half, handed to native listeners and background tasks
#[derive(Debug, Clone)]
pub struct CallbackSender(mpsc::UnboundedSender<NativeCallback>);

impl CallbackSender {
    pub fn send(&self, callback: NativeCallback) -> Result<(), CallbackError> {
        self.0.send(callback).map_err(|_| CallbackError::Closed)
    }

    /// Parse a host JSON callback and enqueue it
    pub fn send_json(&self, json: &str) -> Result<(), CallbackError> {
        let callback: NativeCallback = serde_json::from_str(json)?;
        self.send(callback)
    }
}

/// Consumer half, owned by the main context
#[derive(Debug)]
pub struct CallbackQueue {
    sender: CallbackSender,
    receiver: mpsc::UnboundedReceiver<NativeCallback>,
}

impl Default for CallbackQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            sender: CallbackSender(tx),
            receiver: rx,
        }
    }

    pub fn sender(&self) -> CallbackSender {
        self.sender.clone()
    }

    /// Next queued callback without waiting
    pub fn try_next(&mut self) -> Option<NativeCallback> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next callback
    pub async fn next(&mut self) -> Option<NativeCallback> {
        self.receiver.recv().await
    }
}
