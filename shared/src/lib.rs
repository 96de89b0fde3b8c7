//! # Navigation SDK Bridge Core
//!
//! Platform-independent half of the bridge between a cross-platform app
//! layer and a native maps/navigation SDK:
//!
//! - **Command Table**: integer commands with positional arguments, routed
//!   to a map view, the in-car screen or the navigation session
//! - **Overlay Registries**: per-surface bidirectional id maps so native
//!   click callbacks resolve back to the caller's overlay
//! - **Navigation Session**: terms, navigator lifecycle, routing, guidance
//!   and simulation
//! - **Event Relay**: fire-and-forget events back to the app layer
//!
//! ## Architecture
//!
//! ```text
//!   app layer ── dispatch ──► NavBridge ──► MapSurface / Navigator (traits)
//!       ▲                         │                     │
//!       │                         │            native callbacks (any thread)
//!       │                         ▼                     ▼
//!       └──── EventSink ◄── EventRelay ◄── pump ◄── CallbackQueue
//! ```
//!
//! Native SDK access happens only through [`traits`]. The Android JNI crate
//! implements them on top of Java facade objects; the tests implement them
//! with in-memory recorders.

pub mod auto;
pub mod bridge;
pub mod callback;
pub mod color;
pub mod command;
pub mod config;
pub mod enums;
pub mod error;
pub mod events;
pub mod id_map;
pub mod model;
pub mod options;
pub mod overlay;
pub mod registry;
pub mod relay;
pub mod router;
pub mod routing;
pub mod session;
pub mod styling;
pub mod traits;
pub mod view;

#[cfg(test)]
mod mock;

// Re-export main types for convenience
pub use bridge::{error_reply, NavBridge};
pub use callback::{CallbackError, CallbackSender, NativeCallback};
pub use command::{Command, ViewTarget, AUTO_VIEW_ID};
pub use config::BridgeConfig;
pub use enums::MapViewType;
pub use error::{codes, BridgeError, BridgeResult, NativeError, NotReady};
pub use events::Event;
pub use router::Reply;
pub use session::{ObserverId, RouteRequestId, SessionState};
pub use traits::{EventSink, MapSurface, NavigationApi, NavigationSurface, Navigator, Simulator, StyleLoader};

/// Library version, reported alongside the native SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
