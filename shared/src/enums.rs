//! # Enum Translator
//!
//! Integers sent by the application layer map onto native SDK constants
//! through total functions: every input produces a value, and anything
//! outside the known range falls back to the native default listed below.
//!
//! ```text
//! ┌─────────────────────────┬───────────────────────────────┬──────────────────────┐
//! │ Enum                    │ Known values                  │ Fallback             │
//! ├─────────────────────────┼───────────────────────────────┼──────────────────────┤
//! │ MapType                 │ 1 normal 2 sat 3 terrain 4 hyb│ None                 │
//! │ ForceNightMode          │ 0 auto 1 day 2 night          │ ForceNight           │
//! │ AudioGuidance           │ 0 silent 1 alerts 2 guidance  │ AlertsAndGuidance    │
//! │ CameraPerspective       │ 1 north-up 2 heading-up       │ Tilted               │
//! │ AlternateRoutesStrategy │ 1 none 2 one                  │ ShowAll              │
//! │ TaskRemovedBehavior     │ 0 continue 1 quit             │ ContinueService      │
//! │ MapViewType             │ 1 navigation                  │ Map                  │
//! └─────────────────────────┴───────────────────────────────┴──────────────────────┘
//! ```
//!
//! Values are serialized by name (`"FORCE_NIGHT"`) when they travel to the
//! native facade, so the facade never depends on this crate's discriminants.

use serde::{Deserialize, Serialize};

/// Base map tile type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MapType {
    #[default]
    None,
    Normal,
    Satellite,
    Terrain,
    Hybrid,
}

impl MapType {
    pub fn from_js_value(value: i64) -> Self {
        match value {
            1 => Self::Normal,
            2 => Self::Satellite,
            3 => Self::Terrain,
            4 => Self::Hybrid,
            _ => Self::None,
        }
    }
}

/// Day/night rendering of the navigation UI.
///
/// Unknown values force night mode rather than falling back to `Auto`; apps
/// in the field rely on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForceNightMode {
    Auto,
    ForceDay,
    #[default]
    ForceNight,
}

impl ForceNightMode {
    pub fn from_js_value(value: i64) -> Self {
        match value {
            0 => Self::Auto,
            1 => Self::ForceDay,
            _ => Self::ForceNight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioGuidance {
    Silent,
    VoiceAlertsOnly,
    #[default]
    VoiceAlertsAndGuidance,
}

impl AudioGuidance {
    pub fn from_js_value(value: i64) -> Self {
        match value {
            0 => Self::Silent,
            1 => Self::VoiceAlertsOnly,
            _ => Self::VoiceAlertsAndGuidance,
        }
    }
}

/// Camera mode used when following the device location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CameraPerspective {
    #[default]
    Tilted,
    TopDownNorthUp,
    TopDownHeadingUp,
}

impl CameraPerspective {
    pub fn from_js_value(value: i64) -> Self {
        match value {
            1 => Self::TopDownNorthUp,
            2 => Self::TopDownHeadingUp,
            _ => Self::Tilted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlternateRoutesStrategy {
    #[default]
    ShowAll,
    ShowNone,
    ShowOne,
}

impl AlternateRoutesStrategy {
    pub fn from_js_value(value: i64) -> Self {
        match value {
            1 => Self::ShowNone,
            2 => Self::ShowOne,
            _ => Self::ShowAll,
        }
    }
}

/// What the navigation foreground service does when the app task is swiped away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskRemovedBehavior {
    #[default]
    ContinueService,
    QuitService,
}

impl TaskRemovedBehavior {
    pub fn from_js_value(value: i64) -> Self {
        match value {
            1 => Self::QuitService,
            _ => Self::ContinueService,
        }
    }
}

/// Kind of view hosting a map surface. Navigation views carry the guidance
/// UI (header, footer, speedometer, ...) on top of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MapViewType {
    #[default]
    Map,
    Navigation,
}

impl MapViewType {
    pub fn from_js_value(value: i64) -> Self {
        match value {
            1 => Self::Navigation,
            _ => Self::Map,
        }
    }

    pub fn is_navigation(self) -> bool {
        self == Self::Navigation
    }
}
