//! Outgoing events.
//!
//! Every event serializes as `{"name": "<event name>", "payload": {...}}`.
//! Events without data carry no payload.

use serde::Serialize;
use serde_json::Value;

use crate::command::ViewTarget;
use crate::model::{ArrivalEvent, LatLng, Location, NavInfo};
use crate::routing::RouteStatus;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", content = "payload", rename_all_fields = "camelCase")]
pub enum Event {
    #[serde(rename = "onMapReady")]
    MapReady { view_id: ViewTarget },
    #[serde(rename = "onMarkerClick")]
    MarkerClick { view_id: ViewTarget, overlay: Value },
    #[serde(rename = "onPolylineClick")]
    PolylineClick { view_id: ViewTarget, overlay: Value },
    #[serde(rename = "onPolygonClick")]
    PolygonClick { view_id: ViewTarget, overlay: Value },
    #[serde(rename = "onCircleClick")]
    CircleClick { view_id: ViewTarget, overlay: Value },
    #[serde(rename = "onGroundOverlayClick")]
    GroundOverlayClick { view_id: ViewTarget, overlay: Value },
    #[serde(rename = "onMarkerInfoWindowTapped")]
    MarkerInfoWindowTapped { view_id: ViewTarget, overlay: Value },
    #[serde(rename = "onMapClick")]
    MapClick { view_id: ViewTarget, position: LatLng },
    #[serde(rename = "onRecenterButtonClick")]
    RecenterButtonClick { view_id: ViewTarget },

    #[serde(rename = "onArrival")]
    Arrival(ArrivalEvent),
    #[serde(rename = "onRouteChanged")]
    RouteChanged,
    #[serde(rename = "onTrafficUpdated")]
    TrafficUpdated,
    #[serde(rename = "onReroutingRequestedByOffRoute")]
    ReroutingRequestedByOffRoute,
    #[serde(rename = "onRemainingTimeOrDistanceChanged")]
    RemainingTimeOrDistanceChanged,
    #[serde(rename = "onTurnByTurn")]
    TurnByTurn(NavInfo),
    #[serde(rename = "onLocationChanged")]
    LocationChanged(Location),
    #[serde(rename = "onRawLocationChanged")]
    RawLocationChanged(Location),

    #[serde(rename = "onNavigationReady")]
    NavigationReady,
    #[serde(rename = "onNavigationInitError")]
    NavigationInitError { error_code: i32 },
    #[serde(rename = "onRouteStatusResult")]
    RouteStatusResult { code: RouteStatus },
    #[serde(rename = "onStartGuidance")]
    StartGuidance,

    #[serde(rename = "onAutoScreenAvailabilityChanged")]
    AutoScreenAvailabilityChanged { available: bool },
    #[serde(rename = "onCustomNavigationAutoEvent")]
    CustomNavigationAutoEvent {
        #[serde(rename = "type")]
        kind: String,
        data: Value,
    },

    #[serde(rename = "logDebugInfo")]
    LogDebugInfo { message: String },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MapReady { .. } => "onMapReady",
            Self::MarkerClick { .. } => "onMarkerClick",
            Self::PolylineClick { .. } => "onPolylineClick",
            Self::PolygonClick { .. } => "onPolygonClick",
            Self::CircleClick { .. } => "onCircleClick",
            Self::GroundOverlayClick { .. } => "onGroundOverlayClick",
            Self::MarkerInfoWindowTapped { .. } => "onMarkerInfoWindowTapped",
            Self::MapClick { .. } => "onMapClick",
            Self::RecenterButtonClick { .. } => "onRecenterButtonClick",
            Self::Arrival(_) => "onArrival",
            Self::RouteChanged => "onRouteChanged",
            Self::TrafficUpdated => "onTrafficUpdated",
            Self::ReroutingRequestedByOffRoute => "onReroutingRequestedByOffRoute",
            Self::RemainingTimeOrDistanceChanged => "onRemainingTimeOrDistanceChanged",
            Self::TurnByTurn(_) => "onTurnByTurn",
            Self::LocationChanged(_) => "onLocationChanged",
            Self::RawLocationChanged(_) => "onRawLocationChanged",
            Self::NavigationReady => "onNavigationReady",
            Self::NavigationInitError { .. } => "onNavigationInitError",
            Self::RouteStatusResult { .. } => "onRouteStatusResult",
            Self::StartGuidance => "onStartGuidance",
            Self::AutoScreenAvailabilityChanged { .. } => "onAutoScreenAvailabilityChanged",
            Self::CustomNavigationAutoEvent { .. } => "onCustomNavigationAutoEvent",
            Self::LogDebugInfo { .. } => "logDebugInfo",
        }
    }

    /// Payload alone, `null` for events without data
    pub fn payload(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove("payload").unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
