//! # Command Table
//!
//! Closed, versioned table of the integer commands the application layer
//! sends. Ids are part of the wire contract and are never renumbered; new
//! commands only ever append.
//!
//! ```text
//!   1 ..= 52   map / navigation view commands (routed to a ViewTarget)
//!  60 ..= 84   navigation session commands
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};
use crate::options::{number_as_int, OptionMap};

/// View id the host uses for the Android Auto screen
pub const AUTO_VIEW_ID: i32 = -1;

/// Surface a view command is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ViewTarget {
    /// A phone map or navigation view, by host view id
    View(i32),
    /// The in-car projection screen
    Auto,
}

impl From<i32> for ViewTarget {
    fn from(id: i32) -> Self {
        if id == AUTO_VIEW_ID {
            Self::Auto
        } else {
            Self::View(id)
        }
    }
}

impl From<ViewTarget> for i32 {
    fn from(target: ViewTarget) -> Self {
        match target {
            ViewTarget::View(id) => id,
            ViewTarget::Auto => AUTO_VIEW_ID,
        }
    }
}

impl fmt::Display for ViewTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View(id) => write!(f, "view {}", id),
            Self::Auto => f.write_str("auto screen"),
        }
    }
}

/// Accepted argument count range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn accepts(self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} to {}", self.min, self.max)
        }
    }
}

macro_rules! command_table {
    ($( $variant:ident = $id:literal, $name:literal, $min:literal ..= $max:literal; )*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Command {
            $( $variant = $id, )*
        }

        impl Command {
            pub const ALL: &'static [Command] = &[$( Command::$variant ),*];

            /// `None` for ids outside the table
            pub fn from_id(id: i64) -> Option<Self> {
                match id {
                    $( $id => Some(Self::$variant), )*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            pub fn arity(self) -> Arity {
                match self {
                    $( Self::$variant => Arity::range($min, $max), )*
                }
            }
        }
    };
}

command_table! {
    CreateFragment = 1, "createFragment", 2..=3;
    MoveCamera = 2, "moveCamera", 1..=1;
    SetMyLocationEnabled = 3, "setMyLocationEnabled", 1..=1;
    SetTripProgressBarEnabled = 4, "setTripProgressBarEnabled", 1..=1;
    SetNavigationUiEnabled = 5, "setNavigationUIEnabled", 1..=1;
    SetFollowingPerspective = 6, "setFollowingPerspective", 1..=1;
    SetNightMode = 7, "setNightMode", 1..=1;
    DeleteFragment = 8, "deleteFragment", 0..=0;
    SetSpeedometerEnabled = 9, "setSpeedometerEnabled", 1..=1;
    SetSpeedLimitIconEnabled = 10, "setSpeedLimitIconEnabled", 1..=1;
    SetZoomLevel = 11, "setZoomLevel", 1..=1;
    SetIndoorEnabled = 12, "setIndoorEnabled", 1..=1;
    SetTrafficEnabled = 13, "setTrafficEnabled", 1..=1;
    SetCompassEnabled = 14, "setCompassEnabled", 1..=1;
    SetMyLocationButtonEnabled = 15, "setMyLocationButtonEnabled", 1..=1;
    SetRotateGesturesEnabled = 16, "setRotateGesturesEnabled", 1..=1;
    SetScrollGesturesEnabled = 17, "setScrollGesturesEnabled", 1..=1;
    SetScrollGesturesEnabledDuringRotateOrZoom = 18, "setScrollGesturesEnabledDuringRotateOrZoom", 1..=1;
    SetTiltGesturesEnabled = 19, "setTiltGesturesEnabled", 1..=1;
    SetZoomGesturesEnabled = 20, "setZoomGesturesEnabled", 1..=1;
    SetBuildingsEnabled = 21, "setBuildingsEnabled", 1..=1;
    SetMapType = 22, "setMapType", 1..=1;
    SetMapToolbarEnabled = 23, "setMapToolbarEnabled", 1..=1;
    ClearMapView = 24, "clearMapView", 0..=0;
    ResetMinMaxZoomLevel = 25, "resetMinMaxZoomLevel", 0..=0;
    SetMapStyle = 26, "setMapStyle", 1..=1;
    AnimateCamera = 27, "animateCamera", 1..=2;
    ShowRouteOverview = 28, "showRouteOverview", 0..=0;
    SetTrafficIncidentCardsEnabled = 29, "setTrafficIncidentCardsEnabled", 1..=1;
    SetFooterEnabled = 30, "setFooterEnabled", 1..=1;
    SetHeaderEnabled = 31, "setHeaderEnabled", 1..=1;
    RemoveMarker = 32, "removeMarker", 1..=1;
    RemovePolyline = 33, "removePolyline", 1..=1;
    RemovePolygon = 34, "removePolygon", 1..=1;
    RemoveCircle = 35, "removeCircle", 1..=1;
    RemoveGroundOverlay = 36, "removeGroundOverlay", 1..=1;
    SetZoomControlsEnabled = 37, "setZoomControlsEnabled", 1..=1;
    SetRecenterButtonEnabled = 38, "setRecenterButtonEnabled", 1..=1;
    SetPadding = 39, "setPadding", 4..=4;
    AddMarker = 40, "addMarker", 1..=1;
    AddPolyline = 41, "addPolyline", 1..=1;
    AddPolygon = 42, "addPolygon", 1..=1;
    AddCircle = 43, "addCircle", 1..=1;
    AddGroundOverlay = 44, "addGroundOverlay", 1..=1;
    GetCameraPosition = 45, "getCameraPosition", 0..=0;
    GetMyLocation = 46, "getMyLocation", 0..=0;
    GetUiSettings = 47, "getUiSettings", 0..=0;
    IsMyLocationEnabled = 48, "isMyLocationEnabled", 0..=0;
    SetMinZoomLevel = 49, "setMinZoomLevel", 1..=1;
    SetMaxZoomLevel = 50, "setMaxZoomLevel", 1..=1;
    SetStylingOptions = 51, "setStylingOptions", 1..=1;
    IsAutoScreenAvailable = 52, "isAutoScreenAvailable", 0..=0;
    InitializeNavigator = 60, "initializeNavigator", 1..=2;
    Cleanup = 61, "cleanup", 0..=0;
    SetDestinations = 62, "setDestinations", 1..=3;
    ClearDestinations = 63, "clearDestinations", 0..=0;
    ContinueToNextDestination = 64, "continueToNextDestination", 0..=0;
    StartGuidance = 65, "startGuidance", 0..=0;
    StopGuidance = 66, "stopGuidance", 0..=0;
    SimulateLocationsAlongExistingRoute = 67, "simulateLocationsAlongExistingRoute", 1..=1;
    StopLocationSimulation = 68, "stopLocationSimulation", 0..=0;
    PauseLocationSimulation = 69, "pauseLocationSimulation", 0..=0;
    ResumeLocationSimulation = 70, "resumeLocationSimulation", 0..=0;
    SimulateLocation = 71, "simulateLocation", 1..=1;
    SetAudioGuidanceType = 72, "setAudioGuidanceType", 1..=1;
    SetSpeedAlertOptions = 73, "setSpeedAlertOptions", 0..=1;
    SetAbnormalTerminatingReportingEnabled = 74, "setAbnormalTerminatingReportingEnabled", 1..=1;
    GetCurrentTimeAndDistance = 75, "getCurrentTimeAndDistance", 0..=0;
    GetCurrentRouteSegment = 76, "getCurrentRouteSegment", 0..=0;
    GetRouteSegments = 77, "getRouteSegments", 0..=0;
    GetTraveledPath = 78, "getTraveledPath", 0..=0;
    AreTermsAccepted = 79, "areTermsAccepted", 0..=0;
    ResetTermsAccepted = 80, "resetTermsAccepted", 0..=0;
    GetNavSdkVersion = 81, "getNavSDKVersion", 0..=0;
    StartUpdatingLocation = 82, "startUpdatingLocation", 0..=0;
    StopUpdatingLocation = 83, "stopUpdatingLocation", 0..=0;
    SetTurnByTurnLoggingEnabled = 84, "setTurnByTurnLoggingEnabled", 1..=1;
}

impl Command {
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Whether the command is addressed to a map surface rather than the session
    pub fn is_view_command(self) -> bool {
        self.id() < 60
    }
}

/// Positional arguments of one command, checked against its arity
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    command: Command,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(command: Command, values: &'a [Value]) -> BridgeResult<Self> {
        let arity = command.arity();
        if !arity.accepts(values.len()) {
            return Err(BridgeError::Arity {
                command: command.name(),
                expected: arity,
                actual: values.len(),
            });
        }
        Ok(Self { command, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn mismatch(&self, index: usize, expected: &'static str) -> BridgeError {
        BridgeError::ArgumentType {
            command: self.command.name(),
            index,
            expected,
        }
    }

    fn present(&self, index: usize) -> Option<&'a Value> {
        match self.values.get(index) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    pub fn int(&self, index: usize) -> BridgeResult<i64> {
        self.present(index)
            .and_then(number_as_int)
            .ok_or_else(|| self.mismatch(index, "an integer"))
    }

    /// Integer argument that has to fit a native `int`
    pub fn int32(&self, index: usize) -> BridgeResult<i32> {
        let value = self.int(index)?;
        i32::try_from(value).map_err(|_| self.mismatch(index, "a 32-bit integer"))
    }

    pub fn opt_int(&self, index: usize) -> BridgeResult<Option<i64>> {
        match self.present(index) {
            None => Ok(None),
            Some(_) => self.int(index).map(Some),
        }
    }

    pub fn float(&self, index: usize) -> BridgeResult<f64> {
        self.present(index)
            .and_then(Value::as_f64)
            .ok_or_else(|| self.mismatch(index, "a number"))
    }

    pub fn bool(&self, index: usize) -> BridgeResult<bool> {
        self.present(index)
            .and_then(Value::as_bool)
            .ok_or_else(|| self.mismatch(index, "a boolean"))
    }

    pub fn string(&self, index: usize) -> BridgeResult<&'a str> {
        self.present(index)
            .and_then(Value::as_str)
            .ok_or_else(|| self.mismatch(index, "a string"))
    }

    pub fn map(&self, index: usize) -> BridgeResult<&'a OptionMap> {
        self.present(index)
            .and_then(Value::as_object)
            .ok_or_else(|| self.mismatch(index, "a map"))
    }

    /// Map argument that may be absent or `null`
    pub fn opt_map(&self, index: usize) -> BridgeResult<Option<&'a OptionMap>> {
        match self.present(index) {
            None => Ok(None),
            Some(_) => self.map(index).map(Some),
        }
    }

    pub fn array(&self, index: usize) -> BridgeResult<&'a [Value]> {
        self.present(index)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| self.mismatch(index, "an array"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_and_round_trip() {
        let mut seen = HashSet::new();
        for command in Command::ALL {
            assert!(seen.insert(command.id()), "duplicate id {}", command.id());
            assert_eq!(Command::from_id(command.id().into()), Some(*command));
        }
        assert_eq!(Command::ALL.len(), 77);
    }

    #[test]
    fn test_wire_ids_are_stable() {
        assert_eq!(Command::from_id(11), Some(Command::SetZoomLevel));
        assert_eq!(Command::from_id(40), Some(Command::AddMarker));
        assert_eq!(Command::from_id(52), Some(Command::IsAutoScreenAvailable));
        assert_eq!(Command::from_id(65), Some(Command::StartGuidance));
        assert_eq!(Command::from_id(84), Some(Command::SetTurnByTurnLoggingEnabled));
        assert_eq!(Command::SetNavigationUiEnabled.name(), "setNavigationUIEnabled");
    }

    #[test]
    fn test_unknown_ids() {
        assert_eq!(Command::from_id(0), None);
        assert_eq!(Command::from_id(55), None);
        assert_eq!(Command::from_id(999), None);
    }

    #[test]
    fn test_arity_is_checked() {
        let err = Args::new(Command::SetZoomLevel, &[]).unwrap_err();
        assert_eq!(
            err,
            BridgeError::Arity {
                command: "setZoomLevel",
                expected: Arity::exactly(1),
                actual: 0
            }
        );
        assert!(Args::new(Command::SetDestinations, &[json!([])]).is_ok());
        assert!(Args::new(Command::SetPadding, &[json!(1), json!(2)]).is_err());
    }

    #[test]
    fn test_argument_types() {
        let values = [json!(5.7), json!("x"), json!(null)];
        let args = Args::new(Command::CreateFragment, &values).unwrap();
        assert_eq!(args.int(0), Ok(5));
        assert_eq!(
            args.int(1),
            Err(BridgeError::ArgumentType {
                command: "createFragment",
                index: 1,
                expected: "an integer"
            })
        );
        assert_eq!(args.opt_map(2), Ok(None));
        assert!(args.map(2).is_err());
    }

    #[test]
    fn test_native_int_range() {
        let values = [json!(-8), json!(4_294_967_296i64), json!(1), json!(2)];
        let args = Args::new(Command::SetPadding, &values).unwrap();
        assert_eq!(args.int32(0), Ok(-8));
        assert_eq!(
            args.int32(1),
            Err(BridgeError::ArgumentType {
                command: "setPadding",
                index: 1,
                expected: "a 32-bit integer"
            })
        );
    }

    #[test]
    fn test_view_target_wire_form() {
        assert_eq!(ViewTarget::from(AUTO_VIEW_ID), ViewTarget::Auto);
        assert_eq!(ViewTarget::from(4), ViewTarget::View(4));
        let target: ViewTarget = serde_json::from_value(json!(-1)).unwrap();
        assert_eq!(target, ViewTarget::Auto);
        assert_eq!(serde_json::to_value(ViewTarget::View(3)).unwrap(), json!(3));
    }
}
