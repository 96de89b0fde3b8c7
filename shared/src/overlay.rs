//! # Overlay Options
//!
//! Parsing of the five overlay kinds a map surface can carry. Each options
//! struct knows how to read itself from an option map and how to place
//! itself on a [`MapSurface`]; the registry only deals with the
//! [`OverlayOptions`] trait.
//!
//! Defaults when a key is absent: alpha 1, rotation 0, visible, not
//! clickable, not draggable, not flat, not geodesic, widths and radius 0.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Argb;
use crate::error::{BridgeError, BridgeResult, NativeError};
use crate::model::LatLng;
use crate::options::{self, ConfigValueError, OptionMap};
use crate::traits::MapSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayKind {
    Marker,
    Polyline,
    Polygon,
    Circle,
    GroundOverlay,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 5] = [
        Self::Marker,
        Self::Polyline,
        Self::Polygon,
        Self::Circle,
        Self::GroundOverlay,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Circle => "circle",
            Self::GroundOverlay => "ground overlay",
        }
    }
}

/// Options of one overlay kind
pub trait OverlayOptions: Sized + Clone + Serialize {
    const KIND: OverlayKind;

    fn parse(map: &OptionMap) -> BridgeResult<Self>;

    /// Create the native object, returning its native id.
    fn place(&self, surface: &mut dyn MapSurface) -> Result<String, NativeError>;
}

/// A placed overlay as reported back to the caller. `id` is the registry
/// key: the caller's id when one was given, the native id otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placed<O> {
    pub id: String,
    #[serde(flatten)]
    pub options: O,
}

impl<O: Serialize> Placed<O> {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<LatLng>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_path: Option<String>,
    pub alpha: f64,
    pub rotation: f64,
    pub draggable: bool,
    pub flat: bool,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<f64>,
}

impl OverlayOptions for MarkerOptions {
    const KIND: OverlayKind = OverlayKind::Marker;

    fn parse(map: &OptionMap) -> BridgeResult<Self> {
        let position = match options::get_map("position", map)? {
            Some(position) => LatLng::from_options(position)?,
            None => None,
        };
        Ok(Self {
            position,
            title: options::get_string("title", map)?,
            snippet: options::get_string("snippet", map)?,
            img_path: options::get_string("imgPath", map)?.filter(|p| !p.is_empty()),
            alpha: options::get_double("alpha", map, 1.0)?,
            rotation: options::get_double("rotation", map, 0.0)?,
            draggable: options::get_bool("draggable", map, false)?,
            flat: options::get_bool("flat", map, false)?,
            visible: options::get_bool("visible", map, true)?,
            z_index: z_index(map)?,
        })
    }

    fn place(&self, surface: &mut dyn MapSurface) -> Result<String, NativeError> {
        surface.add_marker(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolylineOptions {
    pub points: Vec<LatLng>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Argb>,
    pub width: f64,
    pub clickable: bool,
    pub geodesic: bool,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<f64>,
}

impl OverlayOptions for PolylineOptions {
    const KIND: OverlayKind = OverlayKind::Polyline;

    fn parse(map: &OptionMap) -> BridgeResult<Self> {
        Ok(Self {
            points: required_points("polyline", map)?,
            color: color("color", map)?,
            width: options::get_double("width", map, 0.0)?,
            clickable: options::get_bool("clickable", map, false)?,
            geodesic: options::get_bool("geodesic", map, false)?,
            visible: options::get_bool("visible", map, true)?,
            z_index: z_index(map)?,
        })
    }

    fn place(&self, surface: &mut dyn MapSurface) -> Result<String, NativeError> {
        surface.add_polyline(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonOptions {
    pub points: Vec<LatLng>,
    pub holes: Vec<Vec<LatLng>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Argb>,
    pub stroke_width: f64,
    pub clickable: bool,
    pub geodesic: bool,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<f64>,
}

impl OverlayOptions for PolygonOptions {
    const KIND: OverlayKind = OverlayKind::Polygon;

    fn parse(map: &OptionMap) -> BridgeResult<Self> {
        let mut holes = Vec::new();
        if let Some(items) = options::get_array("holes", map)? {
            for item in items {
                match item {
                    Value::Array(hole) => {
                        let hole = points("holes", hole)?;
                        // An empty ring is not a hole
                        if !hole.is_empty() {
                            holes.push(hole);
                        }
                    }
                    other => {
                        return Err(ConfigValueError::new("holes", "a list of point lists", other).into())
                    }
                }
            }
        }

        Ok(Self {
            points: required_points("polygon", map)?,
            holes,
            fill_color: color("fillColor", map)?,
            stroke_color: color("strokeColor", map)?,
            stroke_width: options::get_double("strokeWidth", map, 0.0)?,
            clickable: options::get_bool("clickable", map, false)?,
            geodesic: options::get_bool("geodesic", map, false)?,
            visible: options::get_bool("visible", map, true)?,
            z_index: z_index(map)?,
        })
    }

    fn place(&self, surface: &mut dyn MapSurface) -> Result<String, NativeError> {
        surface.add_polygon(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<LatLng>,
    pub radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Argb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Argb>,
    pub stroke_width: f64,
    pub clickable: bool,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<f64>,
}

impl OverlayOptions for CircleOptions {
    const KIND: OverlayKind = OverlayKind::Circle;

    fn parse(map: &OptionMap) -> BridgeResult<Self> {
        let center = match options::get_map("center", map)? {
            Some(center) => LatLng::from_options(center)?,
            None => None,
        };
        Ok(Self {
            center,
            radius: options::get_double("radius", map, 0.0)?,
            fill_color: color("fillColor", map)?,
            stroke_color: color("strokeColor", map)?,
            stroke_width: options::get_double("strokeWidth", map, 0.0)?,
            clickable: options::get_bool("clickable", map, false)?,
            visible: options::get_bool("visible", map, true)?,
            z_index: z_index(map)?,
        })
    }

    fn place(&self, surface: &mut dyn MapSurface) -> Result<String, NativeError> {
        surface.add_circle(self)
    }
}

/// Image overlay anchored at `location`. An explicit `transparency` wins;
/// otherwise it is derived from the caller's `alpha` as `1 - alpha`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundOverlayOptions {
    pub location: LatLng,
    pub width: f64,
    pub height: f64,
    pub transparency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_path: Option<String>,
    pub clickable: bool,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<f64>,
}

impl OverlayOptions for GroundOverlayOptions {
    const KIND: OverlayKind = OverlayKind::GroundOverlay;

    fn parse(map: &OptionMap) -> BridgeResult<Self> {
        let missing = BridgeError::MissingField {
            object: "ground overlay",
            field: "location",
        };
        let location = match options::get_map("location", map)? {
            Some(location) => LatLng::from_options(location)?.ok_or(missing)?,
            None => return Err(missing),
        };
        let transparency = if options::has("transparency", map) {
            options::get_double("transparency", map, 0.0)?
        } else {
            1.0 - options::get_double("alpha", map, 1.0)?
        };
        let bearing = if options::has("bearing", map) {
            Some(options::get_double("bearing", map, 0.0)?)
        } else {
            None
        };

        Ok(Self {
            location,
            width: options::get_double("width", map, 0.0)?,
            height: options::get_double("height", map, 0.0)?,
            transparency: transparency.clamp(0.0, 1.0),
            bearing,
            img_path: options::get_string("imgPath", map)?.filter(|p| !p.is_empty()),
            clickable: options::get_bool("clickable", map, false)?,
            visible: options::get_bool("visible", map, true)?,
            z_index: z_index(map)?,
        })
    }

    fn place(&self, surface: &mut dyn MapSurface) -> Result<String, NativeError> {
        surface.add_ground_overlay(self)
    }
}

/// Parse the hex color under `field`, if present.
pub(crate) fn color(field: &'static str, map: &OptionMap) -> BridgeResult<Option<Argb>> {
    match options::get_string(field, map)? {
        None => Ok(None),
        Some(hex) => Argb::from_hex(&hex)
            .map(Some)
            .map_err(|e| BridgeError::invalid_color(field, &hex, e)),
    }
}

fn z_index(map: &OptionMap) -> BridgeResult<Option<f64>> {
    if options::has("zIndex", map) {
        Ok(Some(options::get_double("zIndex", map, 0.0)?))
    } else {
        Ok(None)
    }
}

fn required_points(object: &'static str, map: &OptionMap) -> BridgeResult<Vec<LatLng>> {
    match options::get_array("points", map)? {
        Some(items) => points("points", items),
        None => Err(BridgeError::MissingField {
            object,
            field: "points",
        }),
    }
}

fn points(field: &str, items: &[Value]) -> BridgeResult<Vec<LatLng>> {
    items
        .iter()
        .map(|item| -> BridgeResult<LatLng> {
            let point = match item {
                Value::Object(point) => options::get_lat_lng(point)?,
                _ => None,
            };
            point.ok_or_else(|| ConfigValueError::new(field, "a list of {lat, lng} maps", item).into())
        })
        .collect()
}
