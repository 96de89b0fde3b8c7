//! # Overlay Registry
//!
//! Shadow model of the overlays placed on one map surface. Each kind has its
//! own bidirectional [`IdMap`]:
//!
//! ```text
//!  addMarker({id: "home", ...}) ──► native add ──► "m12"
//!
//!    markers.forward  "home" ──► ("m12", Placed{id:"home", ...})
//!    markers.reverse  "m12"  ──► "home"
//!
//!  native click("m12") ──► reverse ──► "home" ──► forward ──► onMarkerClick
//! ```
//!
//! The registry key is the caller supplied id when it is non-empty, and the
//! native id otherwise. Every surface owns its own registry; registries are
//! never shared between phone views and the in-car screen.

use log::{debug, warn};
use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};
use crate::id_map::IdMap;
use crate::options::{self, OptionMap};
use crate::overlay::{
    CircleOptions, GroundOverlayOptions, MarkerOptions, OverlayKind, OverlayOptions, Placed, PolygonOptions,
    PolylineOptions,
};
use crate::traits::MapSurface;

/// Overlay kinds with a store in [`OverlayRegistry`]
pub trait Registered: OverlayOptions {
    fn store(registry: &OverlayRegistry) -> &IdMap<Placed<Self>>;
    fn store_mut(registry: &mut OverlayRegistry) -> &mut IdMap<Placed<Self>>;
}

macro_rules! registered {
    ($options:ty, $field:ident) => {
        impl Registered for $options {
            fn store(registry: &OverlayRegistry) -> &IdMap<Placed<Self>> {
                &registry.$field
            }

            fn store_mut(registry: &mut OverlayRegistry) -> &mut IdMap<Placed<Self>> {
                &mut registry.$field
            }
        }
    };
}

registered!(MarkerOptions, markers);
registered!(PolylineOptions, polylines);
registered!(PolygonOptions, polygons);
registered!(CircleOptions, circles);
registered!(GroundOverlayOptions, ground_overlays);

#[derive(Debug, Default)]
pub struct OverlayRegistry {
    markers: IdMap<Placed<MarkerOptions>>,
    polylines: IdMap<Placed<PolylineOptions>>,
    polygons: IdMap<Placed<PolygonOptions>>,
    circles: IdMap<Placed<CircleOptions>>,
    ground_overlays: IdMap<Placed<GroundOverlayOptions>>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `map`, place the overlay on `surface` and record it.
    ///
    /// Re-adding an existing key replaces the earlier overlay, which is
    /// removed from the native map.
    pub fn add<O: Registered>(&mut self, surface: &mut dyn MapSurface, map: &OptionMap) -> BridgeResult<Placed<O>> {
        let options = O::parse(map)?;
        let external_id = options::get_string("id", map)?.filter(|id| !id.is_empty());

        let native_id = options.place(surface).map_err(|source| BridgeError::OverlayCreation {
            kind: O::KIND.name(),
            source,
        })?;

        let key = external_id.unwrap_or_else(|| native_id.clone());
        let placed = Placed { id: key.clone(), options };
        debug!("Added {} {} (native {})", O::KIND.name(), key, native_id);

        if let Some((old_native, _)) = O::store_mut(self).insert(key, native_id.clone(), placed.clone()) {
            if old_native != native_id {
                release(surface, O::KIND, &old_native);
            }
        }
        Ok(placed)
    }

    /// Remove by registry key. Returns `false` (and does nothing) for an
    /// unknown key.
    pub fn remove(&mut self, kind: OverlayKind, key: &str, surface: &mut dyn MapSurface) -> bool {
        let native_id = match kind {
            OverlayKind::Marker => self.markers.remove(key).map(|(n, _)| n),
            OverlayKind::Polyline => self.polylines.remove(key).map(|(n, _)| n),
            OverlayKind::Polygon => self.polygons.remove(key).map(|(n, _)| n),
            OverlayKind::Circle => self.circles.remove(key).map(|(n, _)| n),
            OverlayKind::GroundOverlay => self.ground_overlays.remove(key).map(|(n, _)| n),
        };
        match native_id {
            Some(native_id) => {
                release(surface, kind, &native_id);
                true
            }
            None => false,
        }
    }

    /// Forget every overlay of every kind
    pub fn clear(&mut self) -> usize {
        self.markers.clear().len()
            + self.polylines.clear().len()
            + self.polygons.clear().len()
            + self.circles.clear().len()
            + self.ground_overlays.clear().len()
    }

    pub fn get<O: Registered>(&self, key: &str) -> Option<&Placed<O>> {
        O::store(self).get(key)
    }

    /// Description of the overlay owning `native_id`, for click events
    pub fn resolve_click(&self, kind: OverlayKind, native_id: &str) -> Option<Value> {
        match kind {
            OverlayKind::Marker => self.describe::<MarkerOptions>(native_id),
            OverlayKind::Polyline => self.describe::<PolylineOptions>(native_id),
            OverlayKind::Polygon => self.describe::<PolygonOptions>(native_id),
            OverlayKind::Circle => self.describe::<CircleOptions>(native_id),
            OverlayKind::GroundOverlay => self.describe::<GroundOverlayOptions>(native_id),
        }
    }

    fn describe<O: Registered>(&self, native_id: &str) -> Option<Value> {
        let store = O::store(self);
        let key = store.key_for_native(native_id)?;
        store.get(key).map(Placed::to_value)
    }

    pub fn len(&self, kind: OverlayKind) -> usize {
        match kind {
            OverlayKind::Marker => self.markers.len(),
            OverlayKind::Polyline => self.polylines.len(),
            OverlayKind::Polygon => self.polygons.len(),
            OverlayKind::Circle => self.circles.len(),
            OverlayKind::GroundOverlay => self.ground_overlays.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        OverlayKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.markers.is_consistent()
            && self.polylines.is_consistent()
            && self.polygons.is_consistent()
            && self.circles.is_consistent()
            && self.ground_overlays.is_consistent()
    }
}

fn release(surface: &mut dyn MapSurface, kind: OverlayKind, native_id: &str) {
    if let Err(e) = surface.remove_overlay(kind, native_id) {
        warn!("Failed to remove {} {}: {}", kind.name(), native_id, e);
    }
}
