//! # Map View Controller
//!
//! One live map surface (phone map view, phone navigation view, or the
//! in-car screen) together with the overlay registry that shadows it.
//!
//! ```text
//!   create ──► created ── map ready callback ──► ready
//!                 │                                 │
//!                 └───────────── destroy ◄──────────┘
//! ```
//!
//! Before the native map reports ready, setters are dropped silently while
//! overlay adds and queries fail with `NO_MAP`. Guidance-UI commands only
//! make sense on navigation views and are ignored with a warning elsewhere.

use log::{debug, info, warn};
use serde_json::Value;

use crate::callback::CallbackSender;
use crate::command::ViewTarget;
use crate::enums::{CameraPerspective, ForceNightMode, MapType, MapViewType};
use crate::error::{BridgeResult, NotReady};
use crate::model::{CameraPosition, Location, Padding, UiSettings};
use crate::options::OptionMap;
use crate::overlay::OverlayKind;
use crate::registry::{OverlayRegistry, Registered};
use crate::relay::EventRelay;
use crate::styling::StylingOptions;
use crate::traits::{MapFlag, MapSurface, NavFlag, NavigationSurface, NativeResult, StyleLoader, StyleRequest};

pub struct MapViewController {
    target: ViewTarget,
    kind: MapViewType,
    surface: Box<dyn MapSurface>,
    created: bool,
    map_ready: bool,
    registry: OverlayRegistry,
    styling: Option<StylingOptions>,
    style_generation: u64,
    pending_style: Option<String>,
}

impl MapViewController {
    pub fn new(target: ViewTarget, kind: MapViewType, surface: Box<dyn MapSurface>) -> Self {
        Self {
            target,
            kind,
            surface,
            created: false,
            map_ready: false,
            registry: OverlayRegistry::new(),
            styling: None,
            style_generation: 0,
            pending_style: None,
        }
    }

    /// Wrap a surface the host already created and whose map is loaded
    pub fn adopt(target: ViewTarget, kind: MapViewType, surface: Box<dyn MapSurface>) -> Self {
        Self {
            created: true,
            map_ready: true,
            ..Self::new(target, kind, surface)
        }
    }

    pub fn target(&self) -> ViewTarget {
        self.target
    }

    pub fn kind(&self) -> MapViewType {
        self.kind
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    pub fn styling(&self) -> Option<&StylingOptions> {
        self.styling.as_ref()
    }

    // ---- lifecycle -----------------------------------------------------

    pub fn create(&mut self, height: i32, width: i32, styling: Option<StylingOptions>) -> BridgeResult<()> {
        if self.created {
            debug!("{} already created", self.target);
            return Ok(());
        }
        self.surface.create(width, height)?;
        self.created = true;
        info!("Created {} ({:?}, {}x{})", self.target, self.kind, width, height);
        if let Some(styling) = styling {
            self.set_styling(styling)?;
        }
        Ok(())
    }

    /// Native map finished loading
    pub fn on_map_ready(&mut self) {
        self.map_ready = true;
        debug!("{} map ready", self.target);

        if let Some(style) = self.pending_style.take() {
            self.log_failure("apply map style", |surface| surface.set_map_style(&style));
        }
        self.reapply_styling();
    }

    /// Tear the surface down. Overlays are forgotten together with it.
    pub fn destroy(&mut self) -> BridgeResult<()> {
        let dropped = self.registry.clear();
        self.map_ready = false;
        self.pending_style = None;
        if !self.created {
            return Ok(());
        }
        self.created = false;
        debug!("Destroying {} ({} overlay(s) dropped)", self.target, dropped);
        self.surface.destroy()?;
        Ok(())
    }

    fn ensure_ready(&self) -> BridgeResult<()> {
        if self.map_ready {
            Ok(())
        } else {
            Err(NotReady::NoMap.into())
        }
    }

    /// Run a setter against the native map, or drop it when there is none yet
    fn apply<F>(&mut self, what: &str, f: F) -> BridgeResult<()>
    where
        F: FnOnce(&mut dyn MapSurface) -> NativeResult<()>,
    {
        if !self.map_ready {
            debug!("{}: no map yet, ignoring {}", self.target, what);
            return Ok(());
        }
        f(self.surface.as_mut())?;
        Ok(())
    }

    fn apply_navigation<F>(&mut self, what: &str, f: F) -> BridgeResult<()>
    where
        F: FnOnce(&mut dyn NavigationSurface) -> NativeResult<()>,
    {
        if !self.created {
            debug!("{}: not created, ignoring {}", self.target, what);
            return Ok(());
        }
        match self.surface.navigation() {
            Some(navigation) => {
                f(navigation)?;
                Ok(())
            }
            None => {
                warn!("{} is not a navigation view, ignoring {}", self.target, what);
                Ok(())
            }
        }
    }

    fn log_failure<F>(&mut self, what: &str, f: F)
    where
        F: FnOnce(&mut dyn MapSurface) -> NativeResult<()>,
    {
        if let Err(e) = f(self.surface.as_mut()) {
            warn!("{}: failed to {}: {}", self.target, what, e);
        }
    }

    // ---- overlays ------------------------------------------------------

    /// Add an overlay and return its description
    pub fn add_overlay<O: Registered>(&mut self, map: &OptionMap) -> BridgeResult<Value> {
        self.ensure_ready()?;
        let placed = self.registry.add::<O>(self.surface.as_mut(), map)?;
        Ok(placed.to_value())
    }

    pub fn remove_overlay(&mut self, kind: OverlayKind, key: &str) -> bool {
        let removed = self.registry.remove(kind, key, self.surface.as_mut());
        if !removed {
            debug!("{}: no {} with id {}", self.target, kind.name(), key);
        }
        removed
    }

    /// Remove every overlay, natively and from the registry
    pub fn clear(&mut self) -> BridgeResult<()> {
        self.registry.clear();
        self.apply("clear", |surface| surface.clear())
    }

    pub fn resolve_click(&self, kind: OverlayKind, native_id: &str) -> Option<Value> {
        self.registry.resolve_click(kind, native_id)
    }

    // ---- camera --------------------------------------------------------

    pub fn move_camera(&mut self, camera: &CameraPosition) -> BridgeResult<()> {
        self.apply("moveCamera", |surface| surface.move_camera(camera))
    }

    pub fn animate_camera(&mut self, camera: &CameraPosition, duration_ms: i64) -> BridgeResult<()> {
        self.apply("animateCamera", |surface| surface.animate_camera(camera, duration_ms))
    }

    pub fn set_zoom_level(&mut self, level: f64) -> BridgeResult<()> {
        self.apply("setZoomLevel", |surface| surface.zoom_to(level))
    }

    pub fn set_following_perspective(&mut self, perspective: CameraPerspective) -> BridgeResult<()> {
        self.apply("setFollowingPerspective", |surface| surface.follow_my_location(perspective))
    }

    pub fn set_min_zoom(&mut self, level: f64) -> BridgeResult<()> {
        self.apply("setMinZoomLevel", |surface| surface.set_min_zoom(level))
    }

    pub fn set_max_zoom(&mut self, level: f64) -> BridgeResult<()> {
        self.apply("setMaxZoomLevel", |surface| surface.set_max_zoom(level))
    }

    pub fn reset_min_max_zoom(&mut self) -> BridgeResult<()> {
        self.apply("resetMinMaxZoomLevel", |surface| surface.reset_min_max_zoom())
    }

    // ---- map settings --------------------------------------------------

    pub fn set_map_flag(&mut self, flag: MapFlag, enabled: bool) -> BridgeResult<()> {
        self.apply("map flag", |surface| surface.set_map_flag(flag, enabled))
    }

    pub fn set_map_type(&mut self, map_type: MapType) -> BridgeResult<()> {
        self.apply("setMapType", |surface| surface.set_map_type(map_type))
    }

    pub fn set_padding(&mut self, padding: Padding) -> BridgeResult<()> {
        self.apply("setPadding", |surface| surface.set_padding(padding))
    }

    // ---- navigation UI -------------------------------------------------

    pub fn set_nav_flag(&mut self, flag: NavFlag, enabled: bool) -> BridgeResult<()> {
        self.apply_navigation("navigation UI flag", |navigation| navigation.set_nav_flag(flag, enabled))
    }

    pub fn set_night_mode(&mut self, mode: ForceNightMode) -> BridgeResult<()> {
        self.apply_navigation("setNightMode", |navigation| navigation.set_night_mode(mode))
    }

    pub fn show_route_overview(&mut self) -> BridgeResult<()> {
        self.apply_navigation("showRouteOverview", |navigation| navigation.show_route_overview())
    }

    /// Replace the stored styling options and apply them to the guidance UI
    pub fn set_styling(&mut self, styling: StylingOptions) -> BridgeResult<()> {
        self.styling = Some(styling);
        if !self.kind.is_navigation() {
            debug!("{}: styling stored for a plain map view", self.target);
            return Ok(());
        }
        let Some(styling) = self.styling.clone() else {
            return Ok(());
        };
        self.apply_navigation("setStylingOptions", |navigation| navigation.set_styling_options(&styling))
    }

    /// Push stored styling options again, after the navigator or map came up
    pub fn reapply_styling(&mut self) {
        if !self.kind.is_navigation() {
            return;
        }
        if let Some(styling) = self.styling.clone() {
            if let Err(e) = self.apply_navigation("setStylingOptions", |navigation| {
                navigation.set_styling_options(&styling)
            }) {
                warn!("{}: failed to re-apply styling: {}", self.target, e);
            }
        }
    }

    // ---- remote style --------------------------------------------------

    /// Start fetching a remote map style. Only the latest request is
    /// applied when results come back.
    pub fn request_style(&mut self, url: &str, loader: &dyn StyleLoader, sender: CallbackSender) -> u64 {
        self.style_generation += 1;
        loader.load(
            StyleRequest {
                target: self.target,
                generation: self.style_generation,
                url: url.to_string(),
            },
            sender,
        );
        self.style_generation
    }

    /// Returns `false` when the result belongs to a superseded request.
    pub fn apply_style(
        &mut self,
        generation: u64,
        style: Option<String>,
        error: Option<String>,
        relay: &mut EventRelay,
    ) -> bool {
        if generation != self.style_generation {
            debug!(
                "{}: dropping style result {} (latest {})",
                self.target, generation, self.style_generation
            );
            return false;
        }

        match (style, error) {
            (_, Some(error)) => {
                relay.debug_info(format!("Failed to load map style for {}: {}", self.target, error));
            }
            (Some(style), None) => {
                if self.map_ready {
                    self.log_failure("apply map style", |surface| surface.set_map_style(&style));
                } else {
                    self.pending_style = Some(style);
                }
            }
            (None, None) => {
                relay.debug_info(format!("Empty map style for {}", self.target));
            }
        }
        true
    }

    // ---- queries -------------------------------------------------------

    pub fn camera_position(&mut self) -> BridgeResult<CameraPosition> {
        self.ensure_ready()?;
        Ok(self.surface.camera_position()?)
    }

    pub fn my_location(&mut self) -> BridgeResult<Option<Location>> {
        self.ensure_ready()?;
        Ok(self.surface.my_location()?)
    }

    pub fn ui_settings(&mut self) -> BridgeResult<UiSettings> {
        self.ensure_ready()?;
        Ok(self.surface.ui_settings()?)
    }

    pub fn is_my_location_enabled(&mut self) -> BridgeResult<bool> {
        self.ensure_ready()?;
        Ok(self.surface.is_my_location_enabled()?)
    }
}
