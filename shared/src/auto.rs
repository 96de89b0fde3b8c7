//! # Android Auto Screen
//!
//! The in-car navigation screen comes and goes with the car connection. It
//! is addressed as [`ViewTarget::Auto`] and has its own overlay registry,
//! never shared with phone views.
//!
//! Styling options set while no car is connected are kept and applied as
//! soon as the screen attaches.

use log::info;
use serde_json::Value;

use crate::command::ViewTarget;
use crate::enums::MapViewType;
use crate::error::BridgeResult;
use crate::events::Event;
use crate::relay::EventRelay;
use crate::styling::StylingOptions;
use crate::traits::MapSurface;
use crate::view::MapViewController;

#[derive(Default)]
pub struct AutoScreen {
    view: Option<MapViewController>,
    styling: Option<StylingOptions>,
}

impl AutoScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&MapViewController> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut MapViewController> {
        self.view.as_mut()
    }

    /// The car screen surface is up
    pub fn attach(&mut self, surface: Box<dyn MapSurface>, relay: &mut EventRelay) {
        let mut view = MapViewController::adopt(ViewTarget::Auto, MapViewType::Navigation, surface);
        if let Some(styling) = self.styling.clone() {
            if let Err(e) = view.set_styling(styling) {
                relay.debug_info(format!("Failed to apply styling to auto screen: {}", e));
            }
        }
        self.view = Some(view);
        info!("Auto screen attached");
        relay.emit(Event::AutoScreenAvailabilityChanged { available: true });
    }

    /// The car screen went away. Its overlays go with it. Nothing is
    /// reported when no screen was attached.
    pub fn detach(&mut self, relay: &mut EventRelay) {
        if self.view.take().is_some() {
            info!("Auto screen detached");
            relay.emit(Event::AutoScreenAvailabilityChanged { available: false });
        }
    }

    /// Store styling options, applying them right away when a screen is up
    pub fn set_styling(&mut self, styling: StylingOptions) -> BridgeResult<()> {
        self.styling = Some(styling.clone());
        match self.view.as_mut() {
            Some(view) => view.set_styling(styling),
            None => Ok(()),
        }
    }

    /// Custom event raised by the in-car UI
    pub fn custom_event(&self, kind: String, data: Value, relay: &mut EventRelay) -> bool {
        relay.emit(Event::CustomNavigationAutoEvent { kind, data })
    }
}
