//! # Event Relay
//!
//! Fire-and-forget delivery of [`Event`]s to the application layer. With no
//! sink attached (app layer not running, screen torn down) the event is
//! dropped and counted; emitting never fails and never blocks.

use log::{debug, trace};

use crate::events::Event;
use crate::traits::EventSink;

#[derive(Default)]
pub struct EventRelay {
    sink: Option<Box<dyn EventSink>>,
    delivered: u64,
    dropped: u64,
}

impl EventRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the receiving side, replacing any previous sink
    pub fn attach(&mut self, sink: Box<dyn EventSink>) {
        self.sink = Some(sink);
    }

    pub fn detach(&mut self) -> Option<Box<dyn EventSink>> {
        self.sink.take()
    }

    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    /// Returns whether a sink received the event.
    pub fn emit(&mut self, event: Event) -> bool {
        match self.sink.as_mut() {
            Some(sink) => {
                trace!("emit {}", event.name());
                sink.emit(&event);
                self.delivered += 1;
                true
            }
            None => {
                debug!("No event sink attached, dropping {}", event.name());
                self.dropped += 1;
                false
            }
        }
    }

    /// Human readable diagnostics, mirrored to the log
    pub fn debug_info(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        debug!("{}", message);
        self.emit(Event::LogDebugInfo { message })
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingSink;

    #[test]
    fn test_drops_without_sink() {
        let mut relay = EventRelay::new();
        assert!(!relay.emit(Event::RouteChanged));
        assert_eq!(relay.dropped(), 1);
        assert_eq!(relay.delivered(), 0);
    }

    #[test]
    fn test_delivers_in_order() {
        let sink = RecordingSink::default();
        let mut relay = EventRelay::new();
        relay.attach(Box::new(sink.clone()));

        assert!(relay.emit(Event::NavigationReady));
        assert!(relay.debug_info("hello"));
        assert_eq!(sink.names(), vec!["onNavigationReady", "logDebugInfo"]);
        assert_eq!(relay.delivered(), 2);
    }

    #[test]
    fn test_detach_stops_delivery() {
        let sink = RecordingSink::default();
        let mut relay = EventRelay::new();
        relay.attach(Box::new(sink.clone()));
        assert!(relay.detach().is_some());
        assert!(!relay.emit(Event::TrafficUpdated));
        assert!(sink.names().is_empty());
    }
}
