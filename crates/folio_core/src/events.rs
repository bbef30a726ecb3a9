//! Event dispatch system
//!
//! Lifecycle, scroll, and animation events raised by a page session.

use rustc_hash::FxHashMap;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;

    // Element lifecycle events
    pub const MOUNT: EventType = 60;
    pub const UNMOUNT: EventType = 61;

    /// Element entered the (margin-adjusted) viewport for the first time
    pub const REVEAL: EventType = 90;
    /// Typewriter cursor advanced
    pub const CURSOR: EventType = 91;
    /// Typewriter reached the end of its text
    pub const CURSOR_DONE: EventType = 92;

    /// Human readable name for logs and previews
    pub fn name(event_type: EventType) -> &'static str {
        match event_type {
            SCROLL => "scroll",
            RESIZE => "resize",
            MOUNT => "mount",
            UNMOUNT => "unmount",
            REVEAL => "reveal",
            CURSOR => "cursor",
            CURSOR_DONE => "cursor-done",
            _ => "unknown",
        }
    }
}

/// An event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    /// Element ID (0 for page-level events)
    pub target: u64,
    pub data: EventData,
    /// Session clock time in milliseconds
    pub timestamp_ms: u64,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Scroll {
        offset_y: f32,
    },
    Resize {
        width: f32,
        height: f32,
    },
    /// Portion of the element inside the margin-adjusted viewport
    Visibility {
        ratio: f32,
    },
    Cursor {
        position: usize,
        length: usize,
    },
    None,
}

impl Event {
    pub fn new(event_type: EventType, target: u64, data: EventData, timestamp_ms: u64) -> Self {
        Self {
            event_type,
            target,
            data,
            timestamp_ms,
        }
    }

    pub fn name(&self) -> &'static str {
        event_types::name(self.event_type)
    }
}

/// Event handler function type
pub type EventHandler = Box<dyn Fn(&Event) + Send + Sync>;

/// Dispatches events to registered handlers
///
/// Handlers are registered per event type, optionally filtered to one target.
pub struct EventDispatcher {
    handlers: FxHashMap<EventType, Vec<(Option<u64>, EventHandler)>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register a handler for every event of a type
    pub fn register<F>(&mut self, event_type: EventType, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.handlers
            .entry(event_type)
            .or_default()
            .push((None, Box::new(handler)));
    }

    /// Register a handler for events of a type raised by one element
    pub fn register_for<F>(&mut self, target: u64, event_type: EventType, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.handlers
            .entry(event_type)
            .or_default()
            .push((Some(target), Box::new(handler)));
    }

    /// Dispatch an event, returning how many handlers saw it
    pub fn dispatch(&self, event: &Event) -> usize {
        let Some(handlers) = self.handlers.get(&event.event_type) else {
            return 0;
        };

        let mut delivered = 0;
        for (filter, handler) in handlers {
            if filter.map_or(true, |target| target == event.target) {
                handler(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Drop every handler registered for an element
    pub fn remove_target(&mut self, target: u64) {
        for handlers in self.handlers.values_mut() {
            handlers.retain(|(filter, _)| *filter != Some(target));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.values().all(Vec::is_empty)
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_filters_by_target() {
        let mut dispatcher = EventDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let all = seen.clone();
        dispatcher.register(event_types::REVEAL, move |e| {
            all.lock().unwrap().push(("all", e.target));
        });
        let only_two = seen.clone();
        dispatcher.register_for(2, event_types::REVEAL, move |e| {
            only_two.lock().unwrap().push(("two", e.target));
        });

        let delivered = dispatcher.dispatch(&Event::new(event_types::REVEAL, 1, EventData::None, 0));
        assert_eq!(delivered, 1);
        let delivered = dispatcher.dispatch(&Event::new(event_types::REVEAL, 2, EventData::None, 5));
        assert_eq!(delivered, 2);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("all", 1), ("all", 2), ("two", 2)]
        );
    }

    #[test]
    fn test_remove_target_drops_filtered_handlers() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register_for(7, event_types::CURSOR, |_| {});
        assert!(!dispatcher.is_empty());

        dispatcher.remove_target(7);
        assert!(dispatcher.is_empty());
        assert_eq!(
            dispatcher.dispatch(&Event::new(event_types::CURSOR, 7, EventData::None, 0)),
            0
        );
    }
}
