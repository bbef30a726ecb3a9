//! Page session runtime
//!
//! A [`PageSession`] mounts a composed [`Page`]: one element per slot, each
//! owning its own reveal gate and typewriter. The host drives the session by
//! scrolling and advancing the clock, then pulls a [`Frame`] of resolved
//! styles and text.
//!
//! Elements never share state. Every timer an element schedules is held by
//! that element's task handle, so unmounting (or dropping the session)
//! releases all of them.

use crate::page::{Page, Slot};
use folio_animation::{
    CursorEmission, Motion, MotionInput, RevealTrigger, Style, TimerScheduler, Typewriter,
};
use folio_core::events::{event_types, Event, EventData, EventDispatcher, EventType};
use folio_core::geometry::Rect;
use serde::Serialize;
use slotmap::{new_key_type, Key, SlotMap};
use std::sync::{Arc, Mutex, PoisonError};

new_key_type! {
    /// Mounted element key
    pub struct ElementId;
}

impl ElementId {
    /// Event target value for this element
    pub fn target(self) -> u64 {
        self.data().as_ffi()
    }
}

/// Events produced inside timer callbacks, drained after each advance
type EventQueue = Arc<Mutex<Vec<Event>>>;

struct Element {
    slot_id: String,
    text: String,
    /// Page coordinates, or viewport coordinates when `fixed`
    rect: Rect,
    fixed: bool,
    motion: Motion,
    reveal: Option<RevealTrigger>,
    typewriter: Option<Typewriter>,
    mounted_at_ms: u64,
}

impl Element {
    fn mount(slot: &Slot, fixed: bool, now_ms: u64) -> Self {
        Self {
            slot_id: slot.id.clone(),
            text: slot.text.clone(),
            rect: slot.rect,
            fixed,
            motion: slot.motion.clone(),
            reveal: slot.motion.reveal_options().copied().map(RevealTrigger::new),
            typewriter: None,
            mounted_at_ms: now_ms,
        }
    }

    fn style(&self, now_ms: u64, scroll_y: f32, viewport_height: f32) -> Style {
        let revealed_at_ms = self
            .reveal
            .as_ref()
            .and_then(RevealTrigger::revealed_at_ms)
            .map(|at| at.saturating_sub(self.mounted_at_ms));

        self.motion.sample(&MotionInput {
            elapsed_ms: now_ms.saturating_sub(self.mounted_at_ms),
            scroll_y,
            viewport_height,
            target: self.rect,
            revealed_at_ms,
        })
    }

    fn text(&self) -> &str {
        match &self.typewriter {
            Some(typewriter) => typewriter.visible_text(),
            None => &self.text,
        }
    }
}

/// Resolved state of one slot
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlotFrame {
    pub id: String,
    pub motion: &'static str,
    pub style: Style,
    pub text: String,
    /// Top edge relative to the viewport
    pub screen_y: f32,
    /// Whether any part of the slot is inside the viewport
    pub on_screen: bool,
    /// Reveal gate state, for reveal-driven slots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed: Option<bool>,
}

/// Resolved state of the whole page at one instant
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub time_ms: u64,
    pub scroll_y: f32,
    pub slots: Vec<SlotFrame>,
}

impl Frame {
    pub fn slot(&self, id: &str) -> Option<&SlotFrame> {
        self.slots.iter().find(|slot| slot.id == id)
    }
}

/// A mounted page
pub struct PageSession {
    page: Page,
    scheduler: TimerScheduler,
    elements: SlotMap<ElementId, Element>,
    /// Mount order, used for deterministic iteration
    order: Vec<ElementId>,
    scroll_y: f32,
    viewport: Rect,
    dispatcher: EventDispatcher,
    queue: EventQueue,
    log: Vec<Event>,
}

impl PageSession {
    /// Mount every slot of `page` and start its entrance timers
    pub fn mount(page: Page) -> Self {
        let viewport = page.viewport;
        let mut session = Self {
            page,
            scheduler: TimerScheduler::new(),
            elements: SlotMap::with_key(),
            order: Vec::new(),
            scroll_y: 0.0,
            viewport,
            dispatcher: EventDispatcher::new(),
            queue: Arc::new(Mutex::new(Vec::new())),
            log: Vec::new(),
        };

        let slots: Vec<(Slot, bool)> = session
            .page
            .overlay
            .iter()
            .map(|slot| (slot.clone(), true))
            .chain(
                session
                    .page
                    .sections
                    .iter()
                    .flat_map(|section| section.slots.iter().map(|slot| (slot.clone(), false))),
            )
            .collect();
        for (slot, fixed) in &slots {
            session.mount_slot(slot, *fixed);
        }

        session.observe_visibility();
        tracing::debug!(elements = session.elements.len(), "Page session mounted");
        session
    }

    fn mount_slot(&mut self, slot: &Slot, fixed: bool) {
        let now_ms = self.scheduler.now_ms();
        let id = self.elements.insert(Element::mount(slot, fixed, now_ms));

        if let Some(typing) = &slot.typewriter {
            let queue = self.queue.clone();
            let target = id.target();
            let mut typewriter = Typewriter::new(
                self.scheduler.handle(),
                typing.text.as_str(),
                typing.delay_ms,
                typing.speed_ms,
            )
            .on_cursor(move |emission: &CursorEmission| {
                push_cursor_events(&queue, target, emission)
            });
            typewriter.activate();

            if let Some(element) = self.elements.get_mut(id) {
                element.typewriter = Some(typewriter);
            }
        }

        self.order.push(id);
        self.emit(Event::new(event_types::MOUNT, id.target(), EventData::None, now_ms));
    }

    // ========================================================================
    // Host input
    // ========================================================================

    /// Scroll to `offset_y` (clamped to the page); returns the applied offset
    pub fn scroll_to(&mut self, offset_y: f32) -> f32 {
        if self.set_scroll(offset_y) {
            self.observe_visibility();
        }
        self.scroll_y
    }

    pub fn scroll_by(&mut self, delta_y: f32) -> f32 {
        self.scroll_to(self.scroll_y + delta_y)
    }

    /// Scroll a section's top to the top of the viewport (navigation)
    pub fn scroll_to_section(&mut self, id: &str) -> Option<f32> {
        let offset = self.page.scroll_offset_of(id)?;
        Some(self.scroll_to(offset))
    }

    /// Change the viewport size used for visibility and scroll progress
    ///
    /// Slot positions keep the layout the page was composed with.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            tracing::warn!(width, height, "Ignoring invalid viewport size");
            return;
        }
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.emit(Event::new(
            event_types::RESIZE,
            0,
            EventData::Resize { width, height },
            self.now_ms(),
        ));

        // The offset may now exceed the shorter scroll range
        self.set_scroll(self.scroll_y);
        self.observe_visibility();
    }

    /// Clamp and store the scroll offset; emits SCROLL only when it moved
    fn set_scroll(&mut self, offset_y: f32) -> bool {
        let max = (self.page.height - self.viewport.height).max(0.0);
        let offset_y = if offset_y.is_nan() {
            0.0
        } else {
            offset_y.clamp(0.0, max)
        };
        if offset_y == self.scroll_y {
            return false;
        }

        self.scroll_y = offset_y;
        self.emit(Event::new(
            event_types::SCROLL,
            0,
            EventData::Scroll { offset_y },
            self.now_ms(),
        ));
        true
    }

    /// Advance the session clock, firing due timers; returns how many fired
    pub fn advance(&mut self, dt_ms: u64) -> usize {
        let fired = self.scheduler.advance(dt_ms);
        let pending = std::mem::take(&mut *lock(&self.queue));
        for event in pending {
            self.emit(event);
        }
        fired
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub fn frame(&self) -> Frame {
        Frame {
            time_ms: self.now_ms(),
            scroll_y: self.scroll_y,
            slots: self
                .order
                .iter()
                .filter_map(|id| self.elements.get(*id))
                .map(|element| self.slot_frame(element))
                .collect(),
        }
    }

    fn slot_frame(&self, element: &Element) -> SlotFrame {
        let screen_y = if element.fixed {
            element.rect.y
        } else {
            element.rect.y - self.scroll_y
        };
        let on_screen = element.fixed || self.viewport_rect().intersects(&element.rect);

        SlotFrame {
            id: element.slot_id.clone(),
            motion: element.motion.kind(),
            style: element.style(self.now_ms(), self.scroll_y, self.viewport.height),
            text: element.text().to_string(),
            screen_y,
            on_screen,
            revealed: element.reveal.as_ref().map(RevealTrigger::is_revealed),
        }
    }

    /// Current style of a slot
    pub fn style_of(&self, slot_id: &str) -> Option<Style> {
        self.find(slot_id)
            .map(|element| element.style(self.now_ms(), self.scroll_y, self.viewport.height))
    }

    /// Current text of a slot (typed-out portion for typewriter slots)
    pub fn text_of(&self, slot_id: &str) -> Option<&str> {
        self.find(slot_id).map(Element::text)
    }

    pub fn is_revealed(&self, slot_id: &str) -> Option<bool> {
        self.find(slot_id)?
            .reveal
            .as_ref()
            .map(RevealTrigger::is_revealed)
    }

    pub fn element_id(&self, slot_id: &str) -> Option<ElementId> {
        self.order.iter().copied().find(|id| {
            self.elements
                .get(*id)
                .map_or(false, |element| element.slot_id == slot_id)
        })
    }

    fn find(&self, slot_id: &str) -> Option<&Element> {
        self.element_id(slot_id).and_then(|id| self.elements.get(id))
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Register a handler for every event of a type
    pub fn on<F>(&mut self, event_type: EventType, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.dispatcher.register(event_type, handler);
    }

    /// Register a handler for one element's events
    pub fn on_element<F>(&mut self, id: ElementId, event_type: EventType, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.dispatcher.register_for(id.target(), event_type, handler);
    }

    /// Take the events emitted since the last call
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.log)
    }

    /// Slot id for an event target
    pub fn slot_id_of(&self, target: u64) -> Option<&str> {
        self.order
            .iter()
            .find(|id| id.target() == target)
            .and_then(|id| self.elements.get(*id))
            .map(|element| element.slot_id.as_str())
    }

    fn emit(&mut self, event: Event) {
        tracing::trace!(
            event = event.name(),
            target = event.target,
            at_ms = event.timestamp_ms,
            "Session event"
        );
        self.dispatcher.dispatch(&event);
        self.log.push(event);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Unmount every element, releasing its timers and handlers
    pub fn unmount(&mut self) {
        let now_ms = self.now_ms();
        for id in std::mem::take(&mut self.order) {
            // Dropping the element cancels its typewriter task
            drop(self.elements.remove(id));
            self.emit(Event::new(event_types::UNMOUNT, id.target(), EventData::None, now_ms));
            self.dispatcher.remove_target(id.target());
        }
        lock(&self.queue).clear();
        tracing::debug!(
            pending_timers = self.scheduler.task_count(),
            "Page session unmounted"
        );
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.viewport.width, self.viewport.height)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.scheduler.task_count()
    }

    /// Whether anything will still change with time alone
    pub fn is_animating(&self) -> bool {
        self.scheduler.has_pending() || self.elements.values().any(|e| e.motion.is_time_driven())
    }

    fn observe_visibility(&mut self) {
        let now_ms = self.now_ms();
        let viewport = self.viewport_rect();

        let mut revealed = Vec::new();
        for id in &self.order {
            let Some(element) = self.elements.get_mut(*id) else {
                continue;
            };
            if element.fixed {
                continue;
            }
            let Some(trigger) = element.reveal.as_mut() else {
                continue;
            };
            if trigger.is_revealed() {
                continue;
            }

            let ratio = viewport
                .inset(trigger.options().margin)
                .coverage_of(&element.rect);
            if trigger.observe_ratio(ratio, now_ms) {
                tracing::debug!(slot = %element.slot_id, ratio, "Slot revealed");
                revealed.push(Event::new(
                    event_types::REVEAL,
                    id.target(),
                    EventData::Visibility { ratio },
                    now_ms,
                ));
            }
        }

        for event in revealed {
            self.emit(event);
        }
    }
}

impl std::fmt::Debug for PageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSession")
            .field("now_ms", &self.now_ms())
            .field("scroll_y", &self.scroll_y)
            .field("elements", &self.elements.len())
            .field("pending_timers", &self.pending_timers())
            .finish()
    }
}

fn lock(queue: &Mutex<Vec<Event>>) -> std::sync::MutexGuard<'_, Vec<Event>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

fn push_cursor_events(queue: &Mutex<Vec<Event>>, target: u64, emission: &CursorEmission) {
    let data = EventData::Cursor {
        position: emission.cursor,
        length: emission.length,
    };
    let mut queue = lock(queue);
    queue.push(Event::new(
        event_types::CURSOR,
        target,
        data.clone(),
        emission.at_ms,
    ));
    if emission.is_final() {
        queue.push(Event::new(
            event_types::CURSOR_DONE,
            target,
            data,
            emission.at_ms,
        ));
    }
}
