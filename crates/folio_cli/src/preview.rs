//! Scripted page preview
//!
//! Mounts a page session, scrolls it from the top at a constant speed and
//! prints what changed on every frame. Stepped mode runs as fast as it can;
//! real-time mode paces frames with a tokio interval.

use crate::config::OutputFormat;
use anyhow::Result;
use folio_animation::Style;
use folio_core::events::{event_types, Event, EventData};
use folio_site::{Page, PageSession, SlotFrame};
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone)]
pub struct PreviewOptions {
    /// Pixels per second
    pub scroll_speed: f32,
    pub duration_ms: u64,
    pub fps: u32,
    pub format: OutputFormat,
    pub realtime: bool,
}

impl PreviewOptions {
    pub fn frame_ms(&self) -> u64 {
        (1000 / self.fps.max(1) as u64).max(1)
    }
}

/// One lifecycle event, resolved to its slot
#[derive(Debug, Serialize)]
pub struct EventRecord {
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    pub at_ms: u64,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

/// Everything that happened in one preview frame
#[derive(Debug, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time_ms: u64,
    pub scroll_y: f32,
    pub events: Vec<EventRecord>,
    /// Slots whose style or text changed since the previous frame
    pub changed: Vec<SlotFrame>,
}

/// Totals reported when the preview ends
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PreviewSummary {
    pub frames: u64,
    pub reveals: usize,
    pub pending_timers: usize,
}

pub struct Preview {
    session: PageSession,
    options: PreviewOptions,
    last: FxHashMap<String, (Style, String)>,
    frame: u64,
    reveals: usize,
    finished: bool,
}

impl Preview {
    pub fn new(page: Page, options: PreviewOptions) -> Self {
        Self {
            session: PageSession::mount(page),
            options,
            last: FxHashMap::default(),
            frame: 0,
            reveals: 0,
            finished: false,
        }
    }

    /// Run one frame of the script, or `None` once the duration has elapsed
    pub fn step(&mut self) -> Option<FrameRecord> {
        if self.finished {
            return None;
        }
        if self.frame > 0 {
            self.session.advance(self.options.frame_ms());
        }

        let now_ms = self.session.now_ms();
        self.session
            .scroll_to(self.options.scroll_speed * now_ms as f32 / 1000.0);

        let events: Vec<EventRecord> = self
            .session
            .take_events()
            .iter()
            .map(|event| self.record(event))
            .collect();
        self.reveals += events.iter().filter(|e| e.event == "reveal").count();

        let changed = self
            .session
            .frame()
            .slots
            .into_iter()
            .filter(|slot| slot.on_screen)
            .filter(|slot| {
                let current = (slot.style, slot.text.clone());
                self.last.insert(slot.id.clone(), current.clone()) != Some(current)
            })
            .collect();

        let record = FrameRecord {
            frame: self.frame,
            time_ms: now_ms,
            scroll_y: self.session.scroll_y(),
            events,
            changed,
        };
        self.frame += 1;
        self.finished = now_ms >= self.options.duration_ms;
        Some(record)
    }

    fn record(&self, event: &Event) -> EventRecord {
        let data = match event.data {
            EventData::Scroll { offset_y } => json!({ "offset_y": offset_y }),
            EventData::Resize { width, height } => json!({ "width": width, "height": height }),
            EventData::Visibility { ratio } => json!({ "ratio": ratio }),
            EventData::Cursor { position, length } => {
                json!({ "position": position, "length": length })
            }
            EventData::None => serde_json::Value::Null,
        };
        EventRecord {
            event: event.name(),
            slot: self.session.slot_id_of(event.target).map(str::to_string),
            at_ms: event.timestamp_ms,
            data,
        }
    }

    pub fn summary(&self) -> PreviewSummary {
        PreviewSummary {
            frames: self.frame,
            reveals: self.reveals,
            pending_timers: self.session.pending_timers(),
        }
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }
}

/// Run the preview to completion, writing frames to `out`
pub fn run(page: Page, options: &PreviewOptions, out: &mut impl Write) -> Result<PreviewSummary> {
    let mut preview = Preview::new(page, options.clone());
    tracing::info!(
        elements = preview.session().element_count(),
        frame_ms = options.frame_ms(),
        realtime = options.realtime,
        "Starting preview"
    );

    if options.realtime {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        runtime.block_on(async {
            let mut interval = tokio::time::interval(Duration::from_millis(options.frame_ms()));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let Some(record) = preview.step() else {
                    break;
                };
                write_record(out, &record, options.format)?;
                out.flush()?;
            }
            anyhow::Ok(())
        })?;
    } else {
        while let Some(record) = preview.step() {
            write_record(out, &record, options.format)?;
        }
    }

    let summary = preview.summary();
    if options.format == OutputFormat::Text {
        writeln!(
            out,
            "done: {} frames, {} reveals, {} pending timers",
            summary.frames, summary.reveals, summary.pending_timers
        )?;
    }
    Ok(summary)
}

fn write_record(out: &mut impl Write, record: &FrameRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_text(out, record)?,
    }
    Ok(())
}

fn write_text(out: &mut impl Write, record: &FrameRecord) -> std::io::Result<()> {
    if record.events.is_empty() && record.changed.is_empty() {
        return Ok(());
    }
    writeln!(
        out,
        "t={:>6}ms  scroll={:>7.1}px",
        record.time_ms, record.scroll_y
    )?;

    let mounts = record
        .events
        .iter()
        .filter(|e| e.event == event_types::name(event_types::MOUNT))
        .count();
    if mounts > 0 {
        writeln!(out, "  [mount] {mounts} elements")?;
    }
    let quiet = [event_types::MOUNT, event_types::SCROLL].map(event_types::name);
    for event in record.events.iter().filter(|e| !quiet.contains(&e.event)) {
        let slot = event.slot.as_deref().unwrap_or("page");
        if event.data.is_null() {
            writeln!(out, "  [{}] {}", event.event, slot)?;
        } else {
            writeln!(out, "  [{}] {} {}", event.event, slot, event.data)?;
        }
    }

    for slot in &record.changed {
        let style = &slot.style;
        write!(
            out,
            "  {:<24} opacity {:.2}  x {:>6.1}  y {:>6.1}  scale {:.2}  sx {:.2}  rot {:>5.1}",
            slot.id,
            style.opacity,
            style.offset_x,
            style.offset_y,
            style.scale,
            style.scale_x,
            style.rotate
        )?;
        if !slot.text.is_empty() {
            let first_line = slot.text.lines().next().unwrap_or_default();
            write!(out, "  {:?}", truncate(first_line, 32))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
