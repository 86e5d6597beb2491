//! Reader session state
//!
//! [`ReaderSession`] is the single owner of everything the reader derives:
//!
//! ```text
//! host rect ──(150ms debounce, 5px hysteresis)──▶ viewport ─┐
//! column mode ──────────────────────────────────────────────┼─▶ geometry ─┐
//! font size / line height ──────────────────────────────────┤             │
//! content ──────────────────────────────────────────────────┴─▶ (100ms settle) ─▶ flow ─▶ navigator ─▶ motion
//! ```
//!
//! Every edge into the flow estimator goes through [`ReaderSession::invalidate`],
//! which clears the pinned width, bumps the layout epoch and re-schedules the
//! settle task. A measurement is only applied to the navigator if it was taken
//! for the current epoch.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::flow::{FlowError, FlowEstimator, FlowMeasurement, FlowPass, FlowRequest, LayoutOracle};
use super::geometry::{compute_geometry, ColumnGeometry};
use super::input::{command_for_key, Key, ReaderCommand, SwipeTracker};
use super::motion::SpringMotion;
use super::navigator::{PageNavigator, PageState};
use super::scheduler::DeferredTask;
use super::typography::{ColumnMode, Theme, Typography};
use super::viewport::{HostRect, Viewport, ViewportMeasurer};
use crate::bookmarks::BookmarkSet;

/// Upper bound on turns [`ReaderSession::drain`] will run
pub const MAX_DRAIN_TURNS: usize = 16;

/// Delays between a trigger and the measurement it causes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    pub resize_debounce: Duration,
    pub settle_delay: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            resize_debounce: Duration::from_millis(150),
            settle_delay: Duration::from_millis(100),
        }
    }
}

/// Document being read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub title: String,
    pub paragraphs: Vec<String>,
}

/// What a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Unchanged,
    PageChanged(u32),
    Bookmark { page: u32, added: bool },
    CloseRequested,
}

pub struct ReaderSession {
    measurer: ViewportMeasurer,
    column_mode: ColumnMode,
    typography: Typography,
    theme: Theme,
    content: Option<Content>,
    geometry: Option<ColumnGeometry>,
    flow: FlowEstimator,
    epoch: u64,
    resize: DeferredTask<HostRect>,
    settle: DeferredTask<u64>,
    navigator: PageNavigator,
    motion: SpringMotion,
    swipe: SwipeTracker,
    bookmarks: BookmarkSet,
}

impl Default for ReaderSession {
    fn default() -> Self {
        Self::new(SessionTimings::default())
    }
}

impl ReaderSession {
    pub fn new(timings: SessionTimings) -> Self {
        Self {
            measurer: ViewportMeasurer::new(),
            column_mode: ColumnMode::Auto,
            typography: Typography::default(),
            theme: Theme::default(),
            content: None,
            geometry: None,
            flow: FlowEstimator::new(),
            epoch: 0,
            resize: DeferredTask::new(timings.resize_debounce),
            settle: DeferredTask::new(timings.settle_delay),
            navigator: PageNavigator::new(),
            motion: SpringMotion::default(),
            swipe: SwipeTracker::new(),
            bookmarks: BookmarkSet::new(),
        }
    }

    // Inputs

    /// Measure the host surface immediately, as on first display
    pub fn mount(&mut self, rect: HostRect, now: Instant) {
        self.apply_host_rect(rect, now);
    }

    /// Record a resize event. Width changes inside the hysteresis band are
    /// dropped, along with any re-measure still pending from an earlier
    /// event; others (re)start the debounce. Returns whether a re-measure
    /// was scheduled.
    pub fn on_resize(&mut self, rect: HostRect, now: Instant) -> bool {
        if !self.measurer.gate().should_remeasure(rect.width) {
            if self.resize.cancel() {
                tracing::debug!(
                    "Width {} is back within range of {:?}, dropping pending resize",
                    rect.width,
                    self.measurer.gate().last_width()
                );
            }
            return false;
        }
        self.resize.schedule(now, rect);
        true
    }

    pub fn set_font_size(&mut self, font_size: u32, now: Instant) {
        let typography = self.typography.with_font_size(font_size);
        if typography != self.typography {
            self.typography = typography;
            self.invalidate(now, "font size");
        }
    }

    pub fn set_line_height(&mut self, line_height: f32, now: Instant) {
        let typography = self.typography.with_line_height(line_height);
        if typography != self.typography {
            self.typography = typography;
            self.invalidate(now, "line height");
        }
    }

    pub fn set_column_mode(&mut self, mode: ColumnMode, now: Instant) {
        if mode == self.column_mode {
            return;
        }
        self.column_mode = mode;
        self.recompute_geometry();
        self.invalidate(now, "column mode");
    }

    /// Theme is presentation only; layout is untouched
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn replace_content(&mut self, title: impl Into<String>, paragraphs: Vec<String>, now: Instant) {
        let content = Content {
            title: title.into(),
            paragraphs,
        };
        if self.content.as_ref() == Some(&content) {
            return;
        }
        self.content = Some(content);
        self.invalidate(now, "content");
    }

    pub fn set_bookmarks(&mut self, bookmarks: BookmarkSet) {
        self.bookmarks = bookmarks;
    }

    // Derivation

    fn apply_host_rect(&mut self, rect: HostRect, now: Instant) {
        match self.measurer.measure(rect) {
            Ok(changed) => {
                if changed || self.geometry.is_none() {
                    self.recompute_geometry();
                    self.invalidate(now, "viewport");
                }
            }
            Err(e) => tracing::debug!("Viewport not ready: {}", e),
        }
    }

    fn recompute_geometry(&mut self) {
        self.geometry = self.measurer.viewport().map(|viewport| {
            let two_column = self.column_mode.resolve(viewport.is_two_column);
            compute_geometry(&viewport.with_two_column(two_column))
        });
    }

    /// Throw away the current flow measurement and schedule a new one
    fn invalidate(&mut self, now: Instant, reason: &str) {
        self.flow.invalidate();
        self.epoch += 1;
        self.settle.schedule(now, self.epoch);
        tracing::debug!("Layout invalidated by {} (epoch {})", reason, self.epoch);
    }

    /// Run whatever deferred work is due at `now`.
    ///
    /// Returns the measurement applied on this turn, if any.
    pub fn poll<O: LayoutOracle + ?Sized>(
        &mut self,
        now: Instant,
        oracle: &mut O,
    ) -> Option<FlowMeasurement> {
        // Viewport first, so a pending resize invalidates before any flow
        // measurement can be taken against the old geometry.
        if let Some(rect) = self.resize.take_ready(now) {
            self.apply_host_rect(rect, now);
        }

        let epoch = self.settle.take_ready(now)?;
        if epoch != self.epoch {
            tracing::debug!("Dropping settle for stale epoch {}", epoch);
            return None;
        }

        let (Some(geometry), Some(content)) = (self.geometry, self.content.as_ref()) else {
            tracing::debug!("Layout waiting for viewport and content");
            return None;
        };

        let request = FlowRequest {
            title: &content.title,
            paragraphs: &content.paragraphs,
            typography: self.typography,
            column_width: geometry.column_width,
            column_height: geometry.column_height,
            gap: geometry.gap,
            container_width: None,
        };

        match self.flow.step(oracle, request, &geometry) {
            Ok(measurement) => {
                self.navigator
                    .set_layout(measurement.total_pages, measurement.stride);
                self.motion
                    .retarget(self.navigator.offset(), self.navigator.offset_bounds());
                if measurement.pass == FlowPass::Estimate {
                    // Pinning changed the container; verify on the next turn
                    self.settle.schedule(now, self.epoch);
                }
                Some(measurement)
            }
            Err(FlowError::NotSettled) => {
                tracing::debug!("Renderer not settled, retrying measurement");
                self.settle.schedule(now, self.epoch);
                None
            }
            Err(e) => {
                tracing::debug!("Deferring layout: {}", e);
                None
            }
        }
    }

    /// Earliest deadline among pending deferred tasks
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.resize.deadline(), self.settle.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Step through every pending deadline, as if the event loop ran idle.
    ///
    /// Returns the time reached.
    pub fn drain<O: LayoutOracle + ?Sized>(&mut self, now: Instant, oracle: &mut O) -> Instant {
        let mut now = now;
        for _ in 0..MAX_DRAIN_TURNS {
            let Some(deadline) = self.next_deadline() else {
                break;
            };
            now = now.max(deadline);
            self.poll(now, oracle);
        }
        now
    }

    // Navigation

    pub fn handle(&mut self, command: ReaderCommand) -> CommandOutcome {
        let changed = match command {
            ReaderCommand::Next => self.navigator.next(),
            ReaderCommand::Prev => self.navigator.prev(),
            ReaderCommand::Goto(page) => self.navigator.goto(page),
            ReaderCommand::ToggleBookmark => {
                let page = self.navigator.current_page();
                let added = self.bookmarks.toggle(page);
                return CommandOutcome::Bookmark { page, added };
            }
            ReaderCommand::Close => return CommandOutcome::CloseRequested,
        };

        if !changed {
            return CommandOutcome::Unchanged;
        }
        self.motion
            .retarget(self.navigator.offset(), self.navigator.offset_bounds());
        CommandOutcome::PageChanged(self.navigator.current_page())
    }

    pub fn handle_key(&mut self, key: Key) -> CommandOutcome {
        match command_for_key(key) {
            Some(command) => self.handle(command),
            None => CommandOutcome::Unchanged,
        }
    }

    pub fn touch_start(&mut self, x: f64) {
        self.swipe.touch_start(x);
    }

    pub fn touch_move(&mut self, x: f64) {
        self.swipe.touch_move(x);
    }

    pub fn touch_end(&mut self) -> CommandOutcome {
        match self.swipe.touch_end() {
            Some(command) => self.handle(command),
            None => CommandOutcome::Unchanged,
        }
    }

    /// Step the slide animation by `dt` seconds
    pub fn advance_motion(&mut self, dt: f64) -> f64 {
        self.motion.advance(dt)
    }

    // Queries

    /// Ready once a viewport has been measured and content is loaded
    pub fn is_ready(&self) -> bool {
        self.measurer.is_ready() && self.content.is_some()
    }

    /// Nothing pending and the current layout has been verified
    pub fn is_settled(&self) -> bool {
        !self.resize.is_pending()
            && !self.settle.is_pending()
            && self
                .flow
                .last_measurement()
                .is_some_and(|m| m.pass.is_verified())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.measurer.viewport()
    }

    pub fn geometry(&self) -> Option<ColumnGeometry> {
        self.geometry
    }

    pub fn typography(&self) -> Typography {
        self.typography
    }

    pub fn measurement(&self) -> Option<&FlowMeasurement> {
        self.flow.last_measurement()
    }

    pub fn pinned_container_width(&self) -> Option<u32> {
        self.flow.pinned_width()
    }

    pub fn navigator(&self) -> &PageNavigator {
        &self.navigator
    }

    pub fn motion(&self) -> &SpringMotion {
        &self.motion
    }

    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.bookmarks
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        ReaderSnapshot {
            ready: self.is_ready(),
            settled: self.is_settled(),
            viewport: self.viewport(),
            geometry: self.geometry,
            typography: self.typography,
            theme: self.theme,
            column_mode: self.column_mode,
            measurement: self.flow.last_measurement().copied(),
            page: self.navigator.state(),
            bookmarks: self.bookmarks.pages().to_vec(),
            bookmarked: self.bookmarks.contains(self.navigator.current_page()),
        }
    }
}

/// Serializable picture of a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderSnapshot {
    pub ready: bool,
    pub settled: bool,
    pub viewport: Option<Viewport>,
    pub geometry: Option<ColumnGeometry>,
    pub typography: Typography,
    pub theme: Theme,
    pub column_mode: ColumnMode,
    pub measurement: Option<FlowMeasurement>,
    pub page: PageState,
    pub bookmarks: Vec<u32>,
    pub bookmarked: bool,
}
