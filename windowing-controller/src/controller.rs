use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use windowing::{
    Align, HeightModel, Padding, RangeFinder, VisibleRange, WindowConfig, compute_padding,
};

use crate::{
    ControllerOptions, CycleAbort, MeasurementSurface, ScrollBehavior, ScrollSource, Throttle,
};

/// Where the controller is in its measure/recompute cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing pending.
    Idle,
    /// A cycle is queued and waits for `frames_remaining` more paint-ready signals.
    Scheduled { frames_remaining: u8 },
    /// Reading rendered sizes from the content surface.
    Measuring,
    /// Running the range finder and padding calculator.
    Recomputing,
    /// Torn down; every event is ignored.
    Destroyed,
}

/// What a call to [`WindowController::on_frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No cycle was pending.
    Idle,
    /// A cycle is pending and waits for more frames.
    Waiting,
    /// A cycle measured and recomputed. `changed` reports whether the range or padding moved.
    Completed { changed: bool },
    /// The cycle was dropped; the controller is back to idle (or destroyed).
    Skipped(CycleAbort),
}

/// Options for [`WindowController::scroll_to_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollToOptions {
    pub align: Align,
    pub behavior: ScrollBehavior,
}

/// An item in the rendered window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleItem<'a, T> {
    pub index: usize,
    pub data: &'a T,
}

/// Drives the windowing engine for one mounted list.
///
/// This type does not hold any UI objects beyond the two collaborator handles. Hosts drive it
/// by calling:
/// - `on_scroll` / `on_resize` / `set_items` when UI or data events occur
/// - `on_commit` after rendering the current window
/// - `on_frame(now_ms)` on every paint-ready signal while `wants_frame()` is true
///
/// Measurement always happens inside `on_frame`, after `frames_before_measure` signals, so the
/// sizes it reads come from a settled layout.
pub struct WindowController<T> {
    options: ControllerOptions,
    items: Arc<[T]>,
    heights: HeightModel,
    finder: RangeFinder,

    viewport: Option<Box<dyn ScrollSource>>,
    content: Option<Box<dyn MeasurementSurface>>,

    phase: Phase,
    throttle: Throttle,
    scroll_offset: f64,
    viewport_height: Option<f64>,

    range: VisibleRange,
    padding: Padding,
    measured_range: Option<VisibleRange>,
}

impl<T> WindowController<T> {
    /// Creates a controller and runs the bootstrap pass.
    ///
    /// The viewport size is unknown at this point, so the first range covers the configured
    /// floor from offset `0`. Attaching the viewport schedules the second pass.
    pub fn new(items: Arc<[T]>, options: ControllerOptions) -> Self {
        let config = options.config.sanitized();
        let options = ControllerOptions { config, ..options };
        wdebug!(
            len = items.len(),
            overscan = config.overscan,
            throttle_interval_ms = options.throttle_interval_ms,
            "WindowController::new"
        );
        let mut c = Self {
            heights: HeightModel::from_config(items.len(), &config),
            finder: RangeFinder::from_config(&config),
            throttle: Throttle::new(options.throttle_interval_ms),
            options,
            items,
            viewport: None,
            content: None,
            phase: Phase::Idle,
            scroll_offset: 0.0,
            viewport_height: None,
            range: VisibleRange::EMPTY,
            padding: Padding::ZERO,
            measured_range: None,
        };
        c.recompute();
        c
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn config(&self) -> &WindowConfig {
        &self.options.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_destroyed(&self) -> bool {
        self.phase == Phase::Destroyed
    }

    /// Whether the host should deliver another paint-ready signal.
    pub fn wants_frame(&self) -> bool {
        match self.phase {
            Phase::Scheduled { .. } => true,
            Phase::Destroyed => false,
            _ => self.throttle.is_pending(),
        }
    }

    pub fn items(&self) -> &Arc<[T]> {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn height_model(&self) -> &HeightModel {
        &self.heights
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.range
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn padding_top(&self) -> f64 {
        self.padding.top
    }

    pub fn padding_bottom(&self) -> f64 {
        self.padding.bottom
    }

    /// Estimated height of the whole list.
    pub fn total_height(&self) -> f64 {
        self.heights.total_height()
    }

    /// Last scroll offset the controller observed.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Iterates over the items in the current window.
    pub fn visible_items(&self) -> impl Iterator<Item = VisibleItem<'_, T>> + '_ {
        let items = &self.items;
        self.range.iter().filter_map(move |index| {
            items.get(index).map(|data| VisibleItem { index, data })
        })
    }

    /// Collects the current window into `out` (clears `out` first).
    pub fn collect_visible_items<'a>(&'a self, out: &mut Vec<VisibleItem<'a, T>>) {
        out.clear();
        out.extend(self.visible_items());
    }

    /// Attaches the scroll container and schedules a pass with the real viewport size.
    pub fn attach_viewport(&mut self, source: impl ScrollSource + 'static) {
        if self.is_destroyed() {
            return;
        }
        self.scroll_offset = sanitize_offset(source.scroll_offset());
        self.viewport = Some(Box::new(source));
        wdebug!(offset = self.scroll_offset, "attach_viewport");
        self.schedule();
    }

    pub fn detach_viewport(&mut self) {
        self.viewport = None;
    }

    /// Attaches the surface that hosts rendered items and schedules a measurement pass.
    pub fn attach_content(&mut self, surface: impl MeasurementSurface + 'static) {
        if self.is_destroyed() {
            return;
        }
        self.content = Some(Box::new(surface));
        wdebug!("attach_content");
        self.schedule();
    }

    pub fn detach_content(&mut self) {
        self.content = None;
        self.measured_range = None;
    }

    /// Binds a new data source.
    ///
    /// Returns `false` when `items` is the same collection (same allocation and length) as the
    /// current one. Otherwise every measurement is dropped, the window is recomputed right away
    /// so it never points past the new end, and a measurement pass is scheduled.
    pub fn set_items(&mut self, items: Arc<[T]>) -> bool {
        if self.is_destroyed() {
            return false;
        }
        if Arc::ptr_eq(&self.items, &items) && self.items.len() == items.len() {
            return false;
        }
        wdebug!(
            prev_len = self.items.len(),
            len = items.len(),
            "set_items: data source changed"
        );
        self.heights.reset_with_len(items.len());
        self.items = items;
        self.measured_range = None;
        self.recompute();
        self.schedule();
        true
    }

    /// Reports a scroll event from the host.
    ///
    /// The observer callback sees every offset; recomputes are throttled to one per interval.
    pub fn on_scroll(&mut self, offset: f64, now_ms: u64) {
        if self.is_destroyed() {
            return;
        }
        let offset = sanitize_offset(offset);
        self.scroll_offset = offset;
        if let Some(cb) = &self.options.on_scroll {
            cb(offset);
        }
        if self.throttle.hit(now_ms) {
            wtrace!(offset, now_ms, "on_scroll: scheduling");
            self.schedule();
        } else {
            wtrace!(offset, now_ms, "on_scroll: throttled");
        }
    }

    /// Reports a viewport resize.
    pub fn on_resize(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.schedule();
    }

    /// Reports that the host finished rendering the current window.
    ///
    /// Schedules a measurement pass only if this window has not been measured yet, so a stable
    /// window does not keep the controller busy.
    pub fn on_commit(&mut self) {
        if self.is_destroyed() || self.content.is_none() {
            return;
        }
        if self.measured_range != Some(self.range) {
            wtrace!(
                start = self.range.start,
                end = self.range.end,
                "on_commit: new window"
            );
            self.schedule();
        }
    }

    /// Delivers one paint-ready signal.
    pub fn on_frame(&mut self, now_ms: u64) -> CycleOutcome {
        if self.is_destroyed() {
            return CycleOutcome::Skipped(CycleAbort::Destroyed);
        }

        if self.throttle.poll(now_ms) && self.phase == Phase::Idle {
            wtrace!(now_ms, "on_frame: trailing scroll released");
            self.schedule();
            return CycleOutcome::Waiting;
        }

        match self.phase {
            Phase::Scheduled { frames_remaining } if frames_remaining > 1 => {
                self.phase = Phase::Scheduled {
                    frames_remaining: frames_remaining - 1,
                };
                CycleOutcome::Waiting
            }
            Phase::Scheduled { .. } => match self.run_cycle() {
                Ok(changed) => {
                    self.phase = Phase::Idle;
                    CycleOutcome::Completed { changed }
                }
                Err(abort) => {
                    wdebug!(%abort, "cycle skipped");
                    self.phase = Phase::Idle;
                    CycleOutcome::Skipped(abort)
                }
            },
            _ => CycleOutcome::Idle,
        }
    }

    /// Scrolls so that `index` starts at the top of the viewport.
    ///
    /// Returns the offset sent to the scroll container, or `None` when `index` is out of range
    /// or no viewport is attached.
    pub fn scroll_to(&mut self, index: usize) -> Option<f64> {
        self.scroll_to_with(index, ScrollToOptions::default())
    }

    pub fn scroll_to_with(&mut self, index: usize, opts: ScrollToOptions) -> Option<f64> {
        if self.is_destroyed() {
            return None;
        }
        if index >= self.items.len() {
            wdebug!(index, len = self.items.len(), "scroll_to: index out of range");
            return None;
        }
        let viewport_height = self.viewport.as_ref()?.viewport_height();
        let target = self.finder.offset_for_index(
            &self.heights,
            index,
            opts.align,
            viewport_height.unwrap_or(0.0),
            self.scroll_offset,
        )?;
        self.scroll_to_offset(target, opts.behavior)
    }

    /// Sends an imperative scroll command. Negative or non-finite offsets are clamped to `0`.
    pub fn scroll_to_offset(&mut self, offset: f64, behavior: ScrollBehavior) -> Option<f64> {
        if self.is_destroyed() {
            return None;
        }
        let offset = sanitize_offset(offset);
        let source = self.viewport.as_mut()?;
        wdebug!(offset, ?behavior, "scroll_to_offset");
        source.scroll_to(offset, behavior);
        self.schedule();
        Some(offset)
    }

    /// Releases both surfaces and cancels any pending cycle. Every later call is a no-op.
    pub fn teardown(&mut self) {
        if self.is_destroyed() {
            return;
        }
        wdebug!("teardown");
        self.phase = Phase::Destroyed;
        self.viewport = None;
        self.content = None;
        self.measured_range = None;
        self.throttle.reset();
    }

    fn schedule(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Scheduled {
                frames_remaining: self.options.frames_before_measure,
            };
        }
    }

    /// Measures the rendered window, then recomputes.
    ///
    /// Everything is read before anything is written, so an abort leaves the controller exactly
    /// as it was.
    fn run_cycle(&mut self) -> Result<bool, CycleAbort> {
        self.phase = Phase::Measuring;
        let viewport = self.viewport.as_ref().ok_or(CycleAbort::ViewportDetached)?;
        let content = self.content.as_ref().ok_or(CycleAbort::ContentDetached)?;
        if !content.is_connected() {
            return Err(CycleAbort::Disconnected);
        }

        let scroll_offset = sanitize_offset(viewport.scroll_offset());
        let viewport_height = viewport.viewport_height();
        let window = self.range;
        let measurements: Vec<(usize, f64)> = window
            .iter()
            .filter_map(|i| content.measure(i).map(|h| (i, h)))
            .collect();
        if !content.is_connected() {
            return Err(CycleAbort::Disconnected);
        }

        self.phase = Phase::Recomputing;
        wtrace!(
            start = window.start,
            end = window.end,
            measured = measurements.len(),
            "run_cycle: measured window"
        );
        self.heights.record_many(measurements);
        self.measured_range = Some(window);
        self.scroll_offset = scroll_offset;
        self.viewport_height = viewport_height;
        Ok(self.recompute())
    }

    fn recompute(&mut self) -> bool {
        let count = self.items.len();
        let range = self.finder.find_range(
            &self.heights,
            self.scroll_offset,
            self.viewport_height.unwrap_or(0.0),
            count,
            self.options.config.overscan,
        );
        let padding = compute_padding(&self.heights, range, count);
        let changed = range != self.range || padding != self.padding;
        self.range = range;
        self.padding = padding;
        if changed {
            wtrace!(
                start = range.start,
                end = range.end,
                top = padding.top,
                bottom = padding.bottom,
                "recompute: window changed"
            );
            if let Some(cb) = &self.options.on_change {
                cb(range, padding);
            }
        }
        changed
    }
}

impl<T> core::fmt::Debug for WindowController<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowController")
            .field("options", &self.options)
            .field("len", &self.items.len())
            .field("phase", &self.phase)
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport_height", &self.viewport_height)
            .field("range", &self.range)
            .field("padding", &self.padding)
            .field("viewport_attached", &self.viewport.is_some())
            .field("content_attached", &self.content.is_some())
            .finish_non_exhaustive()
    }
}

fn sanitize_offset(offset: f64) -> f64 {
    if offset.is_finite() { offset.max(0.0) } else { 0.0 }
}
