use alloc::sync::Arc;

use windowing::{Padding, VisibleRange, WindowConfig};

/// Default scroll throttle cadence (about 144 Hz).
pub const DEFAULT_THROTTLE_INTERVAL_MS: u64 = 7;
/// Paint-ready signals to wait for before trusting measured sizes (layout, then paint).
pub const DEFAULT_FRAMES_BEFORE_MEASURE: u8 = 2;

/// Observer fired with every scroll offset the host reports. Side effects only.
pub type OnScrollCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Render sink fired whenever the visible range or the padding changes.
pub type OnChangeCallback = Arc<dyn Fn(VisibleRange, Padding) + Send + Sync>;

/// Configuration for [`crate::WindowController`].
///
/// Callbacks are stored in `Arc`s so the options stay cheap to clone.
#[derive(Clone)]
pub struct ControllerOptions {
    pub config: WindowConfig,
    pub throttle_interval_ms: u64,
    pub frames_before_measure: u8,
    pub on_scroll: Option<OnScrollCallback>,
    pub on_change: Option<OnChangeCallback>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            config: WindowConfig::default(),
            throttle_interval_ms: DEFAULT_THROTTLE_INTERVAL_MS,
            frames_before_measure: DEFAULT_FRAMES_BEFORE_MEASURE,
            on_scroll: None,
            on_change: None,
        }
    }
}

impl ControllerOptions {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_item_height(mut self, item_height: Option<f64>) -> Self {
        self.config.item_height = item_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.config.overscan = overscan;
        self
    }

    pub fn with_min_viewport_floor(mut self, min_viewport_floor: f64) -> Self {
        self.config.min_viewport_floor = min_viewport_floor;
        self
    }

    pub fn with_throttle_interval_ms(mut self, interval_ms: u64) -> Self {
        self.throttle_interval_ms = interval_ms;
        self
    }

    pub fn with_frames_before_measure(mut self, frames: u8) -> Self {
        self.frames_before_measure = frames;
        self
    }

    pub fn with_on_scroll(
        mut self,
        on_scroll: Option<impl Fn(f64) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scroll = on_scroll.map(|f| Arc::new(f) as OnScrollCallback);
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(VisibleRange, Padding) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as OnChangeCallback);
        self
    }
}

impl core::fmt::Debug for ControllerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControllerOptions")
            .field("config", &self.config)
            .field("throttle_interval_ms", &self.throttle_interval_ms)
            .field("frames_before_measure", &self.frames_before_measure)
            .field("on_scroll", &self.on_scroll.is_some())
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
