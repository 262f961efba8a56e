/// Estimated height used for unmeasured items before any sample has been recorded.
pub const DEFAULT_ITEM_HEIGHT: f64 = 50.0;
/// Overscan applied on both sides of the visible range.
pub const DEFAULT_OVERSCAN: usize = 8;
/// Minimum span (in pixels) the range must cover, even before the viewport is measured.
pub const DEFAULT_MIN_VIEWPORT_FLOOR: f64 = 800.0;

/// Configuration shared by [`crate::HeightModel`] and [`crate::RangeFinder`].
///
/// This is plain data: it is cheap to clone and, with `feature = "serde"`, can be loaded from
/// whatever configuration format the host uses.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WindowConfig {
    /// Fixed item height. When set, estimation is disabled: every item reports this height and
    /// measurements are not recorded.
    pub item_height: Option<f64>,
    /// Initial estimate for unmeasured items (also the value restored by `reset`).
    pub default_item_height: f64,
    /// Extra items rendered before and after the visible range.
    pub overscan: usize,
    /// Lower bound on the span the visible range must cover.
    pub min_viewport_floor: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            item_height: None,
            default_item_height: DEFAULT_ITEM_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            min_viewport_floor: DEFAULT_MIN_VIEWPORT_FLOOR,
        }
    }
}

impl WindowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item_height(mut self, item_height: Option<f64>) -> Self {
        self.item_height = item_height;
        self
    }

    pub fn with_default_item_height(mut self, default_item_height: f64) -> Self {
        self.default_item_height = default_item_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_min_viewport_floor(mut self, min_viewport_floor: f64) -> Self {
        self.min_viewport_floor = min_viewport_floor;
        self
    }

    /// Returns a copy with every non-finite or negative value replaced by its default.
    ///
    /// A fixed item height that is not a finite, non-negative number is dropped (estimation is
    /// used instead).
    pub fn sanitized(self) -> Self {
        let item_height = self.item_height.filter(|h| is_valid_extent(*h));
        if self.item_height.is_some() && item_height.is_none() {
            wwarn!(item_height = ?self.item_height, "WindowConfig: ignoring invalid item_height");
        }
        Self {
            item_height,
            default_item_height: valid_or(self.default_item_height, DEFAULT_ITEM_HEIGHT),
            overscan: self.overscan,
            min_viewport_floor: valid_or(self.min_viewport_floor, DEFAULT_MIN_VIEWPORT_FLOOR),
        }
    }
}

pub(crate) fn is_valid_extent(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn valid_or(v: f64, default: f64) -> f64 {
    if is_valid_extent(v) { v } else { default }
}
