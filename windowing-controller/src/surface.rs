/// How an imperative scroll command should be carried out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollBehavior {
    #[default]
    Instant,
    Smooth,
}

/// The scroll container (viewport) of a list.
///
/// Reports the current offset and viewport size, and accepts imperative scroll commands. The
/// container is responsible for clamping offsets to its scrollable range.
pub trait ScrollSource {
    fn scroll_offset(&self) -> f64;

    /// Viewport height, or `None` before the container has been laid out.
    fn viewport_height(&self) -> Option<f64>;

    fn scroll_to(&mut self, offset: f64, behavior: ScrollBehavior);
}

/// The content surface that hosts the rendered items.
pub trait MeasurementSurface {
    /// Whether the surface is still mounted. A disconnected surface aborts the running cycle.
    fn is_connected(&self) -> bool {
        true
    }

    /// Rendered height of `index`, or `None` if that item is not currently rendered.
    fn measure(&self, index: usize) -> Option<f64>;
}
