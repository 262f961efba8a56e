use crate::{Align, HeightModel, VisibleRange, WindowConfig};

/// Maps a scroll offset to the range of items that must be rendered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeFinder {
    min_viewport_floor: f64,
}

impl Default for RangeFinder {
    fn default() -> Self {
        Self::new(crate::DEFAULT_MIN_VIEWPORT_FLOOR)
    }
}

impl RangeFinder {
    /// Creates a finder that always covers at least `min_viewport_floor` pixels past the scroll
    /// offset, so a useful range exists before the viewport has been measured.
    pub fn new(min_viewport_floor: f64) -> Self {
        let min_viewport_floor = if min_viewport_floor.is_finite() {
            min_viewport_floor.max(0.0)
        } else {
            crate::DEFAULT_MIN_VIEWPORT_FLOOR
        };
        Self { min_viewport_floor }
    }

    pub fn from_config(config: &WindowConfig) -> Self {
        Self::new(config.min_viewport_floor)
    }

    pub fn min_viewport_floor(&self) -> f64 {
        self.min_viewport_floor
    }

    /// Computes the overscanned range to render.
    ///
    /// - `start` is the item containing `scroll_offset` (see [`HeightModel::index_at_offset`]).
    /// - `end` is the first index after `start` whose top reaches
    ///   `scroll_offset + max(viewport, floor)`. The span is measured from `scroll_offset`, not
    ///   from the top of `start`, so `offset_of(end)` is always at least
    ///   `min(scroll_offset + span, total_height)` and the rendered items cover the viewport
    ///   even when `start` begins well above the offset.
    /// - both ends are widened by `overscan` and clamped to `0..item_count`.
    ///
    /// `item_count` is clamped to `model.len()`. Returns an empty range for an empty list and a
    /// non-empty one otherwise.
    pub fn find_range(
        &self,
        model: &HeightModel,
        scroll_offset: f64,
        viewport_height: f64,
        item_count: usize,
        overscan: usize,
    ) -> VisibleRange {
        if item_count > model.len() {
            wwarn!(
                item_count,
                model_len = model.len(),
                "RangeFinder: item_count exceeds height model length"
            );
        }
        let count = item_count.min(model.len());
        if count == 0 {
            return VisibleRange::EMPTY;
        }

        let offset = if scroll_offset.is_finite() {
            scroll_offset.max(0.0)
        } else {
            0.0
        };
        let viewport = if viewport_height.is_finite() {
            viewport_height.max(0.0)
        } else {
            0.0
        };
        let span = viewport.max(self.min_viewport_floor);

        let start = model
            .index_at_offset(offset)
            .unwrap_or(0)
            .min(count - 1);
        let end = model
            .count_below(offset + span)
            .saturating_add(1)
            .max(start + 1)
            .min(count);

        let range = VisibleRange {
            start: start.saturating_sub(overscan),
            end: end.saturating_add(overscan).min(count),
        };
        wtrace!(
            offset,
            span,
            visible_start = start,
            visible_end = end,
            start = range.start,
            end = range.end,
            "RangeFinder::find_range"
        );
        range
    }

    /// Scroll offset that brings `index` into view with the given alignment.
    ///
    /// Returns `None` when `index` is out of range. The result is never negative; clamping to
    /// the maximum scroll offset is left to the scroll container.
    pub fn offset_for_index(
        &self,
        model: &HeightModel,
        index: usize,
        align: Align,
        viewport_height: f64,
        current_offset: f64,
    ) -> Option<f64> {
        if index >= model.len() {
            return None;
        }
        let start = model.offset_of(index);
        let end = start + model.get(index);
        let view = if viewport_height.is_finite() {
            viewport_height.max(0.0)
        } else {
            0.0
        };

        let target = match align {
            Align::Start => start,
            Align::End => end - view,
            Align::Center => start + (end - start) / 2.0 - view / 2.0,
            Align::Auto => {
                let cur_end = current_offset + view;
                if start >= current_offset && end <= cur_end {
                    current_offset
                } else if start < current_offset {
                    start
                } else {
                    end - view
                }
            }
        };
        Some(target.max(0.0))
    }
}
