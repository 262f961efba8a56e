use crate::{HeightModel, Padding, VisibleRange};

/// Computes the spacers that keep the scrollable height correct around a rendered range.
///
/// `top` is the estimated height of `0..range.start` and `bottom` the estimated height of
/// `range.end..item_count`. Both are read from the model's prefix sums, so this is
/// `O(log n)` and always consistent with [`HeightModel::total_height`].
pub fn compute_padding(model: &HeightModel, range: VisibleRange, item_count: usize) -> Padding {
    let count = item_count.min(model.len());
    if count == 0 {
        return Padding::ZERO;
    }
    let start = range.start.min(count);
    let end = range.end.clamp(start, count);

    let top = model.offset_of(start);
    let bottom = (model.offset_of(count) - model.offset_of(end)).max(0.0);
    Padding { top, bottom }
}
