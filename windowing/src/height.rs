use alloc::vec::Vec;

use crate::HeightSnapshot;
use crate::WindowConfig;
use crate::fenwick::Fenwick;
use crate::options::is_valid_extent;

/// Largest smoothing factor used once the first sample has been taken.
const MAX_ALPHA: f64 = 0.1;

/// Best current estimate of every item's height.
///
/// Measured items report their last measurement. Unmeasured items report the fixed item height
/// when one is configured, otherwise a running average of all measurements (an exponential
/// moving average whose smoothing factor shrinks as samples accumulate).
///
/// Offsets are answered from prefix sums over the measured entries, so `offset_of`,
/// `total_height` and `index_at_offset` run in `O(log n)` and an average update is `O(1)`.
#[derive(Clone, Debug)]
pub struct HeightModel {
    entries: Vec<Option<f64>>,
    sums: Fenwick,
    average_height: f64,
    sample_count: u64,
    fixed_height: Option<f64>,
    default_height: f64,
}

impl HeightModel {
    /// Creates a model for `len` items.
    ///
    /// `fixed_height` disables estimation entirely. `default_height` seeds the average before the
    /// first measurement and is restored by [`Self::reset`].
    pub fn new(len: usize, fixed_height: Option<f64>, default_height: f64) -> Self {
        let fixed_height = fixed_height.filter(|h| is_valid_extent(*h));
        let default_height = if is_valid_extent(default_height) {
            default_height
        } else {
            crate::DEFAULT_ITEM_HEIGHT
        };
        wdebug!(len, ?fixed_height, default_height, "HeightModel::new");
        Self {
            entries: alloc::vec![None; len],
            sums: Fenwick::new(len),
            average_height: fixed_height.unwrap_or(default_height),
            sample_count: 0,
            fixed_height,
            default_height,
        }
    }

    pub fn from_config(len: usize, config: &WindowConfig) -> Self {
        Self::new(len, config.item_height, config.default_item_height)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fixed_height(&self) -> Option<f64> {
        self.fixed_height
    }

    pub fn average_height(&self) -> f64 {
        self.average_height
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Number of distinct indexes that currently hold a measurement.
    pub fn measured_count(&self) -> usize {
        self.sums.measured_count()
    }

    pub fn is_measured(&self, index: usize) -> bool {
        matches!(self.entries.get(index), Some(Some(_)))
    }

    /// Height used for items that have no measurement.
    pub fn fallback_height(&self) -> f64 {
        self.fixed_height.unwrap_or(self.average_height)
    }

    /// Returns the best estimate for `index`.
    pub fn get(&self, index: usize) -> f64 {
        if let Some(fixed) = self.fixed_height {
            return fixed;
        }
        match self.entries.get(index) {
            Some(Some(h)) => *h,
            _ => self.average_height,
        }
    }

    /// Records a measurement for `index`.
    ///
    /// With a fixed height configured this does nothing. Negative or non-finite heights and
    /// out-of-range indexes are ignored.
    pub fn record(&mut self, index: usize, measured: f64) {
        if self.fixed_height.is_some() {
            return;
        }
        if !is_valid_extent(measured) {
            wwarn!(index, measured, "HeightModel::record: ignoring invalid height");
            return;
        }
        let Some(slot) = self.entries.get_mut(index) else {
            wwarn!(
                index,
                len = self.entries.len(),
                "HeightModel::record: out-of-bounds index"
            );
            return;
        };

        let prev = slot.replace(measured);
        match prev {
            Some(old) if old == measured => {}
            Some(old) => self.sums.add(index, measured - old, false),
            None => self.sums.add(index, measured, true),
        }

        if self.sample_count == 0 {
            self.average_height = measured;
        } else {
            let alpha = MAX_ALPHA.min(1.0 / self.sample_count as f64);
            self.average_height += alpha * (measured - self.average_height);
        }
        self.sample_count = self.sample_count.saturating_add(1);
        wtrace!(
            index,
            measured,
            average = self.average_height,
            samples = self.sample_count,
            "HeightModel::record"
        );
    }

    /// Records several measurements in order.
    pub fn record_many(&mut self, measurements: impl IntoIterator<Item = (usize, f64)>) {
        for (index, measured) in measurements {
            self.record(index, measured);
        }
    }

    /// Forgets every measurement and restores the initial estimate.
    pub fn reset(&mut self) {
        let len = self.entries.len();
        self.reset_with_len(len);
    }

    /// Like [`Self::reset`], but also changes the number of tracked items.
    pub fn reset_with_len(&mut self, len: usize) {
        wdebug!(
            len,
            prev_len = self.entries.len(),
            measured = self.sums.measured_count(),
            "HeightModel::reset"
        );
        self.entries.clear();
        self.entries.resize(len, None);
        self.sums = Fenwick::new(len);
        self.sample_count = 0;
        self.average_height = self.fixed_height.unwrap_or(self.default_height);
    }

    /// Estimated distance from the top of the list to the top of `index`.
    ///
    /// Indexes past the end return the total height.
    pub fn offset_of(&self, index: usize) -> f64 {
        self.sums.prefix_height(index, self.fallback_height())
    }

    /// Estimated height of the items in `start..end`.
    pub fn height_between(&self, start: usize, end: usize) -> f64 {
        if end <= start {
            return 0.0;
        }
        (self.offset_of(end) - self.offset_of(start)).max(0.0)
    }

    pub fn total_height(&self) -> f64 {
        self.sums.total_height(self.fallback_height())
    }

    /// Returns the item containing `offset`.
    ///
    /// When no item extends past `offset` (the offset is at or beyond the end, or every
    /// remaining item is empty), this is the first item whose bottom reaches `offset`, clamped
    /// to the last item. Offset `0` is always item `0`.
    ///
    /// Negative or non-finite offsets are treated as `0`. Returns `None` for an empty model.
    pub fn index_at_offset(&self, offset: f64) -> Option<usize> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        let consumed = self.sums.lower_bound(offset, self.fallback_height());
        if consumed < len {
            return Some(consumed);
        }
        Some(self.count_below(offset).min(len - 1))
    }

    /// Number of items whose cumulative height stays strictly below `offset`.
    pub(crate) fn count_below(&self, offset: f64) -> usize {
        self.sums.strict_lower_bound(offset, self.fallback_height())
    }

    /// Exports the current measurements.
    pub fn snapshot(&self) -> HeightSnapshot {
        let mut entries = Vec::with_capacity(self.sums.measured_count());
        for (i, h) in self.entries.iter().enumerate() {
            if let Some(h) = h {
                entries.push((i, *h));
            }
        }
        HeightSnapshot {
            entries,
            average_height: self.average_height,
            sample_count: self.sample_count,
        }
    }

    /// Replaces the current measurements with a previously exported snapshot.
    ///
    /// Entries past the end of the model or with invalid heights are skipped. The sample count
    /// becomes the larger of the current and the exported one, so it never goes down. With a
    /// fixed height configured the snapshot is ignored.
    pub fn restore(&mut self, snapshot: &HeightSnapshot) {
        if self.fixed_height.is_some() {
            return;
        }
        let len = self.entries.len();
        self.entries.clear();
        self.entries.resize(len, None);
        for &(index, h) in &snapshot.entries {
            if index < len && is_valid_extent(h) {
                self.entries[index] = Some(h);
            }
        }
        self.sums = Fenwick::from_entries(&self.entries);
        self.average_height = if is_valid_extent(snapshot.average_height) {
            snapshot.average_height
        } else {
            self.default_height
        };
        self.sample_count = self.sample_count.max(snapshot.sample_count);
        wdebug!(
            entries = snapshot.entries.len(),
            restored = self.sums.measured_count(),
            samples = self.sample_count,
            "HeightModel::restore"
        );
    }
}
