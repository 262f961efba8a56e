/// Where the target item should land in the viewport when scrolling to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    /// Keep the current offset if the item is fully visible, otherwise scroll the minimum
    /// distance to reveal it.
    Auto,
}

/// A half-open interval of item indexes to render, overscan included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize, // exclusive
}

impl VisibleRange {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    pub fn iter(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }
}

/// Spacer sizes placed before and after the rendered window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    /// Estimated height of every item before `range.start`.
    pub top: f64,
    /// Estimated height of every item from `range.end` to the end of the list.
    pub bottom: f64,
}

impl Padding {
    pub const ZERO: Self = Self {
        top: 0.0,
        bottom: 0.0,
    };
}
