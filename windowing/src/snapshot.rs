use alloc::vec::Vec;

/// A serializable export of a [`crate::HeightModel`]'s measurements.
///
/// Hosts can persist this across screens/sessions so a freshly mounted list starts with real
/// heights instead of the default estimate. With `feature = "serde"`, this type implements
/// `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightSnapshot {
    /// `(index, measured_height)` pairs, ascending by index.
    pub entries: Vec<(usize, f64)>,
    pub average_height: f64,
    pub sample_count: u64,
}

impl HeightSnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
