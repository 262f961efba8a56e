//! A headless windowed-rendering engine for long lists.
//!
//! For the event-driven controller (scroll throttling, frame-aligned measurement, scroll-to),
//! see the `windowing-controller` crate.
//!
//! Given a scroll offset, a viewport height and a list whose item heights are only partially
//! known, this crate decides which items must be rendered and how much empty space to put
//! around them:
//!
//! - [`HeightModel`] keeps measured heights plus a running estimate for unmeasured items.
//! - [`RangeFinder`] turns a scroll offset into an overscanned [`VisibleRange`].
//! - [`compute_padding`] turns a range into leading/trailing spacer sizes ([`Padding`]).
//!
//! All queries run on prefix sums over the measured heights, so they stay `O(log n)` for
//! large lists.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport height and scroll offset
//! - measured heights of the items it rendered
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod fenwick;
mod height;
mod key;
mod options;
mod padding;
mod range;
mod snapshot;
mod types;


pub use cache::BoundedCache;
pub use height::HeightModel;
pub use key::CacheKey;
pub use options::{
    DEFAULT_ITEM_HEIGHT, DEFAULT_MIN_VIEWPORT_FLOOR, DEFAULT_OVERSCAN, WindowConfig,
};
pub use padding::compute_padding;
pub use range::RangeFinder;
pub use snapshot::HeightSnapshot;
pub use types::{Align, Padding, VisibleRange};
