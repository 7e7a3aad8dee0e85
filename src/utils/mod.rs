//! Small self-contained helpers kept alongside the resolution core.
//!
//! # Key Components
//!
//! - [`KeyedView`] - Read-only keyed collection view
//! - [`copy_with_progress`] / [`ProgressScale`] - Progress-reporting stream
//!   copy and nested progress scaling
//! - [`before`] / [`after`] / [`between`] - String slicing helpers

mod keyed;
mod progress;
mod strings;

pub use keyed::KeyedView;
pub use progress::{copy_with_progress, ProgressScale};
pub use strings::{after, before, between};
