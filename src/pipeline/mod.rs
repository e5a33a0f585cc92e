//! Pipeline Module - per-frame consumers of cached layout results.
//!
//! - [`hit_test`] - pointer to widget lookup
//! - [`FrameDriver`] - runs edits, layout, hit testing and painting in order

mod frame;

pub use frame::{FrameDriver, FrameReport};
pub use hit_test::{hit_test, Hit};
