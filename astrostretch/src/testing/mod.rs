//! Synthetic test data shared by unit tests, benches and examples.

pub mod synthetic;

pub use synthetic::{SkyConfig, gradient_plane, synthetic_gray, synthetic_rgb};
