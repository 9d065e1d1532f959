//! Data models for dashboard chart input.

mod series;

pub use series::{DecodeError, Series, SeriesKind};
