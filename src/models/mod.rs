//! Base model score analysis

pub mod signals;

pub use signals::{Agreement, SignalReport};
