//! Tillfield library crate: the farm simulation core.
//!
//! The binary crate (`main.rs`) is a headless demo driver.
//! This library crate exposes every domain so that `tests/` integration
//! tests and embedding games can import types, systems, and resources
//! without needing a window or GPU.

pub mod shared;
pub mod calendar;
pub mod player;
pub mod farming;
pub mod save;
pub mod data;
