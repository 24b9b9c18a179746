//! Minimal image viewer: view geometry, pixel-format-aware color effects and
//! the winit/softbuffer front end that drives them.

pub mod cli;
pub mod effects;
pub mod error;
pub mod files;
pub mod loader;
pub mod pixel;
pub mod ui;
pub mod view;
