//! Wayfinder kit: element adapters for the platform seam.
//!
//! Each element kind maps its own native lifecycle onto the three
//! [`Presentable`](wayfinder_core::Presentable) signals.

pub mod lifecycle;
pub mod screen;
pub mod window;

pub use lifecycle::{Element, ElementLifecycle};
pub use screen::Screen;
pub use window::Window;
