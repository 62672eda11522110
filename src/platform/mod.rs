//! Platform abstraction layer
//!
//! A round needs two independently cancellable scheduled tasks: the frame
//! callback and the one-second countdown. In the browser these are
//! `requestAnimationFrame` and `setInterval` (see `main.rs`); everywhere else
//! `headless::HeadlessRunner` drives them on a simulated clock.

pub mod headless;

pub use headless::{HeadlessRunner, NullPainter, Task};
