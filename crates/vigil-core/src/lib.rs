//! Board-agnostic display-control core for the Vigil watch.
//!
//! One task owns the active screen, the back-navigation history, touch
//! routing and display dimming. Everything else in the system talks to it
//! through a bounded message queue.
#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod hw;
pub mod messages;
pub mod screen;
