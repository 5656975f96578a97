#![forbid(unsafe_code)]

//! Core: geometry, canonical input events, transitions, and terminal lifecycle.

pub mod animation;
pub mod event;
pub mod geometry;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal_session;
