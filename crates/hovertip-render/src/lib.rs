#![forbid(unsafe_code)]

//! Render kernel: cells, the cell buffer, and terminal output.
//!
//! Widgets draw into a [`buffer::Buffer`]; the [`presenter::Presenter`]
//! turns a buffer into ANSI bytes.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod grapheme_pool;
pub mod presenter;
