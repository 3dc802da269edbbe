//! Minimal terminal runtime: an event loop that interleaves fixed-rate
//! ticks, redraws and crossterm input for a single [`App`].

mod app;
mod event;
mod event_loop;
mod runner;

pub use self::{app::App, runner::Tui};
