#[macro_use]
pub mod debug;

/// Everything you'd need to put a control on screen. Import this with `use ctl::prelude::*;`.
pub mod prelude;

// These modules have also been re-exported in the prelude.
pub mod formatters;
pub mod util;

pub mod config;
pub mod control;
pub mod error;
pub mod event_loop;

// Re-exported so the macros in the `debug` module can refer to `$crate::log`.
pub use log;
