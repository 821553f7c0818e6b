// Re-export the macros
pub use crate::debug::*;

pub use crate::formatters;
pub use crate::util;

pub use crate::config::{CtlConfig, Direction};
pub use crate::control::range::{Range, Warp};
pub use crate::control::spec::ControlSpec;
pub use crate::control::{
    Ctl, DisplayFrame, Listener, ListenerHandle, Renderer, StepAmount,
};
pub use crate::error::CtlError;
pub use crate::event_loop::{EventLoop, FrameClock, ImmediateLoop, Task};
