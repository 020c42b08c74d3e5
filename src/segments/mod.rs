//! Segment module
//!
//! This module contains all statusline segments and the segment framework.

pub mod base;
pub mod load;
pub mod uptime;
pub mod weather;

// Re-export commonly used types
pub use base::{
    ColorSupport, RenderContext, Segment, SegmentFactory, SegmentOutput, Side,
    TerminalCapabilities,
};
pub use load::{LoadSegment, LoadSegmentFactory};
pub use uptime::{UptimeSegment, UptimeSegmentFactory};
pub use weather::{WeatherSegment, WeatherSegmentFactory};
