//! Floating Sticks - two virtual analogue sticks for touchscreens
//!
//! Each half of the screen gets a stick that appears under the finger,
//! reports a two-axis value in `[-1, 1]` while dragged, and hides again after
//! release. A second touch shortly after a release counts as a quick tap.
//!
//! - [`input`]: pure stick logic (normalization, stick state, quick-tap gate)
//! - [`host`]: the async dual-stick actor that owns timers and routing
//! - [`pad`]: an egui window to drive the host with mouse or touch

pub mod cli;
pub mod config;
pub mod host;
pub mod input;
pub mod pad;
pub mod paths;
pub mod timer;
pub mod trace;
