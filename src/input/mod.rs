//! Stick input core: normalization, the stick control and the quick-tap gate

pub mod gate;
pub mod geometry;
pub mod normalize;
pub mod stick;

pub use gate::{GateConfig, QuickTapGate, TapKind};
pub use geometry::{AxisValue, Point, Size};
pub use normalize::normalize;
pub use stick::{StickConfig, StickControl, StickPhase, StickUpdate};
