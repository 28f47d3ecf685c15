//! Simulation core: vehicle, signals, cameras and the tick clock

pub mod camera;
pub mod clock;
pub mod signal;
pub mod snapshot;
pub mod vehicle;

pub use camera::{CameraFrame, CameraRig, ViewRole};
pub use clock::{Simulation, SimulationClock};
pub use signal::{SignalColor, SignalController, SignalState, SignalTiming};
pub use snapshot::{FrameSnapshot, HudThrottle};
pub use vehicle::{Compass, VehicleKinematics, VehicleState, VehicleTuning};

use serde::Serialize;

use crate::input::Key;

/// Directional input flags sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriveInputs {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl DriveInputs {
    /// Record a key press or release
    pub fn apply(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Up => self.forward = pressed,
            Key::Down => self.backward = pressed,
            Key::Left => self.turn_left = pressed,
            Key::Right => self.turn_right = pressed,
        }
    }

    pub fn is_turning(&self) -> bool {
        self.turn_left || self.turn_right
    }
}
