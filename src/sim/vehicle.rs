//! Vehicle kinematics: smoothed acceleration and speed-dependent turning

use glam::Vec3;
use serde::Serialize;

use super::DriveInputs;

/// Snap tolerance, as a fraction of the step, when approaching a limit
const SNAP_FRACTION: f32 = 1e-2;

/// Handling constants, all expressed per tick
#[derive(Debug, Clone, Copy)]
pub struct VehicleTuning {
    /// Maximum forward speed (reverse is capped at half of this)
    pub max_speed: f32,
    /// Speed gained per tick while throttle or reverse is held
    pub acceleration: f32,
    /// Speed lost per tick while coasting
    pub deceleration: f32,
    /// Turn rate at standstill, degrees per tick
    pub max_turn_speed: f32,
    /// Turn rate at full speed, degrees per tick
    pub min_turn_speed: f32,
    /// Turn interpolation gained per tick while steering
    pub turn_acceleration: f32,
    /// Turn interpolation lost per tick after steering is released.
    /// Half of `turn_acceleration` by default; the original handling released
    /// at the acceleration rate (0.2 per tick).
    pub turn_deceleration: f32,
    pub turn_speed_multiplier: f32,
    pub start_position: Vec3,
    pub start_heading: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: 0.5,
            acceleration: 0.01,
            deceleration: 0.005,
            max_turn_speed: 6.0,
            min_turn_speed: 2.0,
            turn_acceleration: 0.2,
            turn_deceleration: 0.1,
            turn_speed_multiplier: 1.0,
            start_position: Vec3::new(3.0, 0.0, 45.0),
            start_heading: 180.0,
        }
    }
}

impl VehicleTuning {
    pub fn max_reverse_speed(&self) -> f32 {
        self.max_speed / 2.0
    }

    /// Degrees per tick at full turn interpolation for the given speed
    pub fn turn_speed(&self, speed: f32) -> f32 {
        let speed_factor = (speed.abs() / self.max_speed).min(1.0);
        let turn = self.min_turn_speed
            + (self.max_turn_speed - self.min_turn_speed) * (1.0 - speed_factor);
        turn * self.turn_speed_multiplier
    }
}

/// Four-point compass label derived from heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compass {
    N,
    E,
    S,
    W,
}

impl Compass {
    /// Each cardinal point covers ±45° around its axis; north wraps through 0°.
    pub fn from_heading(heading: f32) -> Self {
        let heading = normalize_heading(heading);
        if !(45.0..315.0).contains(&heading) {
            Compass::N
        } else if heading < 135.0 {
            Compass::E
        } else if heading < 225.0 {
            Compass::S
        } else {
            Compass::W
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Compass::N => "N",
            Compass::E => "E",
            Compass::S => "S",
            Compass::W => "W",
        }
    }
}

/// Vehicle state read by the renderer and the camera rig
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleState {
    pub position: Vec3,
    /// Degrees in [0, 360); 0 faces +Z, 90 faces +X
    pub heading: f32,
    pub speed: f32,
    pub turn_interpolation: f32,
    pub inputs: DriveInputs,
}

impl VehicleState {
    pub fn compass(&self) -> Compass {
        Compass::from_heading(self.heading)
    }
}

/// Owns the vehicle state and advances it once per tick
#[derive(Debug, Clone)]
pub struct VehicleKinematics {
    tuning: VehicleTuning,
    state: VehicleState,
}

impl VehicleKinematics {
    pub fn new(tuning: VehicleTuning) -> Self {
        Self {
            state: Self::initial_state(&tuning),
            tuning,
        }
    }

    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Advance one fixed tick using the input flags sampled for this tick
    pub fn advance(&mut self, inputs: DriveInputs) -> VehicleState {
        let tuning = &self.tuning;
        let state = &mut self.state;
        state.inputs = inputs;

        // Movement uses the heading from the start of the tick
        let heading_rad = state.heading.to_radians();

        state.speed = if inputs.forward {
            step_toward(state.speed, tuning.max_speed, tuning.acceleration)
        } else if inputs.backward {
            step_toward(state.speed, -tuning.max_reverse_speed(), tuning.acceleration)
        } else {
            step_toward(state.speed, 0.0, tuning.deceleration)
        };
        state.speed = state
            .speed
            .clamp(-tuning.max_reverse_speed(), tuning.max_speed);

        let turn_speed = tuning.turn_speed(state.speed);
        state.turn_interpolation = if inputs.is_turning() {
            step_toward(state.turn_interpolation, 1.0, tuning.turn_acceleration)
        } else {
            step_toward(state.turn_interpolation, 0.0, tuning.turn_deceleration)
        };

        if state.turn_interpolation > 0.0 {
            let turn_amount = turn_speed * state.turn_interpolation;
            if inputs.turn_left {
                state.heading += turn_amount;
            }
            if inputs.turn_right {
                state.heading -= turn_amount;
            }
            state.heading = normalize_heading(state.heading);
        }

        state.position.x += state.speed * heading_rad.sin();
        state.position.z += state.speed * heading_rad.cos();

        *state
    }

    /// Stop dead without moving or turning the vehicle
    pub fn brake(&mut self) {
        self.state.speed = 0.0;
        self.state.inputs.forward = false;
        self.state.inputs.backward = false;
    }

    /// Restore the start pose and clear all inputs
    pub fn reset(&mut self) {
        self.state = Self::initial_state(&self.tuning);
    }

    fn initial_state(tuning: &VehicleTuning) -> VehicleState {
        VehicleState {
            position: tuning.start_position,
            heading: normalize_heading(tuning.start_heading),
            speed: 0.0,
            turn_interpolation: 0.0,
            inputs: DriveInputs::default(),
        }
    }
}

impl Default for VehicleKinematics {
    fn default() -> Self {
        Self::new(VehicleTuning::default())
    }
}

/// Wrap any angle in degrees into [0, 360)
pub fn normalize_heading(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Move `current` toward `target` by at most `step`, landing exactly on the target
fn step_toward(current: f32, target: f32, step: f32) -> f32 {
    let gap = target - current;
    if gap.abs() <= step * (1.0 + SNAP_FRACTION) {
        target
    } else {
        current + step.copysign(gap)
    }
}
