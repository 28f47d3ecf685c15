//! Per-frame state handed to the renderer

use glam::Vec3;
use serde::Serialize;

use super::camera::{CameraFrame, CameraRig};
use super::signal::{SignalColor, SignalState};
use super::vehicle::{Compass, VehicleState};

/// Everything a renderer needs to draw one frame across four viewports
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub position: Vec3,
    pub heading: f32,
    pub speed: f32,
    pub compass: Compass,
    /// North-south approach
    pub approach_a: SignalColor,
    /// West-east approach
    pub approach_b: SignalColor,
    pub cameras: [CameraFrame; 4],
}

impl FrameSnapshot {
    pub fn capture(
        tick: u64,
        vehicle: &VehicleState,
        signals: &SignalState,
        rig: &CameraRig,
    ) -> Self {
        Self {
            tick,
            position: vehicle.position,
            heading: vehicle.heading,
            speed: vehicle.speed,
            compass: vehicle.compass(),
            approach_a: signals.approach_a,
            approach_b: signals.approach_b,
            cameras: rig.frames(vehicle),
        }
    }

    /// Heads-up display text
    pub fn hud_line(&self) -> String {
        format!(
            "Speed: {:.2} Direction: {} Heading: {} Position: ({:.1}, {:.1})",
            self.speed,
            self.heading as i32,
            self.compass.as_str(),
            self.position.x,
            self.position.z,
        )
    }
}

/// Decides which ticks emit a HUD line
pub struct HudThrottle {
    /// Tick counter since last emission
    ticks_since_emit: u32,
    /// Emission interval in ticks
    interval: u32,
}

impl HudThrottle {
    pub fn new(interval: u32) -> Self {
        Self {
            ticks_since_emit: 0,
            interval: interval.max(1),
        }
    }

    /// Check if it's time to emit
    pub fn should_emit(&mut self) -> bool {
        self.ticks_since_emit += 1;
        if self.ticks_since_emit >= self.interval {
            self.ticks_since_emit = 0;
            true
        } else {
            false
        }
    }

    /// Emit on the next check (after reset or brake)
    pub fn force_next(&mut self) {
        self.ticks_since_emit = self.interval;
    }
}
