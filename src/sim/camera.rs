//! Four-view camera rig derived from vehicle state

use glam::{Quat, Vec3};
use serde::Serialize;

use super::vehicle::VehicleState;

/// Viewport roles, in the order the renderer lays them out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewRole {
    /// Third-person camera behind the vehicle (main viewport)
    Chase,
    /// South-east angled view
    RightAngled,
    TopDown,
    /// South-west angled view
    LeftAngled,
}

impl ViewRole {
    pub const ALL: [ViewRole; 4] = [
        ViewRole::Chase,
        ViewRole::RightAngled,
        ViewRole::TopDown,
        ViewRole::LeftAngled,
    ];
}

/// One look-at triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraFrame {
    pub role: ViewRole,
    pub eye: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
}

/// Placement constants for the four views
#[derive(Debug, Clone, Copy)]
pub struct CameraRig {
    /// Chase offset in the vehicle's local frame (-Z is behind)
    pub local_offset: Vec3,
    pub chase_eye_lift: f32,
    pub chase_look_lift: f32,
    /// Distance of the angled views from the vehicle
    pub side_radius: f32,
    /// Absolute eye height of the angled views
    pub side_height: f32,
    pub side_look_lift: f32,
    /// World bearing of the right angled view, degrees
    pub right_bearing: f32,
    pub left_bearing: f32,
    pub top_height: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            local_offset: Vec3::new(0.0, 0.0, -6.0),
            chase_eye_lift: 2.0,
            chase_look_lift: 1.0,
            side_radius: 30.0,
            side_height: 5.0,
            side_look_lift: 2.0,
            right_bearing: -45.0,
            left_bearing: 45.0,
            top_height: 100.0,
        }
    }
}

impl CameraRig {
    /// Chase offset rotated about +Y by the vehicle heading
    pub fn world_offset(&self, heading: f32) -> Vec3 {
        Quat::from_rotation_y(heading.to_radians()) * self.local_offset
    }

    pub fn frame(&self, role: ViewRole, vehicle: &VehicleState) -> CameraFrame {
        match role {
            ViewRole::Chase => self.chase(vehicle),
            ViewRole::RightAngled => self.angled(role, self.right_bearing, vehicle),
            ViewRole::TopDown => self.top_down(vehicle),
            ViewRole::LeftAngled => self.angled(role, self.left_bearing, vehicle),
        }
    }

    pub fn frames(&self, vehicle: &VehicleState) -> [CameraFrame; 4] {
        ViewRole::ALL.map(|role| self.frame(role, vehicle))
    }

    fn chase(&self, vehicle: &VehicleState) -> CameraFrame {
        let position = vehicle.position;
        CameraFrame {
            role: ViewRole::Chase,
            eye: position + self.world_offset(vehicle.heading) + Vec3::Y * self.chase_eye_lift,
            look_at: position + Vec3::Y * self.chase_look_lift,
            up: Vec3::Y,
        }
    }

    // Orbits the world position only; vehicle heading does not matter here.
    fn angled(&self, role: ViewRole, bearing: f32, vehicle: &VehicleState) -> CameraFrame {
        let position = vehicle.position;
        let bearing = bearing.to_radians();
        CameraFrame {
            role,
            eye: Vec3::new(
                position.x + self.side_radius * bearing.sin(),
                self.side_height,
                position.z + self.side_radius * bearing.cos(),
            ),
            look_at: position + Vec3::Y * self.side_look_lift,
            up: Vec3::Y,
        }
    }

    fn top_down(&self, vehicle: &VehicleState) -> CameraFrame {
        let position = vehicle.position;
        CameraFrame {
            role: ViewRole::TopDown,
            eye: Vec3::new(position.x, self.top_height, position.z),
            look_at: Vec3::new(position.x, 0.0, position.z),
            // Looking straight down, so up cannot be +Y; -Z keeps north at the top
            up: Vec3::NEG_Z,
        }
    }
}
