//! Intersection Sim - simulation core for a four-way intersection
//!
//! A user-driven vehicle, two timed signal approaches and a four-view camera
//! rig, advanced on a fixed tick. Rendering is left to the consumer, which
//! reads [`sim::FrameSnapshot`] values published by [`sim::SimulationClock`].

pub mod config;
pub mod input;
pub mod scenery;
pub mod sim;
pub mod util;
