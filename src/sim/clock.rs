//! Simulation state and the fixed-interval tick loop

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};
use uuid::Uuid;

use crate::input::InputEvent;
use crate::util::time::tick_duration;

use super::camera::CameraRig;
use super::signal::{SignalController, SignalState, SignalTiming};
use super::snapshot::{FrameSnapshot, HudThrottle};
use super::vehicle::{VehicleKinematics, VehicleState, VehicleTuning};
use super::DriveInputs;

/// All mutable simulation state for one session
#[derive(Debug, Clone)]
pub struct Simulation {
    pub id: Uuid,
    tick: u64,
    tick_ms: u32,
    /// Flags collected since the last tick
    pending: DriveInputs,
    vehicle: VehicleKinematics,
    signals: SignalController,
    rig: CameraRig,
}

impl Simulation {
    pub fn new(tick_ms: u32, tuning: VehicleTuning, timing: SignalTiming) -> Self {
        Self {
            id: Uuid::new_v4(),
            tick: 0,
            tick_ms,
            pending: DriveInputs::default(),
            vehicle: VehicleKinematics::new(tuning),
            signals: SignalController::new(timing),
            rig: CameraRig::default(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    pub fn vehicle(&self) -> &VehicleState {
        self.vehicle.state()
    }

    pub fn signals(&self) -> SignalState {
        self.signals.state()
    }

    pub fn pending_inputs(&self) -> DriveInputs {
        self.pending
    }

    /// Advance one tick: vehicle first, then signals
    pub fn step(&mut self) {
        self.tick += 1;
        self.vehicle.advance(self.pending);
        self.signals.advance(self.tick_ms);
    }

    /// Apply one input event. Returns `false` once quit is requested.
    pub fn apply(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Press { key } => self.pending.apply(key, true),
            InputEvent::Release { key } => self.pending.apply(key, false),
            InputEvent::Reset => {
                self.vehicle.reset();
                self.pending = DriveInputs::default();
                info!(session = %self.id, tick = self.tick, "Vehicle reset");
            }
            InputEvent::Brake => {
                self.vehicle.brake();
                self.pending.forward = false;
                self.pending.backward = false;
                info!(session = %self.id, tick = self.tick, "Brake applied");
            }
            InputEvent::Quit => return false,
        }
        true
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self.tick, self.vehicle.state(), &self.signals.state(), &self.rig)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(
            crate::util::time::DEFAULT_TICK_MS,
            VehicleTuning::default(),
            SignalTiming::default(),
        )
    }
}

/// Drives a [`Simulation`] in real time and publishes a snapshot per tick
pub struct SimulationClock {
    sim: Simulation,
    input_rx: mpsc::Receiver<InputEvent>,
    frame_tx: watch::Sender<FrameSnapshot>,
    hud: HudThrottle,
}

impl SimulationClock {
    /// Create a clock plus the receiver the renderer reads published frames from
    pub fn new(
        sim: Simulation,
        input_rx: mpsc::Receiver<InputEvent>,
        hud_interval: u32,
    ) -> (Self, watch::Receiver<FrameSnapshot>) {
        let (frame_tx, frame_rx) = watch::channel(sim.snapshot());
        let clock = Self {
            sim,
            input_rx,
            frame_tx,
            hud: HudThrottle::new(hud_interval),
        };
        (clock, frame_rx)
    }

    /// Run the tick loop until quit is requested or the input channel closes
    pub async fn run(mut self) -> Simulation {
        info!(session = %self.sim.id, tick_ms = self.sim.tick_ms(), "Simulation started");

        let mut ticker = interval(tick_duration(self.sim.tick_ms()));
        // A late tick is just late; never step twice to catch up
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if !self.process_inputs() {
                info!(session = %self.sim.id, tick = self.sim.tick(), "Quit requested");
                break;
            }

            self.sim.step();

            let snapshot = self.sim.snapshot();
            if self.hud.should_emit() {
                info!(session = %self.sim.id, tick = snapshot.tick, "{}", snapshot.hud_line());
            }
            if self.frame_tx.send(snapshot).is_err() {
                warn!(session = %self.sim.id, "Frame consumer dropped");
            }
        }

        self.sim
    }

    /// Drain pending input. Returns `false` when the loop should stop.
    fn process_inputs(&mut self) -> bool {
        loop {
            match self.input_rx.try_recv() {
                Ok(event) => {
                    if matches!(event, InputEvent::Reset | InputEvent::Brake) {
                        self.hud.force_next();
                    }
                    if !self.sim.apply(event) {
                        return false;
                    }
                }
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::sim::signal::SignalColor;

    #[test]
    fn input_only_affects_the_next_step() {
        let mut sim = Simulation::default();
        sim.apply(InputEvent::Press { key: Key::Up });
        assert_eq!(sim.vehicle().speed, 0.0);
        assert!(!sim.vehicle().inputs.forward);

        sim.step();
        assert!(sim.vehicle().inputs.forward);
        assert!(sim.vehicle().speed > 0.0);
    }

    #[test]
    fn step_advances_vehicle_and_signals_together() {
        let mut sim = Simulation::default();
        for _ in 0..250 {
            sim.step();
        }
        assert_eq!(sim.tick(), 250);
        assert_eq!(sim.signals().approach_a, SignalColor::Yellow);
        assert_eq!(sim.signals().elapsed_ms, 5000);
    }

    #[test]
    fn brake_clears_throttle_but_keeps_steering() {
        let mut sim = Simulation::default();
        sim.apply(InputEvent::Press { key: Key::Up });
        sim.apply(InputEvent::Press { key: Key::Left });
        for _ in 0..20 {
            sim.step();
        }
        let pose = (sim.vehicle().position, sim.vehicle().heading);

        sim.apply(InputEvent::Brake);
        assert_eq!(sim.vehicle().speed, 0.0);
        assert_eq!((sim.vehicle().position, sim.vehicle().heading), pose);
        assert!(!sim.pending_inputs().forward);
        assert!(sim.pending_inputs().turn_left);
    }

    #[test]
    fn reset_restores_start_pose_and_clears_inputs() {
        let mut sim = Simulation::default();
        let start = *sim.vehicle();
        sim.apply(InputEvent::Press { key: Key::Down });
        sim.apply(InputEvent::Press { key: Key::Right });
        for _ in 0..40 {
            sim.step();
        }

        sim.apply(InputEvent::Reset);
        assert_eq!(*sim.vehicle(), start);
        assert_eq!(sim.pending_inputs(), DriveInputs::default());

        sim.apply(InputEvent::Reset);
        assert_eq!(*sim.vehicle(), start);
    }

    #[test]
    fn reset_does_not_touch_signals() {
        let mut sim = Simulation::default();
        for _ in 0..10 {
            sim.step();
        }
        sim.apply(InputEvent::Reset);
        assert_eq!(sim.signals().elapsed_ms, 200);
    }

    #[test]
    fn quit_stops_application() {
        let mut sim = Simulation::default();
        assert!(sim.apply(InputEvent::Brake));
        assert!(!sim.apply(InputEvent::Quit));
    }

    #[tokio::test]
    async fn clock_publishes_frames_until_quit() {
        let (tx, rx) = mpsc::channel(16);
        let sim = Simulation::new(1, VehicleTuning::default(), SignalTiming::default());
        let (clock, mut frames) = SimulationClock::new(sim, rx, 1000);
        let handle = tokio::spawn(clock.run());

        tx.send(InputEvent::Press { key: Key::Up }).await.unwrap();
        frames.changed().await.unwrap();
        while frames.borrow().tick < 5 {
            frames.changed().await.unwrap();
        }
        tx.send(InputEvent::Quit).await.unwrap();

        let sim = handle.await.unwrap();
        assert!(sim.tick() >= 5);
        assert!(sim.vehicle().speed > 0.0);
    }

    #[tokio::test]
    async fn clock_stops_when_input_closes() {
        let (tx, rx) = mpsc::channel(1);
        let (clock, _frames) = SimulationClock::new(Simulation::default(), rx, 10);
        drop(tx);
        let sim = clock.run().await;
        assert_eq!(sim.tick(), 0);
    }
}
