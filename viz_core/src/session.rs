use tracing::{debug, trace};
use viz_proto::{BoxesSnapshot, RobotsSnapshot, SessionConfig, Vec3};

use crate::buffer::{InterpolationBuffer, Pose};
use crate::error::SyncError;
use crate::interp;
use crate::proxy::ProxySink;
use crate::reconcile::{reconcile_boxes, BoxRoster, Reconciliation};
use crate::timer::CadenceTimer;

/// Position in the fetch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleStage {
    #[default]
    Idle,
    AwaitUpdateCheck,
    AwaitRobots,
    AwaitBoxes,
    AwaitObjective,
}

/// All mutable state for one visualization session.
///
/// The cooperative loop owns the single instance; the fetch sequencer
/// mutates it between network awaits and the per-frame interpolation only
/// reads it. No locking: everything happens on one thread.
pub struct SessionState {
    config: SessionConfig,
    timer: CadenceTimer,
    robots: InterpolationBuffer,
    boxes: InterpolationBuffer,
    roster: BoxRoster,
    objective: Vec3,
    stage: CycleStage,
    hold: bool,
    first: bool,
}

impl SessionState {
    pub fn new(config: SessionConfig, update_delay: f32) -> Result<Self, SyncError> {
        Ok(Self {
            timer: CadenceTimer::new(update_delay)?,
            robots: InterpolationBuffer::default(),
            boxes: InterpolationBuffer::default(),
            roster: BoxRoster::default(),
            objective: Vec3::ZERO,
            stage: CycleStage::Idle,
            hold: false,
            first: true,
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stage(&self) -> CycleStage {
        self.stage
    }

    pub fn hold(&self) -> bool {
        self.hold
    }

    pub fn objective(&self) -> Vec3 {
        self.objective
    }

    pub fn robots(&self) -> &InterpolationBuffer {
        &self.robots
    }

    pub fn boxes(&self) -> &InterpolationBuffer {
        &self.boxes
    }

    pub fn box_count(&self) -> usize {
        self.roster.len()
    }

    /// One interpolation tick. Returns true when the cadence elapsed and a
    /// fetch cycle should run.
    ///
    /// While `hold` is set the proxies stay frozen at their last pose and
    /// the cadence clock does not run, so a slow fetch never eats into the
    /// next interpolation window.
    pub fn frame(&mut self, dt: f32, proxies: &mut dyn ProxySink) -> bool {
        if self.hold {
            return false;
        }
        if self.timer.advance(dt) {
            // Freeze immediately; this frame must not sample the buffers at
            // the reset timer.
            self.hold = true;
            return true;
        }

        let eased = interp::ease(self.timer.progress());
        for index in 0..self.robots.len() {
            proxies.move_robot(index, self.robots.sample(index, eased));
        }
        for (slot, id) in self.roster.ids().iter().enumerate() {
            proxies.move_box(*id, self.boxes.sample(slot, eased).position);
        }
        trace!(eased, "frame interpolated");
        false
    }

    /// Enter the fetch sequence. Returns false when a cycle is already in
    /// flight; the trigger is dropped rather than overlapped.
    pub fn begin_cycle(&mut self) -> bool {
        if self.stage != CycleStage::Idle {
            return false;
        }
        self.hold = true;
        self.stage = CycleStage::AwaitUpdateCheck;
        true
    }

    pub fn set_stage(&mut self, stage: CycleStage) {
        self.stage = stage;
    }

    /// Abandon the current cycle after a failed step. Buffers keep their
    /// previous contents and the hold is released so a single dropped
    /// request can never freeze the animation for good.
    pub fn abort_cycle(&mut self) {
        self.stage = CycleStage::Idle;
        self.hold = false;
    }

    pub fn finish_cycle(&mut self) {
        self.stage = CycleStage::Idle;
    }

    /// Fold a robot snapshot into the interpolation buffer. The robot count
    /// is fixed at session configuration time; a mismatch means the server
    /// and client disagree about the world and is surfaced as a hard error.
    pub fn apply_robots(&mut self, snapshot: RobotsSnapshot) -> Result<(), SyncError> {
        if snapshot.positions.len() != self.config.num_agents {
            return Err(SyncError::Invariant(format!(
                "robot snapshot has {} positions, session expects {}",
                snapshot.positions.len(),
                self.config.num_agents
            )));
        }
        if self.first {
            self.robots.seed(snapshot.positions);
            self.first = false;
        } else {
            self.robots.retarget(snapshot.positions)?;
        }
        Ok(())
    }

    /// Reconcile the box roster against a fresh snapshot and swap the box
    /// buffer. Releases the hold: structural changes are complete once the
    /// boxes are reconciled.
    pub fn apply_boxes(&mut self, snapshot: &BoxesSnapshot) -> Result<Reconciliation, SyncError> {
        let result = reconcile_boxes(&mut self.roster, snapshot, self.objective)?;
        let positions = result
            .survivors
            .iter()
            .map(|(_, position)| *position)
            .collect();
        // Recreated proxies carry no identity from the previous snapshot,
        // so the buffer restarts with zero interpolation distance.
        self.boxes.seed(positions);
        self.hold = false;
        debug!(
            live = self.roster.len(),
            reported = snapshot.num_boxes,
            "boxes reconciled"
        );
        Ok(result)
    }

    pub fn set_objective(&mut self, position: Vec3) {
        self.objective = position;
    }

    /// One-shot position commit after reconciliation: robots snap to their
    /// new targets. `facing: None` leaves each robot's orientation alone.
    pub fn commit_positions<P: ProxySink + ?Sized>(&self, proxies: &mut P) {
        for (index, position) in self.robots.target().iter().enumerate() {
            proxies.move_robot(
                index,
                Pose {
                    position: *position,
                    facing: None,
                },
            );
        }
    }
}
