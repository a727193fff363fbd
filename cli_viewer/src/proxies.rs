use std::collections::BTreeMap;

use tracing::{debug, info, trace};
use viz_core::{BoxId, Pose, ProxySink};
use viz_proto::Vec3;

/// Logging proxy sink.
///
/// Stands in for a scene graph: tracks which proxies are alive and logs
/// mutations with the same create/destroy discipline a renderer would need.
#[derive(Debug, Default)]
pub struct TraceProxies {
    robots: BTreeMap<usize, Pose>,
    boxes: BTreeMap<BoxId, Vec3>,
    objective: Option<Vec3>,
}

impl TraceProxies {
    pub fn live_boxes(&self) -> usize {
        self.boxes.len()
    }
}

impl ProxySink for TraceProxies {
    fn create_box(&mut self, id: BoxId, position: Vec3) {
        debug!(id = id.0, ?position, "box proxy created");
        self.boxes.insert(id, position);
    }

    fn destroy_box(&mut self, id: BoxId) {
        debug!(id = id.0, "box proxy destroyed");
        self.boxes.remove(&id);
    }

    fn move_robot(&mut self, index: usize, pose: Pose) {
        trace!(index, position = ?pose.position, "robot pose");
        let entry = self.robots.entry(index).or_insert(pose);
        entry.position = pose.position;
        // A stationary robot keeps its previous facing.
        if pose.facing.is_some() {
            entry.facing = pose.facing;
        }
    }

    fn move_box(&mut self, id: BoxId, position: Vec3) {
        trace!(id = id.0, ?position, "box position");
        if let Some(slot) = self.boxes.get_mut(&id) {
            *slot = position;
        }
    }

    fn move_objective(&mut self, position: Vec3) {
        info!(?position, "objective repositioned");
        self.objective = Some(position);
    }
}
