#![allow(dead_code)]

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use viz_core::{BoxId, Pose, ProxySink, SessionState, Transport, TransportError};
use viz_proto::{BoxesSnapshot, ObjectiveSnapshot, RobotsSnapshot, SessionConfig, Vec3};

/// Canned transport: each endpoint pops scripted responses in order. An
/// exhausted script reads as a connection failure so a test that under-
/// scripts fails loudly instead of hanging.
#[derive(Default)]
pub struct ScriptedTransport {
    updates: Mutex<VecDeque<Result<(), TransportError>>>,
    robots: Mutex<VecDeque<Result<String, TransportError>>>,
    boxes: Mutex<VecDeque<Result<String, TransportError>>>,
    objectives: Mutex<VecDeque<Result<String, TransportError>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_update(&self, response: Result<(), TransportError>) {
        self.updates.lock().unwrap().push_back(response);
    }

    pub fn script_robots(&self, response: Result<String, TransportError>) {
        self.robots.lock().unwrap().push_back(response);
    }

    pub fn script_boxes(&self, response: Result<String, TransportError>) {
        self.boxes.lock().unwrap().push_back(response);
    }

    pub fn script_objective(&self, response: Result<String, TransportError>) {
        self.objectives.lock().unwrap().push_back(response);
    }
}

fn pop<T>(queue: &Mutex<VecDeque<Result<T, TransportError>>>, endpoint: &str) -> Result<T, TransportError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(TransportError::Connection(format!("script exhausted: {endpoint}"))))
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send_config(&self, _config: &SessionConfig) -> Result<(), TransportError> {
        Ok(())
    }

    async fn check_update(&self) -> Result<(), TransportError> {
        pop(&self.updates, "update")
    }

    async fn fetch_robots(&self) -> Result<String, TransportError> {
        pop(&self.robots, "robots")
    }

    async fn fetch_boxes(&self) -> Result<String, TransportError> {
        pop(&self.boxes, "boxes")
    }

    async fn fetch_objective(&self) -> Result<String, TransportError> {
        pop(&self.objectives, "objective")
    }
}

/// Proxy sink that records every mutation for assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub robot_moves: Vec<(usize, Pose)>,
    pub boxes: BTreeMap<BoxId, Vec3>,
    pub boxes_created: usize,
    pub boxes_destroyed: usize,
    pub objective: Option<Vec3>,
}

impl RecordingSink {
    pub fn live_boxes(&self) -> usize {
        self.boxes.len()
    }

    pub fn last_robot_pose(&self, index: usize) -> Option<Pose> {
        self.robot_moves
            .iter()
            .rev()
            .find(|(moved, _)| *moved == index)
            .map(|(_, pose)| *pose)
    }
}

impl ProxySink for RecordingSink {
    fn create_box(&mut self, id: BoxId, position: Vec3) {
        self.boxes_created += 1;
        self.boxes.insert(id, position);
    }

    fn destroy_box(&mut self, id: BoxId) {
        self.boxes_destroyed += 1;
        self.boxes.remove(&id);
    }

    fn move_robot(&mut self, index: usize, pose: Pose) {
        self.robot_moves.push((index, pose));
    }

    fn move_box(&mut self, id: BoxId, position: Vec3) {
        if let Some(slot) = self.boxes.get_mut(&id) {
            *slot = position;
        }
    }

    fn move_objective(&mut self, position: Vec3) {
        self.objective = Some(position);
    }
}

pub fn session(num_agents: usize, update_delay: f32) -> SessionState {
    let config = SessionConfig {
        num_agents,
        width: 10,
        height: 10,
        density: 0.3,
    };
    SessionState::new(config, update_delay).expect("valid session config")
}

pub fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

pub fn robots_body(positions: &[Vec3]) -> String {
    serde_json::to_string(&RobotsSnapshot {
        positions: positions.to_vec(),
    })
    .expect("robots snapshot serializes")
}

pub fn boxes_body(positions: &[Vec3]) -> String {
    serde_json::to_string(&BoxesSnapshot {
        positions: positions.to_vec(),
        num_boxes: positions.len(),
    })
    .expect("boxes snapshot serializes")
}

pub fn objective_body(position: Vec3) -> String {
    serde_json::to_string(&ObjectiveSnapshot { position }).expect("objective serializes")
}

/// Script one successful full cycle (update, robots, boxes) on `transport`.
pub fn script_cycle(transport: &ScriptedTransport, robots: &[Vec3], boxes: &[Vec3], objective: Vec3) {
    transport.script_update(Ok(()));
    transport.script_robots(Ok(robots_body(robots)));
    transport.script_boxes(Ok(boxes_body(boxes)));
    transport.script_objective(Ok(objective_body(objective)));
}
