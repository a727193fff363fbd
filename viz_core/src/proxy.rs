use viz_proto::Vec3;

use crate::buffer::Pose;

/// Stable synthetic identity for a box proxy.
///
/// The server does not preserve per-index identity across snapshots, so the
/// core mints its own ids and the rendering layer keys proxies off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub u64);

/// Create/destroy decision produced by a box reconciliation pass. Effects
/// are ordered so a sink can apply them blindly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProxyEffect {
    CreateBox { id: BoxId, position: Vec3 },
    DestroyBox { id: BoxId },
}

/// Receiver for visual proxy mutations.
///
/// Implemented by the rendering layer. The core only calls in; the sink
/// never calls back. Robot proxies exist for the whole session (the
/// renderer creates `num_agents` of them up front), so only boxes go
/// through create/destroy.
pub trait ProxySink {
    fn create_box(&mut self, id: BoxId, position: Vec3);
    fn destroy_box(&mut self, id: BoxId);
    fn move_robot(&mut self, index: usize, pose: Pose);
    fn move_box(&mut self, id: BoxId, position: Vec3);
    fn move_objective(&mut self, position: Vec3);
}
