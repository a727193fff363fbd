use viz_proto::{BoxesSnapshot, Vec3};

use crate::error::SyncError;
use crate::proxy::{BoxId, ProxyEffect};

/// Live box proxies in creation order.
#[derive(Debug, Default)]
pub struct BoxRoster {
    next_id: u64,
    live: Vec<BoxId>,
}

impl BoxRoster {
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn ids(&self) -> &[BoxId] {
        &self.live
    }

    fn mint(&mut self) -> BoxId {
        let id = BoxId(self.next_id);
        self.next_id += 1;
        self.live.push(id);
        id
    }
}

/// Outcome of a box reconciliation pass.
#[derive(Debug)]
pub struct Reconciliation {
    pub effects: Vec<ProxyEffect>,
    /// Boxes still standing after the delivery check, in roster order.
    pub survivors: Vec<(BoxId, Vec3)>,
}

/// Reconcile the roster against a fresh snapshot.
///
/// Policy: destroy every live proxy, recreate exactly `num_boxes` at their
/// reported positions, then destroy any recreated box whose position
/// exactly equals the objective (delivered to goal). Per-index identity
/// across snapshots is not guaranteed by the server, so a full re-create is
/// the only safe mapping. `num_boxes == 0` destroys everything and creates
/// nothing.
pub fn reconcile_boxes(
    roster: &mut BoxRoster,
    snapshot: &BoxesSnapshot,
    objective: Vec3,
) -> Result<Reconciliation, SyncError> {
    if snapshot.positions.len() < snapshot.num_boxes {
        return Err(SyncError::Invariant(format!(
            "box snapshot reports {} boxes but carries only {} positions",
            snapshot.num_boxes,
            snapshot.positions.len()
        )));
    }

    let mut effects = Vec::with_capacity(roster.len() + snapshot.num_boxes * 2);
    for id in roster.live.drain(..) {
        effects.push(ProxyEffect::DestroyBox { id });
    }

    let mut delivered = Vec::new();
    for position in snapshot
        .positions
        .iter()
        .take(snapshot.num_boxes)
        .copied()
    {
        let id = roster.mint();
        effects.push(ProxyEffect::CreateBox { id, position });
        if position == objective {
            delivered.push(id);
        }
    }
    for id in &delivered {
        roster.live.retain(|live| live != id);
        effects.push(ProxyEffect::DestroyBox { id: *id });
    }

    let survivors = roster
        .live
        .iter()
        .zip(
            snapshot
                .positions
                .iter()
                .take(snapshot.num_boxes)
                .filter(|position| **position != objective),
        )
        .map(|(id, position)| (*id, *position))
        .collect();

    Ok(Reconciliation { effects, survivors })
}
