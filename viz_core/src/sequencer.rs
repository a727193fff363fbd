use tracing::{debug, info, warn};
use viz_proto::{decode_boxes_json, decode_objective_json, decode_robots_json};

use crate::error::SyncError;
use crate::proxy::{ProxyEffect, ProxySink};
use crate::session::{CycleStage, SessionState};
use crate::transport::Transport;

/// How a fetch cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every snapshot stage was applied.
    Completed,
    /// The named stage failed; buffers past it were left untouched and the
    /// hold was released.
    Aborted(CycleStage),
    /// A cycle was already in flight; the trigger was dropped.
    Deferred,
}

/// Run one poll cycle: update check, robots, boxes, objective.
///
/// Transport and decode failures abort the cycle and are not errors to the
/// caller; the previous snapshot keeps animating toward its stale target.
/// Invariant violations propagate out as hard errors.
pub async fn run_fetch_cycle<T, P>(
    session: &mut SessionState,
    transport: &T,
    proxies: &mut P,
) -> Result<CycleOutcome, SyncError>
where
    T: Transport + ?Sized,
    P: ProxySink + ?Sized,
{
    if !session.begin_cycle() {
        debug!(stage = ?session.stage(), "cadence trigger ignored: cycle in flight");
        return Ok(CycleOutcome::Deferred);
    }

    // Liveness check first: a dead server aborts before any buffer moves.
    if let Err(err) = transport.check_update().await {
        warn!("update check failed: {err}");
        session.abort_cycle();
        return Ok(CycleOutcome::Aborted(CycleStage::AwaitUpdateCheck));
    }

    if !robots_step(session, transport).await? {
        return Ok(CycleOutcome::Aborted(CycleStage::AwaitRobots));
    }

    if !boxes_step(session, transport, proxies).await? {
        return Ok(CycleOutcome::Aborted(CycleStage::AwaitBoxes));
    }

    objective_step(session, transport, proxies).await;

    session.finish_cycle();
    Ok(CycleOutcome::Completed)
}

/// Seed the scene at session start: one objective fetch followed by a
/// robots/boxes pass, all before the first idle period. The first robot
/// snapshot lands with zero interpolation distance.
pub async fn seed_scene<T, P>(
    session: &mut SessionState,
    transport: &T,
    proxies: &mut P,
) -> Result<(), SyncError>
where
    T: Transport + ?Sized,
    P: ProxySink + ?Sized,
{
    if !session.begin_cycle() {
        return Err(SyncError::Invariant(
            "seed_scene called while a cycle is in flight".into(),
        ));
    }

    objective_step(session, transport, proxies).await;

    if !robots_step(session, transport).await? {
        return Ok(());
    }
    if !boxes_step(session, transport, proxies).await? {
        return Ok(());
    }

    session.finish_cycle();
    info!(
        robots = session.robots().len(),
        boxes = session.box_count(),
        "scene seeded"
    );
    Ok(())
}

/// Fetch and apply the robot snapshot. `Ok(false)` means the step failed
/// and the cycle was aborted; hard errors propagate.
async fn robots_step<T>(session: &mut SessionState, transport: &T) -> Result<bool, SyncError>
where
    T: Transport + ?Sized,
{
    session.set_stage(CycleStage::AwaitRobots);
    let body = match transport.fetch_robots().await {
        Ok(body) => body,
        Err(err) => {
            warn!("robot fetch failed: {err}");
            session.abort_cycle();
            return Ok(false);
        }
    };
    let snapshot = match decode_robots_json(&body) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("robot snapshot decode failed: {err}");
            session.abort_cycle();
            return Ok(false);
        }
    };
    if let Err(err) = session.apply_robots(snapshot) {
        session.abort_cycle();
        return Err(err);
    }
    Ok(true)
}

/// Fetch the box snapshot, reconcile proxies, and commit positions. This is
/// the stage that releases the hold.
async fn boxes_step<T, P>(
    session: &mut SessionState,
    transport: &T,
    proxies: &mut P,
) -> Result<bool, SyncError>
where
    T: Transport + ?Sized,
    P: ProxySink + ?Sized,
{
    session.set_stage(CycleStage::AwaitBoxes);
    let body = match transport.fetch_boxes().await {
        Ok(body) => body,
        Err(err) => {
            warn!("box fetch failed: {err}");
            session.abort_cycle();
            return Ok(false);
        }
    };
    let snapshot = match decode_boxes_json(&body) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("box snapshot decode failed: {err}");
            session.abort_cycle();
            return Ok(false);
        }
    };
    let reconciliation = match session.apply_boxes(&snapshot) {
        Ok(reconciliation) => reconciliation,
        Err(err) => {
            session.abort_cycle();
            return Err(err);
        }
    };
    for effect in &reconciliation.effects {
        match *effect {
            ProxyEffect::CreateBox { id, position } => proxies.create_box(id, position),
            ProxyEffect::DestroyBox { id } => proxies.destroy_box(id),
        }
    }
    session.commit_positions(proxies);
    Ok(true)
}

/// Refresh the objective position. Best effort: the objective is
/// quasi-static, so a failed refresh only logs.
async fn objective_step<T, P>(session: &mut SessionState, transport: &T, proxies: &mut P)
where
    T: Transport + ?Sized,
    P: ProxySink + ?Sized,
{
    session.set_stage(CycleStage::AwaitObjective);
    let body = match transport.fetch_objective().await {
        Ok(body) => body,
        Err(err) => {
            warn!("objective fetch failed: {err}");
            return;
        }
    };
    match decode_objective_json(&body) {
        Ok(snapshot) => {
            session.set_objective(snapshot.position);
            proxies.move_objective(snapshot.position);
        }
        Err(err) => warn!("objective decode failed: {err}"),
    }
}
