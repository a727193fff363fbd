//! Synchronization and interpolation core for the Boxyard viewer.
//!
//! Drives the fixed-cadence poll cycle against the warehouse simulation
//! server, reconciles reported entity counts into local proxy state, and
//! produces smoothly interpolated poses between snapshots. Network access
//! and rendering sit behind the [`Transport`] and [`ProxySink`] traits;
//! everything here runs on one cooperative thread.

mod buffer;
mod error;
mod interp;
mod reconcile;
mod sequencer;
mod session;
mod timer;

pub mod proxy;
pub mod transport;

pub use buffer::{InterpolationBuffer, Pose};
pub use error::SyncError;
pub use interp::ease;
pub use proxy::{BoxId, ProxyEffect, ProxySink};
pub use reconcile::{reconcile_boxes, BoxRoster, Reconciliation};
pub use sequencer::{run_fetch_cycle, seed_scene, CycleOutcome};
pub use session::{CycleStage, SessionState};
pub use timer::CadenceTimer;
pub use transport::{Transport, TransportError};
