//! Trajectory filter module
//!
//! TrajCtrl smooths the constrained target into the actual commanded spar motion using a
//! spring-damper filter with a soft-saturating spring. The filter holds persistent velocity
//! state, the spar therefore moves continuously even when the target jumps.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during TrajCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum TrajCtrlError {
    #[error("Recieved a non-finite target position: {0:?}")]
    NonFiniteTarget(crate::pos_ctrl::TargetPos),

    #[error("Recieved an invalid timestep: {0} s")]
    InvalidTimestep(f64),
}
