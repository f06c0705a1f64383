//! Rope kinematics module
//!
//! RopeCtrl converts the spar position into the length each rope must have, one rope per
//! mast in mast order. These are the lengths the winch actuators must realise.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during RopeCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum RopeCtrlError {
    #[error("The module has not been initialised")]
    NotInitialised,

    #[error("Computed a non-finite length for rope {0}")]
    NonFiniteLength(usize),
}
