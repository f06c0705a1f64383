//! Command generation module
//!
//! CmdGen owns the commanded spar position. With a live controller the stick deflections are
//! integrated into the command (velocity control with a dead-zone), without one a closed-form
//! fallback trajectory wanders the spar around the workspace so the rig never just hangs
//! there.

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

/// Possible errors that can occur during CmdGen operation.
#[derive(Debug, thiserror::Error)]
pub enum CmdGenError {
    #[error("Recieved a non-finite session time: {0} s")]
    NonFiniteTime(f64),
}
