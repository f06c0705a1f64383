//! Parameters structure for TrajCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the trajectory filter.
#[derive(Debug, Default, Deserialize)]
pub struct Params {

    /// Spring constant coupling the filter position to the target.
    ///
    /// The effective spring force is softened as the displacement grows, large jumps
    /// accelerate less aggressively than small ones.
    pub spring_constant: f64,

    /// Velocity damping factor applied every cycle, in (0, 1).
    pub damping: f64
}
