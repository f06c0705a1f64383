//! Position constraint module
//!
//! PosCtrl keeps the commanded spar position inside the safe workspace derived from the rig's
//! mast footprint. Commands deep inside the workspace pass through untouched, commands outside
//! it are blended back towards the safe zone boundary with a quadratic ease-in, and commanded
//! heights are saturated against the rig's height limits.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod bounds;
mod calc_constraint;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use bounds::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during PosCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum PosCtrlInitError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("The mast footprint produces a zero workspace margin")]
    DegenerateFootprint,

    #[error(
        "The height limits are inverted: lowest mast gives a ceiling of {0} m but the floor \
         is {1} m"
    )]
    InvalidHeightRange(f64, f64),
}

/// Possible errors that can occur during PosCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum PosCtrlError {
    #[error("The module has not been initialised")]
    NotInitialised,
}
