//! Parameters structure for PosCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for position constraint.
#[derive(Debug, Default, Deserialize)]
pub struct Params {

    // ---- HORIZONTAL LIMITS ----

    /// Fraction of the centroid-to-nearest-vertex distance used as the workspace margin.
    ///
    /// The safe zone is the mast footprint inset by this margin.
    pub margin_factor: f64,

    /// Fraction of the margin used to inset the danger zone.
    ///
    /// The danger zone inset is smaller than the safe zone inset, commands inside the danger
    /// zone are passed through untouched.
    pub danger_zone_factor: f64,

    // ---- HEIGHT LIMITS ----

    /// Clearance kept between the spar and the lowest rope anchor.
    ///
    /// Units: meters
    pub height_clearance_m: f64,

    /// The lowest height the spar may be commanded to.
    ///
    /// Units: meters
    pub min_allowed_height_m: f64
}
