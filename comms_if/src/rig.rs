//! # Rig Layout Definitions
//!
//! The static description of the physical rig: the masts the ropes hang from and the dimensions
//! of the suspended spar. These types are shared between the exec's configuration and the
//! visualisation's static payload, the layout is described exactly once.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A fixed anchor mast from which one rope to the spar is suspended.
///
/// The rope leaves the mast at its top, `(x, height, z)` in world coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Mast {
    /// Height of the rope anchor point above the ground plane.
    ///
    /// Units: meters
    pub height: f64,

    /// Position of the mast foot along the world x axis.
    ///
    /// Units: meters
    pub x: f64,

    /// Position of the mast foot along the world z axis.
    ///
    /// Units: meters
    pub z: f64
}

/// Dimensions of the suspended spar platform.
///
/// Half of each extent offsets the rope attachment from the platform's logical centre.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct SparDims {
    /// Extent of the spar along the world x axis.
    ///
    /// Units: meters
    pub width: f64,

    /// Extent of the spar along the world z axis.
    ///
    /// Units: meters
    pub length: f64
}
