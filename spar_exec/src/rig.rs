//! # Rig configuration
//!
//! The rig is the fixed physical arrangement the spar hangs in: a set of anchor masts whose
//! footprint must form a simple polygon, and the spar platform itself. The configuration is
//! loaded once at start up and validated before any module touches it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use geo::{coord, Area, Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

// Internal
use comms_if::rig::{Mast, SparDims};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Minimum number of masts required to suspend the spar.
pub const MIN_NUM_MASTS: usize = 3;

/// Footprint areas below this are treated as degenerate (collinear masts).
///
/// Units: square meters
const MIN_FOOTPRINT_AREA_M2: f64 = 1e-9;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Static configuration of the rig, loaded from `rig.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigConfig {
    /// The anchor masts, in rope order. The (x, z) footprints must form a simple polygon when
    /// taken in this order.
    pub masts: Vec<Mast>,

    /// Dimensions of the spar platform.
    pub spar: SparDims,

    /// If true the visualisation displays its coordinate axes helper.
    #[serde(default)]
    pub show_axes: bool
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Errors detected while validating a rig configuration.
#[derive(Debug, thiserror::Error)]
pub enum RigError {
    #[error("At least 3 masts are required to suspend the spar, found {0}")]
    TooFewMasts(usize),

    #[error("Mast {0} has a non-positive height ({1} m)")]
    NonPositiveMastHeight(usize, f64),

    #[error("Mast {0} has a non-finite position or height")]
    NonFiniteMast(usize),

    #[error("The mast footprints are collinear, they do not enclose a workspace")]
    DegenerateFootprint,

    #[error("The spar dimensions must be finite and non-negative, found {0} x {1} m")]
    InvalidSparDims(f64, f64)
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl RigConfig {
    /// Validate the configuration, failing fast on anything that would poison the geometry
    /// downstream.
    pub fn validate(&self) -> Result<(), RigError> {
        if self.masts.len() < MIN_NUM_MASTS {
            return Err(RigError::TooFewMasts(self.masts.len()));
        }

        for (i, mast) in self.masts.iter().enumerate() {
            if !(mast.x.is_finite() && mast.z.is_finite() && mast.height.is_finite()) {
                return Err(RigError::NonFiniteMast(i));
            }
            if mast.height <= 0.0 {
                return Err(RigError::NonPositiveMastHeight(i, mast.height));
            }
        }

        if !(self.spar.width.is_finite() && self.spar.length.is_finite())
            || self.spar.width < 0.0
            || self.spar.length < 0.0
        {
            return Err(RigError::InvalidSparDims(self.spar.width, self.spar.length));
        }

        if self.footprint_polygon().unsigned_area() < MIN_FOOTPRINT_AREA_M2 {
            return Err(RigError::DegenerateFootprint);
        }

        Ok(())
    }

    /// Build the footprint polygon from the mast (x, z) positions in mast order.
    ///
    /// The polygon's y axis is the world z axis, heights play no part in the footprint.
    pub fn footprint_polygon(&self) -> Polygon<f64> {
        let ring: Vec<Coord<f64>> = self
            .masts
            .iter()
            .map(|m| coord! { x: m.x, y: m.z })
            .collect();

        Polygon::new(LineString::from(ring), vec![])
    }

    /// The lowest rope anchor height on the rig.
    ///
    /// Returns `None` if there are no masts.
    pub fn min_mast_height(&self) -> Option<f64> {
        self.masts
            .iter()
            .map(|m| m.height)
            .fold(None, |min, h| match min {
                Some(m) if m <= h => Some(m),
                _ => Some(h)
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// The reference rig: four 5 m masts on a 10 x 6 m rectangle.
    fn test_rig() -> RigConfig {
        RigConfig {
            masts: vec![
                Mast { height: 5.0, x: -5.0, z: -3.0 },
                Mast { height: 5.0, x: 5.0, z: -3.0 },
                Mast { height: 5.0, x: 5.0, z: 3.0 },
                Mast { height: 5.0, x: -5.0, z: 3.0 },
            ],
            spar: SparDims { width: 0.5, length: 0.3 },
            show_axes: false
        }
    }

    #[test]
    fn test_valid_rig() {
        assert!(test_rig().validate().is_ok());
        assert_eq!(test_rig().min_mast_height(), Some(5.0));
    }

    #[test]
    fn test_too_few_masts() {
        let mut rig = test_rig();
        rig.masts.truncate(2);

        assert!(matches!(rig.validate(), Err(RigError::TooFewMasts(2))));
    }

    #[test]
    fn test_collinear_footprint() {
        let rig = RigConfig {
            masts: vec![
                Mast { height: 5.0, x: 0.0, z: 0.0 },
                Mast { height: 5.0, x: 1.0, z: 1.0 },
                Mast { height: 5.0, x: 2.0, z: 2.0 },
            ],
            spar: SparDims::default(),
            show_axes: false
        };

        assert!(matches!(rig.validate(), Err(RigError::DegenerateFootprint)));
    }

    #[test]
    fn test_non_positive_height() {
        let mut rig = test_rig();
        rig.masts[1].height = 0.0;

        assert!(matches!(
            rig.validate(),
            Err(RigError::NonPositiveMastHeight(1, _))
        ));
    }
}
