//! Implementations for the RopeCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use super::RopeCtrlError;
use crate::rig::{RigConfig, RigError};
use crate::traj_ctrl::SparState;
use util::{module::State, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Rope kinematics module state
#[derive(Default)]
pub struct RopeCtrl {
    /// The rig the ropes hang in, set at init.
    pub(crate) rig: RigConfig,

    pub(crate) report: StatusReport
}

/// A single rope's demanded state.
///
/// Ropes have no persistent identity beyond the cycle, the full set is recomputed from the
/// spar position every time.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct RopeState {
    /// Demanded rope length at full precision, rounding for presentation happens at the
    /// publication boundary only.
    ///
    /// Units: meters
    pub length_m: f64
}

/// Status report for RopeCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Shortest demanded rope length this cycle.
    ///
    /// Units: meters
    pub min_length_m: f64,

    /// Longest demanded rope length this cycle.
    ///
    /// Units: meters
    pub max_length_m: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for RopeCtrl {
    type InitData = RigConfig;
    type InitError = RigError;

    type InputData = SparState;
    type OutputData = Vec<RopeState>;
    type StatusReport = StatusReport;
    type ProcError = RopeCtrlError;

    /// Initialise the RopeCtrl module.
    ///
    /// Expected init data is the rig configuration, which is re-validated here so that the
    /// module cannot be handed an unchecked rig.
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        init_data.validate()?;
        self.rig = init_data;

        Ok(())
    }

    /// Perform cyclic processing of the rope kinematics.
    ///
    /// Deterministic and pure in the spar position, same input always yields the same
    /// lengths.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        if self.rig.masts.is_empty() {
            return Err(RopeCtrlError::NotInitialised);
        }

        self.report = StatusReport {
            min_length_m: f64::INFINITY,
            max_length_m: 0.0
        };

        // The same half-extent offset is subtracted from every mast's relative position,
        // not a per-corner attachment point.
        let half_width_m = self.rig.spar.width / 2.0;
        let half_length_m = self.rig.spar.length / 2.0;

        let mut ropes = Vec::with_capacity(self.rig.masts.len());

        for (i, mast) in self.rig.masts.iter().enumerate() {
            let dx_m = mast.x - input_data.x_m - half_width_m;
            let dz_m = mast.z - input_data.z_m - half_length_m;
            let dy_m = input_data.y_m - mast.height;

            let length_m = Vector3::new(dx_m, dy_m, dz_m).norm();

            if !length_m.is_finite() {
                return Err(RopeCtrlError::NonFiniteLength(i));
            }

            self.report.min_length_m = self.report.min_length_m.min(length_m);
            self.report.max_length_m = self.report.max_length_m.max(length_m);

            ropes.push(RopeState { length_m });
        }

        trace!("RopeCtrl lengths: {:?}", ropes);

        Ok((ropes, self.report))
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use comms_if::rig::{Mast, SparDims};

    use super::*;

    /// The reference rig: four 5 m masts on a 10 x 6 m rectangle, 0.5 x 0.3 m spar.
    fn test_ctrl() -> RopeCtrl {
        RopeCtrl {
            rig: RigConfig {
                masts: vec![
                    Mast { height: 5.0, x: -5.0, z: -3.0 },
                    Mast { height: 5.0, x: 5.0, z: -3.0 },
                    Mast { height: 5.0, x: 5.0, z: 3.0 },
                    Mast { height: 5.0, x: -5.0, z: 3.0 },
                ],
                spar: SparDims { width: 0.5, length: 0.3 },
                show_axes: false
            },
            report: StatusReport::default()
        }
    }

    fn spar(x_m: f64, y_m: f64, z_m: f64) -> SparState {
        SparState { x_m, y_m, z_m }
    }

    #[test]
    fn test_reference_scenario() {
        let mut ctrl = test_ctrl();

        let (ropes, report) = ctrl.proc(&spar(0.0, 1.0, 0.0)).unwrap();

        assert_eq!(ropes.len(), 4);

        // Per-mast: dx = mast.x - 0.25, dz = mast.z - 0.15, dy = -4. The uniform corner
        // offset makes the four lengths differ even though the spar sits at the centre.
        let expected = [
            (5.25f64.powi(2) + 16.0 + 3.15f64.powi(2)).sqrt(),
            (4.75f64.powi(2) + 16.0 + 3.15f64.powi(2)).sqrt(),
            (4.75f64.powi(2) + 16.0 + 2.85f64.powi(2)).sqrt(),
            (5.25f64.powi(2) + 16.0 + 2.85f64.powi(2)).sqrt(),
        ];

        for (rope, exp) in ropes.iter().zip(expected.iter()) {
            assert_relative_eq!(rope.length_m, *exp, epsilon = 1e-12);
        }

        assert_relative_eq!(report.min_length_m, expected[2], epsilon = 1e-12);
        assert_relative_eq!(report.max_length_m, expected[0], epsilon = 1e-12);
    }

    #[test]
    fn test_symmetric_rig_with_point_spar() {
        let mut ctrl = test_ctrl();
        ctrl.rig.spar = SparDims::default();

        // With a zero-size spar the symmetry is exact and all four ropes match
        let (ropes, _) = ctrl.proc(&spar(0.0, 1.0, 0.0)).unwrap();

        let expected = (25.0f64 + 16.0 + 9.0).sqrt();
        for rope in &ropes {
            assert_relative_eq!(rope.length_m, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_spar_at_mast_top_keeps_corner_offset() {
        let mut ctrl = test_ctrl();

        // Sitting exactly at a mast's anchor the rope still spans the fixed corner offset,
        // it never reaches zero
        let (ropes, _) = ctrl.proc(&spar(-5.0, 5.0, -3.0)).unwrap();

        let expected = (0.25f64.powi(2) + 0.15f64.powi(2)).sqrt();
        assert_relative_eq!(ropes[0].length_m, expected, epsilon = 1e-12);
        assert!(ropes[0].length_m > 0.0);
    }

    #[test]
    fn test_deterministic() {
        let mut ctrl = test_ctrl();

        let a = ctrl.proc(&spar(1.2, 2.3, -0.7)).unwrap().0;
        let b = ctrl.proc(&spar(1.2, 2.3, -0.7)).unwrap().0;

        assert_eq!(a, b);
    }

    #[test]
    fn test_not_initialised() {
        let mut ctrl = RopeCtrl::default();

        assert!(matches!(
            ctrl.proc(&spar(0.0, 1.0, 0.0)),
            Err(RopeCtrlError::NotInitialised)
        ));
    }
}
