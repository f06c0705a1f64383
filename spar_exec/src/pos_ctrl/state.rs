//! Implementations for the PosCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{Params, PosCtrlError, PosCtrlInitError, WorkspaceBounds};
use crate::cmd_gen::CommandedPosition;
use crate::rig::RigConfig;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Position constraint module state
#[derive(Default)]
pub struct PosCtrl {
    pub(crate) params: Params,

    /// The workspace bounds, computed once at init from the rig.
    pub(crate) bounds: Option<WorkspaceBounds>,

    pub(crate) report: StatusReport
}

/// Constrained target position produced by PosCtrl.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct TargetPos {
    /// Target position along the world x axis.
    ///
    /// Units: meters
    pub x_m: f64,

    /// Target height above the ground plane.
    ///
    /// Units: meters
    pub y_m: f64,

    /// Target position along the world z axis.
    ///
    /// Units: meters
    pub z_m: f64
}

/// Status report for PosCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// If true the horizontal command was pushed back towards the safe zone.
    pub horiz_limited: bool,

    /// Strength of the horizontal push-back, 0 at the danger zone boundary saturating to 1.
    pub push_back_force: f64,

    /// If true the commanded height was saturated.
    pub height_limited: bool,

    /// If true the geometry could not answer for the command and the target was clamped to
    /// the footprint centroid.
    pub centroid_fallback: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for PosCtrl {
    type InitData = (&'static str, RigConfig);
    type InitError = PosCtrlInitError;

    type InputData = CommandedPosition;
    type OutputData = TargetPos;
    type StatusReport = StatusReport;
    type ProcError = PosCtrlError;

    /// Initialise the PosCtrl module.
    ///
    /// Expected init data is the path to the parameter file and the validated rig
    /// configuration. The workspace bounds are computed here, once.
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        let (params_path, rig) = init_data;

        self.params = params::load(params_path)?;

        let bounds = WorkspaceBounds::compute(&rig, &self.params);

        // A zero margin means the constraint has nothing to work with
        if !(bounds.margin_m > 0.0) || !bounds.margin_m.is_finite() {
            return Err(PosCtrlInitError::DegenerateFootprint);
        }

        // The height band must be the right way up
        if bounds.min_height_m <= bounds.min_allowed_height_m {
            return Err(PosCtrlInitError::InvalidHeightRange(
                bounds.min_height_m,
                bounds.min_allowed_height_m
            ));
        }

        self.bounds = Some(bounds);

        Ok(())
    }

    /// Perform cyclic processing of position constraint.
    ///
    /// Pure per-cycle function of the command and the bounds, no state persists between
    /// cycles other than the bounds themselves.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Clear the status report
        self.report = StatusReport::default();

        let (x_m, z_m) = self.calc_horizontal_target(input_data)?;
        let y_m = self.calc_height_target(input_data.y_m)?;

        let output = TargetPos { x_m, y_m, z_m };

        trace!("PosCtrl output: {:?}", output);

        Ok((output, self.report))
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use comms_if::rig::{Mast, SparDims};
    use geo::EuclideanDistance;
    use geo::Point;

    use super::*;

    /// Build an initialised PosCtrl over the reference rig without touching the filesystem.
    fn test_ctrl() -> PosCtrl {
        let params = Params {
            margin_factor: 0.05,
            danger_zone_factor: 0.3,
            height_clearance_m: 0.3,
            min_allowed_height_m: 0.2
        };

        let rig = RigConfig {
            masts: vec![
                Mast { height: 5.0, x: -5.0, z: -3.0 },
                Mast { height: 5.0, x: 5.0, z: -3.0 },
                Mast { height: 5.0, x: 5.0, z: 3.0 },
                Mast { height: 5.0, x: -5.0, z: 3.0 },
            ],
            spar: SparDims { width: 0.5, length: 0.3 },
            show_axes: false
        };

        let bounds = WorkspaceBounds::compute(&rig, &params);

        PosCtrl {
            params,
            bounds: Some(bounds),
            report: StatusReport::default()
        }
    }

    fn cmd(x_m: f64, y_m: f64, z_m: f64) -> CommandedPosition {
        CommandedPosition { x_m, y_m, z_m }
    }

    #[test]
    fn test_identity_inside_danger_zone() {
        let mut ctrl = test_ctrl();

        for &(x, z) in &[(0.0, 0.0), (2.5, -1.5), (-4.0, 2.0), (4.5, 0.0)] {
            let (out, report) = ctrl.proc(&cmd(x, 1.0, z)).unwrap();

            assert_eq!(out.x_m, x);
            assert_eq!(out.z_m, z);
            assert!(!report.horiz_limited);
        }
    }

    #[test]
    fn test_far_outside_saturates_onto_safe_boundary() {
        let mut ctrl = test_ctrl();

        let (out, report) = ctrl.proc(&cmd(100.0, 1.0, 100.0)).unwrap();

        assert!(report.horiz_limited);
        assert_relative_eq!(report.push_back_force, 1.0, epsilon = 1e-12);

        // At saturation the output is the boundary projection itself
        let bounds = ctrl.bounds.as_ref().unwrap();
        let out_point = Point::new(out.x_m, out.z_m);
        let dist = out_point.euclidean_distance(bounds.safe_zone.exterior());
        assert!(dist < 1e-9);
    }

    #[test]
    fn test_partial_push_back_between_zones() {
        let mut ctrl = test_ctrl();
        let margin = ctrl.bounds.as_ref().unwrap().margin_m;

        // Just outside the danger zone on the +x edge
        let x = 5.0 - margin * 0.3 + 0.05;
        let (out, report) = ctrl.proc(&cmd(x, 1.0, 0.0)).unwrap();

        assert!(report.horiz_limited);
        assert!(report.push_back_force > 0.0);
        assert!(report.push_back_force < 1.0);

        // The output sits between the safe boundary and the command
        assert!(out.x_m < x);
        assert!(out.x_m > 5.0 - 2.0 * margin);
        assert_eq!(out.z_m, 0.0);
    }

    #[test]
    fn test_height_saturation() {
        let mut ctrl = test_ctrl();

        let (out, report) = ctrl.proc(&cmd(0.0, 100.0, 0.0)).unwrap();
        assert_relative_eq!(out.y_m, 4.7, epsilon = 1e-12);
        assert!(report.height_limited);

        let (out, report) = ctrl.proc(&cmd(0.0, -100.0, 0.0)).unwrap();
        assert_relative_eq!(out.y_m, 0.2, epsilon = 1e-12);
        assert!(report.height_limited);

        let (out, report) = ctrl.proc(&cmd(0.0, 1.3, 0.0)).unwrap();
        assert_relative_eq!(out.y_m, 1.3, epsilon = 1e-12);
        assert!(!report.height_limited);

        // Infinities saturate like any other out of range height
        let (out, _) = ctrl.proc(&cmd(0.0, f64::INFINITY, 0.0)).unwrap();
        assert_relative_eq!(out.y_m, 4.7, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_command_clamps_to_centroid() {
        let mut ctrl = test_ctrl();

        let (out, report) = ctrl.proc(&cmd(f64::NAN, f64::NAN, 100.0)).unwrap();

        assert!(report.centroid_fallback);
        assert_relative_eq!(out.x_m, 0.0, epsilon = 1e-12);
        assert_relative_eq!(out.z_m, 0.0, epsilon = 1e-12);

        // The NaN height lands on the floor, never in the output
        assert_relative_eq!(out.y_m, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_not_initialised() {
        let mut ctrl = PosCtrl::default();

        assert!(matches!(
            ctrl.proc(&cmd(0.0, 1.0, 0.0)),
            Err(PosCtrlError::NotInitialised)
        ));
    }
}
