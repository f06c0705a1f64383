//! Implementations for the TrajCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use super::{Params, TrajCtrlError};
use crate::pos_ctrl::TargetPos;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Trajectory filter module state
#[derive(Default)]
pub struct TrajCtrl {
    pub(crate) params: Params,

    /// The persistent filter state, seeded from the first target and never reset afterwards.
    pub(crate) filter: Option<FilterState>,

    pub(crate) report: StatusReport
}

/// The spring-damper filter's persistent state.
#[derive(Clone, Copy, Debug)]
pub struct FilterState {
    /// Current filter position, which is the commanded spar position.
    ///
    /// Units: meters
    pub position_m: Vector3<f64>,

    /// Current filter velocity.
    ///
    /// Added to the position once per cycle without timestep scaling, the damping and spring
    /// constants are tuned for that update form. Units: meters per cycle.
    pub velocity_m: Vector3<f64>
}

/// Input data to the trajectory filter.
#[derive(Clone, Copy, Default)]
pub struct InputData {
    /// The constrained target to move towards.
    pub target: TargetPos,

    /// Timestep of this cycle.
    ///
    /// Units: seconds
    pub dt_s: f64
}

/// The smoothed spar position output each cycle.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct SparState {
    /// Spar position along the world x axis.
    ///
    /// Units: meters
    pub x_m: f64,

    /// Spar height above the ground plane.
    ///
    /// Units: meters
    pub y_m: f64,

    /// Spar position along the world z axis.
    ///
    /// Units: meters
    pub z_m: f64
}

/// Status report for TrajCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Distance between the filter position and the target after this cycle.
    ///
    /// Units: meters
    pub dist_to_target_m: f64,

    /// Magnitude of the filter velocity after this cycle.
    ///
    /// Units: meters per cycle
    pub speed_m: f64,

    /// True on the cycle that seeded the filter.
    pub seeded: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for TrajCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = SparState;
    type StatusReport = StatusReport;
    type ProcError = TrajCtrlError;

    /// Initialise the TrajCtrl module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)?;

        // The filter is deliberately not touched here, it seeds itself lazily from the first
        // target so that a re-init cannot snap the spar.

        Ok(())
    }

    /// Perform cyclic processing of the trajectory filter.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport::default();

        let t = input_data.target;
        if !(t.x_m.is_finite() && t.y_m.is_finite() && t.z_m.is_finite()) {
            return Err(TrajCtrlError::NonFiniteTarget(t));
        }

        if !(input_data.dt_s > 0.0) || !input_data.dt_s.is_finite() {
            return Err(TrajCtrlError::InvalidTimestep(input_data.dt_s));
        }

        let target = Vector3::new(t.x_m, t.y_m, t.z_m);

        // Seed the filter on the spar's first ever target
        self.report.seeded = self.filter.is_none();
        let filter = self.filter.get_or_insert_with(|| FilterState {
            position_m: target,
            velocity_m: Vector3::zeros()
        });

        // Per-axis spring-damper update. The spring force is softened as the displacement
        // grows, which avoids violent acceleration on large commanded steps.
        for i in 0..3 {
            let delta = target[i] - filter.position_m[i];
            let softening = 1.0 - delta.abs() / (delta.abs() + 1.0);
            let accel = delta * self.params.spring_constant * softening;

            filter.velocity_m[i] =
                (filter.velocity_m[i] + accel * input_data.dt_s) * self.params.damping;
            filter.position_m[i] += filter.velocity_m[i];
        }

        self.report.dist_to_target_m = (target - filter.position_m).norm();
        self.report.speed_m = filter.velocity_m.norm();

        let output = SparState {
            x_m: filter.position_m[0],
            y_m: filter.position_m[1],
            z_m: filter.position_m[2]
        };

        trace!("TrajCtrl output: {:?}", output);

        Ok((output, self.report))
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    const DT_S: f64 = 0.02;

    fn test_ctrl() -> TrajCtrl {
        TrajCtrl {
            params: Params {
                spring_constant: 0.15,
                damping: 0.95
            },
            filter: None,
            report: StatusReport::default()
        }
    }

    fn target(x_m: f64, y_m: f64, z_m: f64) -> InputData {
        InputData {
            target: TargetPos { x_m, y_m, z_m },
            dt_s: DT_S
        }
    }

    #[test]
    fn test_first_cycle_seeds_filter() {
        let mut ctrl = test_ctrl();

        let (out, report) = ctrl.proc(&target(1.0, 2.0, -3.0)).unwrap();

        assert!(report.seeded);
        assert_relative_eq!(out.x_m, 1.0, epsilon = 1e-12);
        assert_relative_eq!(out.y_m, 2.0, epsilon = 1e-12);
        assert_relative_eq!(out.z_m, -3.0, epsilon = 1e-12);
        assert_relative_eq!(report.speed_m, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_converges_to_held_target() {
        let mut ctrl = test_ctrl();

        // Seed at the origin, then hold a step target
        ctrl.proc(&target(0.0, 1.0, 0.0)).unwrap();

        let step = target(2.0, 1.5, -1.2);
        let mut out = SparState::default();
        for _ in 0..5000 {
            out = ctrl.proc(&step).unwrap().0;
        }

        assert_relative_eq!(out.x_m, 2.0, epsilon = 1e-3);
        assert_relative_eq!(out.y_m, 1.5, epsilon = 1e-3);
        assert_relative_eq!(out.z_m, -1.2, epsilon = 1e-3);
        assert!(ctrl.report.speed_m < 1e-4);
    }

    #[test]
    fn test_steady_state_is_idempotent() {
        let mut ctrl = test_ctrl();

        let held = target(0.5, 1.0, 0.5);
        for _ in 0..5000 {
            ctrl.proc(&held).unwrap();
        }

        let (before, _) = ctrl.proc(&held).unwrap();
        let (after, _) = ctrl.proc(&held).unwrap();

        assert_relative_eq!(before.x_m, after.x_m, epsilon = 1e-9);
        assert_relative_eq!(before.y_m, after.y_m, epsilon = 1e-9);
        assert_relative_eq!(before.z_m, after.z_m, epsilon = 1e-9);
    }

    #[test]
    fn test_motion_is_continuous_across_target_jump() {
        let mut ctrl = test_ctrl();

        ctrl.proc(&target(0.0, 1.0, 0.0)).unwrap();

        // A huge target jump must not teleport the spar, the soft saturation caps the spring
        // force so the first-cycle displacement stays small
        let (out, report) = ctrl.proc(&target(1000.0, 1.0, 0.0)).unwrap();

        assert!(!report.seeded);
        assert!(out.x_m.abs() < 0.01);
        assert!(report.speed_m < 0.01);
    }

    #[test]
    fn test_filter_state_never_reset() {
        let mut ctrl = test_ctrl();

        ctrl.proc(&target(0.0, 1.0, 0.0)).unwrap();
        for _ in 0..100 {
            ctrl.proc(&target(2.0, 1.0, 0.0)).unwrap();
        }
        let mid = ctrl.filter.unwrap().position_m;

        // A new target continues from the current state rather than re-seeding
        let (out, report) = ctrl.proc(&target(-2.0, 1.0, 0.0)).unwrap();

        assert!(!report.seeded);
        assert!((out.x_m - mid[0]).abs() < 0.1);
    }

    #[test]
    fn test_non_finite_target_rejected() {
        let mut ctrl = test_ctrl();

        ctrl.proc(&target(0.0, 1.0, 0.0)).unwrap();
        let pos_before = ctrl.filter.unwrap().position_m;

        assert!(matches!(
            ctrl.proc(&target(f64::NAN, 1.0, 0.0)),
            Err(TrajCtrlError::NonFiniteTarget(_))
        ));

        // The filter state is untouched by the rejected cycle
        assert_eq!(ctrl.filter.unwrap().position_m, pos_before);
    }

    #[test]
    fn test_invalid_timestep_rejected() {
        let mut ctrl = test_ctrl();

        let input = InputData {
            target: TargetPos { x_m: 0.0, y_m: 1.0, z_m: 0.0 },
            dt_s: 0.0
        };

        assert!(matches!(
            ctrl.proc(&input),
            Err(TrajCtrlError::InvalidTimestep(_))
        ));
    }
}
