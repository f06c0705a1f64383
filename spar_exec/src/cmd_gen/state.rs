//! Implementations for the CmdGen state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{CmdGenError, Params};
use comms_if::eqpt::ctrl::CtrlState;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command generation module state
#[derive(Default)]
pub struct CmdGen {
    pub(crate) params: Params,

    /// The commanded position carried between cycles, `None` until the first cycle.
    pub(crate) cmd: Option<CommandedPosition>,

    pub(crate) report: StatusReport
}

/// The raw commanded spar position, before any workspace constraint.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct CommandedPosition {
    /// Commanded position along the world x axis.
    ///
    /// Units: meters
    pub x_m: f64,

    /// Commanded height above the ground plane.
    ///
    /// Units: meters
    pub y_m: f64,

    /// Commanded position along the world z axis.
    ///
    /// Units: meters
    pub z_m: f64
}

/// Input data to command generation.
#[derive(Clone, Default)]
pub struct InputData {
    /// The freshest controller snapshot, or `None` if the controller is absent, stale or
    /// uncompliant.
    pub ctrl: Option<CtrlState>,

    /// Session-elapsed time, which parametrises the fallback trajectory.
    ///
    /// Units: seconds
    pub time_s: f64
}

/// The source that produced this cycle's command.
#[derive(Clone, Copy, Serialize, Debug, PartialEq)]
pub enum CmdSource {
    /// Command integrated from live controller axes.
    Controller,

    /// Command generated by the fallback trajectory.
    Fallback
}

/// Status report for CmdGen processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// The source that produced this cycle's command.
    pub source: CmdSource,

    /// Set if the controller's stop button is pressed.
    pub stop_requested: bool,

    /// Per-axis dead-zone gating flags, in (x, y, z) order. Only meaningful when the source
    /// is the controller.
    pub dead_zone_gated: [bool; 3]
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CmdSource {
    fn default() -> Self {
        CmdSource::Fallback
    }
}

impl State for CmdGen {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = CommandedPosition;
    type StatusReport = StatusReport;
    type ProcError = CmdGenError;

    /// Initialise the CmdGen module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)?;

        Ok(())
    }

    /// Perform cyclic processing of command generation.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        if !input_data.time_s.is_finite() {
            return Err(CmdGenError::NonFiniteTime(input_data.time_s));
        }

        self.report = StatusReport::default();

        let mut cmd = self.cmd.unwrap_or(CommandedPosition {
            x_m: self.params.initial_cmd_m[0],
            y_m: self.params.initial_cmd_m[1],
            z_m: self.params.initial_cmd_m[2]
        });

        match input_data.ctrl {
            Some(ref ctrl) => {
                self.report.source = CmdSource::Controller;

                self.report.stop_requested = ctrl
                    .buttons
                    .get(self.params.stop_button_index)
                    .copied()
                    .unwrap_or(false);

                // Integrate the stick deflections into the command. This is velocity
                // control, holding the stick moves the spar at a steady rate.
                let (dx, gated_x) = self.axis_deflection(ctrl, self.params.x_axis_index);
                let (dy, gated_y) = self.axis_deflection(ctrl, self.params.y_axis_index);
                let (dz, gated_z) = self.axis_deflection(ctrl, self.params.z_axis_index);

                cmd.x_m += dx * self.params.axis_gain_m;
                cmd.y_m += -dy * self.params.axis_gain_m;
                cmd.z_m += dz * self.params.axis_gain_m;

                self.report.dead_zone_gated = [gated_x, gated_y, gated_z];
            }
            None => {
                self.report.source = CmdSource::Fallback;
                cmd = self.fallback_cmd(input_data.time_s);
            }
        }

        self.cmd = Some(cmd);

        trace!("CmdGen output ({:?}): {:?}", self.report.source, cmd);

        Ok((cmd, self.report))
    }
}

impl CmdGen {
    /// Get an axis deflection with the dead-zone applied.
    ///
    /// Returns the deflection and whether the dead-zone gated it to zero. Missing or
    /// non-finite axes read as neutral.
    fn axis_deflection(&self, ctrl: &CtrlState, axis_index: usize) -> (f64, bool) {
        let value = ctrl.axes.get(axis_index).copied().unwrap_or(0.0);

        if !value.is_finite() || value.abs() < self.params.dead_zone {
            (0.0, true)
        } else {
            (value, false)
        }
    }

    /// The closed-form fallback trajectory, a bounded Lissajous-like sweep of the workspace
    /// parametrised by session-elapsed time.
    fn fallback_cmd(&self, time_s: f64) -> CommandedPosition {
        CommandedPosition {
            x_m: self.params.fallback_x_amp_m * time_s.sin(),
            y_m: self.params.fallback_y_base_m
                + self.params.fallback_y_amp_m * (time_s / 2.0).sin(),
            z_m: self.params.fallback_z_amp_m * time_s.cos()
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    fn test_gen() -> CmdGen {
        CmdGen {
            params: Params {
                dead_zone: 0.1,
                axis_gain_m: 0.05,
                x_axis_index: 2,
                y_axis_index: 1,
                z_axis_index: 3,
                stop_button_index: 7,
                initial_cmd_m: [0.0, 1.0, 0.0],
                fallback_x_amp_m: 4.0,
                fallback_y_base_m: 2.2,
                fallback_y_amp_m: 2.0,
                fallback_z_amp_m: 2.5
            },
            cmd: None,
            report: StatusReport::default()
        }
    }

    fn ctrl_input(axes: &[(usize, f64)]) -> InputData {
        let mut state = CtrlState::new(6, 11, 1);
        for &(idx, value) in axes {
            state.axes[idx] = value;
        }

        InputData {
            ctrl: Some(state),
            time_s: 0.0
        }
    }

    #[test]
    fn test_dead_zone_gates_small_deflections() {
        let mut gen = test_gen();

        let (cmd, report) = gen.proc(&ctrl_input(&[(2, 0.05), (3, -0.09)])).unwrap();

        assert_eq!(report.source, CmdSource::Controller);
        assert_eq!(report.dead_zone_gated, [true, true, true]);
        assert_relative_eq!(cmd.x_m, 0.0, epsilon = 1e-12);
        assert_relative_eq!(cmd.y_m, 1.0, epsilon = 1e-12);
        assert_relative_eq!(cmd.z_m, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_axes_integrate_into_command() {
        let mut gen = test_gen();

        let input = ctrl_input(&[(2, 0.5), (3, -1.0), (1, 0.8)]);

        // Two cycles of held deflection accumulate, this is velocity control not position
        // mapping
        gen.proc(&input).unwrap();
        let (cmd, report) = gen.proc(&input).unwrap();

        assert_eq!(report.dead_zone_gated, [false, false, false]);
        assert_relative_eq!(cmd.x_m, 2.0 * 0.5 * 0.05, epsilon = 1e-12);
        assert_relative_eq!(cmd.z_m, 2.0 * -1.0 * 0.05, epsilon = 1e-12);

        // Axis 1 is negated, pushing the stick lowers the spar
        assert_relative_eq!(cmd.y_m, 1.0 - 2.0 * 0.8 * 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_stop_button() {
        let mut gen = test_gen();

        let mut input = ctrl_input(&[]);
        input.ctrl.as_mut().unwrap().buttons[7] = true;

        let (_, report) = gen.proc(&input).unwrap();

        assert!(report.stop_requested);
    }

    #[test]
    fn test_fallback_when_no_controller() {
        let mut gen = test_gen();

        let input = InputData { ctrl: None, time_s: 1.5 };
        let (cmd, report) = gen.proc(&input).unwrap();

        assert_eq!(report.source, CmdSource::Fallback);
        assert_relative_eq!(cmd.x_m, 4.0 * 1.5f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(cmd.y_m, 2.2 + 2.0 * 0.75f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(cmd.z_m, 2.5 * 1.5f64.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_fallback_bounded_and_periodic() {
        let gen = test_gen();

        // The full pattern repeats every 4 pi seconds (the height sweep runs at half rate)
        let period_s = 4.0 * std::f64::consts::PI;

        for i in 0..2000 {
            let t = i as f64 * 0.02;
            let cmd = gen.fallback_cmd(t);

            assert!(cmd.x_m.abs() <= 4.0);
            assert!(cmd.y_m >= 0.2 && cmd.y_m <= 4.2);
            assert!(cmd.z_m.abs() <= 2.5);

            let next_period = gen.fallback_cmd(t + period_s);
            assert_relative_eq!(cmd.x_m, next_period.x_m, epsilon = 1e-9);
            assert_relative_eq!(cmd.y_m, next_period.y_m, epsilon = 1e-9);
            assert_relative_eq!(cmd.z_m, next_period.z_m, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_controller_resumes_from_fallback_position() {
        let mut gen = test_gen();

        // Run on the fallback for a while
        let (fallback_cmd, _) = gen
            .proc(&InputData { ctrl: None, time_s: 2.0 })
            .unwrap();

        // A returning controller integrates from where the fallback left the command
        let (cmd, report) = gen.proc(&ctrl_input(&[(2, 1.0)])).unwrap();

        assert_eq!(report.source, CmdSource::Controller);
        assert_relative_eq!(cmd.x_m, fallback_cmd.x_m + 0.05, epsilon = 1e-12);
        assert_relative_eq!(cmd.y_m, fallback_cmd.y_m, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_time_rejected() {
        let mut gen = test_gen();

        assert!(matches!(
            gen.proc(&InputData { ctrl: None, time_s: f64::NAN }),
            Err(CmdGenError::NonFiniteTime(_))
        ));
    }
}
