//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::{cmd_gen, pos_ctrl, rig::RigConfig, rope_ctrl, traj_ctrl};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time
    pub sim_time_s: f64,

    /// The validated rig configuration
    pub rig: RigConfig,

    // CmdGen
    pub cmd_gen: cmd_gen::CmdGen,
    pub cmd_gen_input: cmd_gen::InputData,
    pub cmd_gen_output: cmd_gen::CommandedPosition,
    pub cmd_gen_status_rpt: cmd_gen::StatusReport,

    // PosCtrl
    pub pos_ctrl: pos_ctrl::PosCtrl,
    pub pos_ctrl_output: pos_ctrl::TargetPos,
    pub pos_ctrl_status_rpt: pos_ctrl::StatusReport,

    // TrajCtrl
    pub traj_ctrl: traj_ctrl::TrajCtrl,
    pub traj_ctrl_input: traj_ctrl::InputData,
    pub traj_ctrl_output: traj_ctrl::SparState,
    pub traj_ctrl_status_rpt: traj_ctrl::StatusReport,

    // RopeCtrl
    pub rope_ctrl: rope_ctrl::RopeCtrl,
    pub rope_ctrl_output: Vec<rope_ctrl::RopeState>,
    pub rope_ctrl_status_rpt: rope_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the per-cycle inputs and status reports and sets the 1Hz cycle flag. Module
    /// outputs are deliberately kept, if a module errors mid-loop the last good output is
    /// published rather than a zeroed one.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.cmd_gen_input = cmd_gen::InputData::default();
        self.traj_ctrl_input = traj_ctrl::InputData::default();

        self.cmd_gen_status_rpt = cmd_gen::StatusReport::default();
        self.pos_ctrl_status_rpt = pos_ctrl::StatusReport::default();
        self.traj_ctrl_status_rpt = traj_ctrl::StatusReport::default();
        self.rope_ctrl_status_rpt = rope_ctrl::StatusReport::default();

        self.sim_time_s = util::session::get_elapsed_seconds();
    }
}
