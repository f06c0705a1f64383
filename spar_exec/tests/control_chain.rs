//! End-to-end control chain test
//!
//! Drives the full module chain the way the exec's main loop does, without the network: the
//! fallback trajectory feeds the constraint solver, the filter and the rope kinematics for a
//! minute of simulated time, and every intermediate quantity must stay bounded.

use spar_lib::{
    cmd_gen::{self, CmdGen, CmdSource},
    pos_ctrl::PosCtrl,
    rig::RigConfig,
    rope_ctrl::RopeCtrl,
    traj_ctrl::{self, TrajCtrl},
};
use util::{module::State, session::Session};

/// Control cycle period, matching the exec.
const DT_S: f64 = 0.02;

#[test]
fn test_fallback_chain_is_bounded() {
    // Point the software root at the repository so the shipped parameter files are the ones
    // exercised here
    std::env::set_var("SPAR_SW_ROOT", concat!(env!("CARGO_MANIFEST_DIR"), "/.."));

    let session = Session::new("control_chain_test", "sessions").unwrap();

    let rig: RigConfig = util::params::load("rig.toml").unwrap();
    rig.validate().unwrap();

    let mut cmd_gen_mod = CmdGen::default();
    cmd_gen_mod.init("cmd_gen.toml", &session).unwrap();

    let mut pos_ctrl_mod = PosCtrl::default();
    pos_ctrl_mod
        .init(("pos_ctrl.toml", rig.clone()), &session)
        .unwrap();

    let mut traj_ctrl_mod = TrajCtrl::default();
    traj_ctrl_mod.init("traj_ctrl.toml", &session).unwrap();

    let mut rope_ctrl_mod = RopeCtrl::default();
    rope_ctrl_mod.init(rig, &session).unwrap();

    // A minute of cycles with no controller present
    for i in 0..3000 {
        let time_s = i as f64 * DT_S;

        let (cmd, cmd_rpt) = cmd_gen_mod
            .proc(&cmd_gen::InputData { ctrl: None, time_s })
            .unwrap();
        assert_eq!(cmd_rpt.source, CmdSource::Fallback);

        let (target, _) = pos_ctrl_mod.proc(&cmd).unwrap();

        // The constrained height never leaves the allowed band
        assert!(target.y_m >= 0.2 && target.y_m <= 4.7);

        let (spar, _) = traj_ctrl_mod
            .proc(&traj_ctrl::InputData { target, dt_s: DT_S })
            .unwrap();

        // The filtered spar stays inside the rig, no divergence
        assert!(spar.x_m.abs() <= 5.0);
        assert!(spar.z_m.abs() <= 3.0);
        assert!(spar.y_m >= 0.0 && spar.y_m <= 5.0);

        let (ropes, _) = rope_ctrl_mod.proc(&spar).unwrap();

        assert_eq!(ropes.len(), 4);
        for rope in &ropes {
            assert!(rope.length_m.is_finite());
            assert!(rope.length_m >= 0.0);
        }
    }
}
