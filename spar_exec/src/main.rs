//! Main spar-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop (50 Hz):
//!         - Controller input acquisition
//!         - Command generation (controller integration or fallback trajectory)
//!         - Position constraint processing
//!         - Trajectory filter processing
//!         - Rope kinematics processing
//!         - Visualisation publication
//!
//! A separate poll thread drains the controller bridge at 100 Hz, decoupled from the main
//! loop by a shared snapshot cell. Both loops honour a stop token checked once per cycle.
//!
//! # Modules
//!
//! All modules (e.g. `pos_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use spar_lib::{
    cmd_gen::{self, CmdSource},
    ctrl_client::{self, ControlsCell, CtrlClient},
    data_store::DataStore,
    params::SparExecParams,
    rig::RigConfig,
    traj_ctrl,
    viz_server::VizServer,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
    stop::StopToken,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "spar_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Spar Rig Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: SparExecParams = util::params::load(
        "spar_exec.toml"
    ).wrap_err("Could not load exec params")?;

    let rig: RigConfig = util::params::load(
        "rig.toml"
    ).wrap_err("Could not load the rig configuration")?;

    // Configuration errors must surface here, not mid-loop
    rig.validate().wrap_err("Invalid rig configuration")?;

    info!(
        "Exec parameters loaded, rig has {} masts and a {} x {} m spar",
        rig.masts.len(),
        rig.spar.width,
        rig.spar.length
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();
    ds.rig = rig.clone();

    // ---- INITIALISE MODULES ----

    ds.cmd_gen.init("cmd_gen.toml", &session)
        .wrap_err("Failed to initialise CmdGen")?;
    info!("CmdGen init complete");

    ds.pos_ctrl.init(("pos_ctrl.toml", rig.clone()), &session)
        .wrap_err("Failed to initialise PosCtrl")?;
    info!("PosCtrl init complete");

    ds.traj_ctrl.init("traj_ctrl.toml", &session)
        .wrap_err("Failed to initialise TrajCtrl")?;
    info!("TrajCtrl init complete");

    ds.rope_ctrl.init(rig, &session)
        .wrap_err("Failed to initialise RopeCtrl")?;
    info!("RopeCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let zmq_ctx = comms_if::net::zmq::Context::new();

    let mut viz_server = {
        let s = VizServer::new(&zmq_ctx, &exec_params)
            .wrap_err("Failed to initialise VizServer")?;
        info!("VizServer initialised");
        s
    };

    let ctrl_client = {
        let c = CtrlClient::new(&zmq_ctx, &exec_params)
            .wrap_err("Failed to initialise CtrlClient")?;
        info!("CtrlClient initialised");
        c
    };

    info!("Network initialisation complete");

    // ---- START CONTROLLER POLL THREAD ----

    let stop_token = StopToken::new();
    let controls = Arc::new(ControlsCell::new());

    let poll_handle = ctrl_client::spawn_poll_thread(
        ctrl_client,
        controls.clone(),
        stop_token.clone()
    );
    info!("Controller poll thread started");

    // Send the static configuration so an already-connected visualisation can build the
    // scene before the first dynamic payload arrives.
    match viz_server.send_static(&ds.rig) {
        Ok(_) => (),
        Err(e) => warn!("Could not send the static viz payload: {}", e)
    };

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut fallback_active = false;

    while !stop_token.is_requested() {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- INPUT ACQUISITION ----

        ds.cmd_gen_input = cmd_gen::InputData {
            ctrl: controls.latest(exec_params.ctrl_stale_limit_s),
            time_s: ds.sim_time_s
        };

        // ---- CONTROL ALGORITHM PROCESSING ----

        // CmdGen processing
        match ds.cmd_gen.proc(&ds.cmd_gen_input) {
            Ok((o, r)) => {
                ds.cmd_gen_output = o;
                ds.cmd_gen_status_rpt = r;
            },
            Err(e) => warn!("Error during CmdGen processing: {}", e)
        };

        // Log command source transitions
        let on_fallback = ds.cmd_gen_status_rpt.source == CmdSource::Fallback;
        if on_fallback != fallback_active {
            if on_fallback {
                warn!("No controller input, fallback trajectory active");
            } else {
                info!("Controller input active");
            }
            fallback_active = on_fallback;
        }

        // The controller can request a clean shutdown
        if ds.cmd_gen_status_rpt.stop_requested {
            info!("Stop requested from the controller");
            stop_token.request();
        }

        // PosCtrl processing
        match ds.pos_ctrl.proc(&ds.cmd_gen_output) {
            Ok((o, r)) => {
                ds.pos_ctrl_output = o;
                ds.pos_ctrl_status_rpt = r;
            },
            Err(e) => warn!("Error during PosCtrl processing: {}", e)
        };

        // TrajCtrl processing
        ds.traj_ctrl_input = traj_ctrl::InputData {
            target: ds.pos_ctrl_output,
            dt_s: CYCLE_PERIOD_S
        };

        match ds.traj_ctrl.proc(&ds.traj_ctrl_input) {
            Ok((o, r)) => {
                ds.traj_ctrl_output = o;
                ds.traj_ctrl_status_rpt = r;
            },
            Err(e) => warn!("Error during TrajCtrl processing: {}", e)
        };

        // RopeCtrl processing
        match ds.rope_ctrl.proc(&ds.traj_ctrl_output) {
            Ok((o, r)) => {
                ds.rope_ctrl_output = o;
                ds.rope_ctrl_status_rpt = r;
            },
            Err(e) => warn!("Error during RopeCtrl processing: {}", e)
        };

        // ---- TELEMETRY ----

        // Re-publish the static configuration on the 1Hz so late joiners can build the scene
        if ds.is_1_hz_cycle {
            match viz_server.send_static(&ds.rig) {
                Ok(_) => (),
                Err(e) => warn!("Could not send the static viz payload: {}", e)
            };
        }

        match viz_server.send_dyn(&ds) {
            Ok(_) => (),
            Err(e) => warn!("VizServer error: {}", e)
        };

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S)
            .checked_sub(cycle_dur)
        {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64()
                        - Duration::from_secs_f64(CYCLE_PERIOD_S).as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!("Stop requested, shutting down");

    match poll_handle.join() {
        Ok(_) => info!("Controller poll thread joined"),
        Err(_) => warn!("Controller poll thread panicked")
    };

    info!("End of execution");

    Ok(())
}
