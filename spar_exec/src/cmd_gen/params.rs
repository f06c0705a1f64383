//! Parameters structure for CmdGen

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for command generation.
#[derive(Debug, Default, Deserialize)]
pub struct Params {

    // ---- CONTROLLER MAPPING ----

    /// Axis deflections with a magnitude below this are treated as neutral.
    pub dead_zone: f64,

    /// Distance integrated into the command per cycle at full axis deflection.
    ///
    /// Units: meters
    pub axis_gain_m: f64,

    /// Controller axis driving the x command.
    pub x_axis_index: usize,

    /// Controller axis driving the y command. Deflection is negated, pushing the stick
    /// forward lowers the spar.
    pub y_axis_index: usize,

    /// Controller axis driving the z command.
    pub z_axis_index: usize,

    /// Controller button that requests a clean shutdown of the exec.
    pub stop_button_index: usize,

    /// Commanded position before any input has been integrated.
    ///
    /// Units: meters
    pub initial_cmd_m: [f64; 3],

    // ---- FALLBACK TRAJECTORY ----

    /// Amplitude of the fallback trajectory along x.
    ///
    /// Units: meters
    pub fallback_x_amp_m: f64,

    /// Mean height of the fallback trajectory.
    ///
    /// Units: meters
    pub fallback_y_base_m: f64,

    /// Height amplitude of the fallback trajectory, swept at half rate.
    ///
    /// Units: meters
    pub fallback_y_amp_m: f64,

    /// Amplitude of the fallback trajectory along z.
    ///
    /// Units: meters
    pub fallback_z_amp_m: f64
}
