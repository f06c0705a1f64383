//! # Spar Executable Parameters
//!
//! This module provides parameters for the spar executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
pub struct SparExecParams {

    /// Network endpoint for the controller state subscription
    pub ctrl_endpoint: String,

    /// Network endpoint for the visualisation publication socket
    pub viz_endpoint: String,

    /// Maximum age of a controller snapshot before it is considered stale and the fallback
    /// trajectory generator takes over.
    ///
    /// Units: seconds
    pub ctrl_stale_limit_s: f64
}
