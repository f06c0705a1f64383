//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "SPAR_SW_ROOT";

/// Retrieve the software root directory from the environment.
///
/// The root directory contains the `params` and `sessions` directories.
pub fn get_spar_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
