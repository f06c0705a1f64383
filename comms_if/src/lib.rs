//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// State definitions for equipment (like the hand controller)
pub mod eqpt;

/// Network module
pub mod net;

/// Static rig layout definitions
pub mod rig;

/// Payload definitions for the visualisation bridge
pub mod viz;
