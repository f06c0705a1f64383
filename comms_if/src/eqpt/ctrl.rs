//! # Hand Controller State
//!
//! The controller itself is owned by an external device bridge which polls the hardware and
//! publishes its state over the network. This module defines that state and the compliance
//! checks applied to it before it is trusted by the exec.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of axes a compliant controller must report.
pub const COMPLIANT_NUM_AXES: usize = 6;

/// Minimum number of buttons a compliant controller must report.
pub const COMPLIANT_MIN_NUM_BUTTONS: usize = 11;

/// Number of hats a compliant controller must report.
pub const COMPLIANT_NUM_HATS: usize = 1;

/// Indices of the trigger-style axes, which rest at [`TRIGGER_NEUTRAL`] rather than zero.
pub const TRIGGER_AXIS_INDICES: [usize; 2] = [4, 5];

/// Neutral value of a trigger-style axis.
pub const TRIGGER_NEUTRAL: f64 = -1.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A snapshot of the full controller state at a given instant.
///
/// Axis values lie in `[-1, 1]`. Hat values are pairs of small integers in `{-1, 0, 1}`.
/// Snapshots are exchanged whole so a reader can never observe axes from one instant and
/// buttons from another.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CtrlState {
    /// Axis deflections, in controller axis order.
    pub axes: Vec<f64>,

    /// Button pressed states, in controller button order.
    pub buttons: Vec<bool>,

    /// Hat (D-pad) states, in controller hat order.
    pub hats: Vec<(i32, i32)>,

    /// Time at which this snapshot was taken by the device bridge.
    pub timestamp: DateTime<Utc>
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CtrlState {
    /// Create a new neutral state for a controller with the given input counts.
    ///
    /// Trigger-style axes rest at -1.0, all other inputs at zero/released.
    pub fn new(num_axes: usize, num_buttons: usize, num_hats: usize) -> Self {
        let mut axes = vec![0.0; num_axes];

        for &idx in TRIGGER_AXIS_INDICES.iter() {
            if idx < num_axes {
                axes[idx] = TRIGGER_NEUTRAL;
            }
        }

        Self {
            axes,
            buttons: vec![false; num_buttons],
            hats: vec![(0, 0); num_hats],
            timestamp: Utc::now()
        }
    }

    /// Check that this snapshot came from a compliant controller.
    ///
    /// A compliant controller reports exactly [`COMPLIANT_NUM_AXES`] axes, at least
    /// [`COMPLIANT_MIN_NUM_BUTTONS`] buttons and exactly [`COMPLIANT_NUM_HATS`] hats.
    pub fn is_compliant(&self) -> bool {
        self.axes.len() == COMPLIANT_NUM_AXES
            && self.buttons.len() >= COMPLIANT_MIN_NUM_BUTTONS
            && self.hats.len() == COMPLIANT_NUM_HATS
    }

    /// Age of this snapshot in seconds relative to `now`.
    ///
    /// Stale snapshots indicate the device bridge has stopped publishing.
    pub fn age_s(&self, now: DateTime<Utc>) -> f64 {
        (now - self.timestamp).num_milliseconds() as f64 * 0.001
    }

    /// Parse a state snapshot from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_neutral_state() {
        let state = CtrlState::new(6, 11, 1);

        assert_eq!(state.axes.len(), 6);
        assert_eq!(state.axes[0], 0.0);
        assert_eq!(state.axes[4], TRIGGER_NEUTRAL);
        assert_eq!(state.axes[5], TRIGGER_NEUTRAL);
        assert!(state.buttons.iter().all(|b| !b));
        assert_eq!(state.hats, vec![(0, 0)]);
    }

    #[test]
    fn test_compliance() {
        assert!(CtrlState::new(6, 11, 1).is_compliant());
        assert!(CtrlState::new(6, 14, 1).is_compliant());

        // Too few axes, buttons, or hats
        assert!(!CtrlState::new(4, 11, 1).is_compliant());
        assert!(!CtrlState::new(6, 8, 1).is_compliant());
        assert!(!CtrlState::new(6, 11, 0).is_compliant());
    }
}
