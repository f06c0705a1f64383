//! # Visualisation Payload Definitions
//!
//! The visualisation bridge consumes two JSON payloads: a one-time static configuration and a
//! per-cycle dynamic state. Field names on the wire are camelCase to match the web client.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::rig::{Mast, SparDims};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Static configuration payload, published once at start up and re-published at 1 Hz so that
/// late-joining subscribers still receive it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VizStatic {
    /// The rig's masts, in rope order.
    pub masts: Vec<Mast>,

    /// Dimensions of the spar platform.
    pub spar: SparDims,

    /// If true the visualisation displays its coordinate axes helper.
    pub show_axes: bool
}

/// A single rope's state as shown by the visualisation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct VizRope {
    /// Rope length, rounded for presentation.
    ///
    /// Units: meters
    pub length: f64
}

/// A 3D position as shown by the visualisation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct VizPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

/// Dynamic state payload, published every control cycle.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VizDyn {
    /// Rope lengths, index-aligned with the static payload's masts.
    pub ropes: Vec<VizRope>,

    /// Current spar position.
    pub spar_position: VizPosition
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wire_field_names_match_web_client() {
        let payload = VizDyn {
            ropes: vec![VizRope { length: 7.0 }],
            spar_position: VizPosition { x: 0.0, y: 1.0, z: 0.0 }
        };

        let json = serde_json::to_string(&payload).unwrap();

        // The web client looks these fields up by name
        assert!(json.contains("\"sparPosition\""));
        assert!(json.contains("\"ropes\""));

        let stat = VizStatic {
            masts: vec![],
            spar: SparDims { width: 0.5, length: 0.3 },
            show_axes: false
        };

        let json = serde_json::to_string(&stat).unwrap();
        assert!(json.contains("\"showAxes\""));
    }
}
