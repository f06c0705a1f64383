//! # Visualisation Server
//!
//! Publishes the rig layout and the per-cycle spar state to the web visualisation. Delivery
//! is fire-and-forget over a PUB socket, the exec never waits on the visualisation.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// Internal
use crate::data_store::DataStore;
use crate::params::SparExecParams;
use crate::rig::RigConfig;
use comms_if::{
    net::{zmq, MonitoredSocket, MonitoredSocketError, SocketOptions},
    viz::{VizDyn, VizPosition, VizRope, VizStatic}
};
use util::maths::round_to_dp;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Decimal places used when presenting rope lengths.
///
/// Rounding happens here and only here, internal computation keeps full precision.
const ROPE_LENGTH_DP: u32 = 2;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Visualisation server
pub struct VizServer {
    socket: MonitoredSocket
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum VizServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send the payload: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the payload: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl VizServer {
    /// Create a new instance of the visualisation server.
    ///
    /// This function will not block until a visualisation connects.
    pub fn new(ctx: &zmq::Context, params: &SparExecParams) -> Result<Self, VizServerError> {
        // Create the socket options
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            bind: true,
            connect_timeout: 1000,
            linger: 1,
            recv_timeout: 10,
            send_timeout: 10,
            ..Default::default()
        };

        // Bind the socket
        let socket = MonitoredSocket::new(
            ctx,
            zmq::PUB,
            socket_options,
            &params.viz_endpoint
        ).map_err(VizServerError::SocketError)?;

        // Create self
        Ok(Self {
            socket
        })
    }

    /// Send the static configuration payload.
    ///
    /// Sent once at start up and re-sent at 1 Hz so late-joining visualisations can still
    /// build the scene.
    pub fn send_static(&mut self, rig: &RigConfig) -> Result<(), VizServerError> {
        let payload = VizStatic {
            masts: rig.masts.clone(),
            spar: rig.spar,
            show_axes: rig.show_axes
        };

        self.send_json(&payload)
    }

    /// Send the dynamic state payload for this cycle.
    pub fn send_dyn(&mut self, ds: &DataStore) -> Result<(), VizServerError> {
        let payload = dyn_payload(ds);

        self.send_json(&payload)
    }

    /// Serialize and send a payload, fire-and-forget.
    fn send_json<T: serde::Serialize>(&mut self, payload: &T) -> Result<(), VizServerError> {
        let payload_string = serde_json::to_string(payload)
            .map_err(VizServerError::SerializationError)?;

        self.socket.send(payload_string.as_str(), 0)
            .map_err(VizServerError::SendError)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build the dynamic payload from the data store.
///
/// This is the publication boundary, rope lengths are rounded for presentation here.
fn dyn_payload(ds: &DataStore) -> VizDyn {
    VizDyn {
        ropes: ds
            .rope_ctrl_output
            .iter()
            .map(|r| VizRope {
                length: round_to_dp(r.length_m, ROPE_LENGTH_DP)
            })
            .collect(),
        spar_position: VizPosition {
            x: ds.traj_ctrl_output.x_m,
            y: ds.traj_ctrl_output.y_m,
            z: ds.traj_ctrl_output.z_m
        }
    }
}

#[cfg(test)]
mod test {
    use crate::rope_ctrl::RopeState;
    use crate::traj_ctrl::SparState;

    use super::*;

    #[test]
    fn test_rope_lengths_rounded_at_publication() {
        let mut ds = DataStore::default();
        ds.rope_ctrl_output = vec![
            RopeState { length_m: 7.313344 },
            RopeState { length_m: 6.9631171 },
        ];
        ds.traj_ctrl_output = SparState { x_m: 0.123456, y_m: 1.0, z_m: -0.5 };

        let payload = dyn_payload(&ds);

        assert_eq!(payload.ropes[0].length, 7.31);
        assert_eq!(payload.ropes[1].length, 6.96);

        // The spar position is not rounded
        assert_eq!(payload.spar_position.x, 0.123456);
    }
}
