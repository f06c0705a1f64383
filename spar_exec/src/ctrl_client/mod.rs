//! # Controller Client
//!
//! Receives controller state snapshots from the external device bridge and makes the freshest
//! one available to the control loop.
//!
//! The bridge publishes at roughly 100 Hz while the control loop runs at 50 Hz, the two are
//! decoupled by a [`ControlsCell`]: the poll thread replaces the cell's whole snapshot, the
//! control loop clones it out once per cycle. Exchanging whole snapshots means the loop can
//! never observe axes from one instant paired with buttons from another.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// Internal
use crate::params::SparExecParams;
use comms_if::{
    eqpt::ctrl::CtrlState,
    net::{zmq, MonitoredSocket, MonitoredSocketError, SocketOptions}
};
use util::stop::StopToken;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Period of the controller poll loop.
///
/// Units: seconds
pub const CTRL_POLL_PERIOD_S: f64 = 0.01;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Controller client
pub struct CtrlClient {
    socket: MonitoredSocket
}

/// Shared cell holding the freshest compliant controller snapshot.
///
/// Single writer (the poll thread), single reader (the control loop). The whole snapshot is
/// replaced or cloned under the lock, torn cross-field reads are impossible.
#[derive(Default)]
pub struct ControlsCell {
    latest: Mutex<Option<CtrlState>>
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CtrlClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not recieve a message from the bridge: {0}")]
    RecvError(zmq::Error),

    #[error("Could not parse the recieved controller state: {0}")]
    StateParseError(serde_json::Error),

    #[error("The bridge sent a message which was not valid UTF-8")]
    NonUtf8State
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CtrlClient {
    /// Create a new instance of the controller client.
    ///
    /// This function will not block until the bridge connects.
    pub fn new(ctx: &zmq::Context, params: &SparExecParams) -> Result<Self, CtrlClientError> {
        // Create the socket options
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            connect_timeout: 1000,
            linger: 1,
            recv_timeout: 1,
            send_timeout: 10,
            ..Default::default()
        };

        // Connect the socket
        let socket = MonitoredSocket::new(
            ctx,
            zmq::SUB,
            socket_options,
            &params.ctrl_endpoint
        ).map_err(CtrlClientError::SocketError)?;

        // Subscribe to everything the bridge publishes
        socket.set_subscribe(b"").map_err(|e| {
            CtrlClientError::SocketError(MonitoredSocketError::SocketOptionError(
                "set_subscribe".into(),
                e
            ))
        })?;

        // Create self
        Ok(Self {
            socket
        })
    }

    /// Check if the client is connected to the bridge
    pub fn is_connected(&self) -> bool {
        self.socket.connected()
    }

    /// Drain the socket and return the freshest pending snapshot, if any.
    ///
    /// The bridge publishes faster than we poll, older queued snapshots are discarded so the
    /// control loop always sees the latest state.
    pub fn recv_latest(&self) -> Result<Option<CtrlState>, CtrlClientError> {
        let mut latest = None;

        loop {
            match self.socket.recv_string(0) {
                // Valid message
                Ok(Ok(s)) => {
                    latest = Some(
                        CtrlState::from_json(&s).map_err(CtrlClientError::StateParseError)?
                    );
                }
                // Non UTF-8 message
                Ok(Err(_)) => return Err(CtrlClientError::NonUtf8State),
                // No more messages pending
                Err(zmq::Error::EAGAIN) => break,
                // Recieve error
                Err(e) => return Err(CtrlClientError::RecvError(e))
            }
        }

        Ok(latest)
    }
}

impl ControlsCell {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored snapshot.
    pub fn store(&self, state: CtrlState) {
        match self.latest.lock() {
            Ok(mut guard) => *guard = Some(state),
            Err(_) => warn!("Controls cell lock poisoned, snapshot dropped")
        }
    }

    /// Clone out the stored snapshot if it is younger than the stale limit.
    ///
    /// A stale snapshot means the bridge has stopped publishing, the caller should fall back
    /// to the generated trajectory.
    pub fn latest(&self, stale_limit_s: f64) -> Option<CtrlState> {
        let guard = match self.latest.lock() {
            Ok(g) => g,
            Err(_) => return None
        };

        match *guard {
            Some(ref state) if state.age_s(Utc::now()) <= stale_limit_s => Some(state.clone()),
            _ => None
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Spawn the controller poll thread.
///
/// The thread drains the client at [`CTRL_POLL_PERIOD_S`] and stores compliant snapshots in
/// the cell. It exits when the stop token is raised, the caller should join the returned
/// handle during shutdown.
pub fn spawn_poll_thread(
    client: CtrlClient,
    cell: Arc<ControlsCell>,
    stop: StopToken
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut was_connected = false;
        let mut warned_uncompliant = false;

        while !stop.is_requested() {
            let connected = client.is_connected();
            if connected != was_connected {
                if connected {
                    info!("Controller bridge connected");
                } else {
                    warn!("Controller bridge connection lost");
                }
                was_connected = connected;
            }

            match client.recv_latest() {
                Ok(Some(state)) => {
                    if state.is_compliant() {
                        cell.store(state);
                        warned_uncompliant = false;
                    } else if !warned_uncompliant {
                        warn!(
                            "Uncompliant controller ({} axes, {} buttons, {} hats), \
                             state rejected",
                            state.axes.len(),
                            state.buttons.len(),
                            state.hats.len()
                        );
                        warned_uncompliant = true;
                    }
                }
                Ok(None) => (),
                Err(e) => warn!("Controller receive error: {}", e)
            }

            thread::sleep(Duration::from_secs_f64(CTRL_POLL_PERIOD_S));
        }

        debug!("Controller poll thread stopped");
    })
}

#[cfg(test)]
mod test {
    use chrono::Duration as ChronoDuration;

    use super::*;

    #[test]
    fn test_cell_returns_last_full_write() {
        let cell = ControlsCell::new();

        assert!(cell.latest(1.0).is_none());

        let mut first = CtrlState::new(6, 11, 1);
        first.axes[2] = 0.5;
        cell.store(first);

        let mut second = CtrlState::new(6, 11, 1);
        second.axes[2] = -0.25;
        second.buttons[3] = true;
        cell.store(second.clone());

        // The reader sees the second write whole, never a mix of the two
        let read = cell.latest(10.0).unwrap();
        assert_eq!(read, second);
    }

    #[test]
    fn test_cell_rejects_stale_snapshot() {
        let cell = ControlsCell::new();

        let mut state = CtrlState::new(6, 11, 1);
        state.timestamp = Utc::now() - ChronoDuration::seconds(5);
        cell.store(state);

        assert!(cell.latest(0.5).is_none());
        assert!(cell.latest(60.0).is_some());
    }
}
