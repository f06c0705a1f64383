//! Test controller publisher
//!
//! Publishes a synthetic compliant controller state at 10 ms intervals, allowing the exec to be
//! driven without real hardware. The left stick sweeps a slow circle so the commanded position
//! visibly wanders.

use std::thread;
use std::time::{Duration, Instant};

use comms_if::eqpt::ctrl::CtrlState;
use comms_if::net::{zmq, MonitoredSocket, SocketOptions};

/// Publication period, matches the device bridge's poll rate.
const PUB_PERIOD_MS: u64 = 10;

fn main() {
    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("tcp://*:5011"));

    let ctx = zmq::Context::new();

    let socket_options = SocketOptions {
        bind: true,
        block_on_first_connect: false,
        linger: 1,
        send_timeout: 10,
        ..Default::default()
    };

    let socket = MonitoredSocket::new(&ctx, zmq::PUB, socket_options, &endpoint)
        .expect("Could not create the controller publisher socket");

    println!("Publishing synthetic controller state on {}", endpoint);

    let start = Instant::now();

    loop {
        let t = start.elapsed().as_secs_f64();

        let mut state = CtrlState::new(6, 11, 1);

        // Slow circle on the stick axes mapped to x/z, values rounded to 2 dp as the real
        // bridge does
        state.axes[2] = ((0.5 * t).sin() * 0.5 * 100.0).round() / 100.0;
        state.axes[3] = ((0.5 * t).cos() * 0.5 * 100.0).round() / 100.0;

        let state_str = serde_json::to_string(&state).expect("Could not serialize CtrlState");

        if let Err(e) = socket.send(state_str.as_str(), 0) {
            eprintln!("Send error: {}", e);
        }

        thread::sleep(Duration::from_millis(PUB_PERIOD_MS));
    }
}
