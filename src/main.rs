//! # Voxel Streamer Entry Point
//!
//! Runs the engine headless through the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- config.json
//! ```

fn main() {
    if let Err(err) = voxel_streamer::run() {
        log::error!("Engine stopped: {}", err);
        std::process::exit(1);
    }
}
