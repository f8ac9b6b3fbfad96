//! ## Logging
//!
//! The library only emits `tracing` events. Binaries call [`init`] once at
//! startup; whether a subscriber is installed is controlled by the
//! `DEBUG_TAXI_EXPLORER` environment variable:
//!
//! - unset, empty, `"0"` or `"false"`: no subscriber, nothing is logged
//! - anything else: debug-level output to stderr, including per-batch decisions
//!
//! ```sh
//! export DEBUG_TAXI_EXPLORER=true
//! ```

use tracing::Level;

pub const DEBUG_ENV_VAR: &str = "DEBUG_TAXI_EXPLORER";

fn debug_enabled(value: Option<&str>) -> bool {
    value.map_or(false, |v| !(v.is_empty() || v == "0" || v == "false"))
}

/// Level of the subscriber to install, `None` for no subscriber
fn subscriber_level(value: Option<&str>) -> Option<Level> {
    debug_enabled(value).then_some(Level::DEBUG)
}

/// Install the global fmt subscriber when debugging is enabled.
/// Safe to call more than once.
pub fn init() {
    let Some(level) = subscriber_level(std::env::var(DEBUG_ENV_VAR).ok().as_deref()) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
