//! Logging initialization

/// Initialize the logging system.
///
/// Uses env_logger writing to stdout with a default filter level of `info`.
/// Override with the `RUST_LOG` environment variable. Calling this more than
/// once is harmless; only the first call installs the logger.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .try_init();
}
