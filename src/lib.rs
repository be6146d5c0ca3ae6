pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod matcher;
pub mod models;
pub mod platform;
pub mod report;
pub mod store;
#[cfg(test)]
mod test_utils;
pub mod tracker;
pub mod validation;

/// Environment variable holding the log filter, e.g. `TRAKK_LOG=debug`.
pub const LOG_ENV: &str = "TRAKK_LOG";

/// Install the `env_logger` backend. Defaults to `info` when `TRAKK_LOG` is unset.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "info")).init();
}
