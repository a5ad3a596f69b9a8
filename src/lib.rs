//! Library exports for reuse in the CLI, benchmarks and tests.
/// Per-user application directory helpers.
pub mod app_dirs;
/// Pipeline settings loaded from TOML.
pub mod config;
/// Ground-truth loading, caching and derived label statistics.
pub mod ground_truth;
/// Tracing subscriber setup.
pub mod logging;
