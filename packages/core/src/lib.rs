// Library root — exposes internal modules for integration tests in `tests/`.
// Production entry point remains `src/main.rs`.

pub mod alerts;
pub mod error;
pub mod feed;
pub mod formatter;
pub mod job;
pub mod services;

// Binary plumbing, public so integration tests can build a job from config.
pub mod cli;
pub mod config;
pub mod logging;
