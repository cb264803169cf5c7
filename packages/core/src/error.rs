use thiserror::Error;

use crate::feed::FeedError;

/// Unified application error.
///
/// Only configuration problems and feed failures end a run early; notifier
/// failures are reported per attempt and never reach this type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Feed(#[from] FeedError),
}
