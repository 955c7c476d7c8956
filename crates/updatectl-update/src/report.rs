//! User-facing progress messages
//!
//! The pipeline reports through [`Reporter`] rather than printing, so the
//! CLI decides on styling and tests can capture what the user would see.

use tracing::{error, info, warn};

pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Sends every message to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn success(&self, message: &str) {
        info!("{}", message);
    }

    fn warning(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}
