use std::sync::Arc;

use crate::jobs::JobDispatcher;
use crate::logging::LogLevel;
use crate::scoring::Appraiser;

#[derive(Clone)]
pub struct HandlerState {
    pub appraiser: Arc<Appraiser>,

    pub dispatcher: JobDispatcher,

    /// Used when a request has no `log_level`.
    pub default_log_level: LogLevel,

    pub max_body_bytes: usize,
}

impl HandlerState {
    pub fn new(
        appraiser: Arc<Appraiser>,
        dispatcher: JobDispatcher,
        default_log_level: LogLevel,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            appraiser,
            dispatcher,
            default_log_level,
            max_body_bytes,
        }
    }
}
