use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("callback {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("failed to post to callback {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
