// src/errors.rs

//! Crate-wide error types and aliases.

use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("invalid collection URL '{url}': {source}")]
    InvalidCollectionUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported environment: {0}")]
    Unsupported(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    #[error("send called before open")]
    RequestNotOpened,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TrackerError>;
