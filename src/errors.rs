use thiserror::Error;

/// Failures that can surface before or at the start of a scan. Anything that
/// happens once probing is underway is isolated and logged instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("script and bruteforce scanning are both disabled, nothing to run")]
    NoStrategy,

    #[error("invalid domain '{input}': {reason}")]
    InvalidDomain { input: String, reason: String },

    #[error("no valid domains to scan")]
    NoDomains,

    #[error("could not read domain list: {0}")]
    Io(#[from] std::io::Error),
}
