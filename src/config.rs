use crate::errors::ScanError;

pub const DEFAULT_MAX_SUBDOMAINS: usize = 100;

/// Scan options shared by the task generator and the orchestrator. Built by
/// the CLI layer, read-only everywhere else.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Inspect front-end scripts for endpoint references.
    pub script_scan: bool,
    /// Probe common GraphQL paths.
    pub bruteforce_scan: bool,
    /// Drop candidates without a strict GraphQL response signature.
    pub precision: bool,
    /// Cap on subdomain candidates expanded from one input domain.
    pub max_subdomains: usize,
    /// Custom bruteforce path list; `None` uses the built-in one.
    pub wordlist: Option<Vec<String>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            script_scan: true,
            bruteforce_scan: true,
            precision: false,
            max_subdomains: DEFAULT_MAX_SUBDOMAINS,
            wordlist: None,
        }
    }
}

impl ScanConfig {
    /// At least one of the two probing strategies must stay enabled.
    pub fn validate(&self) -> Result<(), ScanError> {
        if !self.script_scan && !self.bruteforce_scan {
            return Err(ScanError::NoStrategy);
        }
        Ok(())
    }
}
