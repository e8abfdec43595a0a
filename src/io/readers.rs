use crate::entities::Domain;
use crate::errors::ScanError;
use std::path::Path;
use tracing::warn;

/// Builds the scan target list from a single `--domain` argument or a file
/// with one domain per line. Blank lines and `#` comments are skipped; a
/// line that does not parse as a host is logged and skipped. Errors when
/// nothing valid remains.
pub fn read_domains(file: Option<&Path>, domain: Option<&str>) -> Result<Vec<Domain>, ScanError> {
    let mut domains = Vec::new();

    if let Some(raw) = domain {
        domains.push(Domain::new(raw)?);
    }

    if let Some(path) = file {
        let content = std::fs::read_to_string(path)?;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match Domain::new(line) {
                Ok(domain) => domains.push(domain),
                Err(e) => warn!(error = %e, "skipping invalid domain line"),
            }
        }
    }

    if domains.is_empty() {
        return Err(ScanError::NoDomains);
    }

    Ok(domains)
}
