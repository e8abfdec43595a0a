use crate::errors::ScanError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single scan target. The base URL always carries a scheme and a valid
/// host; bare hostnames get `https://` prepended at construction.
#[derive(Debug, Clone)]
pub struct Domain {
    base: url::Url,
    from_expansion: bool,
}

impl Domain {
    pub fn new(raw: &str) -> Result<Self, ScanError> {
        Self::build(raw, false)
    }

    /// A domain obtained from subdomain expansion. Expanded domains never
    /// expand again.
    pub fn expanded(raw: &str) -> Result<Self, ScanError> {
        Self::build(raw, true)
    }

    fn build(raw: &str, from_expansion: bool) -> Result<Self, ScanError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScanError::InvalidDomain {
                input: raw.to_string(),
                reason: "empty input".to_string(),
            });
        }

        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        let base = url::Url::parse(&with_scheme).map_err(|e| ScanError::InvalidDomain {
            input: raw.to_string(),
            reason: e.to_string(),
        })?;

        if base.host_str().is_none() || !matches!(base.scheme(), "http" | "https") {
            return Err(ScanError::InvalidDomain {
                input: raw.to_string(),
                reason: "not a host reference".to_string(),
            });
        }

        Ok(Self {
            base,
            from_expansion,
        })
    }

    pub fn base(&self) -> &url::Url {
        &self.base
    }

    /// Hostname without scheme, used for subdomain enumeration.
    pub fn host(&self) -> &str {
        self.base.host_str().unwrap_or_default()
    }

    pub fn from_expansion(&self) -> bool {
        self.from_expansion
    }

    /// Identifier used as the key in the final result mapping.
    pub fn name(&self) -> String {
        self.base.to_string().trim_end_matches('/').to_string()
    }

    /// Base URL with `path` swapped in, for path probing.
    pub fn with_path(&self, path: &str) -> url::Url {
        let mut probe = self.base.clone();
        probe.set_path(path);
        probe
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which probing strategy produced a discovered URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Script,
    Bruteforce,
    Subdomain,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Script => write!(f, "script"),
            Strategy::Bruteforce => write!(f, "bruteforce"),
            Strategy::Subdomain => write!(f, "subdomain"),
        }
    }
}

/// A discovered endpoint URL in canonical form. Equality, hashing and
/// ordering all go through the canonical string, so two spellings of the
/// same endpoint collapse in a set.
///
/// `confirmed` records whether the probe response carried a strict GraphQL
/// signature at discovery time; precision filtering keys off it.
#[derive(Debug, Clone)]
pub struct Url {
    canonical: String,
    pub strategy: Strategy,
    pub confirmed: bool,
}

impl Url {
    /// Parses and canonicalizes `raw`. Returns `None` for anything that is
    /// not an absolute http(s) URL with a host.
    pub fn parse(raw: &str, strategy: Strategy) -> Option<Self> {
        let canonical = canonicalize(raw)?;
        Some(Self {
            canonical,
            strategy,
            confirmed: false,
        })
    }

    pub fn confirmed(mut self) -> Self {
        self.confirmed = true;
        self
    }

    /// Re-attributes the URL to another strategy, e.g. when a nested scan's
    /// discoveries are reported by the expansion that spawned it.
    pub fn retag(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

/// Case-folds scheme and host (the `url` crate does this on parse), drops
/// the fragment and any default port, and trims trailing slashes.
fn canonicalize(raw: &str) -> Option<String> {
    let mut parsed = url::Url::parse(raw.trim()).ok()?;
    parsed.host_str()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed.set_fragment(None);

    let mut out = parsed.to_string();
    if parsed.query().is_none() {
        while out.ends_with('/') {
            out.pop();
        }
    }
    Some(out)
}

impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Url {}

impl Hash for Url {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for Url {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Url {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical)
    }
}

impl Serialize for Url {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn domain_requires_a_host() {
        assert!(Domain::new("example.com").is_ok());
        assert!(Domain::new("https://example.com").is_ok());
        assert!(Domain::new("").is_err());
        assert!(Domain::new("   ").is_err());
        assert!(Domain::new("https://").is_err());
    }

    #[test]
    fn bare_hostname_gets_https() {
        let domain = Domain::new("Example.COM").unwrap();
        assert_eq!(domain.name(), "https://example.com");
        assert!(!domain.from_expansion());
    }

    #[test]
    fn expanded_domains_are_marked() {
        let domain = Domain::expanded("api.example.com").unwrap();
        assert!(domain.from_expansion());
    }

    #[test]
    fn with_path_replaces_the_path() {
        let domain = Domain::new("https://example.com/ignored").unwrap();
        assert_eq!(
            domain.with_path("/graphql").to_string(),
            "https://example.com/graphql"
        );
    }

    #[test]
    fn urls_collapse_on_canonical_form() {
        let a = Url::parse("https://x.com/graphql", Strategy::Script).unwrap();
        let b = Url::parse("https://x.com/graphql/", Strategy::Bruteforce).unwrap();
        let c = Url::parse("HTTPS://X.com/graphql", Strategy::Bruteforce).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);

        let set: HashSet<Url> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn default_port_and_fragment_are_dropped() {
        let a = Url::parse("https://x.com:443/graphql#playground", Strategy::Script).unwrap();
        assert_eq!(a.as_str(), "https://x.com/graphql");
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert!(Url::parse("ftp://x.com/graphql", Strategy::Script).is_none());
        assert!(Url::parse("not a url", Strategy::Script).is_none());
        assert!(Url::parse("/relative/graphql", Strategy::Script).is_none());
    }
}
