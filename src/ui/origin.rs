//! Origin header policy for the WebSocket upgrade.

use regex::Regex;

/// Decides whether an upgrade request's `Origin` header is acceptable.
///
/// A missing `Origin` header is always accepted (non-browser clients do
/// not send one). Without a configured pattern every origin is accepted.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    pattern: Option<Regex>,
}

impl OriginPolicy {
    /// Compile the configured pattern, if any.
    pub fn from_pattern(pattern: Option<&str>) -> Result<Self, regex::Error> {
        let pattern = match pattern {
            Some(raw) => Some(Regex::new(raw)?),
            None => None,
        };
        Ok(Self { pattern })
    }

    /// Accept-all policy.
    pub fn allow_all() -> Self {
        Self { pattern: None }
    }

    pub fn allows(&self, origin: Option<&str>) -> bool {
        match (origin, &self.pattern) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(origin), Some(pattern)) => pattern.is_match(origin),
        }
    }
}
