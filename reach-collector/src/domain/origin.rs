//! Origin points reachability is measured from.

use serde::{Deserialize, Serialize};

/// A fixed starting point (e.g. an office's nearest station).
///
/// `node` is the routing service's opaque identifier and is what the
/// aggregate structures are keyed by; `name` is only a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    pub name: String,
    pub node: String,
    /// Human-facing page for this origin, passed through to the output.
    #[serde(default, alias = "base_url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Origin {
    /// Create an origin without a page link.
    pub fn new(name: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node: node.into(),
            base_url: None,
        }
    }

    /// Attach a page link.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_omitted_when_absent() {
        let origin = Origin::new("茅場町", "00001303");
        let json = serde_json::to_string(&origin).unwrap();
        assert_eq!(json, r#"{"name":"茅場町","node":"00001303"}"#);
    }

    #[test]
    fn base_url_is_camel_case() {
        let origin = Origin::new("八丁堀", "00007548").with_base_url("https://example.test/x");
        let json = serde_json::to_value(&origin).unwrap();
        assert_eq!(json["baseUrl"], "https://example.test/x");

        let back: Origin = serde_json::from_value(json).unwrap();
        assert_eq!(back, origin);
    }
}
