//! Storage types

use std::fmt;

use chrono::Utc;

/// Flat object key of a published PDF: `barcodes_<epoch millis>.pdf`
///
/// Two names generated within the same millisecond are equal; callers
/// accept that collision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName(String);

impl ArtifactName {
    pub const PREFIX: &'static str = "barcodes_";
    pub const EXTENSION: &'static str = ".pdf";

    /// Name for an artifact created now
    pub fn generate() -> Self {
        Self::from_millis(Utc::now().timestamp_millis())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(format!("{}{}{}", Self::PREFIX, millis, Self::EXTENSION))
    }

    /// Accept only names this service could have generated
    pub fn parse(name: &str) -> Option<Self> {
        let millis = name
            .strip_prefix(Self::PREFIX)?
            .strip_suffix(Self::EXTENSION)?;
        if millis.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scheme and host the current request arrived on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// `scheme://host`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

/// A stored PDF and the URL it can be fetched from
#[derive(Debug, Clone)]
pub struct PublishedArtifact {
    pub name: ArtifactName,
    pub url: String,
    pub size: usize,
    pub pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name_format() {
        let name = ArtifactName::from_millis(1_700_000_000_123);
        assert_eq!(name.as_str(), "barcodes_1700000000123.pdf");
    }

    #[test]
    fn test_generated_name_shape() {
        let name = ArtifactName::generate();
        let millis = name
            .as_str()
            .strip_prefix(ArtifactName::PREFIX)
            .and_then(|s| s.strip_suffix(ArtifactName::EXTENSION))
            .unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn test_parse_accepts_generated_names() {
        let name = ArtifactName::from_millis(1_700_000_000_123);
        assert_eq!(ArtifactName::parse(name.as_str()), Some(name));
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        for name in [
            "secret.txt",
            "notes.pdf",
            "barcodes_.pdf",
            "barcodes_12x.pdf",
            "barcodes_-1.pdf",
            "barcodes_1.pdf.tmp",
            ".barcodes_1.pdf.tmp.abc",
            "../barcodes_1.pdf",
            "barcodes_1\".pdf",
        ] {
            assert_eq!(ArtifactName::parse(name), None, "name: {}", name);
        }
    }

    #[test]
    fn test_same_millisecond_names_collide() {
        assert_eq!(ArtifactName::from_millis(42), ArtifactName::from_millis(42));
    }

    #[test]
    fn test_origin_base_url() {
        let origin = RequestOrigin::new("https", "labels.example.com:8443");
        assert_eq!(origin.base_url(), "https://labels.example.com:8443");
    }
}
