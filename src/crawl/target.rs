// src/crawl/target.rs
// =============================================================================
// Turns a caller-supplied URL string into a validated crawl target.
//
// Rules:
// - The string must parse as an absolute URL
// - The scheme must be http or https (anything else is rejected)
// - The host must be present and non-empty
//
// Both kinds of failure come back as the same error kind (InvalidUrl); the
// reason string only shows up in the logs.
//
// Validation is a pure function of its input: no DNS lookups, no network.
// =============================================================================

use std::fmt;

use url::Url;

use crate::error::{GateError, Result};

/// The two schemes the crawler accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

// A validated crawl target. Immutable once built.
//
// `path` always starts with '/', which is how the url crate normalizes
// http(s) paths. Query strings and fragments are not part of a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    scheme: Scheme,
    host: String,
    port: Option<u16>,
    path: String,
}

impl CrawlTarget {
    // Parses and validates a raw URL string
    //
    // Returns: CrawlTarget on success, GateError::InvalidUrl otherwise
    //
    // Example:
    //   "http://example.com:8080/docs" -> scheme=http, host=example.com,
    //                                     port=Some(8080), path="/docs"
    pub fn parse(raw: &str) -> Result<Self> {
        let parsed = Url::parse(raw.trim())
            .map_err(|e| GateError::invalid_url(raw, format!("parse error: {}", e)))?;

        let scheme = match parsed.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(GateError::invalid_url(
                    raw,
                    format!("scheme {:?} is not allowed", other),
                ))
            }
        };

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| GateError::invalid_url(raw, "URL has no host"))?
            .to_string();

        Ok(CrawlTarget {
            scheme,
            host,
            // url drops ports that match the scheme default (http:80, https:443)
            port: parsed.port(),
            path: parsed.path().to_string(),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Bare host, without any port. This is what crawl policy is keyed on.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    // Rebuilds the absolute start URL: scheme://host[:port]/path
    pub fn start_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}{}", self.scheme, self.host, port, self.path),
            None => format!("{}://{}{}", self.scheme, self.host, self.path),
        }
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.start_url())
    }
}
