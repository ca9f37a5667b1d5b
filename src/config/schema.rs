//! Configuration schema definitions.
//!
//! All types derive Serde traits so they can be read from fixture files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Options shared by a registry and every server it creates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerOptions {
    /// URL scheme used when building request URLs (`http` or `http:`).
    pub protocol: String,

    /// Host used when building request URLs. Servers always bind all interfaces.
    pub hostname: String,

    /// Default listening port. `None` picks an ephemeral port.
    pub port: Option<u16>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            hostname: "127.0.0.1".to_string(),
            port: None,
        }
    }
}

impl ServerOptions {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// URL for `path` on the configured host and port.
    pub fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.url_on_port(path, self.port)
    }

    /// URL for `path` on the configured host and the given port.
    pub fn url_on_port(&self, path: &str, port: Option<u16>) -> Result<Url, url::ParseError> {
        let scheme = self.protocol.trim_end_matches(':');
        let base = match port {
            Some(port) => format!("{}://{}:{}", scheme, self.hostname, port),
            None => format!("{}://{}", scheme, self.hostname),
        };
        Url::parse(&base)?.join(path)
    }
}

/// Root of a fixture file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FixtureFile {
    /// Options used when the caller does not supply any.
    pub server: Option<ServerOptions>,

    /// Fixtures keyed by name.
    pub fixtures: BTreeMap<String, FixtureSpec>,
}

impl FixtureFile {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// One fixture as written in a file.
///
/// Every field is optional here; presence is enforced at registration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FixtureSpec {
    /// Lowercase HTTP verb, or `all`.
    pub method: Option<String>,

    /// Route pattern (`/trips`, `/users/{id}`).
    pub route: Option<String>,

    /// Canned response.
    pub response: Option<ResponseSpec>,
}

/// A fixed response served by a file-defined fixture.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseSpec {
    /// Status code (default: 200).
    pub status: u16,

    /// Extra response headers. These override the default content type.
    pub headers: BTreeMap<String, String>,

    /// Plain-text body.
    pub body: Option<String>,

    /// JSON body. Mutually exclusive with `body`.
    pub json: Option<serde_json::Value>,
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
            body: None,
            json: None,
        }
    }
}
