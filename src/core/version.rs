//! Server-published version tokens.

use crate::core::LauncherError;
use std::fmt;

/// An opaque version token as published by the setup server.
///
/// The server's token is kept in two forms that must never be mixed up:
/// - [`raw`](Self::raw) is used verbatim when building download URLs
/// - [`sanitized`](Self::sanitized) keeps only ASCII letters and digits and is
///   the only form ever used as a path component
///
/// A token with no alphanumeric characters is rejected, so a sanitized token
/// can never be empty, `.`/`..`, or contain a path separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
    sanitized: String,
}

impl Version {
    /// Parses a `/version` response body. Surrounding whitespace is trimmed
    /// from the raw token.
    pub fn parse(body: &str) -> Result<Self, LauncherError> {
        let raw = body.trim();
        let sanitized: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();

        if sanitized.is_empty() {
            return Err(LauncherError::InvalidVersion {
                token: raw.to_string(),
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            sanitized,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn sanitized(&self) -> &str {
        &self.sanitized
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
