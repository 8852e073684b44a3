//! Conversion between GitHub's numeric GPG key ids and state identifiers

use crate::error::{GitHubError, Result};

/// Encode a GitHub key id as the identifier stored in state
pub fn encode(id: i64) -> String {
    id.to_string()
}

/// Decode a state identifier back into a GitHub key id
pub fn decode(s: &str) -> Result<i64> {
    s.parse::<i64>().map_err(|source| GitHubError::InvalidIdentifier {
        id: s.to_string(),
        source,
    })
}
