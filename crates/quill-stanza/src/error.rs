//! Error types for the stanza codec.

use thiserror::Error;

use crate::key::QualifiedKey;

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed qualified key (empty namespace or local name)
    #[error("Invalid qualified key: {0}")]
    InvalidKey(String),

    /// A provider is already registered for this key
    #[error("Duplicate provider for {0}")]
    DuplicateProvider(QualifiedKey),

    /// The registry was sealed and no longer accepts mutations
    #[error("Provider registry is sealed")]
    RegistrySealed,

    /// Structurally broken XML; aborts the current stanza parse
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    /// A registered provider rejected a recognized payload
    #[error("Provider for {key} rejected payload: {reason}")]
    Provider {
        /// Key of the rejecting provider
        key: QualifiedKey,
        /// Human-readable rejection reason
        reason: String,
    },

    /// Top-level element is not a message, presence, or iq
    #[error("Unsupported stanza element: {0}")]
    UnsupportedStanza(String),

    /// Invalid addressing attribute
    #[error("Invalid JID: {0}")]
    Jid(#[from] jid::Error),
}

impl CodecError {
    /// Create a new invalid-key error.
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create a new malformed-XML error.
    pub fn malformed_xml(msg: impl Into<String>) -> Self {
        Self::MalformedXml(msg.into())
    }

    /// Create a new provider rejection error.
    pub fn provider(key: QualifiedKey, reason: impl Into<String>) -> Self {
        Self::Provider {
            key,
            reason: reason.into(),
        }
    }

    /// Create a new unsupported-stanza error.
    pub fn unsupported_stanza(msg: impl Into<String>) -> Self {
        Self::UnsupportedStanza(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let key = QualifiedKey::new("urn:xmpp:conference", "callid").unwrap();
        let err = CodecError::provider(key, "missing stamp");
        assert_eq!(
            err.to_string(),
            "Provider for {urn:xmpp:conference}callid rejected payload: missing stamp"
        );
    }

    #[test]
    fn test_jid_error_conversion() {
        let parse_err = "".parse::<jid::Jid>().unwrap_err();
        let err: CodecError = parse_err.into();
        assert!(matches!(err, CodecError::Jid(_)));
    }
}
