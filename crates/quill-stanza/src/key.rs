//! Namespace-qualified element keys.
//!
//! Every extension element is identified by a (namespace URI, local element
//! name) pair. The pair is the sole lookup key into the provider registry,
//! so equality and hashing cover both fields.

use std::fmt;

use crate::error::CodecError;

/// Namespace URIs used by the codec core.
pub mod ns {
    /// XMPP client namespace
    pub const JABBER_CLIENT: &str = "jabber:client";
    /// XMPP server namespace
    pub const JABBER_SERVER: &str = "jabber:server";
    /// XEP-0199 Ping namespace
    pub const PING: &str = "urn:xmpp:ping";
    /// XEP-0203 Delayed Delivery namespace
    pub const DELAY: &str = "urn:xmpp:delay";
}

/// Immutable (namespace, local name) pair identifying an extension kind.
///
/// Both fields are required and case-sensitive. Display uses Clark notation
/// (`{namespace}name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedKey {
    namespace: String,
    name: String,
}

impl QualifiedKey {
    /// Create a qualified key from a namespace URI and a local element name.
    ///
    /// Fails with [`CodecError::InvalidKey`] if either field is empty or
    /// whitespace-only, or if the local name does not start with a valid
    /// XML name start character.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, CodecError> {
        let namespace = namespace.into();
        let name = name.into();

        if namespace.trim().is_empty() {
            return Err(CodecError::invalid_key("namespace must not be empty"));
        }
        if name.trim().is_empty() {
            return Err(CodecError::invalid_key("local name must not be empty"));
        }

        let first = name.chars().next().unwrap_or(' ');
        if !(first.is_alphabetic() || first == '_') {
            return Err(CodecError::invalid_key(format!(
                "local name '{}' must start with a letter or underscore",
                name
            )));
        }

        Ok(Self { namespace, name })
    }

    /// The namespace URI.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The local element name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QualifiedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.name)
    }
}
