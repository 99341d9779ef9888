//! RFC 6121 message body, modeled as a regular extension element.
//!
//! The body lives in the stream's own namespace (`jabber:client`), so it
//! serializes without an `xmlns` declaration inside a stanza.

use std::any::Any;

use minidom::Element;

use crate::error::CodecError;
use crate::extension::ExtensionElement;
use crate::key::{ns, QualifiedKey};
use crate::provider::{ExtensionProvider, ParseContext};

/// Local element name.
pub const ELEMENT_BODY: &str = "body";

/// Message body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    /// The body text
    pub text: String,
}

impl Body {
    /// Create a body from its text payload.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The key bodies are dispatched under.
    pub fn qualified_key() -> QualifiedKey {
        QualifiedKey::new(ns::JABBER_CLIENT, ELEMENT_BODY)
            .expect("body key constants are valid")
    }
}

impl ExtensionElement for Body {
    fn key(&self) -> QualifiedKey {
        Self::qualified_key()
    }

    fn text(&self) -> Option<String> {
        Some(self.text.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider for message bodies.
pub struct BodyProvider;

impl ExtensionProvider for BodyProvider {
    fn key(&self) -> QualifiedKey {
        Body::qualified_key()
    }

    fn parse(
        &self,
        element: &Element,
        _ctx: &ParseContext<'_>,
    ) -> Result<Box<dyn ExtensionElement>, CodecError> {
        Ok(Box::new(Body::new(element.text())))
    }
}
