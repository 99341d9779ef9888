//! Stanza decoding: registry-dispatched extension parsing.
//!
//! The decoder receives complete top-level elements (from [`StanzaReader`]
//! framing or a self-contained string) and turns them into [`Stanza`]
//! values, dispatching each child element through the provider registry by
//! its qualified key. Unknown extensions are skipped, never fatal.

use std::sync::Arc;

use minidom::Element;
use tracing::debug;

use crate::error::CodecError;
use crate::provider::ParseContext;
use crate::reader::{parse_with_default_ns, StanzaReader};
use crate::registry::ProviderRegistry;
use crate::stanza::{Stanza, StanzaKind};
use crate::key::ns;

/// Decodes parsed elements into stanzas via an injected provider registry.
pub struct StanzaDecoder {
    registry: Arc<ProviderRegistry>,
}

impl StanzaDecoder {
    /// Create a decoder over a registry.
    ///
    /// Registration should be complete (ideally sealed) before concurrent
    /// decoding begins.
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this decoder dispatches through.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Decode a complete stanza element.
    ///
    /// The element must be one of message/presence/iq in a stream namespace
    /// (`jabber:client` or `jabber:server`); anything else fails with
    /// [`CodecError::UnsupportedStanza`]. Child elements whose key has a
    /// registered provider become typed extensions attached in document
    /// order; unrecognized children are dropped in their entirety and
    /// logged at debug level.
    pub fn decode(&self, element: &Element) -> Result<Stanza, CodecError> {
        let stanza_ns = element.ns();
        if stanza_ns != ns::JABBER_CLIENT && stanza_ns != ns::JABBER_SERVER {
            return Err(CodecError::unsupported_stanza(format!(
                "{{{}}}{}",
                stanza_ns,
                element.name()
            )));
        }

        let kind = StanzaKind::from_name(element.name())
            .ok_or_else(|| CodecError::unsupported_stanza(element.name().to_string()))?;

        let mut stanza = Stanza::new(kind);

        if let Some(to) = element.attr("to") {
            stanza.to = Some(to.parse()?);
        }
        if let Some(from) = element.attr("from") {
            stanza.from = Some(from.parse()?);
        }
        stanza.id = element.attr("id").map(str::to_string);
        stanza.type_ = element.attr("type").map(str::to_string);

        let ctx = ParseContext::new(&self.registry);
        for ext in ctx.decode_children(element)? {
            stanza.add_extension(ext);
        }

        debug!(
            kind = %stanza.kind,
            extensions = stanza.extension_count(),
            "Decoded stanza"
        );

        Ok(stanza)
    }

    /// Decode a self-contained stanza string.
    ///
    /// Elements without a namespace declaration inherit `jabber:client`.
    pub fn decode_str(&self, xml: &str) -> Result<Stanza, CodecError> {
        let element = parse_with_default_ns(xml, ns::JABBER_CLIENT)?;
        self.decode(&element)
    }

    /// Decode the next complete stanza from a reader.
    ///
    /// Returns `Ok(None)` when the reader needs more input.
    pub fn decode_next(&self, reader: &mut StanzaReader) -> Result<Option<Stanza>, CodecError> {
        match reader.next_element()? {
            Some(element) => Ok(Some(self.decode(&element)?)),
            None => Ok(None),
        }
    }
}
