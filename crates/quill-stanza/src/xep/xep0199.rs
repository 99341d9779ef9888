//! XEP-0199: XMPP Ping
//!
//! An empty element; serializes self-closing.

use std::any::Any;

use minidom::Element;

use crate::error::CodecError;
use crate::extension::ExtensionElement;
use crate::key::{ns, QualifiedKey};
use crate::provider::{ExtensionProvider, ParseContext};

/// Local element name.
pub const ELEMENT_PING: &str = "ping";

/// XEP-0199 ping payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ping;

impl Ping {
    /// The key pings are dispatched under.
    pub fn qualified_key() -> QualifiedKey {
        QualifiedKey::new(ns::PING, ELEMENT_PING).expect("ping key constants are valid")
    }
}

impl ExtensionElement for Ping {
    fn key(&self) -> QualifiedKey {
        Self::qualified_key()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider for ping elements.
pub struct PingProvider;

impl ExtensionProvider for PingProvider {
    fn key(&self) -> QualifiedKey {
        Ping::qualified_key()
    }

    fn parse(
        &self,
        _element: &Element,
        _ctx: &ParseContext<'_>,
    ) -> Result<Box<dyn ExtensionElement>, CodecError> {
        Ok(Box::new(Ping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::serialize_extension;

    #[test]
    fn test_ping_serializes_self_closing() {
        assert_eq!(serialize_extension(&Ping), "<ping xmlns=\"urn:xmpp:ping\"/>");
    }

    #[test]
    fn test_ping_provider() {
        let registry = crate::registry::ProviderRegistry::new();
        let ctx = ParseContext::new(&registry);

        let element: Element = "<ping xmlns='urn:xmpp:ping'/>".parse().unwrap();
        let parsed = PingProvider.parse(&element, &ctx).unwrap();
        assert!(parsed.as_any().downcast_ref::<Ping>().is_some());
    }
}
