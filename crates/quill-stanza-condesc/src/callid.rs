//! The `callid` element: an opaque call identifier.

use std::any::Any;

use minidom::Element;
use quill_stanza::{
    CodecError, ExtensionElement, ExtensionProvider, ParseContext, QualifiedKey,
};

use crate::NS_CONFERENCE;

/// Local element name.
pub const ELEMENT_CALLID: &str = "callid";

/// Opaque identifier of a conference call.
///
/// The namespace is inherited from the family constant
/// [`NS_CONFERENCE`](crate::NS_CONFERENCE); the element has no attributes
/// or children, only text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallId {
    /// The call identifier text
    pub call_id: String,
}

impl CallId {
    /// Create a callid element from its text payload.
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
        }
    }

    /// The key callid elements are dispatched under.
    pub fn qualified_key() -> QualifiedKey {
        QualifiedKey::new(NS_CONFERENCE, ELEMENT_CALLID)
            .expect("callid key constants are valid")
    }
}

impl ExtensionElement for CallId {
    fn key(&self) -> QualifiedKey {
        Self::qualified_key()
    }

    fn text(&self) -> Option<String> {
        Some(self.call_id.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider for callid elements.
pub struct CallIdProvider;

impl ExtensionProvider for CallIdProvider {
    fn key(&self) -> QualifiedKey {
        CallId::qualified_key()
    }

    fn parse(
        &self,
        element: &Element,
        _ctx: &ParseContext<'_>,
    ) -> Result<Box<dyn ExtensionElement>, CodecError> {
        Ok(Box::new(CallId::new(element.text())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_stanza::serialize_extension;

    #[test]
    fn test_callid_serialization() {
        let callid = CallId::new("abc-123");
        assert_eq!(
            serialize_extension(&callid),
            "<callid xmlns=\"urn:xmpp:conference\">abc-123</callid>"
        );
    }

    #[test]
    fn test_key_is_fixed() {
        let callid = CallId::new("anything");
        assert_eq!(callid.key(), CallId::qualified_key());
        assert_eq!(callid.key().namespace(), NS_CONFERENCE);
        assert_eq!(callid.key().name(), "callid");
    }
}
