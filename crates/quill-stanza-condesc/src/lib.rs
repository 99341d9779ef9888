//! Conference description extension family.
//!
//! Extensions describing an ongoing conference call, embedded in presence
//! or message stanzas. The `callid` element carries the opaque call
//! identifier and inherits the family namespace rather than declaring its
//! own.
//!
//! ## XML Format
//!
//! ```xml
//! <conference-description xmlns='urn:xmpp:conference'
//!                         url='https://meet.example.com/room'
//!                         name='Weekly sync'>
//!   <callid>abc-123</callid>
//! </conference-description>
//! ```
//!
//! A bare `<callid/>` may also appear as a direct stanza child.

use std::sync::Arc;

use quill_stanza::{CodecError, ProviderRegistry};

mod callid;
mod description;

pub use callid::{CallId, CallIdProvider, ELEMENT_CALLID};
pub use description::{
    ConferenceDescription, ConferenceDescriptionProvider, ELEMENT_CONFERENCE_DESCRIPTION,
};

/// Namespace shared by the whole conference description family.
pub const NS_CONFERENCE: &str = "urn:xmpp:conference";

/// Register the conference extension providers on a registry.
pub fn register_conference_extensions(registry: &ProviderRegistry) -> Result<(), CodecError> {
    registry.register(Arc::new(CallIdProvider))?;
    registry.register(Arc::new(ConferenceDescriptionProvider))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_stanza::QualifiedKey;

    #[test]
    fn test_register_conference_extensions() {
        let registry = ProviderRegistry::new();
        register_conference_extensions(&registry).unwrap();

        assert!(registry.contains(&QualifiedKey::new(NS_CONFERENCE, ELEMENT_CALLID).unwrap()));
        assert!(registry.contains(
            &QualifiedKey::new(NS_CONFERENCE, ELEMENT_CONFERENCE_DESCRIPTION).unwrap()
        ));
    }
}
