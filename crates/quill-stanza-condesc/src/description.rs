//! The `conference-description` element.
//!
//! Describes an ongoing conference; may carry a nested `callid` and other
//! family extensions, which are decoded through the same registry as the
//! enclosing stanza.

use std::any::Any;

use minidom::Element;
use quill_stanza::{
    CodecError, ExtensionElement, ExtensionProvider, ParseContext, QualifiedKey,
};
use tracing::debug;

use crate::NS_CONFERENCE;

/// Local element name.
pub const ELEMENT_CONFERENCE_DESCRIPTION: &str = "conference-description";

/// Description of an ongoing conference call.
#[derive(Debug)]
pub struct ConferenceDescription {
    /// URL participants can join at
    pub url: Option<String>,
    /// Human-readable conference name
    pub name: Option<String>,
    children: Vec<Box<dyn ExtensionElement>>,
}

impl ConferenceDescription {
    /// Create an empty conference description.
    pub fn new() -> Self {
        Self {
            url: None,
            name: None,
            children: Vec::new(),
        }
    }

    /// Set the join URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the conference name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a child extension (typically a [`CallId`](crate::CallId)).
    pub fn with_child(mut self, child: Box<dyn ExtensionElement>) -> Self {
        self.children.push(child);
        self
    }

    /// The first nested callid, if present.
    pub fn call_id(&self) -> Option<&crate::CallId> {
        self.children
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<crate::CallId>())
    }

    /// The key conference descriptions are dispatched under.
    pub fn qualified_key() -> QualifiedKey {
        QualifiedKey::new(NS_CONFERENCE, ELEMENT_CONFERENCE_DESCRIPTION)
            .expect("conference-description key constants are valid")
    }
}

impl Default for ConferenceDescription {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtensionElement for ConferenceDescription {
    fn key(&self) -> QualifiedKey {
        Self::qualified_key()
    }

    fn attributes(&self) -> Vec<(String, String)> {
        let mut attrs = Vec::with_capacity(2);
        if let Some(ref url) = self.url {
            attrs.push(("url".to_string(), url.clone()));
        }
        if let Some(ref name) = self.name {
            attrs.push(("name".to_string(), name.clone()));
        }
        attrs
    }

    fn children(&self) -> Vec<&dyn ExtensionElement> {
        self.children.iter().map(|c| c.as_ref()).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider for conference description elements.
///
/// Nested children are dispatched recursively through the parse context,
/// so a registered `callid` provider also serves descriptions that embed
/// one.
pub struct ConferenceDescriptionProvider;

impl ExtensionProvider for ConferenceDescriptionProvider {
    fn key(&self) -> QualifiedKey {
        ConferenceDescription::qualified_key()
    }

    fn parse(
        &self,
        element: &Element,
        ctx: &ParseContext<'_>,
    ) -> Result<Box<dyn ExtensionElement>, CodecError> {
        let mut description = ConferenceDescription::new();
        description.url = element.attr("url").map(str::to_string);
        description.name = element.attr("name").map(str::to_string);

        for child in ctx.decode_children(element)? {
            description.children.push(child);
        }

        debug!(
            children = description.children.len(),
            "Parsed conference description"
        );
        Ok(Box::new(description))
    }
}
