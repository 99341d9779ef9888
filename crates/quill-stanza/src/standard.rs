//! Generic key + attributes + text + children extension.
//!
//! Lets applications capture a payload without defining a dedicated type:
//! bind a [`StandardExtensionProvider`] to any key and every matching
//! element is preserved structurally, children included.

use std::any::Any;

use minidom::Element;

use crate::error::CodecError;
use crate::extension::ExtensionElement;
use crate::key::QualifiedKey;
use crate::provider::{ExtensionProvider, ParseContext};

/// An extension element with no dedicated type: a key plus whatever
/// attributes, text, and children the wire carried.
#[derive(Debug)]
pub struct StandardExtension {
    key: QualifiedKey,
    text: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<Box<dyn ExtensionElement>>,
}

impl StandardExtension {
    /// Create an empty extension with the given key.
    pub fn new(key: QualifiedKey) -> Self {
        Self {
            key,
            text: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the text payload.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append an attribute, replacing any existing attribute of that name.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if let Some(existing) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value.into();
        } else {
            self.attributes.push((name, value.into()));
        }
        self
    }

    /// Append a child extension.
    pub fn with_child(mut self, child: Box<dyn ExtensionElement>) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl ExtensionElement for StandardExtension {
    fn key(&self) -> QualifiedKey {
        self.key.clone()
    }

    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.attributes.clone()
    }

    fn children(&self) -> Vec<&dyn ExtensionElement> {
        self.children.iter().map(|c| c.as_ref()).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider producing [`StandardExtension`] values for one bound key.
///
/// Captures the whole subtree generically: attributes in the order minidom
/// reports them, concatenated text content, and every child element as a
/// nested [`StandardExtension`] regardless of registry state.
pub struct StandardExtensionProvider {
    key: QualifiedKey,
}

impl StandardExtensionProvider {
    /// Bind a generic provider to a key.
    pub fn bound_to(key: QualifiedKey) -> Self {
        Self { key }
    }

    fn capture(element: &Element) -> Result<StandardExtension, CodecError> {
        let key = QualifiedKey::new(element.ns(), element.name())?;
        let mut ext = StandardExtension::new(key);

        for (name, value) in element.attrs() {
            ext = ext.with_attribute(name, value);
        }

        let text = element.text();
        if !text.is_empty() {
            ext = ext.with_text(text);
        }

        for child in element.children() {
            ext = ext.with_child(Box::new(Self::capture(child)?));
        }

        Ok(ext)
    }
}

impl ExtensionProvider for StandardExtensionProvider {
    fn key(&self) -> QualifiedKey {
        self.key.clone()
    }

    fn parse(
        &self,
        element: &Element,
        _ctx: &ParseContext<'_>,
    ) -> Result<Box<dyn ExtensionElement>, CodecError> {
        Ok(Box::new(Self::capture(element)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ProviderRegistry;
    use crate::writer::serialize_extension;
    use std::sync::Arc;

    fn key(namespace: &str, name: &str) -> QualifiedKey {
        QualifiedKey::new(namespace, name).unwrap()
    }

    #[test]
    fn test_attribute_replacement() {
        let ext = StandardExtension::new(key("urn:test", "x"))
            .with_attribute("a", "1")
            .with_attribute("b", "2")
            .with_attribute("a", "3");

        assert_eq!(ext.attribute("a"), Some("3"));
        assert_eq!(ext.attribute("b"), Some("2"));
        assert_eq!(ext.attributes().len(), 2);
    }

    #[test]
    fn test_provider_captures_subtree() {
        let registry = ProviderRegistry::new();
        let provider = StandardExtensionProvider::bound_to(key("urn:test", "outer"));

        let element: Element =
            "<outer xmlns='urn:test' kind='demo'><inner>v</inner></outer>"
                .parse()
                .unwrap();
        let ctx = ParseContext::new(&registry);
        let parsed = provider.parse(&element, &ctx).unwrap();

        let ext = parsed.as_any().downcast_ref::<StandardExtension>().unwrap();
        assert_eq!(ext.key(), key("urn:test", "outer"));
        assert_eq!(ext.attribute("kind"), Some("demo"));
        assert_eq!(ext.children().len(), 1);
        assert_eq!(ext.children()[0].text().as_deref(), Some("v"));
    }

    #[test]
    fn test_capture_then_serialize_roundtrips() {
        let registry = ProviderRegistry::new();
        let provider = StandardExtensionProvider::bound_to(key("urn:test", "x"));

        let xml = "<x xmlns=\"urn:test\" a=\"1\">payload</x>";
        let element: Element = xml.parse().unwrap();
        let ctx = ParseContext::new(&registry);
        let parsed = provider.parse(&element, &ctx).unwrap();

        assert_eq!(serialize_extension(parsed.as_ref()), xml);
    }

    #[test]
    fn test_typed_downcast() {
        let provider: Arc<dyn ExtensionProvider> =
            Arc::new(StandardExtensionProvider::bound_to(key("urn:test", "x")));
        assert_eq!(provider.key(), key("urn:test", "x"));
    }
}
