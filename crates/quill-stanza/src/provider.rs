//! Extension providers: the parsing strategies behind the registry.
//!
//! A provider is bound to exactly one qualified key and turns a parsed XML
//! subtree into a typed [`ExtensionElement`]. Providers that carry nested
//! extension elements recurse through the [`ParseContext`], which dispatches
//! via the same registry the outer parse used.

use minidom::Element;
use tracing::debug;

use crate::error::CodecError;
use crate::extension::ExtensionElement;
use crate::key::QualifiedKey;
use crate::registry::ProviderRegistry;

/// Parsing strategy for one extension kind.
pub trait ExtensionProvider: Send + Sync {
    /// The qualified key this provider is registered under.
    fn key(&self) -> QualifiedKey;

    /// Construct a fully populated extension element from a parsed subtree.
    ///
    /// The element has already been matched against this provider's key.
    /// Rejecting the payload (missing attribute, bad timestamp) aborts the
    /// enclosing stanza parse; return [`CodecError::Provider`] with a reason.
    fn parse(
        &self,
        element: &Element,
        ctx: &ParseContext<'_>,
    ) -> Result<Box<dyn ExtensionElement>, CodecError>;
}

impl std::fmt::Debug for dyn ExtensionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionProvider")
            .field("key", &self.key())
            .finish()
    }
}

/// Per-parse context handed to providers for recursive dispatch.
pub struct ParseContext<'a> {
    registry: &'a ProviderRegistry,
}

impl<'a> ParseContext<'a> {
    /// Create a parse context over a registry.
    pub fn new(registry: &'a ProviderRegistry) -> Self {
        Self { registry }
    }

    /// The registry this parse dispatches through.
    pub fn registry(&self) -> &ProviderRegistry {
        self.registry
    }

    /// Decode the recognized child extensions of an element.
    ///
    /// Children whose key has no registered provider are skipped in their
    /// entirety (nested content included) and logged at debug level; unknown
    /// extensions are never fatal. A provider failure on a recognized child
    /// propagates and aborts the enclosing stanza parse.
    pub fn decode_children(
        &self,
        element: &Element,
    ) -> Result<Vec<Box<dyn ExtensionElement>>, CodecError> {
        let mut extensions = Vec::new();

        for child in element.children() {
            let key = match QualifiedKey::new(child.ns(), child.name()) {
                Ok(key) => key,
                Err(_) => {
                    debug!(name = child.name(), "Skipping child without a resolvable key");
                    continue;
                }
            };

            match self.registry.lookup(&key) {
                Some(provider) => extensions.push(provider.parse(child, self)?),
                None => {
                    debug!(key = %key, "Skipping unknown extension element");
                }
            }
        }

        Ok(extensions)
    }
}
