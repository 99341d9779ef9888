//! The extension element capability contract.
//!
//! Concrete extension kinds are independent types implementing
//! [`ExtensionElement`]; there is no inheritance hierarchy. The serializer
//! only ever talks to the trait surface, so a well-formed element falls out
//! of the key/text/attributes/children accessors.

use std::any::Any;
use std::fmt;

use crate::key::QualifiedKey;

/// Capability contract for a namespaced XML fragment carried in a stanza.
///
/// The qualified key of an instance is fixed at construction and never
/// changes afterwards; it is the identity used for registry dispatch.
pub trait ExtensionElement: fmt::Debug + Send + Sync + 'static {
    /// The fixed (namespace, local name) identity of this element.
    fn key(&self) -> QualifiedKey;

    /// Character data of this element, if any.
    ///
    /// Returned unescaped; the serializer applies XML escaping on output.
    fn text(&self) -> Option<String> {
        None
    }

    /// Attributes in stable, deterministic order.
    fn attributes(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Child extension elements in insertion order.
    fn children(&self) -> Vec<&dyn ExtensionElement> {
        Vec::new()
    }

    /// Downcasting support for recovering concrete types from trait objects.
    fn as_any(&self) -> &dyn Any;
}
