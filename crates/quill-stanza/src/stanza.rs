//! Stanza model and extension assembly.
//!
//! A stanza owns an ordered sequence of extension elements. Insertion order
//! is preserved both for serialization fidelity and for first-match
//! extraction by key; duplicates are never collapsed here (type-specific
//! uniqueness rules belong to the calling layer).

use jid::Jid;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extension::ExtensionElement;
use crate::key::{ns, QualifiedKey};
use crate::writer::{push_escaped_attr, write_extension};

/// Top-level stanza kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StanzaKind {
    /// Message stanza
    Message,
    /// Presence stanza
    Presence,
    /// IQ (info/query) stanza
    Iq,
}

impl StanzaKind {
    /// Get the element name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Presence => "presence",
            Self::Iq => "iq",
        }
    }

    /// Match an element name against the known stanza kinds.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "message" => Some(Self::Message),
            "presence" => Some(Self::Presence),
            "iq" => Some(Self::Iq),
            _ => None,
        }
    }
}

impl std::fmt::Display for StanzaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A top-level XMPP packet carrying extension elements.
#[derive(Debug)]
pub struct Stanza {
    /// Stanza kind (message, presence, iq)
    pub kind: StanzaKind,
    /// Recipient address
    pub to: Option<Jid>,
    /// Sender address
    pub from: Option<Jid>,
    /// Stanza identifier
    pub id: Option<String>,
    /// The 'type' attribute (chat, get, set, unavailable, ...)
    pub type_: Option<String>,
    extensions: Vec<Box<dyn ExtensionElement>>,
}

impl Stanza {
    /// Create an empty stanza of the given kind.
    pub fn new(kind: StanzaKind) -> Self {
        Self {
            kind,
            to: None,
            from: None,
            id: None,
            type_: None,
            extensions: Vec::new(),
        }
    }

    /// Create an empty message stanza.
    pub fn message() -> Self {
        Self::new(StanzaKind::Message)
    }

    /// Create an empty presence stanza.
    pub fn presence() -> Self {
        Self::new(StanzaKind::Presence)
    }

    /// Create an empty iq stanza.
    pub fn iq() -> Self {
        Self::new(StanzaKind::Iq)
    }

    /// Set the recipient.
    pub fn with_to(mut self, to: Jid) -> Self {
        self.to = Some(to);
        self
    }

    /// Set the sender.
    pub fn with_from(mut self, from: Jid) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the stanza id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a freshly generated UUID v4 stanza id.
    pub fn with_generated_id(mut self) -> Self {
        self.id = Some(Uuid::new_v4().to_string());
        self
    }

    /// Set the 'type' attribute.
    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    /// Append an extension element.
    ///
    /// No uniqueness constraint is enforced; duplicates are retained in
    /// insertion order.
    pub fn add_extension(&mut self, ext: Box<dyn ExtensionElement>) {
        self.extensions.push(ext);
    }

    /// Get the first extension matching the key, in insertion order.
    pub fn get_extension(&self, key: &QualifiedKey) -> Option<&dyn ExtensionElement> {
        self.extensions
            .iter()
            .find(|ext| ext.key() == *key)
            .map(|ext| ext.as_ref())
    }

    /// Get all extensions matching the key, in insertion order.
    ///
    /// Empty when nothing matches, never a lookup failure.
    pub fn get_extensions(&self, key: &QualifiedKey) -> Vec<&dyn ExtensionElement> {
        self.extensions
            .iter()
            .filter(|ext| ext.key() == *key)
            .map(|ext| ext.as_ref())
            .collect()
    }

    /// Get the first extension of a concrete type, downcast.
    pub fn get_extension_as<T: ExtensionElement>(&self) -> Option<&T> {
        self.extensions
            .iter()
            .find_map(|ext| ext.as_any().downcast_ref::<T>())
    }

    /// Remove and return the first extension matching the key.
    ///
    /// No-op (None) if absent.
    pub fn remove_extension(&mut self, key: &QualifiedKey) -> Option<Box<dyn ExtensionElement>> {
        let index = self.extensions.iter().position(|ext| ext.key() == *key)?;
        Some(self.extensions.remove(index))
    }

    /// Iterate over all attached extensions in insertion order.
    pub fn extensions(&self) -> impl Iterator<Item = &dyn ExtensionElement> {
        self.extensions.iter().map(|ext| ext.as_ref())
    }

    /// The number of attached extensions.
    pub fn extension_count(&self) -> usize {
        self.extensions.len()
    }

    /// Serialize the whole stanza.
    ///
    /// Opens the namespace scope at `jabber:client`, so children in the
    /// client namespace carry no redundant `xmlns` declaration. Attribute
    /// order is fixed (to, from, id, type) so repeated serialization is
    /// byte-identical.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();

        out.push('<');
        out.push_str(self.kind.as_str());
        out.push_str(" xmlns=\"");
        out.push_str(ns::JABBER_CLIENT);
        out.push('"');

        if let Some(ref to) = self.to {
            out.push_str(" to=\"");
            push_escaped_attr(&mut out, &to.to_string());
            out.push('"');
        }
        if let Some(ref from) = self.from {
            out.push_str(" from=\"");
            push_escaped_attr(&mut out, &from.to_string());
            out.push('"');
        }
        if let Some(ref id) = self.id {
            out.push_str(" id=\"");
            push_escaped_attr(&mut out, id);
            out.push('"');
        }
        if let Some(ref type_) = self.type_ {
            out.push_str(" type=\"");
            push_escaped_attr(&mut out, type_);
            out.push('"');
        }

        if self.extensions.is_empty() {
            out.push_str("/>");
            return out;
        }

        out.push('>');
        for ext in &self.extensions {
            write_extension(&mut out, ext.as_ref(), ns::JABBER_CLIENT);
        }
        out.push_str("</");
        out.push_str(self.kind.as_str());
        out.push('>');
        out
    }
}
