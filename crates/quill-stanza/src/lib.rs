//! # quill-stanza
//!
//! XMPP extension element codec and provider registry.
//!
//! This crate maps typed extension objects to and from XML stanza
//! fragments, dispatching them through a registry keyed by
//! (namespace, local name), and embeds them correctly inside packets.
//!
//! ## Architecture
//!
//! - **StanzaReader**: incremental framing that extracts complete top-level
//!   elements from untrusted byte input, with size and depth limits
//! - **StanzaDecoder**: turns elements into [`Stanza`] values, dispatching
//!   child elements through the [`ProviderRegistry`]
//! - **ExtensionElement**: capability trait concrete extension kinds
//!   implement; the serializer only talks to this surface
//! - **Writer**: pure serialization with a namespace scope stack, so
//!   `xmlns` is declared only where the default changes
//!
//! Unknown extensions are skipped conservatively rather than failing the
//! stanza; structurally broken XML aborts the enclosing stanza parse only.
//! Transport (sockets, TLS), stream negotiation, and authentication are
//! external collaborators.

pub mod decoder;
pub mod extension;
pub mod provider;
pub mod reader;
pub mod registry;
pub mod stanza;
pub mod standard;
pub mod writer;
pub mod xep;

mod error;
mod key;

pub use decoder::StanzaDecoder;
pub use error::CodecError;
pub use extension::ExtensionElement;
pub use key::{ns, QualifiedKey};
pub use provider::{ExtensionProvider, ParseContext};
pub use reader::{StanzaReader, DEFAULT_MAX_DEPTH, DEFAULT_MAX_STANZA_LEN};
pub use registry::ProviderRegistry;
pub use stanza::{Stanza, StanzaKind};
pub use standard::{StandardExtension, StandardExtensionProvider};
pub use writer::serialize_extension;
pub use xep::register_builtins;
