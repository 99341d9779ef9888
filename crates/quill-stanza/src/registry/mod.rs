//! Provider Registry for extension element dispatch.
//!
//! This module provides a thread-safe registry mapping qualified keys to
//! parsing providers. Registration happens at startup; once sealed, the
//! registry is immutable and lookups from concurrent parses need no
//! external locking.
//!
//! ```text
//! StanzaDecoder --- lookup(QualifiedKey) ---> ProviderRegistry
//!       |                                          |
//!       v                                          v
//! ExtensionElement <--- parse(subtree) --- ExtensionProvider
//! ```

mod provider_registry;

pub use provider_registry::ProviderRegistry;
