//! Built-in extension elements.
//!
//! Each module pairs a concrete extension type with its provider:
//! - `body`: RFC 6121 message body, modeled as a regular extension
//! - `xep0199`: XMPP Ping
//! - `xep0203`: Delayed Delivery

pub mod body;
pub mod xep0199;
pub mod xep0203;

use std::sync::Arc;

use crate::error::CodecError;
use crate::registry::ProviderRegistry;

/// Register the built-in providers (body, ping, delay) on a registry.
pub fn register_builtins(registry: &ProviderRegistry) -> Result<(), CodecError> {
    registry.register(Arc::new(body::BodyProvider))?;
    registry.register(Arc::new(xep0199::PingProvider))?;
    registry.register(Arc::new(xep0203::DelayProvider))?;
    Ok(())
}
