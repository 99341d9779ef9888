//! Shared helpers for codec integration tests.

use std::sync::{Arc, Once};

use quill_stanza::{
    register_builtins, ProviderRegistry, QualifiedKey, StandardExtensionProvider, StanzaDecoder,
};

/// Initialize tracing once for the whole test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Qualified key helper; panics on invalid input (test-only).
pub fn key(namespace: &str, name: &str) -> QualifiedKey {
    QualifiedKey::new(namespace, name).unwrap()
}

/// Build a sealed registry with the built-in providers plus generic
/// providers for the given extra keys, and a decoder over it.
pub fn decoder_with(extra: &[(&str, &str)]) -> StanzaDecoder {
    init_tracing();

    let registry = ProviderRegistry::new();
    register_builtins(&registry).unwrap();
    for (namespace, name) in extra {
        registry
            .register(Arc::new(StandardExtensionProvider::bound_to(key(
                namespace, name,
            ))))
            .unwrap();
    }
    registry.seal();

    StanzaDecoder::new(Arc::new(registry))
}
