//! Provider Registry implementation.
//!
//! Maps qualified keys to extension providers for codec dispatch.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::debug;

use crate::error::CodecError;
use crate::provider::ExtensionProvider;
use crate::QualifiedKey;

static GLOBAL: OnceLock<ProviderRegistry> = OnceLock::new();

/// Registry mapping qualified keys to extension providers.
///
/// Thread-safe via DashMap so steady-state lookups from many parsing
/// threads require no external locking. Registration is a startup-time
/// concern: duplicate registration fails fast with
/// [`CodecError::DuplicateProvider`], and after [`seal`](Self::seal) all
/// mutations are rejected while lookups continue to be served.
///
/// ## Usage
///
/// ```ignore
/// let registry = ProviderRegistry::new();
/// registry.register(Arc::new(CallIdProvider))?;
/// registry.seal();
///
/// // Steady state, from any thread:
/// let provider = registry.lookup(&key);
/// ```
pub struct ProviderRegistry {
    /// Map of qualified key to provider
    providers: DashMap<QualifiedKey, Arc<dyn ExtensionProvider>>,
    /// Set once registration is complete; mutations are rejected afterwards
    sealed: AtomicBool,
}

impl ProviderRegistry {
    /// Create a new, empty provider registry.
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
            sealed: AtomicBool::new(false),
        }
    }

    /// The process-wide default registry.
    ///
    /// Opt-in convenience for applications that do not inject their own
    /// instance. Callers are expected to register providers and then
    /// [`seal`](Self::seal) it before any concurrent parsing begins.
    pub fn global() -> &'static ProviderRegistry {
        GLOBAL.get_or_init(ProviderRegistry::new)
    }

    /// Register a provider under its own qualified key.
    ///
    /// Fails with [`CodecError::DuplicateProvider`] if a provider already
    /// exists for that key (the existing registration is left intact), and
    /// with [`CodecError::RegistrySealed`] after sealing.
    pub fn register(&self, provider: Arc<dyn ExtensionProvider>) -> Result<(), CodecError> {
        if self.is_sealed() {
            return Err(CodecError::RegistrySealed);
        }

        let key = provider.key();
        match self.providers.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(CodecError::DuplicateProvider(key))
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(provider);
                debug!(key = %key, "Registered extension provider");
                Ok(())
            }
        }
    }

    /// Look up the provider for a qualified key.
    ///
    /// Safe to call concurrently from many parsing threads.
    pub fn lookup(&self, key: &QualifiedKey) -> Option<Arc<dyn ExtensionProvider>> {
        self.providers.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove the provider for a key, returning it.
    ///
    /// Returns None if no provider was registered for the key. Rejected
    /// after sealing.
    pub fn unregister(
        &self,
        key: &QualifiedKey,
    ) -> Result<Option<Arc<dyn ExtensionProvider>>, CodecError> {
        if self.is_sealed() {
            return Err(CodecError::RegistrySealed);
        }

        let removed = self.providers.remove(key);
        if removed.is_some() {
            debug!(key = %key, "Unregistered extension provider");
        }
        Ok(removed.map(|(_, provider)| provider))
    }

    /// Seal the registry, making it immutable.
    ///
    /// Idempotent. Lookups continue to be served after sealing.
    pub fn seal(&self) {
        if !self.sealed.swap(true, Ordering::SeqCst) {
            debug!(providers = self.providers.len(), "Sealed provider registry");
        }
    }

    /// Whether the registry has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::SeqCst)
    }

    /// Whether a provider is registered for the key.
    pub fn contains(&self, key: &QualifiedKey) -> bool {
        self.providers.contains_key(key)
    }

    /// The number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.len())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::ExtensionElement;
    use crate::provider::ParseContext;
    use crate::standard::StandardExtension;
    use minidom::Element;

    struct TestProvider {
        key: QualifiedKey,
    }

    impl TestProvider {
        fn new(namespace: &str, name: &str) -> Arc<Self> {
            Arc::new(Self {
                key: QualifiedKey::new(namespace, name).unwrap(),
            })
        }
    }

    impl ExtensionProvider for TestProvider {
        fn key(&self) -> QualifiedKey {
            self.key.clone()
        }

        fn parse(
            &self,
            _element: &Element,
            _ctx: &ParseContext<'_>,
        ) -> Result<Box<dyn ExtensionElement>, CodecError> {
            Ok(Box::new(StandardExtension::new(self.key.clone())))
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ProviderRegistry::new();
        let provider = TestProvider::new("urn:test", "a");
        let key = provider.key();

        registry.register(provider).unwrap();

        assert!(registry.contains(&key));
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup(&key).is_some());
    }

    #[test]
    fn test_lookup_miss() {
        let registry = ProviderRegistry::new();
        let key = QualifiedKey::new("urn:test", "missing").unwrap();
        assert!(registry.lookup(&key).is_none());
    }

    #[test]
    fn test_duplicate_registration_fails_and_keeps_original() {
        let registry = ProviderRegistry::new();
        let first = TestProvider::new("urn:test", "a");
        let second = TestProvider::new("urn:test", "a");
        let key = first.key();

        registry.register(Arc::clone(&first) as Arc<dyn ExtensionProvider>).unwrap();
        let err = registry
            .register(second)
            .unwrap_err();

        assert!(matches!(err, CodecError::DuplicateProvider(k) if k == key));
        assert_eq!(registry.len(), 1);

        // The original registration is untouched.
        let looked_up = registry.lookup(&key).unwrap();
        assert!(Arc::ptr_eq(
            &looked_up,
            &(first as Arc<dyn ExtensionProvider>)
        ));
    }

    #[test]
    fn test_unregister() {
        let registry = ProviderRegistry::new();
        let provider = TestProvider::new("urn:test", "a");
        let key = provider.key();

        registry.register(provider).unwrap();
        assert!(registry.unregister(&key).unwrap().is_some());
        assert!(!registry.contains(&key));

        // Absent key is a no-op.
        assert!(registry.unregister(&key).unwrap().is_none());
    }

    #[test]
    fn test_sealed_rejects_mutation_but_serves_lookups() {
        let registry = ProviderRegistry::new();
        let provider = TestProvider::new("urn:test", "a");
        let key = provider.key();

        registry.register(provider).unwrap();
        registry.seal();
        assert!(registry.is_sealed());

        let err = registry.register(TestProvider::new("urn:test", "b")).unwrap_err();
        assert!(matches!(err, CodecError::RegistrySealed));

        let err = registry.unregister(&key).unwrap_err();
        assert!(matches!(err, CodecError::RegistrySealed));

        assert!(registry.lookup(&key).is_some());
    }

    #[test]
    fn test_seal_is_idempotent() {
        let registry = ProviderRegistry::new();
        registry.seal();
        registry.seal();
        assert!(registry.is_sealed());
    }

    #[test]
    fn test_concurrent_lookups() {
        let registry = Arc::new(ProviderRegistry::new());
        registry.register(TestProvider::new("urn:test", "a")).unwrap();
        registry.seal();

        let key = QualifiedKey::new("urn:test", "a").unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let key = key.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        assert!(registry.lookup(&key).is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
