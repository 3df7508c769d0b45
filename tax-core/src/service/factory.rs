use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::calculator::{CalculationError, TaxCalculator};

/// Where the reference tax service listens by default.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/calculate-tax";

/// Backend-agnostic calculator configuration.
///
/// `backend` must match the [`CalculatorFactory::backend_name`] of a
/// registered factory. `endpoint` and `timeout` only matter to backends that
/// talk to a remote service.
///
/// | backend | endpoint                                 |
/// |---------|------------------------------------------|
/// | `http`  | `http://127.0.0.1:8000/calculate-tax`    |
/// | `local` | ignored                                  |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"http"`).
    pub backend: String,
    /// Full URL of the `calculate-tax` route.
    pub endpoint: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

/// One implementation per calculator backend, registered with a
/// [`CalculatorRegistry`] at startup.
#[async_trait]
pub trait CalculatorFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Box<dyn TaxCalculator>, CalculationError>;
}

/// Registry of [`CalculatorFactory`] instances, keyed by backend name.
pub struct CalculatorRegistry {
    factories: HashMap<&'static str, Box<dyn CalculatorFactory>>,
}

impl CalculatorRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any previous factory with the
    /// same name.
    pub fn register(&mut self, factory: Box<dyn CalculatorFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`CalculationError::Configuration`] — no factory is registered for
    ///   the requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Box<dyn TaxCalculator>, CalculationError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                CalculationError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        tracing::debug!(backend = %config.backend, endpoint = %config.endpoint, "creating calculator");
        factory.create(config).await
    }
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use crate::models::TaxResponse;

    use super::{
        CalculationError, CalculatorFactory, CalculatorRegistry, DEFAULT_ENDPOINT, ServiceConfig,
        TaxCalculator,
    };

    struct StubCalculator;

    #[async_trait]
    impl TaxCalculator for StubCalculator {
        async fn calculate(&self, _income: Decimal) -> Result<TaxResponse, CalculationError> {
            unimplemented!()
        }
    }

    struct StubFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl CalculatorFactory for StubFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn create(
            &self,
            _config: &ServiceConfig,
        ) -> Result<Box<dyn TaxCalculator>, CalculationError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(StubCalculator))
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl CalculatorFactory for FailingFactory {
        fn backend_name(&self) -> &'static str {
            "broken"
        }

        async fn create(
            &self,
            _config: &ServiceConfig,
        ) -> Result<Box<dyn TaxCalculator>, CalculationError> {
            Err(CalculationError::Configuration("bad endpoint".to_string()))
        }
    }

    fn stub_factory(name: &'static str) -> (Box<dyn CalculatorFactory>, Arc<AtomicBool>) {
        let called = Arc::new(AtomicBool::new(false));
        let factory = StubFactory {
            name,
            called: called.clone(),
        };
        (Box::new(factory), called)
    }

    fn config_for(backend: &str) -> ServiceConfig {
        ServiceConfig {
            backend: backend.to_string(),
            ..ServiceConfig::default()
        }
    }

    #[test]
    fn service_config_default_targets_local_service() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.backend, "http");
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn new_registry_has_no_backends() {
        assert!(CalculatorRegistry::new().available_backends().is_empty());
    }

    #[test]
    fn available_backends_is_sorted() {
        let mut reg = CalculatorRegistry::new();
        let (f1, _) = stub_factory("local");
        let (f2, _) = stub_factory("http");
        reg.register(f1);
        reg.register(f2);
        assert_eq!(reg.available_backends(), vec!["http", "local"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut reg = CalculatorRegistry::new();
        let (old, _) = stub_factory("http");
        let (new, _) = stub_factory("http");
        reg.register(old);
        reg.register(new);
        assert_eq!(reg.available_backends(), vec!["http"]);
    }

    #[tokio::test]
    async fn create_calls_matching_factory() {
        let mut reg = CalculatorRegistry::new();
        let (http, http_called) = stub_factory("http");
        let (local, local_called) = stub_factory("local");
        reg.register(http);
        reg.register(local);

        let result = reg.create(&config_for("local")).await;

        assert!(result.is_ok());
        assert!(local_called.load(Ordering::SeqCst));
        assert!(!http_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn create_unknown_backend_lists_available() {
        let mut reg = CalculatorRegistry::new();
        let (factory, _) = stub_factory("http");
        reg.register(factory);

        let err = match reg.create(&config_for("grpc")).await {
            Err(e) => e,
            Ok(_) => panic!("expected an error for an unknown backend"),
        };

        assert_eq!(
            err,
            CalculationError::Configuration(
                "unknown backend 'grpc'; available: [\"http\"]".to_string()
            )
        );
    }

    #[tokio::test]
    async fn create_propagates_factory_error() {
        let mut reg = CalculatorRegistry::new();
        reg.register(Box::new(FailingFactory));

        let result = reg.create(&config_for("broken")).await;

        assert!(matches!(result, Err(CalculationError::Configuration(msg)) if msg == "bad endpoint"));
    }
}
