//! Factory caching terminal services per title and resource.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use lintterm_core::{Disposable, Error, Result, ShellType, TerminalSettings, Url};

use crate::service::{TerminalService, TerminalServices};

/// Configuration for the terminal service factory.
#[derive(Debug, Clone)]
pub struct TerminalServiceFactoryConfig {
    /// Title used when a request does not name one
    pub default_title: String,

    /// Maximum number of cached services
    pub max_terminals: usize,
}

impl Default for TerminalServiceFactoryConfig {
    fn default() -> Self {
        Self::from(&TerminalSettings::default())
    }
}

impl From<&TerminalSettings> for TerminalServiceFactoryConfig {
    fn from(settings: &TerminalSettings) -> Self {
        Self {
            default_title: settings.title.clone(),
            max_terminals: settings.max_terminals,
        }
    }
}

type ServiceKey = (String, Option<Url>);

/// Hands out terminal services, one per `(title, resource)` pair.
pub struct TerminalServiceFactory {
    services: RwLock<HashMap<ServiceKey, Arc<TerminalService>>>,
    collaborators: TerminalServices,
    config: TerminalServiceFactoryConfig,
}

impl TerminalServiceFactory {
    /// Create a factory with default configuration.
    pub fn new(collaborators: TerminalServices) -> Self {
        Self::with_config(collaborators, TerminalServiceFactoryConfig::default())
    }

    /// Create a factory with custom configuration.
    pub fn with_config(
        collaborators: TerminalServices,
        config: TerminalServiceFactoryConfig,
    ) -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            collaborators,
            config,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ServiceKey, Arc<TerminalService>>> {
        self.services.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ServiceKey, Arc<TerminalService>>> {
        self.services.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn title_or_default(&self, title: Option<&str>) -> String {
        title.unwrap_or(&self.config.default_title).to_string()
    }

    /// Get the cached service for `(title, resource)`, creating it on first
    /// request.
    pub fn get_terminal_service(
        &self,
        resource: Option<&Url>,
        title: Option<&str>,
    ) -> Result<Arc<TerminalService>> {
        let key = (self.title_or_default(title), resource.cloned());

        let mut services = self.write();
        if let Some(service) = services.get(&key) {
            return Ok(Arc::clone(service));
        }

        if services.len() >= self.config.max_terminals {
            return Err(Error::TerminalLimitReached(self.config.max_terminals));
        }

        info!(
            "Creating terminal service: title='{}', resource={}",
            key.0,
            key.1.as_ref().map(Url::as_str).unwrap_or("<none>")
        );
        let service = Arc::new(TerminalService::new(
            self.collaborators.clone(),
            key.1.clone(),
            key.0.clone(),
        ));
        services.insert(key, Arc::clone(&service));

        Ok(service)
    }

    /// Create a service that is not cached; the caller owns its disposal.
    pub fn create_terminal_service(
        &self,
        resource: Option<&Url>,
        title: Option<&str>,
    ) -> TerminalService {
        TerminalService::new(
            self.collaborators.clone(),
            resource.cloned(),
            self.title_or_default(title),
        )
    }

    /// List all cached services.
    pub fn list_services(&self) -> Vec<TerminalServiceInfo> {
        self.read()
            .values()
            .map(|service| TerminalServiceInfo {
                title: service.title().to_string(),
                resource: service.resource().cloned(),
                has_terminal: service.has_terminal(),
                shell_type: service.shell_type(),
            })
            .collect()
    }

    /// Dispose and drop every cached service.
    pub fn dispose_all(&self) {
        let services: Vec<Arc<TerminalService>> =
            self.write().drain().map(|(_, service)| service).collect();

        debug!("Disposing {} terminal services", services.len());
        for service in services {
            service.dispose();
        }
    }

    /// Get the number of cached services.
    pub fn service_count(&self) -> usize {
        self.read().len()
    }
}

impl Disposable for TerminalServiceFactory {
    fn dispose(&self) {
        self.dispose_all();
    }
}

impl std::fmt::Debug for TerminalServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalServiceFactory")
            .field("config", &self.config)
            .field("services", &self.service_count())
            .finish()
    }
}

/// Information about a cached service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalServiceInfo {
    /// Terminal title
    pub title: String,

    /// Resource the environment is activated for
    pub resource: Option<Url>,

    /// Whether a terminal is live
    pub has_terminal: bool,

    /// Shell type of the live terminal
    pub shell_type: Option<ShellType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedShellHelper, RecordingActivator, RecordingTerminalManager};

    fn factory_with(
        config: TerminalServiceFactoryConfig,
    ) -> (Arc<RecordingTerminalManager>, TerminalServiceFactory) {
        let manager = Arc::new(RecordingTerminalManager::new());
        let collaborators = TerminalServices {
            manager: manager.clone(),
            helper: Arc::new(FixedShellHelper::new(Some("/bin/bash"))),
            activator: Arc::new(RecordingActivator::new()),
        };
        (manager, TerminalServiceFactory::with_config(collaborators, config))
    }

    fn factory() -> (Arc<RecordingTerminalManager>, TerminalServiceFactory) {
        factory_with(TerminalServiceFactoryConfig::default())
    }

    #[test]
    fn test_factory_create() {
        let (_, factory) = factory();
        assert_eq!(factory.service_count(), 0);
        assert!(factory.list_services().is_empty());
    }

    #[test]
    fn test_get_returns_cached_service() {
        let (_, factory) = factory();
        let resource = Url::parse("file:///work/a").unwrap();

        let first = factory.get_terminal_service(Some(&resource), None).unwrap();
        let second = factory
            .get_terminal_service(Some(&resource), Some("Python"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.title(), "Python");
        assert_eq!(factory.service_count(), 1);
    }

    #[test]
    fn test_distinct_keys_get_distinct_services() {
        let (_, factory) = factory();
        let a = Url::parse("file:///work/a").unwrap();
        let b = Url::parse("file:///work/b").unwrap();

        factory.get_terminal_service(Some(&a), None).unwrap();
        factory.get_terminal_service(Some(&b), None).unwrap();
        factory.get_terminal_service(None, None).unwrap();
        factory.get_terminal_service(Some(&a), Some("REPL")).unwrap();

        assert_eq!(factory.service_count(), 4);
        let titles: Vec<String> = factory
            .list_services()
            .into_iter()
            .map(|info| info.title)
            .collect();
        assert!(titles.contains(&"REPL".to_string()));
    }

    #[test]
    fn test_terminal_limit() {
        let (_, factory) = factory_with(TerminalServiceFactoryConfig {
            max_terminals: 1,
            ..Default::default()
        });

        factory.get_terminal_service(None, Some("one")).unwrap();
        let result = factory.get_terminal_service(None, Some("two"));
        assert!(matches!(result, Err(Error::TerminalLimitReached(1))));

        // cached lookups still succeed at the limit
        assert!(factory.get_terminal_service(None, Some("one")).is_ok());
    }

    #[test]
    fn test_uncached_service() {
        let (_, factory) = factory();
        let service = factory.create_terminal_service(None, Some("Scratch"));
        assert_eq!(service.title(), "Scratch");
        assert_eq!(factory.service_count(), 0);
    }

    #[tokio::test]
    async fn test_dispose_all() {
        let (manager, factory) = factory();
        let service = factory.get_terminal_service(None, None).unwrap();
        service.show(true).await.unwrap();

        let info = &factory.list_services()[0];
        assert!(info.has_terminal);
        assert_eq!(info.shell_type, Some(ShellType::Bash));

        factory.dispose();
        assert_eq!(factory.service_count(), 0);
        assert!(service.is_disposed());
        assert!(manager.last_terminal().unwrap().is_disposed());

        let fresh = factory.get_terminal_service(None, None).unwrap();
        assert!(!Arc::ptr_eq(&service, &fresh));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = TerminalSettings {
            title: "Shell".to_string(),
            max_terminals: 3,
            ..TerminalSettings::default()
        };
        let config = TerminalServiceFactoryConfig::from(&settings);
        assert_eq!(config.default_title, "Shell");
        assert_eq!(config.max_terminals, 3);
    }
}
