//! Service catalog: which components make up each service.
//!
//! Adding a service creates the service resource and then each of its
//! components. The API does not say which components a service needs, so the
//! list comes from a catalog file loaded once by the caller and injected into
//! the [`LifecycleOrchestrator`](crate::LifecycleOrchestrator).
//!
//! # File format
//!
//! A YAML mapping from service name to an ordered list of component names:
//!
//! ```yaml
//! HDFS: [NAMENODE, SECONDARY_NAMENODE, DATANODE, HDFS_CLIENT]
//! ZOOKEEPER: [ZOOKEEPER_SERVER, ZOOKEEPER_CLIENT]
//! ```
//!
//! The older layout, a one-element list holding the mapping under
//! `service_components`, is accepted as well.

use std::collections::BTreeMap;
use std::path::Path;

use ambari_core::{ComponentName, ServiceName};
use serde::Deserialize;

use crate::error::{ClientError, Result};

/// Ordered component lists keyed by service name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: BTreeMap<ServiceName, Vec<ComponentName>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Mapping(BTreeMap<ServiceName, Vec<ComponentName>>),
    Legacy(Vec<LegacyEntry>),
}

#[derive(Deserialize)]
struct LegacyEntry {
    service_components: BTreeMap<ServiceName, Vec<ComponentName>>,
}

impl ServiceCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the text is not a valid catalog.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)
            .map_err(|e| ClientError::Config(format!("invalid service catalog: {e}")))?;

        let services = match file {
            CatalogFile::Mapping(services) => services,
            CatalogFile::Legacy(entries) => entries
                .into_iter()
                .next()
                .map(|entry| entry.service_components)
                .ok_or_else(|| {
                    ClientError::Config("service catalog list is empty".to_string())
                })?,
        };

        Ok(Self { services })
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read catalog {}: {e}", path.display()))
        })?;
        let catalog = Self::from_yaml_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            services = catalog.len(),
            "Loaded service catalog"
        );
        Ok(catalog)
    }

    /// Set the component list for a service, replacing any previous entry.
    pub fn insert(&mut self, service: ServiceName, components: Vec<ComponentName>) {
        self.services.insert(service, components);
    }

    /// Get the ordered component list for a service.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnknownService` if the catalog has no entry.
    pub fn components(&self, service: &ServiceName) -> Result<&[ComponentName]> {
        self.services
            .get(service)
            .map(Vec::as_slice)
            .ok_or_else(|| ClientError::UnknownService(service.clone()))
    }

    /// Iterate over the services in the catalog.
    pub fn services(&self) -> impl Iterator<Item = &ServiceName> {
        self.services.keys()
    }

    /// Number of services in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if the catalog has no services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl FromIterator<(ServiceName, Vec<ComponentName>)> for ServiceCatalog {
    fn from_iter<I: IntoIterator<Item = (ServiceName, Vec<ComponentName>)>>(iter: I) -> Self {
        Self {
            services: iter.into_iter().collect(),
        }
    }
}
