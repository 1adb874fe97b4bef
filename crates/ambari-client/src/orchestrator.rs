//! Multi-step lifecycle operations.
//!
//! Adding a service or a host-component takes a short fixed sequence of
//! requests. The sequences are not atomic: when a step fails, the resources
//! created by earlier steps stay on the server and the error is returned
//! as-is. Callers retry or clean up.
//!
//! ```text
//! add_service            services? ──▶ POST service ──▶ POST component × N
//! add_component_to_host  POST host component ──▶ PUT INSTALLED
//! remove_*               locate ──▶ DELETE <located endpoint>
//! ```

use std::sync::Arc;

use ambari_core::{ClusterName, ComponentName, HostName, ServiceName, State};

use crate::api::ClusterApi;
use crate::catalog::ServiceCatalog;
use crate::error::Result;
use crate::locator::ResourceRef;
use crate::types::StateChange;

/// Result of an add operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The resource was created.
    Created,
    /// The resource already existed; nothing was sent.
    AlreadyPresent,
}

/// Sequences the requests that add and remove cluster resources.
pub struct LifecycleOrchestrator<A: ClusterApi> {
    api: Arc<A>,
    catalog: ServiceCatalog,
}

impl<A: ClusterApi> LifecycleOrchestrator<A> {
    /// Create an orchestrator over `api` using `catalog` to expand services
    /// into components.
    #[must_use]
    pub fn new(api: Arc<A>, catalog: ServiceCatalog) -> Self {
        Self { api, catalog }
    }

    /// Get a reference to the underlying API.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Get the service catalog.
    #[must_use]
    pub const fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Add a service and all of its catalog components to a cluster.
    ///
    /// If the cluster already lists the service, nothing is sent and
    /// `AlreadyPresent` is returned. Otherwise the service is created, then
    /// each component in catalog order.
    ///
    /// # Errors
    ///
    /// - `UnknownService` if the catalog has no entry for the service; checked
    ///   before anything is created
    /// - any request error; components created before the failure remain
    pub async fn add_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<AddOutcome> {
        if self.api.services(cluster).await?.contains(service) {
            tracing::warn!(cluster = %cluster, service = %service, "Service already installed");
            return Ok(AddOutcome::AlreadyPresent);
        }

        let components = self.catalog.components(service)?;

        self.api.create_service(cluster, service).await?;
        tracing::info!(cluster = %cluster, service = %service, "Created service");

        for component in components {
            self.add_service_component(cluster, service, component)
                .await?;
        }

        tracing::info!(
            cluster = %cluster,
            service = %service,
            components = components.len(),
            "Added service"
        );
        Ok(AddOutcome::Created)
    }

    /// Create one component under an existing service.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the request.
    pub async fn add_service_component(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        component: &ComponentName,
    ) -> Result<()> {
        self.api
            .create_service_component(cluster, service, component)
            .await?;
        tracing::info!(
            cluster = %cluster,
            service = %service,
            component = %component,
            "Created service component"
        );
        Ok(())
    }

    /// Place a component on a host and install it.
    ///
    /// The new host-component starts out pending, so it is immediately moved
    /// to `INSTALLED`. Exactly one create and one state change are sent, in
    /// that order.
    ///
    /// # Errors
    ///
    /// Returns the first failing request's error. If the state change fails,
    /// the host-component remains created.
    pub async fn add_component_to_host(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
    ) -> Result<StateChange> {
        self.api
            .create_host_component(cluster, host, component)
            .await?;
        tracing::info!(
            cluster = %cluster,
            host = %host,
            component = %component,
            "Created host component"
        );

        self.api
            .set_host_component_state(cluster, host, component, State::STOPPED)
            .await
    }

    /// Register a host with a cluster unless it is already a member.
    ///
    /// # Errors
    ///
    /// Returns an error if listing hosts or creating the host fails.
    pub async fn add_host(&self, cluster: &ClusterName, host: &HostName) -> Result<AddOutcome> {
        if self.api.hosts(cluster).await?.contains(host) {
            tracing::warn!(cluster = %cluster, host = %host, "Host already registered");
            return Ok(AddOutcome::AlreadyPresent);
        }

        self.api.create_host(cluster, host).await?;
        tracing::info!(cluster = %cluster, host = %host, "Added host");
        Ok(AddOutcome::Created)
    }

    /// Remove a service from a cluster.
    ///
    /// # Errors
    ///
    /// Returns the locate error if the service cannot be found, or `Remote` if
    /// the server refuses the deletion (e.g. components still running).
    pub async fn remove_service(&self, cluster: &ClusterName, service: &ServiceName) -> Result<()> {
        self.remove(&ResourceRef::service(cluster, service)).await
    }

    /// Remove a component from a host.
    ///
    /// # Errors
    ///
    /// Returns the locate error if the host-component cannot be found, or
    /// `Remote` if the server refuses the deletion.
    pub async fn remove_component(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
    ) -> Result<()> {
        self.remove(&ResourceRef::host_component(cluster, host, component))
            .await
    }

    /// Remove a host from a cluster.
    ///
    /// # Errors
    ///
    /// Returns the locate error if the host cannot be found, or `Remote` if
    /// the server refuses the deletion.
    pub async fn remove_host(&self, cluster: &ClusterName, host: &HostName) -> Result<()> {
        self.remove(&ResourceRef::host(cluster, host)).await
    }

    /// Locate a resource and delete it through its current endpoint.
    ///
    /// # Errors
    ///
    /// Returns the locate error without sending a delete, or the delete error.
    pub async fn remove(&self, target: &ResourceRef) -> Result<()> {
        let located = self.api.locate(target).await?;
        self.api.delete(&located).await?;
        tracing::info!(resource = %target, endpoint = %located.endpoint, "Removed resource");
        Ok(())
    }
}
