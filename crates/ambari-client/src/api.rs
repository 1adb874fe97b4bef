//! The cluster operations the lifecycle orchestrator depends on.
//!
//! [`ClusterApi`] abstracts the client so orchestration can be exercised
//! without a server. [`AmbariClient`] is the production implementation.

use async_trait::async_trait;
use ambari_core::{ClusterName, ComponentName, HostName, ServiceName, State};

use crate::client::AmbariClient;
use crate::error::Result;
use crate::locator::ResourceRef;
use crate::types::{Located, StateChange};

/// Operations used to provision and remove cluster resources.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List the services of a cluster.
    async fn services(&self, cluster: &ClusterName) -> Result<Vec<ServiceName>>;

    /// List the hosts of a cluster.
    async fn hosts(&self, cluster: &ClusterName) -> Result<Vec<HostName>>;

    /// Locate a resource and return its current endpoint.
    async fn locate(&self, target: &ResourceRef) -> Result<Located>;

    /// Create a service resource.
    async fn create_service(&self, cluster: &ClusterName, service: &ServiceName) -> Result<()>;

    /// Create a component under a service.
    async fn create_service_component(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        component: &ComponentName,
    ) -> Result<()>;

    /// Register a host with a cluster.
    async fn create_host(&self, cluster: &ClusterName, host: &HostName) -> Result<()>;

    /// Create a component instance on a host.
    async fn create_host_component(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
    ) -> Result<()>;

    /// Delete a located resource.
    async fn delete(&self, located: &Located) -> Result<()>;

    /// Move a component on a host to `state`.
    async fn set_host_component_state(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
        state: State,
    ) -> Result<StateChange>;
}

#[async_trait]
impl ClusterApi for AmbariClient {
    async fn services(&self, cluster: &ClusterName) -> Result<Vec<ServiceName>> {
        AmbariClient::services(self, cluster).await
    }

    async fn hosts(&self, cluster: &ClusterName) -> Result<Vec<HostName>> {
        AmbariClient::hosts(self, cluster).await
    }

    async fn locate(&self, target: &ResourceRef) -> Result<Located> {
        AmbariClient::locate(self, target).await
    }

    async fn create_service(&self, cluster: &ClusterName, service: &ServiceName) -> Result<()> {
        AmbariClient::create_service(self, cluster, service).await
    }

    async fn create_service_component(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        component: &ComponentName,
    ) -> Result<()> {
        AmbariClient::create_service_component(self, cluster, service, component).await
    }

    async fn create_host(&self, cluster: &ClusterName, host: &HostName) -> Result<()> {
        AmbariClient::create_host(self, cluster, host).await
    }

    async fn create_host_component(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
    ) -> Result<()> {
        AmbariClient::create_host_component(self, cluster, host, component).await
    }

    async fn delete(&self, located: &Located) -> Result<()> {
        AmbariClient::delete(self, located).await
    }

    async fn set_host_component_state(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
        state: State,
    ) -> Result<StateChange> {
        AmbariClient::set_host_component_state(self, cluster, host, component, state).await
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use recording::{RecordedCall, RecordingClusterApi};

#[cfg(any(test, feature = "test-utils"))]
mod recording {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use ambari_core::{ClusterName, ComponentName, HostName, ServiceName, State};
    use parking_lot::Mutex;

    use super::ClusterApi;
    use crate::error::{ClientError, Result};
    use crate::locator::ResourceRef;
    use crate::types::{Located, StateChange};

    /// A call made against [`RecordingClusterApi`].
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum RecordedCall {
        /// `services(cluster)`
        ListServices(ClusterName),
        /// `hosts(cluster)`
        ListHosts(ClusterName),
        /// `locate(target)`
        Locate(ResourceRef),
        /// `create_service(cluster, service)`
        CreateService(ClusterName, ServiceName),
        /// `create_service_component(cluster, service, component)`
        CreateServiceComponent(ClusterName, ServiceName, ComponentName),
        /// `create_host(cluster, host)`
        CreateHost(ClusterName, HostName),
        /// `create_host_component(cluster, host, component)`
        CreateHostComponent(ClusterName, HostName, ComponentName),
        /// `delete(endpoint)`
        Delete(String),
        /// `set_host_component_state(cluster, host, component, state)`
        SetHostComponentState(ClusterName, HostName, ComponentName, State),
    }

    impl RecordedCall {
        /// Returns true for calls that change remote state.
        #[must_use]
        pub const fn is_mutation(&self) -> bool {
            !matches!(
                self,
                Self::ListServices(_) | Self::ListHosts(_) | Self::Locate(_)
            )
        }
    }

    #[derive(Default)]
    struct Recorded {
        calls: Vec<RecordedCall>,
        services: Vec<ServiceName>,
        hosts: Vec<HostName>,
        missing: HashSet<ResourceRef>,
        fail_on: Option<RecordedCall>,
    }

    /// An in-memory [`ClusterApi`] that records every call.
    ///
    /// Created services and hosts are added to the listed ones, so repeated
    /// adds observe earlier ones. Every resource can be located unless marked
    /// missing; its endpoint is derived from the lookup path.
    #[derive(Default)]
    pub struct RecordingClusterApi {
        inner: Mutex<Recorded>,
    }

    impl RecordingClusterApi {
        /// Create an API with no services and no hosts.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populate the listed services.
        #[must_use]
        pub fn with_services(self, services: impl IntoIterator<Item = ServiceName>) -> Self {
            self.inner.lock().services.extend(services);
            self
        }

        /// Pre-populate the listed hosts.
        #[must_use]
        pub fn with_hosts(self, hosts: impl IntoIterator<Item = HostName>) -> Self {
            self.inner.lock().hosts.extend(hosts);
            self
        }

        /// Make locating `target` fail with `NotFound`.
        #[must_use]
        pub fn with_missing(self, target: ResourceRef) -> Self {
            self.inner.lock().missing.insert(target);
            self
        }

        /// Make `call` fail with a 500 after it has been recorded.
        #[must_use]
        pub fn failing_on(self, call: RecordedCall) -> Self {
            self.inner.lock().fail_on = Some(call);
            self
        }

        /// All calls made so far, in order.
        #[must_use]
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.inner.lock().calls.clone()
        }

        /// The mutating calls made so far, in order.
        #[must_use]
        pub fn mutations(&self) -> Vec<RecordedCall> {
            self.calls()
                .into_iter()
                .filter(RecordedCall::is_mutation)
                .collect()
        }

        /// The endpoint reported when locating `target`.
        #[must_use]
        pub fn endpoint_for(target: &ResourceRef) -> String {
            format!("http://ambari.test:8080/api/v1/{}", target.path())
        }

        fn record(&self, call: RecordedCall) -> Result<()> {
            let mut inner = self.inner.lock();
            let fail = inner.fail_on.as_ref() == Some(&call);
            inner.calls.push(call);
            if fail {
                return Err(ClientError::Remote {
                    status: 500,
                    message: "injected failure".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ClusterApi for RecordingClusterApi {
        async fn services(&self, cluster: &ClusterName) -> Result<Vec<ServiceName>> {
            self.record(RecordedCall::ListServices(cluster.clone()))?;
            Ok(self.inner.lock().services.clone())
        }

        async fn hosts(&self, cluster: &ClusterName) -> Result<Vec<HostName>> {
            self.record(RecordedCall::ListHosts(cluster.clone()))?;
            Ok(self.inner.lock().hosts.clone())
        }

        async fn locate(&self, target: &ResourceRef) -> Result<Located> {
            self.record(RecordedCall::Locate(target.clone()))?;
            if self.inner.lock().missing.contains(target) {
                return Err(ClientError::NotFound {
                    resource: target.path(),
                });
            }
            Ok(Located {
                endpoint: Self::endpoint_for(target),
                attributes: serde_json::json!({ "href": Self::endpoint_for(target) }),
            })
        }

        async fn create_service(&self, cluster: &ClusterName, service: &ServiceName) -> Result<()> {
            self.record(RecordedCall::CreateService(cluster.clone(), service.clone()))?;
            self.inner.lock().services.push(service.clone());
            Ok(())
        }

        async fn create_service_component(
            &self,
            cluster: &ClusterName,
            service: &ServiceName,
            component: &ComponentName,
        ) -> Result<()> {
            self.record(RecordedCall::CreateServiceComponent(
                cluster.clone(),
                service.clone(),
                component.clone(),
            ))
        }

        async fn create_host(&self, cluster: &ClusterName, host: &HostName) -> Result<()> {
            self.record(RecordedCall::CreateHost(cluster.clone(), host.clone()))?;
            self.inner.lock().hosts.push(host.clone());
            Ok(())
        }

        async fn create_host_component(
            &self,
            cluster: &ClusterName,
            host: &HostName,
            component: &ComponentName,
        ) -> Result<()> {
            self.record(RecordedCall::CreateHostComponent(
                cluster.clone(),
                host.clone(),
                component.clone(),
            ))
        }

        async fn delete(&self, located: &Located) -> Result<()> {
            self.record(RecordedCall::Delete(located.endpoint.clone()))
        }

        async fn set_host_component_state(
            &self,
            cluster: &ClusterName,
            host: &HostName,
            component: &ComponentName,
            state: State,
        ) -> Result<StateChange> {
            self.record(RecordedCall::SetHostComponentState(
                cluster.clone(),
                host.clone(),
                component.clone(),
                state,
            ))?;
            Ok(StateChange {
                status: 202,
                request: None,
            })
        }
    }
}
