//! State transitions for services and host-components.
//!
//! Each transition locates its target, builds a [`StateChangeRequest`] and
//! PUTs it to the located endpoint. The server answers before the work is
//! done; the returned [`StateChange`] references the asynchronous request but
//! the client does not wait for it.
//!
//! Starting moves a resource to `STARTED`. Stopping moves it to `INSTALLED`,
//! which is the API's only stopped state ([`State::STOPPED`]).

use ambari_core::{ClusterName, ComponentName, HostName, ServiceName, State};
use reqwest::Method;

use crate::client::AmbariClient;
use crate::envelope::StateChangeRequest;
use crate::error::Result;
use crate::locator::ResourceRef;
use crate::types::{Located, RequestRef, StateChange};

impl AmbariClient {
    /// Move a service to `state`.
    ///
    /// # Errors
    ///
    /// - `Core` if `state` is not a transition target (nothing is sent)
    /// - the locate error if the service cannot be found (no PUT is sent)
    /// - `Remote` if the server rejects the change
    pub async fn set_service_state(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
        state: State,
    ) -> Result<StateChange> {
        let request = StateChangeRequest::service(cluster, service, state)?;
        let located = self.locate(&ResourceRef::service(cluster, service)).await?;

        let change = self.put_state(&located, &request).await?;
        tracing::info!(
            cluster = %cluster,
            service = %service,
            state = %state,
            accepted = change.is_accepted(),
            "Requested service state change"
        );
        Ok(change)
    }

    /// Move a component on a host to `state`.
    ///
    /// # Errors
    ///
    /// - `Core` if `state` is not a transition target (nothing is sent)
    /// - the locate error if the host-component cannot be found (no PUT is sent)
    /// - `Remote` if the server rejects the change
    pub async fn set_host_component_state(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
        state: State,
    ) -> Result<StateChange> {
        let request = StateChangeRequest::host_component(cluster, host, component, state)?;
        let located = self
            .locate(&ResourceRef::host_component(cluster, host, component))
            .await?;

        let change = self.put_state(&located, &request).await?;
        tracing::info!(
            cluster = %cluster,
            host = %host,
            component = %component,
            state = %state,
            accepted = change.is_accepted(),
            "Requested host component state change"
        );
        Ok(change)
    }

    /// Start a service.
    ///
    /// # Errors
    ///
    /// See [`set_service_state`](Self::set_service_state).
    pub async fn start_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<StateChange> {
        self.set_service_state(cluster, service, State::Started)
            .await
    }

    /// Stop a service, returning it to `INSTALLED`.
    ///
    /// # Errors
    ///
    /// See [`set_service_state`](Self::set_service_state).
    pub async fn stop_service(
        &self,
        cluster: &ClusterName,
        service: &ServiceName,
    ) -> Result<StateChange> {
        self.set_service_state(cluster, service, State::STOPPED)
            .await
    }

    /// Start a component on a host.
    ///
    /// # Errors
    ///
    /// See [`set_host_component_state`](Self::set_host_component_state).
    pub async fn start_host_component(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
    ) -> Result<StateChange> {
        self.set_host_component_state(cluster, host, component, State::Started)
            .await
    }

    /// Stop a component on a host, returning it to `INSTALLED`.
    ///
    /// This is also how a freshly created host-component gets installed.
    ///
    /// # Errors
    ///
    /// See [`set_host_component_state`](Self::set_host_component_state).
    pub async fn stop_host_component(
        &self,
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
    ) -> Result<StateChange> {
        self.set_host_component_state(cluster, host, component, State::STOPPED)
            .await
    }

    async fn put_state(
        &self,
        located: &Located,
        request: &StateChangeRequest,
    ) -> Result<StateChange> {
        let response = self
            .send(Method::PUT, &located.endpoint, Some(request))
            .await?;
        let status = response.status().as_u16();

        // 200 with an empty body means the resource is already in the target state
        let bytes = response.bytes().await?;
        let request = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice::<RequestRef>(&bytes).ok()
        };

        Ok(StateChange { status, request })
    }
}
