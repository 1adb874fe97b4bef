//! Request envelopes for state changes.
//!
//! A state change is a PUT whose body has two parts: a `RequestInfo` block
//! describing the operation level and a human-readable context, and a desired
//! state block keyed by the level (`ServiceInfo` or `HostRoles`).
//!
//! ```text
//! {
//!   "RequestInfo": {
//!     "operation_level": {"level": "HOST_COMPONENT", "cluster_name": "c1", "host_names": "h1"},
//!     "context": "Component DATANODE transition to started"
//!   },
//!   "HostRoles": {"state": "STARTED"}
//! }
//! ```

use ambari_core::{
    ClusterName, ComponentName, CoreError, HostName, OperationLevel, ServiceName, State,
};
use serde::Serialize;

/// A validated state-change request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateChangeRequest {
    #[serde(rename = "RequestInfo")]
    request_info: RequestInfo,
    #[serde(rename = "ServiceInfo", skip_serializing_if = "Option::is_none")]
    service_info: Option<DesiredState>,
    #[serde(rename = "HostRoles", skip_serializing_if = "Option::is_none")]
    host_roles: Option<DesiredState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct RequestInfo {
    operation_level: OperationLevelInfo,
    context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct OperationLevelInfo {
    level: OperationLevel,
    cluster_name: ClusterName,
    #[serde(skip_serializing_if = "Option::is_none")]
    host_names: Option<HostName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct DesiredState {
    state: State,
}

impl StateChangeRequest {
    /// Start building a request at the given level.
    #[must_use]
    pub fn builder(level: OperationLevel, cluster: ClusterName) -> StateChangeBuilder {
        StateChangeBuilder {
            level,
            cluster,
            host: None,
            state: None,
            context: None,
        }
    }

    /// Build a service-level request with the standard context.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTarget` if `state` is not a transition target.
    pub fn service(
        cluster: &ClusterName,
        service: &ServiceName,
        state: State,
    ) -> Result<Self, CoreError> {
        Self::builder(OperationLevel::Service, cluster.clone())
            .state(state)
            .context(format!("Service {service} transition to {}", lowercase(state)))
            .build()
    }

    /// Build a host-component request with the standard context.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTarget` if `state` is not a transition target.
    pub fn host_component(
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
        state: State,
    ) -> Result<Self, CoreError> {
        Self::builder(OperationLevel::HostComponent, cluster.clone())
            .host(host.clone())
            .state(state)
            .context(format!(
                "Component {component} transition to {}",
                lowercase(state)
            ))
            .build()
    }

    /// The operation level of the request.
    #[must_use]
    pub const fn level(&self) -> OperationLevel {
        self.request_info.operation_level.level
    }

    /// The cluster the request targets.
    #[must_use]
    pub const fn cluster(&self) -> &ClusterName {
        &self.request_info.operation_level.cluster_name
    }

    /// The host of a host-component request.
    #[must_use]
    pub const fn host(&self) -> Option<&HostName> {
        self.request_info.operation_level.host_names.as_ref()
    }

    /// The requested target state.
    #[must_use]
    pub fn state(&self) -> State {
        self.service_info
            .or(self.host_roles)
            .map_or(State::Unknown, |desired| desired.state)
    }

    /// The context string recorded by the server.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.request_info.context
    }
}

/// Builder for [`StateChangeRequest`].
#[derive(Debug, Clone)]
pub struct StateChangeBuilder {
    level: OperationLevel,
    cluster: ClusterName,
    host: Option<HostName>,
    state: Option<State>,
    context: Option<String>,
}

impl StateChangeBuilder {
    /// Set the host of a host-component request.
    #[must_use]
    pub fn host(mut self, host: HostName) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the target state.
    #[must_use]
    pub const fn state(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the context string.
    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Validate the fields and produce the request.
    ///
    /// Without an explicit context, `"Transition to <state>"` is used.
    ///
    /// # Errors
    ///
    /// - `MissingState` if no target state was set
    /// - `InvalidTarget` if the state is neither `INSTALLED` nor `STARTED`
    /// - `MissingHost` if a host-component request has no host
    /// - `UnexpectedHost` if a service request has a host
    pub fn build(self) -> Result<StateChangeRequest, CoreError> {
        let state = self.state.ok_or(CoreError::MissingState(self.level))?;
        if !state.is_transition_target() {
            return Err(CoreError::InvalidTarget(state));
        }

        match (self.level, &self.host) {
            (OperationLevel::HostComponent, None) => {
                return Err(CoreError::MissingHost(self.level));
            }
            (OperationLevel::Service, Some(_)) => {
                return Err(CoreError::UnexpectedHost(self.level));
            }
            _ => {}
        }

        let context = self
            .context
            .unwrap_or_else(|| format!("Transition to {}", lowercase(state)));
        let desired = Some(DesiredState { state });
        let (service_info, host_roles) = match self.level {
            OperationLevel::Service => (desired, None),
            OperationLevel::HostComponent => (None, desired),
        };

        Ok(StateChangeRequest {
            request_info: RequestInfo {
                operation_level: OperationLevelInfo {
                    level: self.level,
                    cluster_name: self.cluster,
                    host_names: self.host,
                },
                context,
            },
            service_info,
            host_roles,
        })
    }
}

fn lowercase(state: State) -> String {
    state.as_str().to_ascii_lowercase()
}
