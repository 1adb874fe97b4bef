//! Response types for the Ambari REST API.
//!
//! Collection endpoints answer with an `items` array of typed wrapper objects;
//! single-resource endpoints answer with an object carrying its own `href`.

use ambari_core::{ClusterName, ComponentName, HostName, ServiceName, State};
use serde::Deserialize;
use serde_json::Value;

/// A collection response. Only the `items` array is read.
#[derive(Debug, Deserialize)]
pub(crate) struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// An item of a collection response that carries one resource name.
pub(crate) trait NamedItem {
    type Name;

    fn into_name(self) -> Self::Name;
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClusterItem {
    #[serde(rename = "Clusters")]
    info: ClusterInfo,
}

#[derive(Debug, Deserialize)]
struct ClusterInfo {
    cluster_name: ClusterName,
}

impl NamedItem for ClusterItem {
    type Name = ClusterName;

    fn into_name(self) -> ClusterName {
        self.info.cluster_name
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HostItem {
    #[serde(rename = "Hosts")]
    info: HostInfo,
}

#[derive(Debug, Deserialize)]
struct HostInfo {
    host_name: HostName,
}

impl NamedItem for HostItem {
    type Name = HostName;

    fn into_name(self) -> HostName {
        self.info.host_name
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceItem {
    #[serde(rename = "ServiceInfo")]
    info: ServiceInfo,
}

#[derive(Debug, Deserialize)]
struct ServiceInfo {
    service_name: ServiceName,
}

impl NamedItem for ServiceItem {
    type Name = ServiceName;

    fn into_name(self) -> ServiceName {
        self.info.service_name
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceComponentItem {
    #[serde(rename = "ServiceComponentInfo")]
    info: ComponentInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HostComponentItem {
    #[serde(rename = "HostRoles")]
    info: ComponentInfo,
}

#[derive(Debug, Deserialize)]
struct ComponentInfo {
    component_name: ComponentName,
}

impl NamedItem for ServiceComponentItem {
    type Name = ComponentName;

    fn into_name(self) -> ComponentName {
        self.info.component_name
    }
}

impl NamedItem for HostComponentItem {
    type Name = ComponentName;

    fn into_name(self) -> ComponentName {
        self.info.component_name
    }
}

/// A single resource as returned by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// The full JSON body of the response.
    pub attributes: Value,
}

impl Resource {
    /// The resource's own link, if the body carries one.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.attributes.get("href").and_then(Value::as_str)
    }

    /// The lifecycle state reported for a service or host-component.
    #[must_use]
    pub fn state(&self) -> Option<State> {
        ["ServiceInfo", "HostRoles"]
            .iter()
            .filter_map(|section| self.attributes.get(section))
            .filter_map(|info| info.get("state").and_then(Value::as_str))
            .find_map(|s| s.parse().ok())
    }
}

/// A resource together with the endpoint that addresses it.
///
/// The endpoint is the `href` reported by the server and is used verbatim for
/// mutations. It is only valid for the call that located it.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    /// Fully qualified link to the resource.
    pub endpoint: String,
    /// The full JSON body of the lookup response.
    pub attributes: Value,
}

/// Outcome of a state-change request.
///
/// Ambari processes state changes asynchronously. A `202 Accepted` carries a
/// reference to the request that tracks the work; a `200 OK` without a body
/// means the resource was already in the target state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// HTTP status of the response.
    pub status: u16,
    /// The asynchronous request started by the server, if any.
    pub request: Option<RequestRef>,
}

impl StateChange {
    /// Returns true if the server started work for this change.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.request.is_some()
    }
}

/// Reference to an asynchronous request on the Ambari server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestRef {
    /// Link to the request resource.
    pub href: String,
    /// Request id.
    #[serde(rename = "Requests")]
    pub info: RequestInfo,
}

/// Status block of an asynchronous request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestInfo {
    /// Server-assigned request id.
    pub id: u64,
    /// Request status, e.g. `Accepted`.
    #[serde(default)]
    pub status: Option<String>,
}
