//! Resource location.
//!
//! Mutations never build their target URL by hand. They look the resource up
//! first and use the `href` the server reports for it. Links may change
//! between calls, so every mutation locates its target again; nothing here is
//! cached.

use std::fmt;

use ambari_core::{ClusterName, ComponentName, HostName, ServiceName};

use crate::client::AmbariClient;
use crate::error::{ClientError, Result};
use crate::types::Located;

/// A remote resource identified by kind and names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    /// A cluster.
    Cluster {
        /// Cluster name.
        cluster: ClusterName,
    },
    /// A host within a cluster.
    Host {
        /// Cluster name.
        cluster: ClusterName,
        /// Host name.
        host: HostName,
    },
    /// A service within a cluster.
    Service {
        /// Cluster name.
        cluster: ClusterName,
        /// Service name.
        service: ServiceName,
    },
    /// A component of a service.
    ServiceComponent {
        /// Cluster name.
        cluster: ClusterName,
        /// Owning service.
        service: ServiceName,
        /// Component name.
        component: ComponentName,
    },
    /// A component instance on a host.
    HostComponent {
        /// Cluster name.
        cluster: ClusterName,
        /// Host the component runs on.
        host: HostName,
        /// Component name.
        component: ComponentName,
    },
}

impl ResourceRef {
    /// Reference a cluster.
    #[must_use]
    pub fn cluster(cluster: &ClusterName) -> Self {
        Self::Cluster {
            cluster: cluster.clone(),
        }
    }

    /// Reference a host.
    #[must_use]
    pub fn host(cluster: &ClusterName, host: &HostName) -> Self {
        Self::Host {
            cluster: cluster.clone(),
            host: host.clone(),
        }
    }

    /// Reference a service.
    #[must_use]
    pub fn service(cluster: &ClusterName, service: &ServiceName) -> Self {
        Self::Service {
            cluster: cluster.clone(),
            service: service.clone(),
        }
    }

    /// Reference a service component.
    #[must_use]
    pub fn service_component(
        cluster: &ClusterName,
        service: &ServiceName,
        component: &ComponentName,
    ) -> Self {
        Self::ServiceComponent {
            cluster: cluster.clone(),
            service: service.clone(),
            component: component.clone(),
        }
    }

    /// Reference a host-component.
    #[must_use]
    pub fn host_component(
        cluster: &ClusterName,
        host: &HostName,
        component: &ComponentName,
    ) -> Self {
        Self::HostComponent {
            cluster: cluster.clone(),
            host: host.clone(),
            component: component.clone(),
        }
    }

    /// The cluster the resource belongs to.
    #[must_use]
    pub const fn cluster_name(&self) -> &ClusterName {
        match self {
            Self::Cluster { cluster }
            | Self::Host { cluster, .. }
            | Self::Service { cluster, .. }
            | Self::ServiceComponent { cluster, .. }
            | Self::HostComponent { cluster, .. } => cluster,
        }
    }

    /// The kind of resource, for logs and messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Cluster { .. } => "cluster",
            Self::Host { .. } => "host",
            Self::Service { .. } => "service",
            Self::ServiceComponent { .. } => "service component",
            Self::HostComponent { .. } => "host component",
        }
    }

    /// Lookup path relative to the API root.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Cluster { cluster } => format!("clusters/{cluster}"),
            Self::Host { cluster, host } => format!("clusters/{cluster}/hosts/{host}/"),
            Self::Service { cluster, service } => {
                format!("clusters/{cluster}/services/{service}")
            }
            Self::ServiceComponent {
                cluster,
                service,
                component,
            } => format!("clusters/{cluster}/services/{service}/components/{component}/"),
            Self::HostComponent {
                cluster,
                host,
                component,
            } => format!("clusters/{cluster}/hosts/{host}/host_components/{component}"),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster { cluster } => write!(f, "cluster {cluster}"),
            Self::Host { cluster, host } => write!(f, "host {host} in cluster {cluster}"),
            Self::Service { cluster, service } => {
                write!(f, "service {service} in cluster {cluster}")
            }
            Self::ServiceComponent {
                cluster,
                service,
                component,
            } => write!(
                f,
                "component {component} of service {service} in cluster {cluster}"
            ),
            Self::HostComponent {
                cluster,
                host,
                component,
            } => write!(
                f,
                "component {component} on host {host} in cluster {cluster}"
            ),
        }
    }
}

impl AmbariClient {
    /// Look a resource up and return the endpoint the server reports for it.
    ///
    /// The endpoint is the response's `href`, to be used verbatim for one
    /// subsequent mutation.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the resource does not exist
    /// - `Remote` for any other non-success response
    /// - `MissingLink` if the response carries no `href`
    pub async fn locate(&self, target: &ResourceRef) -> Result<Located> {
        let path = target.path();
        let resource = self.get_resource(&path).await?;

        let endpoint = resource
            .href()
            .map(str::to_string)
            .ok_or(ClientError::MissingLink { resource: path })?;

        tracing::debug!(resource = %target, endpoint = %endpoint, "Located resource");

        Ok(Located {
            endpoint,
            attributes: resource.attributes,
        })
    }
}
