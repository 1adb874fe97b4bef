//! Subcommands of the `ambari` binary.
//!
//! Lists are printed one name per line, resources as pretty JSON and state
//! changes as the HTTP status followed by the request id when one was started.

use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;

use ambari_client::{
    AddOutcome, AmbariClient, LifecycleOrchestrator, Resource, ServiceCatalog, StateChange,
};
use ambari_core::{ClusterName, ComponentName, HostName, ServiceName};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List clusters.
    Clusters,

    /// List the hosts of a cluster.
    Hosts { cluster: ClusterName },

    /// List the services of a cluster.
    Services { cluster: ClusterName },

    /// List the components of a service.
    Components {
        cluster: ClusterName,
        service: ServiceName,
    },

    /// List the components installed on a host.
    HostComponents { cluster: ClusterName, host: HostName },

    /// Print the full description of a resource.
    #[command(subcommand)]
    Show(Show),

    /// Start a service.
    StartService {
        cluster: ClusterName,
        service: ServiceName,
    },

    /// Stop a service.
    StopService {
        cluster: ClusterName,
        service: ServiceName,
    },

    /// Start a component on a host.
    StartComponent {
        cluster: ClusterName,
        host: HostName,
        component: ComponentName,
    },

    /// Stop a component on a host.
    StopComponent {
        cluster: ClusterName,
        host: HostName,
        component: ComponentName,
    },

    /// Create a service and its catalog components.
    AddService {
        cluster: ClusterName,
        service: ServiceName,
    },

    /// Delete a service.
    RemoveService {
        cluster: ClusterName,
        service: ServiceName,
    },

    /// Create a component on a host and install it.
    AddComponent {
        cluster: ClusterName,
        host: HostName,
        component: ComponentName,
    },

    /// Delete a component from a host.
    RemoveComponent {
        cluster: ClusterName,
        host: HostName,
        component: ComponentName,
    },

    /// Register a host with a cluster.
    AddHost { cluster: ClusterName, host: HostName },

    /// Remove a host from a cluster.
    RemoveHost { cluster: ClusterName, host: HostName },
}

#[derive(Subcommand, Debug)]
pub enum Show {
    /// A cluster.
    Cluster { cluster: ClusterName },

    /// A host.
    Host { cluster: ClusterName, host: HostName },

    /// A service.
    Service {
        cluster: ClusterName,
        service: ServiceName,
    },

    /// A component of a service.
    Component {
        cluster: ClusterName,
        service: ServiceName,
        component: ComponentName,
    },

    /// A component on a host.
    HostComponent {
        cluster: ClusterName,
        host: HostName,
        component: ComponentName,
    },
}

impl Command {
    pub async fn run(self, client: AmbariClient, catalog_path: &Path) -> anyhow::Result<()> {
        let client = Arc::new(client);

        match self {
            Self::Clusters => print_names(&client.clusters().await?),
            Self::Hosts { cluster } => print_names(&client.hosts(&cluster).await?),
            Self::Services { cluster } => print_names(&client.services(&cluster).await?),
            Self::Components { cluster, service } => {
                print_names(&client.service_components(&cluster, &service).await?);
            }
            Self::HostComponents { cluster, host } => {
                print_names(&client.host_components(&cluster, &host).await?);
            }
            Self::Show(show) => print_resource(&show.fetch(&client).await?)?,

            Self::StartService { cluster, service } => {
                print_change(&client.start_service(&cluster, &service).await?);
            }
            Self::StopService { cluster, service } => {
                print_change(&client.stop_service(&cluster, &service).await?);
            }
            Self::StartComponent {
                cluster,
                host,
                component,
            } => print_change(
                &client
                    .start_host_component(&cluster, &host, &component)
                    .await?,
            ),
            Self::StopComponent {
                cluster,
                host,
                component,
            } => print_change(
                &client
                    .stop_host_component(&cluster, &host, &component)
                    .await?,
            ),

            Self::AddService { cluster, service } => {
                let catalog = ServiceCatalog::from_path(catalog_path).with_context(|| {
                    format!("Failed to load service catalog {}", catalog_path.display())
                })?;
                let orchestrator = LifecycleOrchestrator::new(client, catalog);
                print_outcome(&service, orchestrator.add_service(&cluster, &service).await?);
            }
            Self::AddComponent {
                cluster,
                host,
                component,
            } => {
                let change = orchestrator(client)
                    .add_component_to_host(&cluster, &host, &component)
                    .await?;
                print_change(&change);
            }
            Self::AddHost { cluster, host } => {
                print_outcome(&host, orchestrator(client).add_host(&cluster, &host).await?);
            }
            Self::RemoveService { cluster, service } => {
                orchestrator(client)
                    .remove_service(&cluster, &service)
                    .await?;
                println!("{service} removed");
            }
            Self::RemoveComponent {
                cluster,
                host,
                component,
            } => {
                orchestrator(client)
                    .remove_component(&cluster, &host, &component)
                    .await?;
                println!("{component} removed from {host}");
            }
            Self::RemoveHost { cluster, host } => {
                orchestrator(client).remove_host(&cluster, &host).await?;
                println!("{host} removed");
            }
        }

        Ok(())
    }
}

impl Show {
    async fn fetch(self, client: &AmbariClient) -> ambari_client::Result<Resource> {
        match self {
            Self::Cluster { cluster } => client.cluster(&cluster).await,
            Self::Host { cluster, host } => client.host(&cluster, &host).await,
            Self::Service { cluster, service } => client.service(&cluster, &service).await,
            Self::Component {
                cluster,
                service,
                component,
            } => {
                client
                    .service_component(&cluster, &service, &component)
                    .await
            }
            Self::HostComponent {
                cluster,
                host,
                component,
            } => client.host_component(&cluster, &host, &component).await,
        }
    }
}

/// An orchestrator for operations that do not consult the service catalog.
fn orchestrator(client: Arc<AmbariClient>) -> LifecycleOrchestrator<AmbariClient> {
    LifecycleOrchestrator::new(client, ServiceCatalog::new())
}

fn print_names<T: Display>(names: &[T]) {
    for name in names {
        println!("{name}");
    }
}

fn print_resource(resource: &Resource) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&resource.attributes)?;
    println!("{json}");
    Ok(())
}

fn print_change(change: &StateChange) {
    match &change.request {
        Some(request) => println!("{} request {}", change.status, request.info.id),
        None => println!("{}", change.status),
    }
}

fn print_outcome(name: &impl Display, outcome: AddOutcome) {
    match outcome {
        AddOutcome::Created => println!("{name} created"),
        AddOutcome::AlreadyPresent => println!("{name} already present"),
    }
}
