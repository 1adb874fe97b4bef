//! Client for the Ambari cluster-management REST API.
//!
//! This crate enumerates clusters, hosts, services and components, and drives
//! services and host-components through their lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   LifecycleOrchestrator                      │
//! │     add service · add component to host · add/remove host    │
//! └─────────────────────────────┬───────────────────────────────┘
//!                               │ ClusterApi
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        AmbariClient                          │
//! │  ┌─────────────┐ ┌──────────────┐ ┌──────────────────────┐  │
//! │  │   Reads     │ │   Locator    │ │  State Transition    │  │
//! │  │   (GET)     │ │  (href)      │ │  Driver (PUT)        │  │
//! │  └─────────────┘ └──────────────┘ └──────────────────────┘  │
//! └─────────────────────────────┬───────────────────────────────┘
//!                               │ HTTP Basic + X-Requested-By
//!                               ▼
//!                     http://<host>:<port>/api/v1/
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use ambari_client::{AmbariClient, ClientConfig, LifecycleOrchestrator, ServiceCatalog};
//! use ambari_core::{ClusterName, ServiceName};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("ambari.example.com", 8080, "admin", "admin");
//! let client = Arc::new(AmbariClient::new(&config)?);
//!
//! let cluster = ClusterName::new("c1")?;
//! for service in client.services(&cluster).await? {
//!     println!("{service}");
//! }
//!
//! let catalog = ServiceCatalog::from_path("components.yml")?;
//! let orchestrator = LifecycleOrchestrator::new(Arc::clone(&client), catalog);
//! let hdfs = ServiceName::new("HDFS")?;
//! orchestrator.add_service(&cluster, &hdfs).await?;
//! client.start_service(&cluster, &hdfs).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # States
//!
//! Ambari has no stopped state. Stopping a service or host-component returns
//! it to `INSTALLED`, available as [`State::STOPPED`](ambari_core::State::STOPPED).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod driver;
pub mod envelope;
pub mod error;
pub mod locator;
pub mod orchestrator;
pub mod types;

pub use api::ClusterApi;
pub use catalog::ServiceCatalog;
pub use client::{AmbariClient, REQUESTED_BY_HEADER};
pub use config::{ClientConfig, RetryPolicy};
pub use envelope::{StateChangeBuilder, StateChangeRequest};
pub use error::{ClientError, Result};
pub use locator::ResourceRef;
pub use orchestrator::{AddOutcome, LifecycleOrchestrator};
pub use types::{Located, RequestInfo, RequestRef, Resource, StateChange};

#[cfg(any(test, feature = "test-utils"))]
pub use api::{RecordedCall, RecordingClusterApi};

// Re-export commonly used types from dependencies for convenience
pub use ambari_core::{ClusterName, ComponentName, HostName, OperationLevel, ServiceName, State};
