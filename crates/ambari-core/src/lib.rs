//! Core types for the Ambari cluster-state client.
//!
//! This crate provides the foundational types shared by the client and CLI:
//!
//! - **Names**: Validated names for clusters, hosts, services, and components
//! - **States**: The lifecycle states reported and accepted by the API
//! - **Error types**: Local validation errors
//!
//! # Example
//!
//! ```
//! use ambari_core::{ClusterName, ServiceName, State};
//!
//! let cluster = ClusterName::new("c1").unwrap();
//! let service: ServiceName = "HDFS".parse().unwrap();
//!
//! // Stopping a service returns it to INSTALLED
//! assert_eq!(State::STOPPED, State::Installed);
//! # let _ = (cluster, service);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod names;
pub mod state;

pub use error::{CoreError, Result};
pub use names::{ClusterName, ComponentName, HostName, NameError, ServiceName};
pub use state::{OperationLevel, State, StateParseError};
