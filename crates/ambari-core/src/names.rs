//! Typed names for remote Ambari resources.
//!
//! Every resource the API manages is addressed by a name that ends up as a
//! single path segment of a URL. The newtypes here keep cluster, host, service
//! and component names apart and reject anything that cannot be embedded in a
//! path verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when validating a resource name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The name is empty.
    #[error("{kind} name must not be empty")]
    Empty {
        /// The kind of resource being named.
        kind: &'static str,
    },

    /// The name contains a character that cannot appear in a path segment.
    #[error("{kind} name {name:?} contains invalid character {found:?}")]
    InvalidCharacter {
        /// The kind of resource being named.
        kind: &'static str,
        /// The rejected name.
        name: String,
        /// The first offending character.
        found: char,
    },
}

fn validate(kind: &'static str, name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty { kind });
    }
    if let Some(found) = name
        .chars()
        .find(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
    {
        return Err(NameError::InvalidCharacter {
            kind,
            name: name.to_string(),
            found,
        });
    }
    Ok(())
}

macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a name.
            ///
            /// # Errors
            ///
            /// Returns an error if the name is empty or contains a character
            /// that cannot be used in a URL path segment.
            pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
                let name = name.into();
                validate($kind, &name)?;
                Ok(Self(name))
            }

            /// Return the name as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = NameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = NameError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = NameError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> Self {
                name.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name!(
    /// Name of a cluster managed by the Ambari server (e.g. `c1`).
    ClusterName,
    "cluster"
);

define_name!(
    /// Fully qualified host name of a cluster member.
    HostName,
    "host"
);

define_name!(
    /// Name of a service within a cluster (e.g. `HDFS`).
    ServiceName,
    "service"
);

define_name!(
    /// Name of a component role (e.g. `DATANODE`).
    ///
    /// The same name addresses both the service component and its per-host
    /// instances.
    ComponentName,
    "component"
);
