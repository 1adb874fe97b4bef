//! Lifecycle states and operation levels.
//!
//! Ambari reports and accepts the same set of state names for services and
//! host-components. Only two of them are meaningful as transition targets:
//!
//! ```text
//!   (created) ──▶ INSTALL_PENDING ──▶ INSTALLED ◀──── stop ────┐
//!                                         │                     │
//!                                         └────── start ──▶ STARTED
//! ```
//!
//! The API has no distinct stopped state. Stopping a service or component
//! moves it back to `INSTALLED`, which is exposed here as [`State::STOPPED`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a service or host-component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// Resource created, nothing installed yet.
    Init,
    /// Created and waiting for an install request.
    InstallPending,
    /// Install in progress.
    Installing,
    /// The last install attempt failed.
    InstallFailed,
    /// Installed and not running. Also the stopped state.
    Installed,
    /// Start in progress.
    Starting,
    /// Running.
    Started,
    /// Stop in progress.
    Stopping,
    /// Uninstall in progress.
    Uninstalling,
    /// Uninstalled.
    Uninstalled,
    /// Data wipe in progress.
    WipingOut,
    /// Upgrade in progress.
    Upgrading,
    /// Disabled by an operator.
    Disabled,
    /// The server could not determine the state.
    Unknown,
}

impl State {
    /// The state a resource is left in after a stop.
    ///
    /// Ambari has no separate stopped state, so this is `Installed`.
    pub const STOPPED: Self = Self::Installed;

    /// Return the wire representation of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::InstallPending => "INSTALL_PENDING",
            Self::Installing => "INSTALLING",
            Self::InstallFailed => "INSTALL_FAILED",
            Self::Installed => "INSTALLED",
            Self::Starting => "STARTING",
            Self::Started => "STARTED",
            Self::Stopping => "STOPPING",
            Self::Uninstalling => "UNINSTALLING",
            Self::Uninstalled => "UNINSTALLED",
            Self::WipingOut => "WIPING_OUT",
            Self::Upgrading => "UPGRADING",
            Self::Disabled => "DISABLED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns true if the state is accepted as the target of a state change.
    #[must_use]
    pub const fn is_transition_target(self) -> bool {
        matches!(self, Self::Installed | Self::Started)
    }

    /// Returns true if a request involving this resource is still in flight.
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(
            self,
            Self::Installing
                | Self::Starting
                | Self::Stopping
                | Self::Uninstalling
                | Self::WipingOut
                | Self::Upgrading
        )
    }

    /// Returns true if a host-component in this state may be started.
    ///
    /// A host-component has to be installed before it can run.
    #[must_use]
    pub const fn can_start(self) -> bool {
        matches!(self, Self::Installed | Self::Started)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = StateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let state = match s.to_ascii_uppercase().as_str() {
            "INIT" => Self::Init,
            "INSTALL_PENDING" => Self::InstallPending,
            "INSTALLING" => Self::Installing,
            "INSTALL_FAILED" => Self::InstallFailed,
            // "stopped" is accepted on input so callers can name the rest state directly
            "INSTALLED" | "STOPPED" => Self::Installed,
            "STARTING" => Self::Starting,
            "STARTED" => Self::Started,
            "STOPPING" => Self::Stopping,
            "UNINSTALLING" => Self::Uninstalling,
            "UNINSTALLED" => Self::Uninstalled,
            "WIPING_OUT" => Self::WipingOut,
            "UPGRADING" => Self::Upgrading,
            "DISABLED" => Self::Disabled,
            "UNKNOWN" => Self::Unknown,
            _ => return Err(StateParseError(s.to_string())),
        };
        Ok(state)
    }
}

/// Error returned when a string does not name a known state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown state: {0}")]
pub struct StateParseError(pub String);

/// Granularity of a state-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationLevel {
    /// The request targets a whole service.
    Service,
    /// The request targets one component on one host.
    HostComponent,
}

impl OperationLevel {
    /// Return the wire representation of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Service => "SERVICE",
            Self::HostComponent => "HOST_COMPONENT",
        }
    }
}

impl fmt::Display for OperationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
