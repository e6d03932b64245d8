// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tri-state service enablement.

use std::fmt;

/// Whether a workload service should run.
///
/// `Auto` is the unset state: the service waits until its workload is
/// observed in the host process table before activating. The decision a
/// service derives from this value latches once and is not re-evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Enablement {
    Enabled,
    Disabled,
    #[default]
    Auto,
}

impl Enablement {
    /// Map a config-file boolean (absent key means auto).
    pub fn from_option(value: Option<bool>) -> Self {
        match value {
            Some(true) => Enablement::Enabled,
            Some(false) => Enablement::Disabled,
            None => Enablement::Auto,
        }
    }

    pub fn as_option(&self) -> Option<bool> {
        match self {
            Enablement::Enabled => Some(true),
            Enablement::Disabled => Some(false),
            Enablement::Auto => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Enablement::Auto)
    }
}

impl fmt::Display for Enablement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Enablement::Enabled => "enabled",
            Enablement::Disabled => "disabled",
            Enablement::Auto => "auto",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
#[path = "enablement_tests.rs"]
mod tests;
