//! Flat permission checks for admin actions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{DeskError, Result};

/// Sentinel permission granting every action
pub const ALL_PERMISSIONS: &str = "all";

/// Check whether `permissions` allow `action`
///
/// `"all"` allows everything; otherwise the action must be present verbatim.
/// No wildcard or prefix matching.
pub fn can_i<I, S>(permissions: I, action: &str) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    permissions.into_iter().any(|granted| {
        let granted = granted.as_ref();
        granted == ALL_PERMISSIONS || granted == action
    })
}

/// The permissions held by the signed-in admin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding only the `"all"` sentinel
    pub fn all() -> Self {
        [ALL_PERMISSIONS].into_iter().collect()
    }

    /// Grant an action
    pub fn grant(&mut self, action: impl Into<String>) {
        self.0.insert(action.into());
    }

    /// Check an action
    pub fn can(&self, action: &str) -> bool {
        self.0.contains(ALL_PERMISSIONS) || self.0.contains(action)
    }

    /// Check an action, turning a refusal into an error
    pub fn require(&self, action: &str) -> Result<()> {
        if self.can(action) {
            Ok(())
        } else {
            Err(DeskError::PermissionDenied(action.to_string()))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
