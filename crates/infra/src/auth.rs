//! Static permission checker.
//!
//! Real deployments delegate to an authorization service; this implementation
//! carries an explicit grant set and is sufficient for single-tenant setups
//! and tests.

use std::collections::HashSet;

use tally_core::{BudgetPermission, PermissionChecker};
use tally_domain::BudgetField;

/// Permission checker backed by an in-memory grant set.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionChecker {
    allow_all: bool,
    granted: HashSet<(BudgetPermission, BudgetField)>,
}

impl StaticPermissionChecker {
    /// A checker that denies every detailed-figures permission.
    pub fn deny_all() -> Self {
        Self::default()
    }

    /// A checker that grants every detailed-figures permission.
    pub fn allow_all() -> Self {
        Self { allow_all: true, granted: HashSet::new() }
    }

    /// Grant one permission for one field.
    pub fn with_grant(mut self, permission: BudgetPermission, field: BudgetField) -> Self {
        self.granted.insert((permission, field));
        self
    }
}

impl PermissionChecker for StaticPermissionChecker {
    fn is_granted(&self, permission: BudgetPermission, field: BudgetField) -> bool {
        self.allow_all || self.granted.contains(&(permission, field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_all_denies_everything() {
        let checker = StaticPermissionChecker::deny_all();
        assert!(!checker.is_granted(BudgetPermission::Money, BudgetField::Project));
        assert!(!checker.is_granted(BudgetPermission::Time, BudgetField::Customer));
    }

    #[test]
    fn grants_are_scoped_to_field_and_kind() {
        let checker = StaticPermissionChecker::deny_all()
            .with_grant(BudgetPermission::Money, BudgetField::Project);
        assert!(checker.is_granted(BudgetPermission::Money, BudgetField::Project));
        assert!(!checker.is_granted(BudgetPermission::Time, BudgetField::Project));
        assert!(!checker.is_granted(BudgetPermission::Money, BudgetField::Activity));
    }

    #[test]
    fn allow_all_ignores_the_grant_set() {
        let checker = StaticPermissionChecker::allow_all();
        assert!(checker.is_granted(BudgetPermission::Time, BudgetField::Activity));
    }
}
