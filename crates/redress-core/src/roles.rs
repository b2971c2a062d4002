// SPDX-FileCopyrightText: 2026 Redress Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed role vocabulary and the escalation routing table.
//!
//! Roles form a fixed organizational ladder: the front-line handler, three
//! specialist departments, two registrar tiers, and two executive tiers.
//! Every permitted escalation route is listed in [`Role::escalation_targets`]
//! as an exhaustive match, so adding or auditing a route is a compile-time
//! operation rather than a string comparison scattered across handlers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An organizational role that can hold a pending escalation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Front-line complaint handler; first assignee and send-back terminus.
    Handler,
    /// Student information systems department.
    Sims,
    /// Finance department.
    Finance,
    /// Library services department.
    Library,
    /// Campus-level registrar.
    CampusRegistrar,
    /// University-level registrar.
    UniversityRegistrar,
    /// Academic vice president.
    AcademicVp,
    /// University president; top of the ladder.
    President,
}

impl Role {
    /// Roles this role is allowed to escalate a complaint to.
    ///
    /// An empty slice means the role must resolve or send back.
    pub fn escalation_targets(self) -> &'static [Role] {
        match self {
            Role::Handler => &[Role::Sims, Role::Finance, Role::Library],
            Role::Sims | Role::Finance | Role::Library => &[Role::CampusRegistrar],
            Role::CampusRegistrar => &[Role::UniversityRegistrar],
            Role::UniversityRegistrar => &[Role::AcademicVp],
            Role::AcademicVp => &[Role::President],
            Role::President => &[],
        }
    }

    /// Whether this role may escalate to the given target role.
    pub fn may_escalate_to(self, target: Role) -> bool {
        self.escalation_targets().contains(&target)
    }

    /// Upper-tier roles trigger the executive-report side channel when a
    /// transition involves them.
    pub fn is_upper_tier(self) -> bool {
        matches!(
            self,
            Role::UniversityRegistrar | Role::AcademicVp | Role::President
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn role_text_round_trips() {
        let all = [
            Role::Handler,
            Role::Sims,
            Role::Finance,
            Role::Library,
            Role::CampusRegistrar,
            Role::UniversityRegistrar,
            Role::AcademicVp,
            Role::President,
        ];
        for role in all {
            let text = role.to_string();
            assert_eq!(Role::from_str(&text).unwrap(), role);
        }
        assert_eq!(Role::CampusRegistrar.to_string(), "campus_registrar");
        assert_eq!(Role::from_str("academic_vp").unwrap(), Role::AcademicVp);
    }

    #[test]
    fn departments_escalate_to_campus_registrar_only() {
        for dept in [Role::Sims, Role::Finance, Role::Library] {
            assert_eq!(dept.escalation_targets(), &[Role::CampusRegistrar]);
            assert!(dept.may_escalate_to(Role::CampusRegistrar));
            assert!(!dept.may_escalate_to(Role::AcademicVp));
        }
    }

    #[test]
    fn registrar_chain_ends_at_president() {
        assert!(Role::UniversityRegistrar.may_escalate_to(Role::AcademicVp));
        assert!(Role::AcademicVp.may_escalate_to(Role::President));
        assert!(Role::President.escalation_targets().is_empty());
    }

    #[test]
    fn upper_tier_classification() {
        assert!(!Role::Handler.is_upper_tier());
        assert!(!Role::CampusRegistrar.is_upper_tier());
        assert!(Role::UniversityRegistrar.is_upper_tier());
        assert!(Role::President.is_upper_tier());
    }
}
