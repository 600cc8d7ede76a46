//! Access-rule reconciliation.
//!
//! The only persisted access-control state for a dashboard is the flat
//! set of assigned user IDs. When the editor opens, [`reconstruct`]
//! derives the smallest explanatory set of grouping rules from that set
//! plus a directory snapshot, preferring coarse rules (Profile, then
//! Role) over individual User rules. On save, [`flatten`] collapses the
//! (possibly edited) rule list back to the flat set; rules themselves
//! are never persisted.
//!
//! All functions here are pure: no I/O, no failure paths. An assigned
//! ID missing from the directory snapshot degrades to a placeholder
//! User rule rather than an error.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::role::{Role, RoleId};
use crate::models::user::{User, UserId};

/// The flat, unordered set of user IDs assigned to one dashboard.
pub type AssignmentSet = BTreeSet<UserId>;

/// Identifier of a derived rule. Unique within one editor lifetime.
pub type RuleId = u64;

/// A profile label. The implicit group of all users sharing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileName(String);

impl ProfileName {
    /// Returns `None` for an empty label: profile-less users are never
    /// grouped.
    pub fn new(label: &str) -> Option<Self> {
        if label.is_empty() {
            None
        } else {
            Some(Self(label.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleType {
    User,
    Profile,
    Role,
}

impl RuleType {
    pub fn label(&self) -> &'static str {
        match self {
            RuleType::User => "User",
            RuleType::Profile => "Profile",
            RuleType::Role => "Role",
        }
    }
}

/// A derived, transient grouping rule. Invariant: within one rule set,
/// `user_ids` are pairwise disjoint and non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRule {
    pub id: RuleId,
    pub rule_type: RuleType,
    /// Display label: profile name, role name, or user display name.
    pub condition: String,
    /// Human summary shown in the rule row. Never contains member
    /// display names; search matches those separately.
    pub details: String,
    pub user_ids: BTreeSet<UserId>,
}

/// Source of fresh rule IDs, seeded from wall-clock millis so IDs from
/// different editor sessions rarely collide. Uniqueness is only
/// guaranteed within one generator.
#[derive(Debug, Clone)]
pub struct RuleIdGen {
    next: u64,
}

impl RuleIdGen {
    pub fn new() -> Self {
        Self {
            next: chrono::Utc::now().timestamp_millis() as u64,
        }
    }

    /// Deterministic generator for tests.
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> RuleId {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for RuleIdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// A group selected in the add-rule dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSelection {
    User(UserId),
    Profile(ProfileName),
    Role(RoleId),
}

/// Group users by non-empty profile name, preserving first-come order
/// of the input list. Profile-less users are excluded.
pub fn group_by_profile(users: &[User]) -> IndexMap<ProfileName, Vec<&User>> {
    let mut groups: IndexMap<ProfileName, Vec<&User>> = IndexMap::new();
    for user in users {
        if let Some(profile) = ProfileName::new(&user.profile_name) {
            groups.entry(profile).or_default().push(user);
        }
    }
    groups
}

fn placeholder_name(id: UserId) -> String {
    format!("User-{id}")
}

fn profile_details(member_count: usize) -> String {
    format!("All {member_count} users with this profile")
}

fn role_details(role: &Role, member_count: usize) -> String {
    format!("{} role, {} members", role.role_type, member_count)
}

/// Derive the rule set explaining `assigned`.
///
/// Passes run in priority order with first-come precedence and no
/// backtracking: Profile groups (input order), then roles (input list
/// order), then one User rule per remaining assigned ID. Each pass only
/// sees IDs not covered by earlier passes.
pub fn reconstruct(
    assigned: &AssignmentSet,
    users: &[User],
    roles: &[Role],
    ids: &mut RuleIdGen,
) -> Vec<AccessRule> {
    let mut rules = Vec::new();
    let mut covered: BTreeSet<UserId> = BTreeSet::new();

    // Profile pass: a profile qualifies only when every one of its
    // members is assigned.
    for (profile, members) in group_by_profile(users) {
        let member_ids: BTreeSet<UserId> = members.iter().map(|u| u.id).collect();
        if !member_ids.is_empty() && member_ids.is_subset(assigned) {
            covered.extend(&member_ids);
            rules.push(AccessRule {
                id: ids.next_id(),
                rule_type: RuleType::Profile,
                condition: profile.as_str().to_string(),
                details: profile_details(member_ids.len()),
                user_ids: member_ids,
            });
        }
    }

    // Role pass: only members not already covered count; all of them
    // must be assigned or the role emits nothing. Roles are processed
    // strictly in input order — overlapping roles keep their
    // first-come outcome.
    for role in roles {
        let uncovered: BTreeSet<UserId> = role
            .members
            .iter()
            .copied()
            .filter(|id| !covered.contains(id))
            .collect();
        if !uncovered.is_empty() && uncovered.is_subset(assigned) {
            covered.extend(&uncovered);
            rules.push(AccessRule {
                id: ids.next_id(),
                rule_type: RuleType::Role,
                condition: role.name.clone(),
                details: role_details(role, uncovered.len()),
                user_ids: uncovered,
            });
        }
    }

    // User pass: directory order first, then orphaned IDs (assigned
    // but absent from the snapshot) in ascending order with a
    // synthesized placeholder name.
    for user in users {
        if assigned.contains(&user.id) && !covered.contains(&user.id) {
            covered.insert(user.id);
            rules.push(AccessRule {
                id: ids.next_id(),
                rule_type: RuleType::User,
                condition: user.display_name.clone(),
                details: user.display_name.clone(),
                user_ids: BTreeSet::from([user.id]),
            });
        }
    }
    for &id in assigned {
        if !covered.contains(&id) {
            rules.push(AccessRule {
                id: ids.next_id(),
                rule_type: RuleType::User,
                condition: placeholder_name(id),
                details: placeholder_name(id),
                user_ids: BTreeSet::from([id]),
            });
        }
    }

    rules
}

/// Collapse a rule list back to the flat assignment set. Duplicate IDs
/// across rules (transient mid-edit states) collapse harmlessly.
pub fn flatten(rules: &[AccessRule]) -> AssignmentSet {
    rules
        .iter()
        .flat_map(|rule| rule.user_ids.iter().copied())
        .collect()
}

/// Append one rule per selection, containing only members not already
/// covered by an existing rule. A selection whose every member is
/// covered is silently dropped: rules never overlap.
pub fn add_rules(
    rules: &mut Vec<AccessRule>,
    selections: &[RuleSelection],
    users: &[User],
    roles: &[Role],
    ids: &mut RuleIdGen,
) {
    let mut existing = flatten(rules);

    for selection in selections {
        match selection {
            RuleSelection::User(user_id) => {
                if existing.contains(user_id) {
                    continue;
                }
                existing.insert(*user_id);
                let name = users
                    .iter()
                    .find(|u| u.id == *user_id)
                    .map(|u| u.display_name.clone())
                    .unwrap_or_else(|| placeholder_name(*user_id));
                rules.push(AccessRule {
                    id: ids.next_id(),
                    rule_type: RuleType::User,
                    condition: name.clone(),
                    details: name,
                    user_ids: BTreeSet::from([*user_id]),
                });
            }
            RuleSelection::Profile(profile) => {
                let uncovered: BTreeSet<UserId> = users
                    .iter()
                    .filter(|u| u.profile_name == profile.as_str() && !existing.contains(&u.id))
                    .map(|u| u.id)
                    .collect();
                if uncovered.is_empty() {
                    continue;
                }
                existing.extend(&uncovered);
                rules.push(AccessRule {
                    id: ids.next_id(),
                    rule_type: RuleType::Profile,
                    condition: profile.as_str().to_string(),
                    details: profile_details(uncovered.len()),
                    user_ids: uncovered,
                });
            }
            RuleSelection::Role(role_id) => {
                let Some(role) = roles.iter().find(|r| r.id == *role_id) else {
                    continue;
                };
                let uncovered: BTreeSet<UserId> = role
                    .members
                    .iter()
                    .copied()
                    .filter(|id| !existing.contains(id))
                    .collect();
                if uncovered.is_empty() {
                    continue;
                }
                existing.extend(&uncovered);
                rules.push(AccessRule {
                    id: ids.next_id(),
                    rule_type: RuleType::Role,
                    condition: role.name.clone(),
                    details: role_details(role, uncovered.len()),
                    user_ids: uncovered,
                });
            }
        }
    }
}

/// Remove rules by ID. Removed users simply become unassigned on save;
/// there are no cascading effects.
pub fn delete_rules(rules: &mut Vec<AccessRule>, rule_ids: &[RuleId]) {
    rules.retain(|rule| !rule_ids.contains(&rule.id));
}

/// Restrict the visible rule list to a subset of rule types.
pub fn filter_rules<'a>(rules: &'a [AccessRule], types: &BTreeSet<RuleType>) -> Vec<&'a AccessRule> {
    rules
        .iter()
        .filter(|rule| types.contains(&rule.rule_type))
        .collect()
}

/// Case-insensitive free-text search over condition, type name, and
/// details. Profile and Role rules additionally match on any covered
/// user's display name, so group rules stay discoverable by member
/// even though the name is not rendered in the row.
pub fn search_rules<'a>(rules: &'a [AccessRule], query: &str, users: &[User]) -> Vec<&'a AccessRule> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return rules.iter().collect();
    }

    rules
        .iter()
        .filter(|rule| {
            if rule.condition.to_lowercase().contains(&needle)
                || rule.rule_type.label().to_lowercase().contains(&needle)
                || rule.details.to_lowercase().contains(&needle)
            {
                return true;
            }
            match rule.rule_type {
                RuleType::Profile | RuleType::Role => users.iter().any(|u| {
                    rule.user_ids.contains(&u.id)
                        && u.display_name.to_lowercase().contains(&needle)
                }),
                RuleType::User => false,
            }
        })
        .collect()
}
