//! Dashboard access editor controller.
//!
//! Thin, caller-owned state around the pure reconciliation functions in
//! [`crate::access`]. The editor holds the mutable rule list derived
//! when a dashboard is opened; rules are discarded on close and only
//! the flattened assignment set is ever persisted.

use std::collections::BTreeSet;

use crate::access::{
    self, AccessRule, AssignmentSet, RuleId, RuleIdGen, RuleSelection, RuleType,
};
use crate::models::role::Role;
use crate::models::user::User;

/// Directory snapshot the editor works against. Captured when the
/// editor opens; the reconciler never sees anything fresher.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
}

/// The editor has exactly two UI states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Viewing,
    AddRuleOpen,
}

/// One open dashboard's access-rule editing session.
#[derive(Debug)]
pub struct RuleEditor {
    snapshot: DirectorySnapshot,
    rules: Vec<AccessRule>,
    type_filter: BTreeSet<RuleType>,
    query: String,
    mode: EditorMode,
    ids: RuleIdGen,
}

impl RuleEditor {
    /// Open the editor: reconstruct rules from the persisted
    /// assignment set and the given directory snapshot.
    pub fn open(assigned: &AssignmentSet, snapshot: DirectorySnapshot) -> Self {
        let mut ids = RuleIdGen::new();
        let rules = access::reconstruct(assigned, &snapshot.users, &snapshot.roles, &mut ids);
        Self {
            snapshot,
            rules,
            type_filter: BTreeSet::from([RuleType::User, RuleType::Profile, RuleType::Role]),
            query: String::new(),
            mode: EditorMode::Viewing,
            ids,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn open_add_dialog(&mut self) {
        self.mode = EditorMode::AddRuleOpen;
    }

    pub fn close_add_dialog(&mut self) {
        self.mode = EditorMode::Viewing;
    }

    /// Confirm the add-rule dialog with the given selections and return
    /// to viewing. Fully covered selections are dropped silently.
    pub fn add(&mut self, selections: &[RuleSelection]) {
        access::add_rules(
            &mut self.rules,
            selections,
            &self.snapshot.users,
            &self.snapshot.roles,
            &mut self.ids,
        );
        self.mode = EditorMode::Viewing;
    }

    pub fn delete(&mut self, rule_ids: &[RuleId]) {
        access::delete_rules(&mut self.rules, rule_ids);
    }

    /// Restrict visible rules to the given types. Empty set resets to
    /// all types.
    pub fn set_type_filter(&mut self, types: BTreeSet<RuleType>) {
        self.type_filter = if types.is_empty() {
            BTreeSet::from([RuleType::User, RuleType::Profile, RuleType::Role])
        } else {
            types
        };
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The rule rows currently visible under the active filter and
    /// search query.
    pub fn visible_rules(&self) -> Vec<&AccessRule> {
        let filtered = access::filter_rules(&self.rules, &self.type_filter);
        if self.query.is_empty() {
            return filtered;
        }
        let matched = access::search_rules(&self.rules, &self.query, &self.snapshot.users);
        filtered
            .into_iter()
            .filter(|rule| matched.iter().any(|m| m.id == rule.id))
            .collect()
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// Flatten the current rule list to the assignment set to persist.
    pub fn save(&self) -> AssignmentSet {
        access::flatten(&self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ProfileName;

    fn snapshot() -> DirectorySnapshot {
        DirectorySnapshot {
            users: vec![
                User::new(1, "Alice", "Admin"),
                User::new(2, "Bob", ""),
                User::new(3, "Carol", ""),
            ],
            roles: vec![Role::new(10, "Oncall", "Operational", vec![2, 3])],
        }
    }

    #[test]
    fn open_edit_save_roundtrip() {
        let assigned: AssignmentSet = [1, 2].into_iter().collect();
        let mut editor = RuleEditor::open(&assigned, snapshot());

        // Admin profile rule for Alice; Bob alone cannot satisfy the
        // Oncall role so he surfaces as a User rule.
        assert_eq!(editor.rules().len(), 2);
        assert_eq!(editor.save(), assigned);

        editor.open_add_dialog();
        assert_eq!(editor.mode(), EditorMode::AddRuleOpen);
        editor.add(&[RuleSelection::User(3)]);
        assert_eq!(editor.mode(), EditorMode::Viewing);

        let expected: AssignmentSet = [1, 2, 3].into_iter().collect();
        assert_eq!(editor.save(), expected);
    }

    #[test]
    fn delete_unassigns_on_save() {
        let assigned: AssignmentSet = [1, 2].into_iter().collect();
        let mut editor = RuleEditor::open(&assigned, snapshot());

        let first = editor.rules()[0].id;
        editor.delete(&[first]);

        let expected: AssignmentSet = [2].into_iter().collect();
        assert_eq!(editor.save(), expected);
    }

    #[test]
    fn filter_and_search_compose() {
        let assigned: AssignmentSet = [1, 2, 3].into_iter().collect();
        let mut editor = RuleEditor::open(&assigned, snapshot());
        // Admin profile rule + Oncall role rule covering Bob and Carol.
        assert_eq!(editor.rules().len(), 2);

        editor.set_type_filter(BTreeSet::from([RuleType::Profile]));
        assert_eq!(editor.visible_rules().len(), 1);

        editor.set_query("alice");
        // Profile rule matches by member name even under the filter.
        assert_eq!(editor.visible_rules().len(), 1);

        editor.set_query("carol");
        assert!(editor.visible_rules().is_empty());

        editor.set_type_filter(BTreeSet::new()); // reset to all
        editor.set_query("");
        assert_eq!(editor.visible_rules().len(), editor.rules().len());
    }

    #[test]
    fn covered_profile_selection_adds_nothing() {
        let assigned: AssignmentSet = [1, 2].into_iter().collect();
        let mut editor = RuleEditor::open(&assigned, snapshot());
        let before = editor.rules().len();

        editor.add(&[RuleSelection::Profile(ProfileName::new("Admin").unwrap())]);
        assert_eq!(editor.rules().len(), before);
    }
}
