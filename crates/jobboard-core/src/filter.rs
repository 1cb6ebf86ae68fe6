//! Listing filter engine
//!
//! Holds an immutable snapshot of listings for one view and derives the
//! visible subset from the active filters. Filtering runs synchronously on
//! every edit; the option lists shown in the dropdowns only change when the
//! snapshot or the locked role set changes.
//!
//! ## Filters
//! - Locked roles: hard pre-filter set by how the view was entered
//!   (e.g. a "top roles" card). The visitor cannot clear it.
//! - Role category: optional narrowing within the locked set
//! - Location: exact `"city, state"` match
//! - Position: exact title match
//! - Search: case-insensitive substring over title, restaurant, city,
//!   state and role category

use std::collections::BTreeSet;

use jobboard_types::ListingRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The four visitor-editable filter fields. Empty means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub location: String,
    pub position: String,
    pub role_category: String,
}

/// Set of role categories the view is locked to.
///
/// Built from non-empty trimmed tags only, so an untagged listing can never
/// pass a non-empty lock. Two locks are equal when they hold the same tags,
/// whatever order the link listed them in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LockedRoles {
    set: BTreeSet<String>,
    /// First-seen order from the link, used for headings
    order: Vec<String>,
}

impl LockedRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut locked = Self::default();
        for role in roles {
            let role = role.as_ref().trim();
            if !role.is_empty() && locked.set.insert(role.to_string()) {
                locked.order.push(role.to_string());
            }
        }
        locked
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.set.contains(role)
    }

    /// Locked tags, deduplicated and sorted ascending
    pub fn to_vec(&self) -> Vec<String> {
        self.set.iter().cloned().collect()
    }

    /// Locked tags, deduplicated, in the order the link listed them
    pub fn in_link_order(&self) -> &[String] {
        &self.order
    }

    /// Whether a listing passes the lock
    pub fn admits(&self, record: &ListingRecord) -> bool {
        self.is_empty() || self.contains(record.role_key())
    }
}

impl PartialEq for LockedRoles {
    fn eq(&self, other: &Self) -> bool {
        self.set == other.set
    }
}

impl Eq for LockedRoles {}

impl From<Vec<String>> for LockedRoles {
    fn from(roles: Vec<String>) -> Self {
        Self::new(roles)
    }
}

impl From<LockedRoles> for Vec<String> {
    fn from(locked: LockedRoles) -> Self {
        locked.order
    }
}

/// Choices offered by the filter dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub positions: Vec<String>,
    pub role_categories: Vec<String>,
}

impl FilterOptions {
    /// Derive option lists from the full snapshot (never the filtered subset)
    pub fn from_snapshot(records: &[ListingRecord], locked: &LockedRoles) -> Self {
        let locations: BTreeSet<String> = records.iter().map(|r| r.location_label()).collect();
        let positions: BTreeSet<String> = records.iter().map(|r| r.title.clone()).collect();

        let role_categories = if locked.is_empty() {
            records
                .iter()
                .map(|r| r.role_key())
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            locked.to_vec()
        };

        Self {
            locations: locations.into_iter().collect(),
            positions: positions.into_iter().collect(),
            role_categories,
        }
    }
}

/// Inclusion predicate for one record.
///
/// `needle` is the already trimmed and lower-cased search text.
pub fn matches(
    record: &ListingRecord,
    state: &FilterState,
    locked: &LockedRoles,
    needle: &str,
) -> bool {
    let role = record.role_key();

    let matches_locked = locked.admits(record);
    let matches_role = state.role_category.is_empty() || role == state.role_category;
    let matches_location = state.location.is_empty() || record.location_label() == state.location;
    let matches_position = state.position.is_empty() || record.title == state.position;
    let matches_search = needle.is_empty()
        || [
            record.title.as_str(),
            record.restaurant_name.as_str(),
            record.city.as_str(),
            record.state.as_str(),
            role,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle));

    matches_locked && matches_role && matches_location && matches_position && matches_search
}

/// Normalize free text the way the search box compares it
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Filter engine for one listings view
#[derive(Debug, Clone)]
pub struct ListingFilter {
    records: Vec<ListingRecord>,
    locked: LockedRoles,
    options: FilterOptions,
    state: FilterState,
    /// Indices into `records` of the visible listings, in snapshot order
    visible: Vec<usize>,
}

impl ListingFilter {
    /// Create an engine with no locked roles
    pub fn new(records: Vec<ListingRecord>) -> Self {
        Self::with_locked_roles(records, LockedRoles::default())
    }

    pub fn with_locked_roles(records: Vec<ListingRecord>, locked: LockedRoles) -> Self {
        let options = FilterOptions::from_snapshot(&records, &locked);
        let mut engine = Self {
            records,
            locked,
            options,
            state: FilterState::default(),
            visible: Vec::new(),
        };
        engine.recompute();
        engine
    }

    pub fn locked_roles(&self) -> &LockedRoles {
        &self.locked
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.query = query.into();
        self.recompute();
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.state.location = location.into();
        self.recompute();
    }

    pub fn set_position(&mut self, position: impl Into<String>) {
        self.state.position = position.into();
        self.recompute();
    }

    pub fn set_role_category(&mut self, role_category: impl Into<String>) {
        self.state.role_category = role_category.into();
        self.recompute();
    }

    /// Reset the four visitor filters. The locked role set stays.
    pub fn clear_all(&mut self) {
        self.state = FilterState::default();
        self.recompute();
    }

    /// The hosting page switched to a different locked set.
    ///
    /// A changed set resets the role narrowing to "all locked roles" and
    /// rebuilds the option lists. An identical set keeps the filters.
    pub fn replace_locked_roles(&mut self, locked: LockedRoles) {
        if locked == self.locked {
            // Headings still follow the newest link order
            self.locked = locked;
            return;
        }
        debug!(
            "Locked roles changed from {:?} to {:?}",
            self.locked.to_vec(),
            locked.to_vec()
        );
        self.locked = locked;
        self.state.role_category.clear();
        self.options = FilterOptions::from_snapshot(&self.records, &self.locked);
        self.recompute();
    }

    /// Visible listings in snapshot order
    pub fn results(&self) -> Vec<&ListingRecord> {
        self.visible.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn result_count(&self) -> usize {
        self.visible.len()
    }

    /// First `limit` visible listings, for the home-page panel
    pub fn latest(&self, limit: usize) -> Vec<&ListingRecord> {
        self.visible
            .iter()
            .take(limit)
            .map(|&i| &self.records[i])
            .collect()
    }

    /// Result count line under the filters
    pub fn summary(&self) -> String {
        let n = self.result_count();
        format!("Showing {} job{}", n, if n == 1 { "" } else { "s" })
    }

    /// Note shown above the filters while the view is locked
    pub fn locked_roles_label(&self) -> Option<String> {
        if self.locked.is_empty() {
            None
        } else {
            Some(format!(
                "Showing role categories: {}",
                self.locked.in_link_order().join(" + ")
            ))
        }
    }

    /// Blank option text of the role dropdown
    pub fn role_placeholder(&self) -> &'static str {
        if self.locked.is_empty() {
            "Role Category"
        } else {
            "All shown roles"
        }
    }

    /// Page heading for the jobs view
    pub fn heading(&self) -> String {
        if self.locked.is_empty() {
            "BROWSE JOBS".to_string()
        } else {
            format!(
                "{} JOBS",
                self.locked.in_link_order().join(" / ").to_uppercase()
            )
        }
    }

    fn recompute(&mut self) {
        let needle = normalize_query(&self.state.query);
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| matches(r, &self.state, &self.locked, &needle))
            .map(|(i, _)| i)
            .collect();
        debug!(
            "Filter recomputed: {} of {} listings visible",
            self.visible.len(),
            self.records.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn listing(
        id: &str,
        title: &str,
        city: &str,
        state: &str,
        role: Option<&str>,
    ) -> ListingRecord {
        ListingRecord {
            id: id.to_string(),
            title: title.to_string(),
            restaurant_name: format!("{} Kitchen", city),
            city: city.to_string(),
            state: state.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            role_category: role.map(str::to_string),
        }
    }

    fn sample() -> Vec<ListingRecord> {
        vec![
            listing("1", "Line Cook", "Glen Burnie", "MD", Some("Line")),
            listing("2", "Server", "Annapolis", "MD", Some("Server")),
            listing("3", "Dishwasher", "Glen Burnie", "MD", None),
            listing("4", "Prep Cook", "Arlington", "VA", Some("Prep")),
            listing("5", "Line Cook", "Arlington", "VA", Some("Line")),
        ]
    }

    fn ids(engine: &ListingFilter) -> Vec<&str> {
        engine.results().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_no_filters_returns_snapshot_in_order() {
        let engine = ListingFilter::new(sample());
        assert_eq!(ids(&engine), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_lock_dominates_other_fields() {
        let records = vec![
            listing("a", "Cook", "X", "MD", Some("Line")),
            listing("b", "Cook", "X", "MD", Some("Server")),
            listing("c", "Cook", "X", "MD", None),
        ];
        let mut engine =
            ListingFilter::with_locked_roles(records, LockedRoles::new(["Line"]));
        assert_eq!(ids(&engine), vec!["a"]);

        engine.set_query("cook");
        engine.set_location("X, MD");
        assert_eq!(ids(&engine), vec!["a"]);

        engine.clear_all();
        assert_eq!(ids(&engine), vec!["a"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut engine = ListingFilter::new(sample());
        engine.set_query("line");
        assert_eq!(ids(&engine), vec!["1", "5"]);
        engine.set_query("LINE");
        assert_eq!(ids(&engine), vec!["1", "5"]);
        engine.set_query("sous");
        assert!(engine.results().is_empty());
    }

    #[test]
    fn test_search_trims_and_covers_all_fields() {
        let mut engine = ListingFilter::new(sample());
        engine.set_query("  annapolis ");
        assert_eq!(ids(&engine), vec!["2"]);
        engine.set_query("va");
        assert_eq!(ids(&engine), vec!["4", "5"]);
        engine.set_query("prep");
        assert_eq!(ids(&engine), vec!["4"]);
        engine.set_query("glen burnie kitchen");
        assert_eq!(ids(&engine), vec!["1", "3"]);
        engine.set_query("   ");
        assert_eq!(engine.result_count(), 5);
    }

    #[test]
    fn test_location_requires_matching_state() {
        let records = vec![listing("1", "Cook", "Glen Burnie", "MD", None)];
        let mut engine = ListingFilter::new(records);
        engine.set_location("Glen Burnie, MD");
        assert_eq!(ids(&engine), vec!["1"]);
        engine.set_location("Glen Burnie, VA");
        assert!(engine.results().is_empty());
    }

    #[test]
    fn test_position_and_role_narrowing() {
        let mut engine = ListingFilter::new(sample());
        engine.set_position("Line Cook");
        assert_eq!(ids(&engine), vec!["1", "5"]);
        engine.set_location("Arlington, VA");
        assert_eq!(ids(&engine), vec!["5"]);
        engine.clear_all();
        engine.set_role_category("line");
        assert!(engine.results().is_empty(), "role match is case-sensitive");
        engine.set_role_category("Server");
        assert_eq!(ids(&engine), vec!["2"]);
    }

    #[test]
    fn test_role_narrowing_within_lock() {
        let mut engine =
            ListingFilter::with_locked_roles(sample(), LockedRoles::new(["Line", "Prep"]));
        assert_eq!(ids(&engine), vec!["1", "4", "5"]);
        engine.set_role_category("Prep");
        assert_eq!(ids(&engine), vec!["4"]);
    }

    #[test]
    fn test_option_lists_come_from_full_snapshot() {
        let mut engine = ListingFilter::new(sample());
        engine.set_query("server");
        let options = engine.options();
        assert_eq!(
            options.locations,
            vec!["Annapolis, MD", "Arlington, VA", "Glen Burnie, MD"]
        );
        assert_eq!(
            options.positions,
            vec!["Dishwasher", "Line Cook", "Prep Cook", "Server"]
        );
        assert_eq!(options.role_categories, vec!["Line", "Prep", "Server"]);
    }

    #[test]
    fn test_locked_role_options_use_lock_set() {
        let engine = ListingFilter::with_locked_roles(
            sample(),
            LockedRoles::new(["Server", " Cashier", "Server", ""]),
        );
        assert_eq!(engine.options().role_categories, vec!["Cashier", "Server"]);
        assert_eq!(engine.role_placeholder(), "All shown roles");
        assert_eq!(
            engine.locked_roles_label().as_deref(),
            Some("Showing role categories: Server + Cashier")
        );
        assert_eq!(engine.heading(), "SERVER / CASHIER JOBS");
    }

    #[test]
    fn test_labels_follow_link_order() {
        let mut engine =
            ListingFilter::with_locked_roles(sample(), LockedRoles::new(["Prep", "Line"]));
        assert_eq!(engine.heading(), "PREP / LINE JOBS");
        assert_eq!(
            engine.locked_roles_label().as_deref(),
            Some("Showing role categories: Prep + Line")
        );
        assert_eq!(engine.options().role_categories, vec!["Line", "Prep"]);

        engine.set_role_category("Prep");
        engine.replace_locked_roles(LockedRoles::new(["Line", "Prep"]));
        assert_eq!(engine.heading(), "LINE / PREP JOBS");
        assert_eq!(engine.state().role_category, "Prep");
    }

    #[test]
    fn test_replacing_lock_resets_role_narrowing() {
        let mut engine =
            ListingFilter::with_locked_roles(sample(), LockedRoles::new(["Line", "Prep"]));
        engine.set_role_category("Prep");
        engine.set_query("cook");

        engine.replace_locked_roles(LockedRoles::new(["Prep", "Line"]));
        assert_eq!(engine.state().role_category, "Prep", "same set keeps narrowing");

        engine.replace_locked_roles(LockedRoles::new(["Server"]));
        assert_eq!(engine.state().role_category, "");
        assert_eq!(engine.state().query, "cook");
        assert_eq!(engine.options().role_categories, vec!["Server"]);
        assert!(engine.results().is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        let mut engine = ListingFilter::new(Vec::new());
        engine.set_query("anything");
        assert_eq!(engine.options(), &FilterOptions::default());
        assert!(engine.results().is_empty());
        assert_eq!(engine.summary(), "Showing 0 jobs");
    }

    #[test]
    fn test_labels_without_lock() {
        let mut engine = ListingFilter::new(sample());
        assert_eq!(engine.heading(), "BROWSE JOBS");
        assert_eq!(engine.role_placeholder(), "Role Category");
        assert_eq!(engine.locked_roles_label(), None);
        engine.set_query("annapolis");
        assert_eq!(engine.summary(), "Showing 1 job");
    }

    #[test]
    fn test_latest_takes_prefix_of_visible() {
        let engine = ListingFilter::new(sample());
        let latest: Vec<&str> = engine.latest(2).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(latest, vec!["1", "2"]);
    }

    fn arb_listing() -> impl Strategy<Value = ListingRecord> {
        (
            "[a-z0-9]{1,8}",
            prop_oneof![Just("Line Cook"), Just("Server"), Just("Host"), Just("Dishwasher")],
            prop_oneof![Just("Towson"), Just("Glen Burnie"), Just("Arlington")],
            prop_oneof![Just("MD"), Just("VA")],
            prop::option::of(prop_oneof![Just("Line"), Just("Server"), Just("Host"), Just("")]),
        )
            .prop_map(|(id, title, city, state, role)| listing(&id, title, city, state, role))
    }

    fn arb_state() -> impl Strategy<Value = FilterState> {
        (
            prop_oneof![Just(""), Just("line"), Just(" MD "), Just("zzz")],
            prop_oneof![Just(""), Just("Towson, MD"), Just("Arlington, VA")],
            prop_oneof![Just(""), Just("Server"), Just("Host")],
            prop_oneof![Just(""), Just("Line"), Just("Server")],
        )
            .prop_map(|(q, l, p, r)| FilterState {
                query: q.to_string(),
                location: l.to_string(),
                position: p.to_string(),
                role_category: r.to_string(),
            })
    }

    proptest! {
        #[test]
        fn prop_identity_law(records in prop::collection::vec(arb_listing(), 0..20)) {
            let engine = ListingFilter::new(records.clone());
            let out: Vec<ListingRecord> = engine.results().into_iter().cloned().collect();
            prop_assert_eq!(out, records);
        }

        #[test]
        fn prop_results_are_ordered_subset(
            records in prop::collection::vec(arb_listing(), 0..20),
            state in arb_state(),
            locked in prop::collection::vec(prop_oneof![Just("Line"), Just("Host")], 0..3),
        ) {
            let locked = LockedRoles::new(&locked);
            let mut engine = ListingFilter::with_locked_roles(records.clone(), locked);
            engine.set_query(state.query.clone());
            engine.set_location(state.location.clone());
            engine.set_position(state.position.clone());
            engine.set_role_category(state.role_category.clone());

            // Each visible record appears in the snapshot after the previous one
            let mut cursor = 0;
            for r in engine.results() {
                let pos = records[cursor..].iter().position(|s| s == r);
                prop_assert!(pos.is_some());
                cursor += pos.unwrap() + 1;
            }
        }

        #[test]
        fn prop_locked_results_carry_locked_roles(
            records in prop::collection::vec(arb_listing(), 0..20),
            locked in prop::collection::vec(prop_oneof![Just("Line"), Just("Server")], 1..3),
        ) {
            let engine = ListingFilter::with_locked_roles(records, LockedRoles::new(&locked));
            for r in engine.results() {
                prop_assert!(locked.iter().any(|l| *l == r.role_key()));
            }
        }
    }
}
