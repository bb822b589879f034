//! Pure view-model computation.
//!
//! Everything here derives the displayed recipe sequence from the catalog
//! and the favorites set, without touching presentation. The board applies
//! the results and hands them to a renderer.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::favorites::FavoritesSet;
use crate::recipe::{Catalog, Difficulty, Recipe};

/// Default upper bound (exclusive) in minutes for the "quick" filter.
pub const DEFAULT_QUICK_MAX_MINUTES: u32 = 30;

/// Which recipes a filter keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCriterion {
    /// Recipes of exactly this difficulty.
    Difficulty(Difficulty),
    /// Recipes faster than the quick threshold.
    Quick,
    /// Recipes in the favorites set.
    Favorites,
    /// Every recipe, catalog order.
    #[default]
    All,
}

impl FilterCriterion {
    /// Every criterion, in the order the controls are shown.
    pub const ALL: [Self; 6] = [
        Self::Difficulty(Difficulty::Easy),
        Self::Difficulty(Difficulty::Medium),
        Self::Difficulty(Difficulty::Hard),
        Self::Quick,
        Self::Favorites,
        Self::All,
    ];

    /// Parse a control value. Unrecognized input means [`FilterCriterion::All`].
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim() {
            "quick" => Self::Quick,
            "favorites" => Self::Favorites,
            other => other.parse().map_or(Self::All, Self::Difficulty),
        }
    }

    /// The control value for this criterion.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Difficulty(d) => d.as_str(),
            Self::Quick => "quick",
            Self::Favorites => "favorites",
            Self::All => "all",
        }
    }
}

impl fmt::Display for FilterCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to reorder the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// By title, using [`compare_titles`].
    Name,
    /// By preparation time, shortest first.
    Time,
}

impl SortKey {
    /// Parse a control value. Unrecognized input yields `None` (no sort).
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Option<Self> {
        match s.trim() {
            "name" => Some(Self::Name),
            "time" => Some(Self::Time),
            _ => None,
        }
    }

    /// The control value for this key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare recipe titles the way a reader expects.
///
/// Leading symbols (the emoji prefixes) are skipped and letters compare
/// case-insensitively; exact code-point order breaks remaining ties so the
/// result is a total order.
#[must_use]
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(title: &str) -> String {
    title
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// The ordered sequence of recipes currently on display.
///
/// Holds catalog positions, so it can only ever name recipes that exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    positions: Vec<usize>,
}

impl ViewState {
    /// Every recipe, in catalog order.
    #[must_use]
    pub fn full(catalog: &Catalog) -> Self {
        Self {
            positions: (0..catalog.len()).collect(),
        }
    }

    /// Recipes matching `criterion`, recomputed from the whole catalog.
    ///
    /// `quick_max_minutes` is the exclusive bound for [`FilterCriterion::Quick`].
    #[must_use]
    pub fn filtered(
        catalog: &Catalog,
        criterion: FilterCriterion,
        favorites: &FavoritesSet,
        quick_max_minutes: u32,
    ) -> Self {
        Self::select(catalog, |r| match criterion {
            FilterCriterion::Difficulty(d) => r.difficulty == d,
            FilterCriterion::Quick => r.time < quick_max_minutes,
            FilterCriterion::Favorites => favorites.contains(r.id),
            FilterCriterion::All => true,
        })
    }

    /// Recipes whose title, category or ingredients contain `query`,
    /// ignoring case. An empty query matches everything.
    #[must_use]
    pub fn searched(catalog: &Catalog, query: &str) -> Self {
        let needle = query.to_lowercase();
        Self::select(catalog, |r| r.mentions(&needle))
    }

    fn select(catalog: &Catalog, keep: impl Fn(&Recipe) -> bool) -> Self {
        let positions = catalog
            .recipes()
            .iter()
            .enumerate()
            .filter(|(_, r)| keep(r))
            .map(|(i, _)| i)
            .collect();
        Self { positions }
    }

    /// Reorder in place. The sort is stable.
    pub fn sort(&mut self, catalog: &Catalog, key: SortKey) {
        let recipes = catalog.recipes();
        match key {
            SortKey::Name => self
                .positions
                .sort_by(|&a, &b| compare_titles(&recipes[a].title, &recipes[b].title)),
            SortKey::Time => self.positions.sort_by_key(|&i| recipes[i].time),
        }
    }

    /// The recipes on display, in order.
    pub fn recipes<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Recipe> + 'a {
        self.positions
            .iter()
            .filter_map(move |&i| catalog.recipes().get(i))
    }

    /// Ids of the recipes on display, in order.
    #[must_use]
    pub fn ids(&self, catalog: &Catalog) -> Vec<u32> {
        self.recipes(catalog).map(|r| r.id).collect()
    }

    /// Check whether the recipe with `id` is on display.
    #[must_use]
    pub fn shows(&self, catalog: &Catalog, id: u32) -> bool {
        self.recipes(catalog).any(|r| r.id == id)
    }

    /// Number of recipes on display.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if nothing is on display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn catalog() -> Catalog {
        Catalog::builtin()
    }

    fn filter_ids(criterion: FilterCriterion, favorites: &FavoritesSet) -> Vec<u32> {
        let catalog = catalog();
        ViewState::filtered(&catalog, criterion, favorites, DEFAULT_QUICK_MAX_MINUTES).ids(&catalog)
    }

    #[test]
    fn test_filter_criterion_parse() {
        assert_eq!(
            FilterCriterion::from_str_lossy("easy"),
            FilterCriterion::Difficulty(Difficulty::Easy)
        );
        assert_eq!(
            FilterCriterion::from_str_lossy(" medium "),
            FilterCriterion::Difficulty(Difficulty::Medium)
        );
        assert_eq!(FilterCriterion::from_str_lossy("quick"), FilterCriterion::Quick);
        assert_eq!(
            FilterCriterion::from_str_lossy("favorites"),
            FilterCriterion::Favorites
        );
        assert_eq!(FilterCriterion::from_str_lossy("all"), FilterCriterion::All);
        assert_eq!(FilterCriterion::from_str_lossy("spicy"), FilterCriterion::All);
    }

    #[test]
    fn test_filter_criterion_display_round_trips() {
        for criterion in FilterCriterion::ALL {
            assert_eq!(FilterCriterion::from_str_lossy(criterion.as_str()), criterion);
        }
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::from_str_lossy("name"), Some(SortKey::Name));
        assert_eq!(SortKey::from_str_lossy("time"), Some(SortKey::Time));
        assert_eq!(SortKey::from_str_lossy("rating"), None);
    }

    #[test]
    fn test_filter_all_keeps_catalog_order() {
        assert_eq!(filter_ids(FilterCriterion::All, &FavoritesSet::new()), vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_difficulty() {
        let favorites = FavoritesSet::new();
        assert_eq!(
            filter_ids(FilterCriterion::Difficulty(Difficulty::Easy), &favorites),
            vec![1, 3]
        );
        assert_eq!(
            filter_ids(FilterCriterion::Difficulty(Difficulty::Medium), &favorites),
            vec![2]
        );
        assert!(filter_ids(FilterCriterion::Difficulty(Difficulty::Hard), &favorites).is_empty());
    }

    #[test]
    fn test_filter_quick() {
        let ids = filter_ids(FilterCriterion::Quick, &FavoritesSet::new());
        assert_eq!(ids, vec![1, 3]);
        assert!(!ids.contains(&2));
    }

    #[test]
    fn test_filter_quick_threshold_is_exclusive() {
        let catalog = catalog();
        let view = ViewState::filtered(&catalog, FilterCriterion::Quick, &FavoritesSet::new(), 25);
        assert_eq!(view.ids(&catalog), vec![3]);
    }

    #[test]
    fn test_filter_favorites() {
        let favorites: FavoritesSet = [2].into_iter().collect();
        assert_eq!(filter_ids(FilterCriterion::Favorites, &favorites), vec![2]);
        assert!(filter_ids(FilterCriterion::Favorites, &FavoritesSet::new()).is_empty());
    }

    #[test]
    fn test_search_pasta() {
        let catalog = catalog();
        let view = ViewState::searched(&catalog, "pasta");
        assert_eq!(view.ids(&catalog), vec![1]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = catalog();
        assert_eq!(ViewState::searched(&catalog, "GREEK").ids(&catalog), vec![3]);
        assert_eq!(ViewState::searched(&catalog, "tomatoes").ids(&catalog), vec![2, 3]);
    }

    #[test]
    fn test_search_empty_matches_all() {
        let catalog = catalog();
        assert_eq!(ViewState::searched(&catalog, "").len(), 3);
    }

    #[test]
    fn test_search_no_match() {
        let catalog = catalog();
        assert!(ViewState::searched(&catalog, "sushi").is_empty());
    }

    #[test]
    fn test_sort_by_time() {
        let catalog = catalog();
        let mut view = ViewState::full(&catalog);
        view.sort(&catalog, SortKey::Time);
        assert_eq!(view.ids(&catalog), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_by_name_ignores_emoji_prefix() {
        let catalog = catalog();
        let mut view = ViewState::full(&catalog);
        view.sort(&catalog, SortKey::Name);
        // Chicken, Classic, Greek
        assert_eq!(view.ids(&catalog), vec![2, 1, 3]);
    }

    #[test]
    fn test_filter_then_sort_composes() {
        let catalog = catalog();
        let mut view = ViewState::filtered(
            &catalog,
            FilterCriterion::Difficulty(Difficulty::Easy),
            &FavoritesSet::new(),
            DEFAULT_QUICK_MAX_MINUTES,
        );
        view.sort(&catalog, SortKey::Time);
        assert_eq!(view.ids(&catalog), vec![3, 1]);
    }

    #[test]
    fn test_compare_titles() {
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_titles("🥗 Zucchini", "Apple"), Ordering::Greater);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
        assert_ne!(compare_titles("Same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_shows() {
        let catalog = catalog();
        let view = ViewState::searched(&catalog, "salad");
        assert!(view.shows(&catalog, 3));
        assert!(!view.shows(&catalog, 1));
    }

    proptest! {
        #[test]
        fn prop_compare_titles_is_antisymmetric(a in "\\PC{0,12}", b in "\\PC{0,12}") {
            prop_assert_eq!(compare_titles(&a, &b), compare_titles(&b, &a).reverse());
        }

        #[test]
        fn prop_search_result_is_subset_in_catalog_order(query in "[a-zA-Z ]{0,6}") {
            let catalog = catalog();
            let ids = ViewState::searched(&catalog, &query).ids(&catalog);
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&ids, &sorted);
            prop_assert!(ids.iter().all(|id| catalog.contains(*id)));
        }

        #[test]
        fn prop_sorted_views_are_ordered(
            criterion in prop::sample::select(FilterCriterion::ALL.to_vec()),
            favorite_ids in prop::collection::vec(1u32..4, 0..3),
        ) {
            let catalog = catalog();
            let favorites: FavoritesSet = favorite_ids.into_iter().collect();

            let mut by_time = ViewState::filtered(&catalog, criterion, &favorites, DEFAULT_QUICK_MAX_MINUTES);
            let len = by_time.len();
            by_time.sort(&catalog, SortKey::Time);
            let times: Vec<u32> = by_time.recipes(&catalog).map(|r| r.time).collect();
            prop_assert!(times.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(times.len(), len);

            let mut by_name = by_time.clone();
            by_name.sort(&catalog, SortKey::Name);
            let titles: Vec<&str> = by_name.recipes(&catalog).map(|r| r.title.as_str()).collect();
            prop_assert!(titles
                .windows(2)
                .all(|w| compare_titles(w[0], w[1]) != Ordering::Greater));
        }
    }
}
