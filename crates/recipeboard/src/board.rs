//! The recipe board component.
//!
//! [`RecipeBoard`] owns all session state: the catalog, the current view, the
//! favorites set, which panels are open, the highlighted controls and the
//! pending debounced search. Every operation updates that state and then
//! pushes a fresh frame to the board's [`Renderer`].
//!
//! Filtering and searching always start again from the full catalog, while
//! sorting reorders whatever is currently shown. A sort followed by a filter
//! therefore loses the sort order.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::{Error, Result};
use crate::favorites::{FavoritesSet, DEFAULT_FAVORITES_KEY};
use crate::recipe::{Catalog, Recipe};
use crate::render::{toggle_label, BoardFrame, CardView, ControlGroup, Renderer, SectionId};
use crate::storage::KeyValueStore;
use crate::view::{FilterCriterion, SortKey, ViewState, DEFAULT_QUICK_MAX_MINUTES};

/// Tunables for a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardOptions {
    /// Storage key for the favorites list.
    pub favorites_key: String,
    /// Exclusive upper bound in minutes for the quick filter.
    pub quick_max_minutes: u32,
    /// Idle window for typed searches.
    pub debounce: Duration,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
            quick_max_minutes: DEFAULT_QUICK_MAX_MINUTES,
            debounce: crate::debounce::DEFAULT_DEBOUNCE,
        }
    }
}

impl From<&Config> for BoardOptions {
    fn from(config: &Config) -> Self {
        Self {
            favorites_key: config.storage.favorites_key.clone(),
            quick_max_minutes: config.view.quick_max_minutes,
            debounce: config.debounce(),
        }
    }
}

/// Interactive recipe list with filters, sorting, search and favorites.
#[derive(Debug)]
pub struct RecipeBoard<R: Renderer> {
    catalog: Catalog,
    view: ViewState,
    favorites: FavoritesSet,
    store: Box<dyn KeyValueStore>,
    renderer: R,
    open_sections: BTreeSet<SectionId>,
    active_controls: BTreeMap<ControlGroup, String>,
    debouncer: Debouncer,
    options: BoardOptions,
}

impl<R: Renderer> RecipeBoard<R> {
    /// Create a board showing the whole catalog with no favorites loaded.
    ///
    /// Call [`RecipeBoard::initialize`] before use.
    pub fn new(
        catalog: Catalog,
        store: Box<dyn KeyValueStore>,
        renderer: R,
        options: BoardOptions,
    ) -> Self {
        let view = ViewState::full(&catalog);
        let debouncer = Debouncer::new(options.debounce);
        Self {
            catalog,
            view,
            favorites: FavoritesSet::new(),
            store,
            renderer,
            open_sections: BTreeSet::new(),
            active_controls: BTreeMap::new(),
            debouncer,
            options,
        }
    }

    /// Load favorites, show every recipe and render.
    ///
    /// Absent or malformed favorites data yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or rendering fails.
    pub fn initialize(&mut self) -> Result<()> {
        self.favorites = FavoritesSet::load(self.store.as_ref(), &self.options.favorites_key)?;
        let stale: Vec<u32> = self
            .favorites
            .iter()
            .filter(|id| !self.catalog.contains(*id))
            .collect();
        if !stale.is_empty() {
            debug!(?stale, "Favorites reference recipes not in the catalog");
        }
        info!(
            recipes = self.catalog.len(),
            favorites = self.favorites.len(),
            "Board initialized"
        );
        self.show(ViewState::full(&self.catalog))
    }

    /// Snapshot of what the renderer should draw for the current view.
    #[must_use]
    pub fn frame(&self) -> BoardFrame {
        BoardFrame {
            cards: self
                .view
                .recipes(&self.catalog)
                .map(|r| CardView::new(r, &self.favorites))
                .collect(),
            total: self.catalog.len(),
            active_controls: self.active_controls.clone(),
        }
    }

    /// Redraw the current view. All panels close.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&mut self) -> Result<()> {
        self.open_sections.clear();
        let frame = self.frame();
        debug!(shown = frame.cards.len(), "Rendering board");
        self.renderer.render(&frame)
    }

    fn show(&mut self, view: ViewState) -> Result<()> {
        self.view = view;
        self.render()
    }

    /// Show or hide one steps/ingredients panel.
    ///
    /// Returns `true` if the panel is visible afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSection`] if the recipe is not in the current
    /// view, or an error if rendering fails.
    pub fn toggle_section(&mut self, section: SectionId) -> Result<bool> {
        let recipe = self
            .view
            .recipes(&self.catalog)
            .find(|r| r.id == section.recipe_id)
            .ok_or_else(|| Error::unknown_section(section))?;
        let card = CardView::new(recipe, &self.favorites);

        let visible = if self.open_sections.remove(&section) {
            false
        } else {
            self.open_sections.insert(section);
            true
        };
        debug!(%section, visible, "Toggled section");
        self.renderer.section_toggled(&card, section.kind, visible)?;
        Ok(visible)
    }

    /// Check whether a panel is currently shown.
    #[must_use]
    pub fn is_section_open(&self, section: SectionId) -> bool {
        self.open_sections.contains(&section)
    }

    /// Current label of a panel's toggle control.
    #[must_use]
    pub fn section_label(&self, section: SectionId) -> String {
        toggle_label(section.kind, self.is_section_open(section))
    }

    /// Add or remove a favorite, persist the whole set and redraw.
    ///
    /// Returns `true` if the recipe is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRecipe`] for ids outside the catalog. If the
    /// store write fails the toggle is undone and the error returned.
    pub fn toggle_favorite(&mut self, id: u32) -> Result<bool> {
        if !self.catalog.contains(id) {
            return Err(Error::UnknownRecipe { id });
        }

        let now_favorite = self.favorites.toggle(id);
        if let Err(e) = self
            .favorites
            .save(self.store.as_mut(), &self.options.favorites_key)
        {
            warn!(id, error = %e, "Failed to persist favorites; reverting");
            self.favorites.toggle(id);
            return Err(e);
        }

        info!(id, favorite = now_favorite, "Favorite toggled");
        self.render()?;
        Ok(now_favorite)
    }

    /// Replace the view with the recipes matching `criterion`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn filter(&mut self, criterion: FilterCriterion) -> Result<()> {
        let view = ViewState::filtered(
            &self.catalog,
            criterion,
            &self.favorites,
            self.options.quick_max_minutes,
        );
        debug!(%criterion, shown = view.len(), "Filtered");
        self.show(view)
    }

    /// Reorder the current view in place.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn sort(&mut self, key: SortKey) -> Result<()> {
        self.view.sort(&self.catalog, key);
        debug!(%key, "Sorted");
        self.render()
    }

    /// Replace the view with recipes matching `query`, searching the full
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn search(&mut self, query: &str) -> Result<()> {
        let view = ViewState::searched(&self.catalog, query);
        debug!(query, shown = view.len(), "Searched");
        self.show(view)
    }

    /// Record a keystroke in the search box.
    ///
    /// The search runs once no further input arrives within the debounce
    /// window; see [`RecipeBoard::fire_due_search`]. Returns `true` if an
    /// earlier pending query was superseded.
    pub fn input_search(&mut self, query: &str, now: Instant) -> bool {
        self.debouncer.submit(query, now)
    }

    /// When the pending typed search becomes due.
    #[must_use]
    pub fn search_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Run the pending typed search if its window has elapsed.
    ///
    /// Returns the query that ran, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn fire_due_search(&mut self, now: Instant) -> Result<Option<String>> {
        match self.debouncer.poll(now) {
            Some(query) => {
                self.search(&query)?;
                Ok(Some(query))
            }
            None => Ok(None),
        }
    }

    /// Run the pending typed search immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn flush_search(&mut self) -> Result<Option<String>> {
        match self.debouncer.flush() {
            Some(query) => {
                self.search(&query)?;
                Ok(Some(query))
            }
            None => Ok(None),
        }
    }

    /// Drop the pending typed search. Returns `true` if there was one.
    pub fn cancel_search(&mut self) -> bool {
        self.debouncer.cancel()
    }

    /// Mark `control` as the highlighted control of `group`.
    ///
    /// Only affects what the next frame shows.
    pub fn set_active_control(&mut self, group: ControlGroup, control: impl Into<String>) {
        self.active_controls.insert(group, control.into());
    }

    /// The highlighted control of `group`, if any.
    #[must_use]
    pub fn active_control(&self, group: ControlGroup) -> Option<&str> {
        self.active_controls.get(&group).map(String::as_str)
    }

    /// Handle a click on a filter or sort control with raw value `value`.
    ///
    /// Unrecognized filters show everything; unrecognized sorts keep the
    /// current order. Either way the control is highlighted and the board
    /// redrawn.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn press_control(&mut self, group: ControlGroup, value: &str) -> Result<()> {
        self.set_active_control(group, value.trim());
        match group {
            ControlGroup::Filters => self.filter(FilterCriterion::from_str_lossy(value)),
            ControlGroup::Sorts => match SortKey::from_str_lossy(value) {
                Some(key) => self.sort(key),
                None => self.render(),
            },
        }
    }

    /// The full catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current view.
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Recipes on display, in order.
    pub fn visible(&self) -> impl Iterator<Item = &Recipe> + '_ {
        self.view.recipes(&self.catalog)
    }

    /// Ids on display, in order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<u32> {
        self.view.ids(&self.catalog)
    }

    /// The favorites set.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// The persisted-state store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Board options.
    #[must_use]
    pub fn options(&self) -> &BoardOptions {
        &self.options
    }
}
