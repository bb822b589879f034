//! Core recipe types for recipeboard.
//!
//! This module defines the immutable recipe record, its difficulty rating,
//! and the catalog that holds the fixed built-in collection.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How demanding a recipe is to cook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Beginner friendly.
    Easy,
    /// Needs some practice.
    Medium,
    /// Involved technique or timing.
    Hard,
}

impl Difficulty {
    /// The tag shown on a recipe card.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    /// Parses a difficulty tag, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(Error::internal(format!("unknown difficulty: {other}"))),
        }
    }
}

/// A single recipe.
///
/// Recipes are created once when the catalog is built and are never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique, positive identifier.
    pub id: u32,
    /// Display title (may start with an emoji).
    pub title: String,
    /// Total preparation time in minutes.
    pub time: u32,
    /// Difficulty rating.
    pub difficulty: Difficulty,
    /// One-paragraph description.
    pub description: String,
    /// Free-form category, e.g. "pasta".
    pub category: String,
    /// Ingredients in listing order.
    pub ingredients: Vec<String>,
    /// Preparation steps in order.
    pub steps: Vec<String>,
}

impl Recipe {
    /// Check whether the title, category or any ingredient contains `needle`.
    ///
    /// `needle` must already be lowercase; the comparison lowercases the
    /// recipe side.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
            || self
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(needle))
    }
}

/// The fixed, ordered collection of recipes available in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    recipes: Vec<Recipe>,
}

impl Catalog {
    /// Build a catalog, rejecting zero or duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is zero or appears more than once.
    pub fn new(recipes: Vec<Recipe>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(recipes.len());
        for recipe in &recipes {
            if recipe.id == 0 {
                return Err(Error::internal(format!(
                    "recipe '{}' has id 0; ids must be positive",
                    recipe.title
                )));
            }
            if !seen.insert(recipe.id) {
                return Err(Error::internal(format!(
                    "duplicate recipe id {}",
                    recipe.id
                )));
            }
        }
        Ok(Self { recipes })
    }

    /// The built-in recipe collection.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            recipes: builtin_recipes(),
        }
    }

    /// Look up a recipe by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Check whether `id` names a recipe in this catalog.
    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// All recipes in catalog order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if the catalog has no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn builtin_recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            id: 1,
            title: "🍝 Classic Spaghetti Carbonara".to_string(),
            time: 25,
            difficulty: Difficulty::Easy,
            description:
                "A creamy Italian pasta dish made with eggs, cheese, pancetta, and black pepper."
                    .to_string(),
            category: "pasta".to_string(),
            ingredients: strings(&["Spaghetti", "Eggs", "Pancetta", "Parmesan", "Black Pepper"]),
            steps: strings(&[
                "Boil pasta",
                "Cook pancetta",
                "Mix eggs and cheese",
                "Combine all",
            ]),
        },
        Recipe {
            id: 2,
            title: "🍛 Chicken Tikka Masala".to_string(),
            time: 45,
            difficulty: Difficulty::Medium,
            description: "Tender chicken pieces in a creamy, spiced tomato sauce.".to_string(),
            category: "curry".to_string(),
            ingredients: strings(&["Chicken", "Yogurt", "Spices", "Tomatoes", "Cream"]),
            steps: strings(&[
                "Marinate chicken",
                "Grill chicken",
                "Prepare sauce",
                "Combine chicken and sauce",
            ]),
        },
        Recipe {
            id: 3,
            title: "🥗 Greek Salad".to_string(),
            time: 15,
            difficulty: Difficulty::Easy,
            description: "Fresh vegetables, feta cheese, and olives tossed in olive oil and herbs."
                .to_string(),
            category: "salad".to_string(),
            ingredients: strings(&["Cucumber", "Tomatoes", "Feta", "Olives", "Olive Oil"]),
            steps: strings(&[
                "Chop vegetables",
                "Mix with feta and olives",
                "Dress with olive oil",
            ]),
        },
    ]
}
