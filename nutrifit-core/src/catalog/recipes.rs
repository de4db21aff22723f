use diesel::prelude::*;
use log::{debug, info};
use std::collections::BTreeSet;

use crate::catalog::{Selection, split_labels};
use crate::db::models::Recipe;
use crate::db::schema::recipes;
use crate::errors::Result;

impl Recipe {
    /// Calorie count, with null and zero both meaning "unknown".
    pub fn known_calories(&self) -> Option<i32> {
        self.calories.filter(|c| *c > 0)
    }

    pub fn tag_list(&self) -> Vec<String> {
        split_labels(self.tags.as_deref())
    }

    /// `needle` must already be lowercase.
    fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .tags
                .as_deref()
                .is_some_and(|tags| tags.to_lowercase().contains(needle))
    }
}

/// Case-insensitive substring search over name and tags. `None` or a blank
/// query means no textual filter.
///
/// Matching happens after loading: SQLite `LIKE` folds ASCII only and treats
/// `%` and `_` as wildcards, which breaks accented names and literal queries.
pub fn search_recipes(
    conn: &mut SqliteConnection,
    query: Option<&str>,
    limit: i64,
) -> Result<Vec<Recipe>> {
    let Some(needle) = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
    else {
        let found = recipes::table
            .select(Recipe::as_select())
            .order(recipes::id.asc())
            .limit(limit)
            .load(conn)?;
        debug!("search_recipes without query returned {}", found.len());
        return Ok(found);
    };

    // Negative limits mean "no limit", as in SQLite.
    let cap = usize::try_from(limit).unwrap_or(usize::MAX);
    let found: Vec<Recipe> = all_recipes(conn)?
        .into_iter()
        .filter(|recipe| recipe.matches_text(&needle))
        .take(cap)
        .collect();
    debug!("search_recipes query={:?} returned {}", needle, found.len());
    Ok(found)
}

pub fn all_recipes(conn: &mut SqliteConnection) -> Result<Vec<Recipe>> {
    recipes::table
        .order(recipes::id.asc())
        .select(Recipe::as_select())
        .load(conn)
        .map_err(Into::into)
}

/// Keep recipes with a known calorie count inside `[target - tolerance, target + tolerance]`.
/// When none qualify the whole input comes back as a fallback.
pub fn filter_recipes_by_calorie_band(
    candidates: Vec<Recipe>,
    target: f64,
    tolerance: f64,
) -> Selection<Recipe> {
    let low = target - tolerance;
    let high = target + tolerance;
    let matched: Vec<Recipe> = candidates
        .iter()
        .filter(|r| {
            r.known_calories()
                .map(f64::from)
                .is_some_and(|c| low <= c && c <= high)
        })
        .cloned()
        .collect();

    let selection = Selection::or_all(matched, candidates);
    if selection.is_fallback() {
        info!(
            "No recipe within {:.0}..={:.0} kcal, using all {} recipes",
            low,
            high,
            selection.len()
        );
    }
    selection
}

pub fn unique_tags(recipes: &[Recipe]) -> Vec<String> {
    recipes
        .iter()
        .flat_map(|r| r.tag_list())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn list_unique_tags(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let raw: Vec<Option<String>> = recipes::table.select(recipes::tags).load(conn)?;
    let tags: BTreeSet<String> = raw
        .iter()
        .flat_map(|t| split_labels(t.as_deref()))
        .collect();
    Ok(tags.into_iter().collect())
}
