use diesel::prelude::*;
use log::debug;

use crate::db::models::{Favorite, NewFavorite, Recipe};
use crate::db::operations;
use crate::errors::Result;

/// Mark a recipe as favorite. Adding twice is a no-op; `None` when the recipe does not exist.
pub fn add_favorite(
    conn: &mut SqliteConnection,
    user_id: i32,
    recipe_id: i32,
) -> Result<Option<Favorite>> {
    operations::get_user(conn, user_id)?;
    if operations::get_recipe(conn, recipe_id)?.is_none() {
        debug!("Recipe {} does not exist, favorite not added", recipe_id);
        return Ok(None);
    }
    operations::insert_favorite(conn, &NewFavorite { user_id, recipe_id }).map(Some)
}

pub fn remove_favorite(conn: &mut SqliteConnection, user_id: i32, recipe_id: i32) -> Result<bool> {
    operations::delete_favorite(conn, user_id, recipe_id)
}

pub fn list_favorites(conn: &mut SqliteConnection, user_id: i32) -> Result<Vec<Recipe>> {
    operations::favorite_recipes(conn, user_id)
}
