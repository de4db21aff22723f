use chrono::NaiveDate;
use diesel::prelude::*;

use crate::db::models::{
    Exercise, Favorite, NewExercise, NewFavorite, NewPlannedMeal, NewPlannedWorkout, NewRecipe,
    NewSessionExercise, NewUser, NewWorkoutSession, PlannedMeal, PlannedWorkout, ProfileUpdate,
    Recipe, SessionExercise, User, WorkoutSession,
};
use crate::db::schema::{
    exercises, favorites, planned_meals, planned_workouts, recipes, session_exercises, users,
    workout_sessions,
};
use crate::errors::{NutrifitError, Result};

// Users
pub fn create_user(conn: &mut SqliteConnection, new_user: &NewUser) -> Result<User> {
    diesel::insert_into(users::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn get_user(conn: &mut SqliteConnection, user_id: i32) -> Result<User> {
    users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(NutrifitError::UserNotFound(user_id))
}

pub fn get_user_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<User>> {
    users::table
        .filter(users::email.eq(email))
        .select(User::as_select())
        .first(conn)
        .optional()
        .map_err(Into::into)
}

pub fn update_profile(
    conn: &mut SqliteConnection,
    user_id: i32,
    changes: &ProfileUpdate,
) -> Result<User> {
    if changes.is_empty() {
        return get_user(conn, user_id);
    }
    diesel::update(users::table.find(user_id))
        .set(changes)
        .returning(User::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or(NutrifitError::UserNotFound(user_id))
}

// Recipes
pub fn create_recipe(conn: &mut SqliteConnection, new_recipe: &NewRecipe) -> Result<Recipe> {
    diesel::insert_into(recipes::table)
        .values(new_recipe)
        .returning(Recipe::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn get_recipe(conn: &mut SqliteConnection, recipe_id: i32) -> Result<Option<Recipe>> {
    recipes::table
        .find(recipe_id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()
        .map_err(Into::into)
}

pub fn list_recipes(conn: &mut SqliteConnection, offset: i64, limit: i64) -> Result<Vec<Recipe>> {
    recipes::table
        .order(recipes::id.asc())
        .offset(offset)
        .limit(limit)
        .select(Recipe::as_select())
        .load(conn)
        .map_err(Into::into)
}

pub fn update_recipe(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    recipe: &NewRecipe,
) -> Result<Option<Recipe>> {
    diesel::update(recipes::table.find(recipe_id))
        .set(recipe)
        .returning(Recipe::as_returning())
        .get_result(conn)
        .optional()
        .map_err(Into::into)
}

pub fn delete_recipe(conn: &mut SqliteConnection, recipe_id: i32) -> Result<bool> {
    let deleted = diesel::delete(recipes::table.find(recipe_id)).execute(conn)?;
    Ok(deleted == 1)
}

pub fn recipe_names(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    recipes::table
        .select(recipes::name)
        .load(conn)
        .map_err(Into::into)
}

// Exercises
pub fn create_exercise(conn: &mut SqliteConnection, new_exercise: &NewExercise) -> Result<Exercise> {
    diesel::insert_into(exercises::table)
        .values(new_exercise)
        .returning(Exercise::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn get_exercise(conn: &mut SqliteConnection, exercise_id: i32) -> Result<Option<Exercise>> {
    exercises::table
        .find(exercise_id)
        .select(Exercise::as_select())
        .first(conn)
        .optional()
        .map_err(Into::into)
}

pub fn list_exercises(
    conn: &mut SqliteConnection,
    offset: i64,
    limit: i64,
) -> Result<Vec<Exercise>> {
    exercises::table
        .order(exercises::id.asc())
        .offset(offset)
        .limit(limit)
        .select(Exercise::as_select())
        .load(conn)
        .map_err(Into::into)
}

pub fn update_exercise(
    conn: &mut SqliteConnection,
    exercise_id: i32,
    exercise: &NewExercise,
) -> Result<Option<Exercise>> {
    diesel::update(exercises::table.find(exercise_id))
        .set(exercise)
        .returning(Exercise::as_returning())
        .get_result(conn)
        .optional()
        .map_err(Into::into)
}

pub fn delete_exercise(conn: &mut SqliteConnection, exercise_id: i32) -> Result<bool> {
    let deleted = diesel::delete(exercises::table.find(exercise_id)).execute(conn)?;
    Ok(deleted == 1)
}

pub fn exercise_names(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    exercises::table
        .select(exercises::name)
        .load(conn)
        .map_err(Into::into)
}

// Workout sessions
pub fn create_workout_session(
    conn: &mut SqliteConnection,
    new_session: &NewWorkoutSession,
) -> Result<WorkoutSession> {
    diesel::insert_into(workout_sessions::table)
        .values(new_session)
        .returning(WorkoutSession::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

pub fn get_workout_session(
    conn: &mut SqliteConnection,
    session_id: i32,
) -> Result<Option<WorkoutSession>> {
    workout_sessions::table
        .find(session_id)
        .select(WorkoutSession::as_select())
        .first(conn)
        .optional()
        .map_err(Into::into)
}

pub fn add_session_exercises(
    conn: &mut SqliteConnection,
    links: &[NewSessionExercise],
) -> Result<Vec<SessionExercise>> {
    links
        .iter()
        .map(|link| {
            diesel::insert_into(session_exercises::table)
                .values(link)
                .returning(SessionExercise::as_returning())
                .get_result(conn)
                .map_err(Into::into)
        })
        .collect()
}

/// Links of a session with their exercises, in prescription order.
pub fn session_exercises_with_details(
    conn: &mut SqliteConnection,
    session: &WorkoutSession,
) -> Result<Vec<(SessionExercise, Exercise)>> {
    SessionExercise::belonging_to(session)
        .inner_join(exercises::table)
        .order(session_exercises::position.asc())
        .select((SessionExercise::as_select(), Exercise::as_select()))
        .load(conn)
        .map_err(Into::into)
}

// Planned meals
pub fn insert_planned_meal(
    conn: &mut SqliteConnection,
    meal: &NewPlannedMeal,
) -> Result<PlannedMeal> {
    diesel::insert_into(planned_meals::table)
        .values(meal)
        .returning(PlannedMeal::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

/// Delete a user's planned meals with `start <= day < end`.
pub fn delete_planned_meals_in_window(
    conn: &mut SqliteConnection,
    user_id: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<usize> {
    diesel::delete(
        planned_meals::table
            .filter(planned_meals::user_id.eq(user_id))
            .filter(planned_meals::day.ge(start))
            .filter(planned_meals::day.lt(end)),
    )
    .execute(conn)
    .map_err(Into::into)
}

/// Planned meals with `start <= day <= end`, by day then start time.
pub fn planned_meals_between(
    conn: &mut SqliteConnection,
    user_id: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PlannedMeal>> {
    planned_meals::table
        .filter(planned_meals::user_id.eq(user_id))
        .filter(planned_meals::day.between(start, end))
        .order((
            planned_meals::day.asc(),
            planned_meals::start_time.asc(),
            planned_meals::id.asc(),
        ))
        .select(PlannedMeal::as_select())
        .load(conn)
        .map_err(Into::into)
}

pub fn planned_meals_for_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Vec<PlannedMeal>> {
    planned_meals::table
        .filter(planned_meals::user_id.eq(user_id))
        .order((
            planned_meals::day.asc(),
            planned_meals::start_time.asc(),
            planned_meals::id.asc(),
        ))
        .select(PlannedMeal::as_select())
        .load(conn)
        .map_err(Into::into)
}

pub fn set_planned_meal_recipe(
    conn: &mut SqliteConnection,
    planning_id: i32,
    recipe_id: i32,
) -> Result<bool> {
    let updated = diesel::update(planned_meals::table.find(planning_id))
        .set(planned_meals::recipe_id.eq(recipe_id))
        .execute(conn)?;
    Ok(updated == 1)
}

pub fn delete_planned_meal(conn: &mut SqliteConnection, planning_id: i32) -> Result<bool> {
    let deleted = diesel::delete(planned_meals::table.find(planning_id)).execute(conn)?;
    Ok(deleted == 1)
}

// Planned workouts
pub fn insert_planned_workout(
    conn: &mut SqliteConnection,
    workout: &NewPlannedWorkout,
) -> Result<PlannedWorkout> {
    diesel::insert_into(planned_workouts::table)
        .values(workout)
        .returning(PlannedWorkout::as_returning())
        .get_result(conn)
        .map_err(Into::into)
}

/// Delete a user's planned workouts with `start <= day < end`.
pub fn delete_planned_workouts_in_window(
    conn: &mut SqliteConnection,
    user_id: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<usize> {
    diesel::delete(
        planned_workouts::table
            .filter(planned_workouts::user_id.eq(user_id))
            .filter(planned_workouts::day.ge(start))
            .filter(planned_workouts::day.lt(end)),
    )
    .execute(conn)
    .map_err(Into::into)
}

pub fn planned_workouts_between(
    conn: &mut SqliteConnection,
    user_id: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PlannedWorkout>> {
    planned_workouts::table
        .filter(planned_workouts::user_id.eq(user_id))
        .filter(planned_workouts::day.between(start, end))
        .order((planned_workouts::day.asc(), planned_workouts::id.asc()))
        .select(PlannedWorkout::as_select())
        .load(conn)
        .map_err(Into::into)
}

pub fn planned_workouts_for_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Vec<PlannedWorkout>> {
    planned_workouts::table
        .filter(planned_workouts::user_id.eq(user_id))
        .order((planned_workouts::day.asc(), planned_workouts::id.asc()))
        .select(PlannedWorkout::as_select())
        .load(conn)
        .map_err(Into::into)
}

pub fn set_planned_workout_session(
    conn: &mut SqliteConnection,
    planning_id: i32,
    session_id: i32,
) -> Result<bool> {
    let updated = diesel::update(planned_workouts::table.find(planning_id))
        .set(planned_workouts::session_id.eq(session_id))
        .execute(conn)?;
    Ok(updated == 1)
}

pub fn set_planned_workout_completed(
    conn: &mut SqliteConnection,
    planning_id: i32,
    completed: bool,
) -> Result<bool> {
    let updated = diesel::update(planned_workouts::table.find(planning_id))
        .set(planned_workouts::completed.eq(completed))
        .execute(conn)?;
    Ok(updated == 1)
}

pub fn delete_planned_workout(conn: &mut SqliteConnection, planning_id: i32) -> Result<bool> {
    let deleted = diesel::delete(planned_workouts::table.find(planning_id)).execute(conn)?;
    Ok(deleted == 1)
}

// Favorites
pub fn insert_favorite(conn: &mut SqliteConnection, favorite: &NewFavorite) -> Result<Favorite> {
    diesel::insert_into(favorites::table)
        .values(favorite)
        .on_conflict_do_nothing()
        .execute(conn)?;
    favorites::table
        .find((favorite.user_id, favorite.recipe_id))
        .select(Favorite::as_select())
        .first(conn)
        .map_err(Into::into)
}

pub fn delete_favorite(conn: &mut SqliteConnection, user_id: i32, recipe_id: i32) -> Result<bool> {
    let deleted = diesel::delete(favorites::table.find((user_id, recipe_id))).execute(conn)?;
    Ok(deleted == 1)
}

pub fn favorite_recipes(conn: &mut SqliteConnection, user_id: i32) -> Result<Vec<Recipe>> {
    favorites::table
        .inner_join(recipes::table)
        .filter(favorites::user_id.eq(user_id))
        .order((favorites::created_at.asc(), recipes::id.asc()))
        .select(Recipe::as_select())
        .load(conn)
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{memory_connection, reference_user, seed_recipe, seed_user};

    #[test]
    fn missing_user_is_reported() {
        let mut conn = memory_connection();
        assert!(matches!(
            get_user(&mut conn, 42),
            Err(NutrifitError::UserNotFound(42))
        ));
    }

    #[test]
    fn profile_update_is_partial() {
        let mut conn = memory_connection();
        let user = seed_user(&mut conn, reference_user());
        let changes = ProfileUpdate {
            weight_kg: Some(72.5),
            goal: Some("perte de poids".to_string()),
            ..Default::default()
        };
        let updated = update_profile(&mut conn, user.id, &changes).unwrap();
        assert_eq!(updated.weight_kg, Some(72.5));
        assert_eq!(updated.goal.as_deref(), Some("perte de poids"));
        assert_eq!(updated.height_cm, Some(175.0));
        assert_eq!(updated.sex.as_deref(), Some("male"));

        let unchanged = update_profile(&mut conn, user.id, &ProfileUpdate::default()).unwrap();
        assert_eq!(unchanged.weight_kg, Some(72.5));
        assert!(matches!(
            update_profile(&mut conn, 999, &changes),
            Err(NutrifitError::UserNotFound(999))
        ));
    }

    #[test]
    fn recipe_crud() {
        let mut conn = memory_connection();
        let recipe = seed_recipe(&mut conn, "Omelette", Some(350), Some("vegetarian"));
        assert_eq!(get_recipe(&mut conn, recipe.id).unwrap(), Some(recipe.clone()));

        let replacement = NewRecipe {
            name: "Spanish Omelette".to_string(),
            calories: Some(420),
            ingredients: "[\"eggs\", \"potatoes\"]".to_string(),
            ..Default::default()
        };
        let updated = update_recipe(&mut conn, recipe.id, &replacement).unwrap().unwrap();
        assert_eq!(updated.name, "Spanish Omelette");
        // Full replacement clears omitted columns.
        assert_eq!(updated.tags, None);
        assert!(update_recipe(&mut conn, 999, &replacement).unwrap().is_none());

        assert!(delete_recipe(&mut conn, recipe.id).unwrap());
        assert!(!delete_recipe(&mut conn, recipe.id).unwrap());
        assert!(get_recipe(&mut conn, recipe.id).unwrap().is_none());
    }

    #[test]
    fn list_recipes_pages_by_id() {
        let mut conn = memory_connection();
        for i in 0..5 {
            seed_recipe(&mut conn, &format!("Recipe {}", i), Some(400), None);
        }
        let page = list_recipes(&mut conn, 2, 2).unwrap();
        let names: Vec<&str> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Recipe 2", "Recipe 3"]);
    }

    #[test]
    fn favorites_are_idempotent() {
        let mut conn = memory_connection();
        let user = seed_user(&mut conn, reference_user());
        let recipe = seed_recipe(&mut conn, "Porridge", Some(300), None);
        let favorite = NewFavorite {
            user_id: user.id,
            recipe_id: recipe.id,
        };
        insert_favorite(&mut conn, &favorite).unwrap();
        insert_favorite(&mut conn, &favorite).unwrap();
        assert_eq!(favorite_recipes(&mut conn, user.id).unwrap().len(), 1);
        assert!(delete_favorite(&mut conn, user.id, recipe.id).unwrap());
        assert!(favorite_recipes(&mut conn, user.id).unwrap().is_empty());
    }
}
