pub mod models;
pub mod operations;
pub mod schema;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, info};

use crate::errors::{NutrifitError, Result};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const CONNECTION_PRAGMAS: &str =
    "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;";

#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(CONNECTION_PRAGMAS)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn establish_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)?;
    info!("Connection pool ready for {}", database_url);
    Ok(pool)
}

/// Single connection with the same pragmas as pooled ones.
pub fn establish_connection(database_url: &str) -> Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(database_url)?;
    conn.batch_execute(CONNECTION_PRAGMAS)?;
    Ok(conn)
}

/// Apply every pending embedded migration. Safe to call on an up-to-date database.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| NutrifitError::Migration(e.to_string()))?;
    if applied.is_empty() {
        debug!("Database schema up to date");
    }
    for version in applied {
        info!("Applied migration {}", version);
    }
    Ok(())
}

/// Delete every row, children before parents.
pub fn reset_all_tables(conn: &mut SqliteConnection) -> Result<()> {
    use schema::*;

    conn.transaction::<_, NutrifitError, _>(|conn| {
        diesel::delete(favorites::table).execute(conn)?;
        diesel::delete(planned_meals::table).execute(conn)?;
        diesel::delete(planned_workouts::table).execute(conn)?;
        diesel::delete(session_exercises::table).execute(conn)?;
        diesel::delete(workout_sessions::table).execute(conn)?;
        diesel::delete(exercises::table).execute(conn)?;
        diesel::delete(recipes::table).execute(conn)?;
        diesel::delete(users::table).execute(conn)?;
        Ok(())
    })?;
    info!("All tables cleared");
    Ok(())
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::db::models::{Exercise, NewExercise, NewRecipe, NewUser, Recipe, User};
    use crate::db::operations;

    pub fn memory_connection() -> SqliteConnection {
        let mut conn = establish_connection(":memory:").unwrap();
        run_migrations(&mut conn).unwrap();
        conn
    }

    /// Reference profile: 70 kg, 175 cm, 30 years, male, maintenance.
    pub fn reference_user() -> NewUser {
        NewUser {
            first_name: Some("Alex".to_string()),
            email: "alex@example.com".to_string(),
            sex: Some("male".to_string()),
            age: Some(30),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            goal: Some("maintien".to_string()),
            equipment: Some("gym".to_string()),
            training_days_per_week: Some(3),
            ..Default::default()
        }
    }

    pub fn seed_user(conn: &mut SqliteConnection, new_user: NewUser) -> User {
        operations::create_user(conn, &new_user).unwrap()
    }

    pub fn seed_recipe(
        conn: &mut SqliteConnection,
        name: &str,
        calories: Option<i32>,
        tags: Option<&str>,
    ) -> Recipe {
        let recipe = NewRecipe {
            name: name.to_string(),
            calories,
            tags: tags.map(str::to_string),
            ingredients: "[]".to_string(),
            ..Default::default()
        };
        operations::create_recipe(conn, &recipe).unwrap()
    }

    pub fn seed_exercise(
        conn: &mut SqliteConnection,
        name: &str,
        exercise_type: &str,
        muscles: &str,
        equipment: &str,
    ) -> Exercise {
        let exercise = NewExercise {
            name: name.to_string(),
            description: None,
            exercise_type: Some(exercise_type.to_string()),
            target_muscles: Some(muscles.to_string()),
            equipment: equipment.to_string(),
            image_url: None,
        };
        operations::create_exercise(conn, &exercise).unwrap()
    }

    /// A small gym catalog covering every focus.
    pub fn seed_exercise_catalog(conn: &mut SqliteConnection) -> Vec<Exercise> {
        [
            ("Push-up", "force", "pectoraux, triceps", "bodyweight"),
            ("Pull-up", "force", "dos, biceps", "bodyweight"),
            ("Squat", "force", "quadriceps, fessiers", "bodyweight"),
            ("Burpee", "cardio", "cardio, jambes", "bodyweight"),
            ("Dumbbell Press", "force", "epaules, triceps", "home"),
            ("Dumbbell Row", "force", "dos, biceps", "home"),
            ("Goblet Squat", "force", "quadriceps", "home"),
            ("Bench Press", "force", "pectoraux, triceps", "gym"),
            ("Lat Pulldown", "force", "dos, lats", "gym"),
            ("Leg Press", "force", "quadriceps, ischios", "gym"),
            ("Leg Curl", "isolation", "ischios", "gym"),
            ("Rowing Machine", "cardio", "cardio, dos", "gym"),
        ]
        .into_iter()
        .map(|(name, kind, muscles, equipment)| seed_exercise(conn, name, kind, muscles, equipment))
        .collect()
    }

    /// Recipes spread around the reference user's per-meal target.
    pub fn seed_recipe_catalog(conn: &mut SqliteConnection) -> Vec<Recipe> {
        [
            ("Chicken Curry", Some(650), Some("gluten-free, spicy")),
            ("Lentil Soup", Some(420), Some("vegan")),
            ("Salmon Bowl", Some(720), Some("high-protein")),
            ("Pasta Bake", Some(980), Some("vegetarian")),
            ("Green Salad", Some(180), Some("vegan, light")),
            ("Mystery Stew", None, None),
        ]
        .into_iter()
        .map(|(name, calories, tags)| seed_recipe(conn, name, calories, tags))
        .collect()
    }
}
