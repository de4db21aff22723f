use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::schema;

// User models
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub sex: Option<String>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub diet: Option<String>,
    pub goal: Option<String>,
    pub equipment: Option<String>,
    pub training_days_per_week: Option<i32>,
}

#[derive(Insertable, Debug, Clone, Default, Deserialize)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub sex: Option<String>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub diet: Option<String>,
    pub goal: Option<String>,
    pub equipment: Option<String>,
    pub training_days_per_week: Option<i32>,
}

/// Partial profile edit: `None` fields keep their stored value.
#[derive(AsChangeset, Debug, Clone, Default, Deserialize)]
#[diesel(table_name = schema::users)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sex: Option<String>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub diet: Option<String>,
    pub goal: Option<String>,
    pub equipment: Option<String>,
    pub training_days_per_week: Option<i32>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.sex.is_none()
            && self.age.is_none()
            && self.weight_kg.is_none()
            && self.height_cm.is_none()
            && self.diet.is_none()
            && self.goal.is_none()
            && self.equipment.is_none()
            && self.training_days_per_week.is_none()
    }
}

// Recipe models
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub ingredients: String,
    pub tags: Option<String>,
    pub image_url: Option<String>,
    pub cautions: Option<String>,
}

/// Insert form of a recipe. Also used as a full replacement on update, so
/// `None` clears the stored column.
#[derive(Insertable, AsChangeset, Debug, Clone, Default, Deserialize)]
#[diesel(table_name = schema::recipes)]
#[diesel(treat_none_as_null = true)]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    #[serde(default = "empty_ingredients")]
    pub ingredients: String,
    pub tags: Option<String>,
    pub image_url: Option<String>,
    pub cautions: Option<String>,
}

fn empty_ingredients() -> String {
    "[]".to_string()
}

// Exercise models
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = schema::exercises)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Exercise {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub exercise_type: Option<String>,
    pub target_muscles: Option<String>,
    pub equipment: String,
    pub image_url: Option<String>,
}

#[derive(Insertable, AsChangeset, Debug, Clone, Deserialize)]
#[diesel(table_name = schema::exercises)]
#[diesel(treat_none_as_null = true)]
pub struct NewExercise {
    pub name: String,
    pub description: Option<String>,
    pub exercise_type: Option<String>,
    pub target_muscles: Option<String>,
    pub equipment: String,
    pub image_url: Option<String>,
}

// Workout session models
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = schema::workout_sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkoutSession {
    pub id: i32,
    pub name: String,
    pub focus: String,
    pub duration_minutes: Option<i32>,
    pub calendar_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::workout_sessions)]
pub struct NewWorkoutSession {
    pub name: String,
    pub focus: String,
    pub duration_minutes: Option<i32>,
    pub calendar_id: Option<i32>,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, Serialize)]
#[diesel(belongs_to(WorkoutSession, foreign_key = session_id))]
#[diesel(belongs_to(Exercise))]
#[diesel(table_name = schema::session_exercises)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SessionExercise {
    pub id: i32,
    pub session_id: i32,
    pub exercise_id: i32,
    pub position: i32,
    pub sets: i32,
    pub reps: i32,
    pub rest_seconds: i32,
}

impl fmt::Display for SessionExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} exercise {}: {} x {} (rest {}s)",
            self.position, self.exercise_id, self.sets, self.reps, self.rest_seconds
        )
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::session_exercises)]
pub struct NewSessionExercise {
    pub session_id: i32,
    pub exercise_id: i32,
    pub position: i32,
    pub sets: i32,
    pub reps: i32,
    pub rest_seconds: i32,
}

// Planning models
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = schema::planned_meals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlannedMeal {
    pub id: i32,
    pub user_id: i32,
    pub recipe_id: i32,
    pub day: NaiveDate,
    pub slot: String,
    pub start_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl fmt::Display for PlannedMeal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time_str = self
            .start_time
            .map(|t| format!(" {}", t.format("%H:%M")))
            .unwrap_or_default();
        write!(
            f,
            "[{}] {}{} {}: recipe #{}",
            self.id, self.day, time_str, self.slot, self.recipe_id
        )
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::planned_meals)]
pub struct NewPlannedMeal {
    pub user_id: i32,
    pub recipe_id: i32,
    pub day: NaiveDate,
    pub slot: String,
    pub start_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = schema::planned_workouts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlannedWorkout {
    pub id: i32,
    pub user_id: i32,
    pub session_id: i32,
    pub day: NaiveDate,
    pub completed: bool,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl fmt::Display for PlannedWorkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let done = if self.completed { " (done)" } else { "" };
        write!(
            f,
            "[{}] {} session #{}{}",
            self.id, self.day, self.session_id, done
        )
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::planned_workouts)]
pub struct NewPlannedWorkout {
    pub user_id: i32,
    pub session_id: i32,
    pub day: NaiveDate,
    pub completed: bool,
    pub notes: Option<String>,
}

// Favorites
#[derive(Queryable, Selectable, Debug, Clone, Serialize)]
#[diesel(table_name = schema::favorites)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Favorite {
    pub user_id: i32,
    pub recipe_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = schema::favorites)]
pub struct NewFavorite {
    pub user_id: i32,
    pub recipe_id: i32,
}
