use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::db::models::{NewPlannedMeal, NewPlannedWorkout, PlannedMeal, PlannedWorkout};
use crate::db::operations;
use crate::errors::{NutrifitError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const DAILY: [MealSlot; 2] = [MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = NutrifitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lunch" | "dejeuner" | "déjeuner" | "midi" => Ok(MealSlot::Lunch),
            "dinner" | "diner" | "dîner" | "soir" => Ok(MealSlot::Dinner),
            other => Err(NutrifitError::invalid(format!("unknown meal slot '{}'", other))),
        }
    }
}

pub fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

pub fn evening() -> NaiveTime {
    NaiveTime::from_hms_opt(19, 0, 0).unwrap_or_default()
}

/// Dinner always goes to the evening; lunch moves there when noon is taken.
/// `None` when the slot it needs is already occupied.
pub fn assign_start_time(slot: MealSlot, same_day: &[PlannedMeal]) -> Option<NaiveTime> {
    let taken = |time: NaiveTime| same_day.iter().any(|m| m.start_time == Some(time));
    let wanted = match slot {
        MealSlot::Lunch if !taken(noon()) => noon(),
        _ => evening(),
    };
    (!taken(wanted)).then_some(wanted)
}

#[derive(Debug, Clone, Serialize)]
pub struct Calendar {
    pub meals: Vec<PlannedMeal>,
    pub workouts: Vec<PlannedWorkout>,
}

impl Calendar {
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty() && self.workouts.is_empty()
    }
}

pub fn user_calendar(conn: &mut SqliteConnection, user_id: i32) -> Result<Calendar> {
    operations::get_user(conn, user_id)?;
    Ok(Calendar {
        meals: operations::planned_meals_for_user(conn, user_id)?,
        workouts: operations::planned_workouts_for_user(conn, user_id)?,
    })
}

pub fn calendar_for_day(
    conn: &mut SqliteConnection,
    user_id: i32,
    day: NaiveDate,
) -> Result<Calendar> {
    operations::get_user(conn, user_id)?;
    Ok(Calendar {
        meals: operations::planned_meals_between(conn, user_id, day, day)?,
        workouts: operations::planned_workouts_between(conn, user_id, day, day)?,
    })
}

/// Insert one planned meal. Checks the rows already stored for that day, so
/// it also sees rows written earlier in the caller's transaction.
pub(crate) fn plan_meal(
    conn: &mut SqliteConnection,
    user_id: i32,
    recipe_id: i32,
    day: NaiveDate,
    slot: MealSlot,
    notes: Option<String>,
) -> Result<PlannedMeal> {
    let same_day = operations::planned_meals_between(conn, user_id, day, day)?;
    let start_time = assign_start_time(slot, &same_day).ok_or_else(|| {
        NutrifitError::invalid(format!("no free {} slot on {}", slot, day))
    })?;
    let meal = operations::insert_planned_meal(
        conn,
        &NewPlannedMeal {
            user_id,
            recipe_id,
            day,
            slot: slot.as_str().to_string(),
            start_time: Some(start_time),
            notes,
        },
    )?;
    debug!("Planned {}", meal);
    Ok(meal)
}

pub fn add_meal_to_calendar(
    conn: &mut SqliteConnection,
    user_id: i32,
    recipe_id: i32,
    day: NaiveDate,
    slot: MealSlot,
    notes: Option<String>,
) -> Result<PlannedMeal> {
    conn.transaction::<_, NutrifitError, _>(|conn| {
        operations::get_user(conn, user_id)?;
        if operations::get_recipe(conn, recipe_id)?.is_none() {
            return Err(NutrifitError::RecipeNotFound(recipe_id));
        }
        plan_meal(conn, user_id, recipe_id, day, slot, notes)
    })
}

pub fn add_workout_to_calendar(
    conn: &mut SqliteConnection,
    user_id: i32,
    session_id: i32,
    day: NaiveDate,
    notes: Option<String>,
) -> Result<PlannedWorkout> {
    conn.transaction::<_, NutrifitError, _>(|conn| {
        operations::get_user(conn, user_id)?;
        if operations::get_workout_session(conn, session_id)?.is_none() {
            return Err(NutrifitError::invalid(format!(
                "workout session {} not found",
                session_id
            )));
        }
        let workout = operations::insert_planned_workout(
            conn,
            &NewPlannedWorkout {
                user_id,
                session_id,
                day,
                completed: false,
                notes,
            },
        )?;
        info!("Added workout {} for user {}", workout, user_id);
        Ok(workout)
    })
}

pub fn remove_meal(conn: &mut SqliteConnection, planning_id: i32) -> Result<bool> {
    operations::delete_planned_meal(conn, planning_id)
}

pub fn remove_workout(conn: &mut SqliteConnection, planning_id: i32) -> Result<bool> {
    operations::delete_planned_workout(conn, planning_id)
}

pub fn set_workout_completed(
    conn: &mut SqliteConnection,
    planning_id: i32,
    completed: bool,
) -> Result<bool> {
    operations::set_planned_workout_completed(conn, planning_id, completed)
}

/// Planned workouts with `start <= day <= end`, by day.
pub fn read_week_workouts(
    conn: &mut SqliteConnection,
    user_id: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PlannedWorkout>> {
    operations::planned_workouts_between(conn, user_id, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NewWorkoutSession;
    use crate::db::test_support::{memory_connection, reference_user, seed_recipe, seed_user};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[test]
    fn parses_slots() {
        assert_eq!("Lunch".parse::<MealSlot>().unwrap(), MealSlot::Lunch);
        assert_eq!("diner".parse::<MealSlot>().unwrap(), MealSlot::Dinner);
        assert!("brunch".parse::<MealSlot>().is_err());
    }

    #[test]
    fn second_lunch_moves_to_evening() {
        let mut conn = memory_connection();
        let user = seed_user(&mut conn, reference_user());
        let recipe = seed_recipe(&mut conn, "Soup", Some(400), None);

        let first = add_meal_to_calendar(&mut conn, user.id, recipe.id, day(5), MealSlot::Lunch, None).unwrap();
        let second = add_meal_to_calendar(&mut conn, user.id, recipe.id, day(5), MealSlot::Lunch, None).unwrap();
        let other_day = add_meal_to_calendar(&mut conn, user.id, recipe.id, day(6), MealSlot::Lunch, None).unwrap();

        assert_eq!(first.start_time, Some(noon()));
        assert_eq!(second.start_time, Some(evening()));
        assert_eq!(other_day.start_time, Some(noon()));
    }

    #[test]
    fn full_day_rejects_another_meal() {
        let mut conn = memory_connection();
        let user = seed_user(&mut conn, reference_user());
        let recipe = seed_recipe(&mut conn, "Soup", Some(400), None);

        add_meal_to_calendar(&mut conn, user.id, recipe.id, day(5), MealSlot::Lunch, None).unwrap();
        add_meal_to_calendar(&mut conn, user.id, recipe.id, day(5), MealSlot::Lunch, None).unwrap();
        assert!(matches!(
            add_meal_to_calendar(&mut conn, user.id, recipe.id, day(5), MealSlot::Lunch, None),
            Err(NutrifitError::InvalidInput(_))
        ));

        add_meal_to_calendar(&mut conn, user.id, recipe.id, day(6), MealSlot::Dinner, None).unwrap();
        assert!(matches!(
            add_meal_to_calendar(&mut conn, user.id, recipe.id, day(6), MealSlot::Dinner, None),
            Err(NutrifitError::InvalidInput(_))
        ));
        let lunch = add_meal_to_calendar(&mut conn, user.id, recipe.id, day(6), MealSlot::Lunch, None).unwrap();
        assert_eq!(lunch.start_time, Some(noon()));

        let meals = user_calendar(&mut conn, user.id).unwrap().meals;
        assert_eq!(meals.len(), 4);
    }

    #[test]
    fn dinner_is_always_evening() {
        let mut conn = memory_connection();
        let user = seed_user(&mut conn, reference_user());
        let recipe = seed_recipe(&mut conn, "Soup", Some(400), None);
        let dinner = add_meal_to_calendar(&mut conn, user.id, recipe.id, day(5), MealSlot::Dinner, None).unwrap();
        assert_eq!(dinner.start_time, Some(evening()));
    }

    #[test]
    fn rejects_unknown_recipe() {
        let mut conn = memory_connection();
        let user = seed_user(&mut conn, reference_user());
        assert!(matches!(
            add_meal_to_calendar(&mut conn, user.id, 77, day(5), MealSlot::Lunch, None),
            Err(NutrifitError::RecipeNotFound(77))
        ));
        assert!(user_calendar(&mut conn, user.id).unwrap().is_empty());
    }

    #[test]
    fn workout_lifecycle() {
        let mut conn = memory_connection();
        let user = seed_user(&mut conn, reference_user());
        let session = operations::create_workout_session(
            &mut conn,
            &NewWorkoutSession {
                name: "Full body session".to_string(),
                focus: "full_body".to_string(),
                duration_minutes: Some(45),
                calendar_id: None,
            },
        )
        .unwrap();

        let workout = add_workout_to_calendar(&mut conn, user.id, session.id, day(7), None).unwrap();
        assert!(!workout.completed);
        assert!(set_workout_completed(&mut conn, workout.id, true).unwrap());

        let week = read_week_workouts(&mut conn, user.id, day(5), day(11)).unwrap();
        assert_eq!(week.len(), 1);
        assert!(week[0].completed);
        assert_eq!(calendar_for_day(&mut conn, user.id, day(7)).unwrap().workouts.len(), 1);
        assert!(calendar_for_day(&mut conn, user.id, day(8)).unwrap().workouts.is_empty());

        assert!(remove_workout(&mut conn, workout.id).unwrap());
        assert!(!remove_workout(&mut conn, workout.id).unwrap());
        assert!(!set_workout_completed(&mut conn, workout.id, false).unwrap());

        assert!(add_workout_to_calendar(&mut conn, user.id, 999, day(7), None).is_err());
    }
}
