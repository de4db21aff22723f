use chrono::{Days, NaiveDate};
use diesel::prelude::*;
use log::{debug, info, warn};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::catalog::recipes::{all_recipes, filter_recipes_by_calorie_band};
use crate::config::PlannerConfig;
use crate::db::models::{NewPlannedWorkout, User};
use crate::db::operations;
use crate::errors::{NutrifitError, Result};
use crate::health::{basal_metabolic_rate, target_calories, total_energy_expenditure};
use crate::planner::calendar::{MealSlot, plan_meal};
use crate::planner::session_builder::build_session;
use crate::planner::split::weekly_schedule;

pub const WINDOW_DAYS: u32 = 7;

/// Activity assumed for meal sizing, whatever the profile states.
const MEAL_ACTIVITY_LEVEL: &str = "sedentary";

/// Stand-ins for missing profile fields when sizing meals.
const FALLBACK_WEIGHT_KG: f64 = 70.0;
const FALLBACK_HEIGHT_CM: f64 = 175.0;
const FALLBACK_AGE: i32 = 30;
const FALLBACK_SEX: &str = "masculin";
const FALLBACK_GOAL: &str = "maintien";

/// Per-meal calorie goal and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CalorieTarget {
    Estimated {
        bmr: i32,
        tdee: i32,
        daily_target: i32,
        per_meal: f64,
    },
    /// The filled-in profile still yields no usable rate.
    Default { per_meal: f64 },
}

impl CalorieTarget {
    pub fn for_user(user: &User, config: &PlannerConfig) -> Self {
        let weight = user.weight_kg.filter(|w| *w != 0.0);
        let height = user.height_cm.filter(|h| *h != 0.0);
        let age = user.age.filter(|a| *a != 0);
        let sex = user.sex.as_deref().filter(|s| !s.trim().is_empty());
        let goal = user.goal.as_deref().filter(|g| !g.trim().is_empty());
        if weight.is_none() || height.is_none() || age.is_none() || sex.is_none() || goal.is_none() {
            info!(
                "Filling missing profile fields of user {} with reference values for meal sizing",
                user.id
            );
        }

        let bmr = basal_metabolic_rate(
            Some(weight.unwrap_or(FALLBACK_WEIGHT_KG)),
            Some(height.unwrap_or(FALLBACK_HEIGHT_CM)),
            Some(age.unwrap_or(FALLBACK_AGE)),
            Some(sex.unwrap_or(FALLBACK_SEX)),
        );
        if bmr <= 0 {
            warn!(
                "No usable BMR for user {}, using default meal target of {} kcal",
                user.id, config.default_meal_calories
            );
            return CalorieTarget::Default {
                per_meal: config.default_meal_calories,
            };
        }
        let tdee = total_energy_expenditure(bmr, Some(MEAL_ACTIVITY_LEVEL));
        let daily_target = target_calories(tdee, Some(goal.unwrap_or(FALLBACK_GOAL)));
        CalorieTarget::Estimated {
            bmr,
            tdee,
            daily_target,
            per_meal: f64::from(daily_target) * config.meal_fraction,
        }
    }

    pub fn per_meal(&self) -> f64 {
        match self {
            CalorieTarget::Estimated { per_meal, .. } | CalorieTarget::Default { per_meal } => {
                *per_meal
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub status: String,
    pub message: String,
    pub details: Vec<String>,
    pub meals_planned: usize,
    pub workouts_planned: usize,
}

fn day_in_window(start: NaiveDate, offset: u32) -> Result<NaiveDate> {
    start
        .checked_add_days(Days::new(u64::from(offset)))
        .ok_or_else(|| NutrifitError::invalid(format!("date out of range: {} + {} days", start, offset)))
}

/// Replace the user's meals and/or workouts for the seven days from `start`.
///
/// Runs as one write transaction: if either pass fails nothing is changed.
pub fn generate_weekly_plan<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    rng: &mut R,
    config: &PlannerConfig,
    user_id: i32,
    start: NaiveDate,
    include_meals: bool,
    include_sport: bool,
) -> Result<PlanSummary> {
    let end = day_in_window(start, WINDOW_DAYS)?;

    let summary = conn.immediate_transaction::<_, NutrifitError, _>(|conn| {
        let user = operations::get_user(conn, user_id)?;
        let mut details = Vec::new();
        let mut meals_planned = 0;
        let mut workouts_planned = 0;

        if include_meals {
            meals_planned = plan_meals(conn, rng, config, &user, start, end, &mut details)?;
        }
        if include_sport {
            workouts_planned = plan_workouts(conn, rng, config, &user, start, end, &mut details)?;
        }

        Ok(PlanSummary {
            status: "success".to_string(),
            message: format!("Plan generated for the week of {}", start),
            details,
            meals_planned,
            workouts_planned,
        })
    })?;

    info!(
        "Weekly plan for user {} from {}: {} meals, {} workouts",
        user_id, start, summary.meals_planned, summary.workouts_planned
    );
    Ok(summary)
}

fn plan_meals<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    rng: &mut R,
    config: &PlannerConfig,
    user: &User,
    start: NaiveDate,
    end: NaiveDate,
    details: &mut Vec<String>,
) -> Result<usize> {
    let removed = operations::delete_planned_meals_in_window(conn, user.id, start, end)?;
    debug!("Removed {} planned meals for user {}", removed, user.id);

    let target = CalorieTarget::for_user(user, config);
    let recipes = all_recipes(conn)?;
    if recipes.is_empty() {
        warn!("Recipe catalog is empty, no meals planned");
        details.push("No recipes available, meals skipped".to_string());
        return Ok(0);
    }

    let selection =
        filter_recipes_by_calorie_band(recipes, target.per_meal(), config.calorie_tolerance);
    if selection.is_fallback() {
        details.push(format!(
            "No recipe near {:.0} kcal, picked from the whole catalog",
            target.per_meal()
        ));
    }
    let pool = selection.into_inner();

    let mut planned = 0;
    for offset in 0..WINDOW_DAYS {
        let day = day_in_window(start, offset)?;
        for slot in MealSlot::DAILY {
            let Some(recipe) = pool.choose(rng) else {
                continue;
            };
            plan_meal(conn, user.id, recipe.id, day, slot, None)?;
            planned += 1;
        }
    }

    details.push(format!(
        "{} meals planned around {:.0} kcal each",
        planned,
        target.per_meal()
    ));
    Ok(planned)
}

fn plan_workouts<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    rng: &mut R,
    config: &PlannerConfig,
    user: &User,
    start: NaiveDate,
    end: NaiveDate,
    details: &mut Vec<String>,
) -> Result<usize> {
    let removed = operations::delete_planned_workouts_in_window(conn, user.id, start, end)?;
    debug!("Removed {} planned workouts for user {}", removed, user.id);

    let frequency = user.training_days_per_week.unwrap_or_else(|| {
        info!(
            "No training frequency for user {}, assuming {} days",
            user.id, config.default_training_frequency
        );
        config.default_training_frequency
    });

    let mut planned = 0;
    for (offset, focus) in weekly_schedule(frequency) {
        let day = day_in_window(start, offset)?;
        let built = build_session(conn, rng, config, focus, user.equipment.as_deref(), None, None)?;
        operations::insert_planned_workout(
            conn,
            &NewPlannedWorkout {
                user_id: user.id,
                session_id: built.session.id,
                day,
                completed: false,
                notes: None,
            },
        )?;
        details.push(format!(
            "{}: {} ({} exercises)",
            day,
            built.session.name,
            built.exercises.len()
        ));
        planned += 1;
    }

    if planned == 0 {
        details.push("No training days this week".to_string());
    }
    Ok(planned)
}
