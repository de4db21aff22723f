use log::{debug, warn};
use std::env;
use std::str::FromStr;

use crate::errors::{NutrifitError, Result};

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

pub fn database_url() -> Result<String> {
    env::var(DATABASE_URL_VAR).map_err(|_| {
        NutrifitError::Config(format!(
            "{} must be specified or present in the environment",
            DATABASE_URL_VAR
        ))
    })
}

/// Tunables for plan generation. Defaults follow the latest generator.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Half-width of the per-meal calorie band, in kcal.
    pub calorie_tolerance: f64,
    /// Share of the daily calorie target given to one planned meal.
    pub meal_fraction: f64,
    /// Per-meal target used when the profile cannot produce a BMR.
    pub default_meal_calories: f64,
    pub default_training_frequency: i32,
    pub default_session_minutes: i32,
    pub default_exercise_count: usize,
    pub recipe_search_limit: i64,
    pub exercise_list_limit: i64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            calorie_tolerance: 300.0,
            meal_fraction: 0.35,
            default_meal_calories: 600.0,
            default_training_frequency: 3,
            default_session_minutes: 60,
            default_exercise_count: 5,
            recipe_search_limit: 5,
            exercise_list_limit: 10,
        }
    }
}

fn env_override<T: FromStr>(name: &str, current: &mut T) {
    let Ok(raw) = env::var(name) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => {
            debug!("{} overridden from environment", name);
            *current = value;
        }
        Err(_) => warn!("Ignoring unparsable {}={:?}", name, raw),
    }
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        env_override("NUTRIFIT_CALORIE_TOLERANCE", &mut config.calorie_tolerance);
        env_override("NUTRIFIT_MEAL_FRACTION", &mut config.meal_fraction);
        env_override(
            "NUTRIFIT_DEFAULT_MEAL_CALORIES",
            &mut config.default_meal_calories,
        );
        env_override(
            "NUTRIFIT_DEFAULT_FREQUENCY",
            &mut config.default_training_frequency,
        );
        config
    }
}
