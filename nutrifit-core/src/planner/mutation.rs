use chrono::NaiveDate;
use diesel::prelude::*;
use log::info;

use crate::db::models::PlannedMeal;
use crate::db::operations;
use crate::errors::{NutrifitError, Result};

/// Planned meals with `start <= day <= end`, by day then time of day.
pub fn read_week(
    conn: &mut SqliteConnection,
    user_id: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PlannedMeal>> {
    if end < start {
        return Err(NutrifitError::invalid(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    operations::planned_meals_between(conn, user_id, start, end)
}

/// Point the planned meal at another recipe. `false` when no such planning row exists.
pub fn swap_meal(conn: &mut SqliteConnection, planning_id: i32, new_recipe_id: i32) -> Result<bool> {
    if operations::get_recipe(conn, new_recipe_id)?.is_none() {
        return Err(NutrifitError::RecipeNotFound(new_recipe_id));
    }
    let swapped = operations::set_planned_meal_recipe(conn, planning_id, new_recipe_id)?;
    if swapped {
        info!("Planned meal {} now uses recipe {}", planning_id, new_recipe_id);
    }
    Ok(swapped)
}

/// Point the planned workout at another session. `false` when no such planning row exists.
pub fn swap_session(
    conn: &mut SqliteConnection,
    planning_id: i32,
    new_session_id: i32,
) -> Result<bool> {
    if operations::get_workout_session(conn, new_session_id)?.is_none() {
        return Err(NutrifitError::invalid(format!(
            "workout session {} not found",
            new_session_id
        )));
    }
    let swapped = operations::set_planned_workout_session(conn, planning_id, new_session_id)?;
    if swapped {
        info!("Planned workout {} now uses session {}", planning_id, new_session_id);
    }
    Ok(swapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::db::test_support::{
        memory_connection, reference_user, seed_exercise_catalog, seed_recipe, seed_recipe_catalog,
        seed_user,
    };
    use crate::planner::weekly::generate_weekly_plan;
    use chrono::Days;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    #[test]
    fn swap_meal_touches_one_row() {
        let mut conn = memory_connection();
        seed_recipe_catalog(&mut conn);
        seed_exercise_catalog(&mut conn);
        let user = seed_user(&mut conn, reference_user());
        let mut rng = StdRng::seed_from_u64(3);
        generate_weekly_plan(&mut conn, &mut rng, &PlannerConfig::default(), user.id, monday(), true, false)
            .unwrap();
        let special = seed_recipe(&mut conn, "Birthday Cake", Some(900), Some("dessert"));

        let before = read_week(&mut conn, user.id, monday(), monday() + Days::new(6)).unwrap();
        let target = before[3].id;
        assert!(swap_meal(&mut conn, target, special.id).unwrap());

        let after = read_week(&mut conn, user.id, monday(), monday() + Days::new(6)).unwrap();
        assert_eq!(after.len(), before.len());
        for (old, new) in before.iter().zip(&after) {
            assert_eq!(old.id, new.id);
            if new.id == target {
                assert_eq!(new.recipe_id, special.id);
            } else {
                assert_eq!(old.recipe_id, new.recipe_id);
            }
        }
    }

    #[test]
    fn swaps_report_missing_rows() {
        let mut conn = memory_connection();
        let recipe = seed_recipe(&mut conn, "Soup", Some(400), None);
        assert!(!swap_meal(&mut conn, 12345, recipe.id).unwrap());
        assert!(matches!(
            swap_meal(&mut conn, 1, 999),
            Err(NutrifitError::RecipeNotFound(999))
        ));
        assert!(swap_session(&mut conn, 1, 999).is_err());
    }

    #[test]
    fn swap_session_updates_reference() {
        let mut conn = memory_connection();
        seed_recipe_catalog(&mut conn);
        seed_exercise_catalog(&mut conn);
        let user = seed_user(&mut conn, reference_user());
        let mut rng = StdRng::seed_from_u64(9);
        generate_weekly_plan(&mut conn, &mut rng, &PlannerConfig::default(), user.id, monday(), false, true)
            .unwrap();

        let workouts =
            operations::planned_workouts_between(&mut conn, user.id, monday(), monday() + Days::new(6))
                .unwrap();
        let (first, second) = (&workouts[0], &workouts[1]);
        assert!(swap_session(&mut conn, first.id, second.session_id).unwrap());
        assert!(!swap_session(&mut conn, 4242, second.session_id).unwrap());

        let updated =
            operations::planned_workouts_between(&mut conn, user.id, monday(), monday() + Days::new(6))
                .unwrap();
        assert_eq!(updated[0].session_id, second.session_id);
        assert_eq!(updated[2].session_id, workouts[2].session_id);
    }

    #[test]
    fn read_week_rejects_reversed_range() {
        let mut conn = memory_connection();
        assert!(read_week(&mut conn, 1, monday() + Days::new(6), monday()).is_err());
        assert!(read_week(&mut conn, 1, monday(), monday()).unwrap().is_empty());
    }
}
