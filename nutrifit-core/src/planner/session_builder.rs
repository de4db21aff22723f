use diesel::prelude::*;
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::exercises::{
    EquipmentTier, Focus, filter_exercises_by_focus, list_exercises_by_equipment,
};
use crate::config::PlannerConfig;
use crate::db::models::{
    Exercise, NewSessionExercise, NewWorkoutSession, SessionExercise, WorkoutSession,
};
use crate::db::operations;
use crate::errors::{NutrifitError, Result};

const MIN_EXERCISES: i32 = 3;
const MINUTES_PER_EXERCISE: i32 = 5;
const INTENSITY_STEP: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl FromStr for Intensity {
    type Err = NutrifitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "faible" | "basse" => Ok(Intensity::Low),
            "medium" | "moderate" | "moyenne" => Ok(Intensity::Medium),
            "high" | "haute" | "elevee" | "élevée" => Ok(Intensity::High),
            other => Err(NutrifitError::invalid(format!("unknown intensity '{}'", other))),
        }
    }
}

/// Sets, reps and rest applied to every exercise of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prescription {
    pub sets: i32,
    pub reps: i32,
    pub rest_seconds: i32,
}

impl Prescription {
    pub fn for_focus(focus: Focus) -> Self {
        match focus {
            Focus::Cardio => Prescription {
                sets: 3,
                reps: 20,
                rest_seconds: 30,
            },
            _ => Prescription {
                sets: 4,
                reps: 12,
                rest_seconds: 60,
            },
        }
    }
}

pub fn exercise_count(
    duration_minutes: Option<i32>,
    intensity: Option<Intensity>,
    default_count: usize,
) -> usize {
    let Some(duration) = duration_minutes else {
        return default_count;
    };
    let base = MIN_EXERCISES.max(duration / MINUTES_PER_EXERCISE);
    let count = match intensity {
        Some(Intensity::Low) => MIN_EXERCISES.max(base - INTENSITY_STEP),
        Some(Intensity::High) => base + INTENSITY_STEP,
        Some(Intensity::Medium) | None => base,
    };
    count as usize
}

#[derive(Debug, Clone, Serialize)]
pub struct BuiltSession {
    pub session: WorkoutSession,
    pub exercises: Vec<SessionExercise>,
}

/// Build and persist one workout session for `focus` from the exercises the
/// equipment descriptor gives access to.
pub fn build_session<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    rng: &mut R,
    config: &PlannerConfig,
    focus: Focus,
    equipment: Option<&str>,
    duration_minutes: Option<i32>,
    intensity: Option<Intensity>,
) -> Result<BuiltSession> {
    let tier = EquipmentTier::from_descriptor(equipment);
    let eligible = list_exercises_by_equipment(conn, tier)?;
    let mut candidates: Vec<Exercise> = filter_exercises_by_focus(eligible, focus).into_inner();
    if candidates.is_empty() {
        return Err(NutrifitError::NotEnoughExercises { focus, tier });
    }

    let count = exercise_count(duration_minutes, intensity, config.default_exercise_count);
    candidates.shuffle(rng);
    candidates.truncate(count);
    debug!(
        "Selected {} of requested {} exercises for {} ({} tier)",
        candidates.len(),
        count,
        focus,
        tier
    );

    let prescription = Prescription::for_focus(focus);
    conn.transaction::<_, NutrifitError, _>(|conn| {
        let session = operations::create_workout_session(
            conn,
            &NewWorkoutSession {
                name: format!("{} session", focus),
                focus: focus.as_str().to_string(),
                duration_minutes: Some(duration_minutes.unwrap_or(config.default_session_minutes)),
                calendar_id: None,
            },
        )?;
        let links: Vec<NewSessionExercise> = candidates
            .iter()
            .zip(1..)
            .map(|(exercise, position)| NewSessionExercise {
                session_id: session.id,
                exercise_id: exercise.id,
                position,
                sets: prescription.sets,
                reps: prescription.reps,
                rest_seconds: prescription.rest_seconds,
            })
            .collect();
        let exercises = operations::add_session_exercises(conn, &links)?;
        info!(
            "Built session {} ({}) with {} exercises",
            session.id,
            session.name,
            exercises.len()
        );
        Ok(BuiltSession { session, exercises })
    })
}
