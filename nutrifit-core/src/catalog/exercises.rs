use diesel::prelude::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Selection, split_labels};
use crate::db::models::Exercise;
use crate::db::schema::exercises;
use crate::errors::{NutrifitError, Result};

/// Cumulative equipment access: each tier can use every exercise of the tiers below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentTier {
    Bodyweight,
    Home,
    Gym,
}

impl EquipmentTier {
    pub const ALL: [EquipmentTier; 3] = [
        EquipmentTier::Bodyweight,
        EquipmentTier::Home,
        EquipmentTier::Gym,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentTier::Bodyweight => "bodyweight",
            EquipmentTier::Home => "home",
            EquipmentTier::Gym => "gym",
        }
    }

    /// Map a user's free-text equipment description to a tier.
    pub fn from_descriptor(descriptor: Option<&str>) -> Self {
        let Some(text) = descriptor.map(|d| d.to_lowercase()) else {
            return EquipmentTier::Bodyweight;
        };
        if ["gym", "salle"].iter().any(|k| text.contains(k)) {
            EquipmentTier::Gym
        } else if ["home", "dumbbell", "maison", "haltere", "haltère", "kettlebell"]
            .iter()
            .any(|k| text.contains(k))
        {
            EquipmentTier::Home
        } else {
            EquipmentTier::Bodyweight
        }
    }

    pub fn eligible(&self) -> Vec<EquipmentTier> {
        EquipmentTier::ALL
            .into_iter()
            .filter(|tier| tier <= self)
            .collect()
    }
}

impl fmt::Display for EquipmentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentTier {
    type Err = NutrifitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bodyweight" | "poids_du_corps" => Ok(EquipmentTier::Bodyweight),
            "home" | "materiel_maison" => Ok(EquipmentTier::Home),
            "gym" | "salle_de_sport" => Ok(EquipmentTier::Gym),
            other => Err(NutrifitError::invalid(format!(
                "unknown equipment tier '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseType {
    Strength,
    Cardio,
    Isolation,
    Other,
}

impl ExerciseType {
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("strength" | "force" | "compound") => ExerciseType::Strength,
            Some("cardio") => ExerciseType::Cardio,
            Some("isolation") => ExerciseType::Isolation,
            _ => ExerciseType::Other,
        }
    }
}

/// Body-part focus of one training day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    FullBody,
    Upper,
    Lower,
    Push,
    Pull,
    Cardio,
}

impl Focus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Focus::FullBody => "full_body",
            Focus::Upper => "upper",
            Focus::Lower => "lower",
            Focus::Push => "push",
            Focus::Pull => "pull",
            Focus::Cardio => "cardio",
        }
    }

    /// Muscle keywords, French and English, as they appear in catalog tags.
    pub fn muscle_keywords(&self) -> &'static [&'static str] {
        match self {
            Focus::FullBody => &[],
            Focus::Upper => &[
                "chest", "pectoraux", "back", "dos", "lats", "traps", "shoulders", "epaules",
                "épaules", "biceps", "triceps", "forearms", "avant-bras",
            ],
            Focus::Lower => &[
                "legs", "jambes", "quadriceps", "quads", "hamstrings", "ischios", "calves",
                "mollets", "glutes", "fessiers", "adductors", "abductors",
            ],
            Focus::Push => &["chest", "pectoraux", "shoulders", "epaules", "épaules", "triceps"],
            Focus::Pull => &["back", "dos", "lats", "traps", "biceps", "forearms", "avant-bras"],
            Focus::Cardio => &["cardio"],
        }
    }

    pub fn matches(&self, exercise: &Exercise) -> bool {
        let kind = exercise.kind();
        match self {
            Focus::FullBody => matches!(kind, ExerciseType::Strength | ExerciseType::Cardio),
            Focus::Cardio if kind == ExerciseType::Cardio => true,
            _ => {
                let keywords = self.muscle_keywords();
                exercise
                    .muscle_tags()
                    .iter()
                    .any(|tag| keywords.iter().any(|k| tag.contains(k)))
            }
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Focus {
    type Err = NutrifitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "full_body" | "fullbody" | "full" => Ok(Focus::FullBody),
            "upper" | "upper_body" | "haut" => Ok(Focus::Upper),
            "lower" | "lower_body" | "legs" | "jambes" | "bas" => Ok(Focus::Lower),
            "push" => Ok(Focus::Push),
            "pull" => Ok(Focus::Pull),
            "cardio" => Ok(Focus::Cardio),
            other => Err(NutrifitError::invalid(format!("unknown focus '{}'", other))),
        }
    }
}

impl Exercise {
    pub fn muscle_tags(&self) -> Vec<String> {
        split_labels(self.target_muscles.as_deref())
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect()
    }

    pub fn kind(&self) -> ExerciseType {
        ExerciseType::from_label(self.exercise_type.as_deref())
    }

    pub fn tier(&self) -> Option<EquipmentTier> {
        self.equipment.parse().ok()
    }
}

pub fn list_exercises_by_equipment(
    conn: &mut SqliteConnection,
    max_tier: EquipmentTier,
) -> Result<Vec<Exercise>> {
    let labels: Vec<&'static str> = max_tier.eligible().iter().map(|t| t.as_str()).collect();
    let pool = exercises::table
        .filter(exercises::equipment.eq_any(labels))
        .order(exercises::id.asc())
        .select(Exercise::as_select())
        .load(conn)?;
    debug!(
        "list_exercises_by_equipment max_tier={} returned {}",
        max_tier,
        pool.len()
    );
    Ok(pool)
}

/// Keep exercises matching `focus`; an empty match falls back to the whole pool.
pub fn filter_exercises_by_focus(pool: Vec<Exercise>, focus: Focus) -> Selection<Exercise> {
    let matched: Vec<Exercise> = pool.iter().filter(|e| focus.matches(e)).cloned().collect();
    let selection = Selection::or_all(matched, pool);
    if selection.is_fallback() {
        info!(
            "No exercise matches focus {}, using all {} eligible exercises",
            focus,
            selection.len()
        );
    }
    selection
}
