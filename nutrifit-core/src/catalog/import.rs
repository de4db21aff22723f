//! Catalog seeding from JSON dumps.
//!
//! Exercises come from the free-exercise-db export format; recipes from a
//! plain array of recipe objects.

use diesel::prelude::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::exercises::EquipmentTier;
use crate::db::models::{NewExercise, NewRecipe};
use crate::db::operations;
use crate::errors::{NutrifitError, Result};

pub const IMAGE_BASE_URL: &str =
    "https://raw.githubusercontent.com/yuhonas/free-exercise-db/main/exercises/";

const MAX_DESCRIPTION_CHARS: usize = 600;

/// One entry of the free-exercise-db `exercises.json` export.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeExercise {
    pub name: String,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub mechanic: Option<String>,
    #[serde(default)]
    pub primary_muscles: Vec<String>,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub inserted: usize,
    pub already_present: usize,
    pub not_allowed: usize,
}

pub fn equipment_tier_for(equipment: Option<&str>) -> EquipmentTier {
    let Some(equipment) = equipment.map(str::to_lowercase) else {
        return EquipmentTier::Bodyweight;
    };
    if ["body", "none"].iter().any(|k| equipment.contains(k)) {
        EquipmentTier::Bodyweight
    } else if ["dumbbell", "kettlebell", "band", "plate"]
        .iter()
        .any(|k| equipment.contains(k))
    {
        EquipmentTier::Home
    } else {
        EquipmentTier::Gym
    }
}

pub fn exercise_type_for(mechanic: Option<&str>) -> &'static str {
    match mechanic {
        Some("compound") => "strength",
        Some("isolation") => "isolation",
        _ => "cardio",
    }
}

/// Catalog muscle vocabulary is French; translate the dataset's English names.
fn localize_muscle(muscle: &str) -> String {
    match muscle {
        "shoulders" => "epaules",
        "chest" => "pectoraux",
        "lower back" | "middle back" => "dos",
        "calves" => "mollets",
        "hamstrings" => "ischios",
        "glutes" => "fessiers",
        "abdominals" => "abdominaux",
        "forearms" => "avant-bras",
        other => other,
    }
    .to_string()
}

impl FreeExercise {
    pub fn into_new_exercise(self) -> NewExercise {
        let mut muscles: Vec<String> = Vec::new();
        for muscle in self.primary_muscles.iter().chain(&self.secondary_muscles) {
            let localized = localize_muscle(muscle);
            if !muscles.contains(&localized) {
                muscles.push(localized);
            }
        }
        let description = (!self.instructions.is_empty()).then(|| {
            let text = format!("Instructions: {}", self.instructions.join(" "));
            text.chars().take(MAX_DESCRIPTION_CHARS).collect()
        });

        NewExercise {
            exercise_type: Some(exercise_type_for(self.mechanic.as_deref()).to_string()),
            equipment: equipment_tier_for(self.equipment.as_deref()).as_str().to_string(),
            target_muscles: (!muscles.is_empty()).then(|| muscles.join(", ")),
            image_url: self
                .images
                .first()
                .map(|image| format!("{}{}", IMAGE_BASE_URL, image)),
            description,
            name: self.name,
        }
    }
}

/// Insert every exercise of a free-exercise-db export that is not already in
/// the catalog by name. When `allow_list` is given, other names are skipped.
pub fn import_exercises(
    conn: &mut SqliteConnection,
    json: &str,
    allow_list: Option<&[String]>,
) -> Result<ImportReport> {
    let entries: Vec<FreeExercise> = serde_json::from_str(json)?;
    let allowed: Option<HashSet<&str>> =
        allow_list.map(|names| names.iter().map(String::as_str).collect());

    conn.transaction::<_, NutrifitError, _>(|conn| {
        let mut known: HashSet<String> = operations::exercise_names(conn)?.into_iter().collect();
        let mut report = ImportReport::default();

        for entry in entries {
            if allowed.as_ref().is_some_and(|a| !a.contains(entry.name.as_str())) {
                report.not_allowed += 1;
                continue;
            }
            if known.contains(&entry.name) {
                debug!("Exercise {:?} already present, skipping", entry.name);
                report.already_present += 1;
                continue;
            }
            known.insert(entry.name.clone());
            let exercise = operations::create_exercise(conn, &entry.into_new_exercise())?;
            debug!("Imported exercise {} ({})", exercise.name, exercise.equipment);
            report.inserted += 1;
        }

        info!(
            "Exercise import: {} inserted, {} already present, {} not allowed",
            report.inserted, report.already_present, report.not_allowed
        );
        Ok(report)
    })
}

pub fn import_recipes(conn: &mut SqliteConnection, json: &str) -> Result<ImportReport> {
    let entries: Vec<NewRecipe> = serde_json::from_str(json)?;

    conn.transaction::<_, NutrifitError, _>(|conn| {
        let mut known: HashSet<String> = operations::recipe_names(conn)?.into_iter().collect();
        let mut report = ImportReport::default();

        for recipe in entries {
            if !known.insert(recipe.name.clone()) {
                report.already_present += 1;
                continue;
            }
            operations::create_recipe(conn, &recipe)?;
            report.inserted += 1;
        }

        info!(
            "Recipe import: {} inserted, {} already present",
            report.inserted, report.already_present
        );
        Ok(report)
    })
}
