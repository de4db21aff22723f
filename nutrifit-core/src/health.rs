//! Energy expenditure formulas.
//!
//! Every function here is total: missing or unrecognised inputs fall into a
//! named default branch (logged) instead of an error, so plan generation can
//! always run.

use log::{debug, warn};
use serde::Serialize;

use crate::db::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
    /// Label present but not recognised; BMR uses the midpoint offset.
    Unrecognized,
}

impl Sex {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "h" | "m" | "homme" | "masculin" | "male" | "man" => Sex::Male,
            "f" | "femme" | "feminin" | "féminin" | "female" | "woman" => Sex::Female,
            _ => Sex::Unrecognized,
        }
    }

    fn bmr_offset(self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
            Sex::Unrecognized => -78.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Substring match on free text. "very"/"tres" is checked before
    /// "active" since the latter is contained in the former.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label.map(|l| l.trim().to_lowercase()).filter(|l| !l.is_empty()) else {
            return ActivityLevel::Sedentary;
        };
        if label.contains("sedentar") || label.contains("sédentaire") {
            ActivityLevel::Sedentary
        } else if label.contains("light") || label.contains("leger") || label.contains("léger") {
            ActivityLevel::Light
        } else if label.contains("moderate") || label.contains("modere") || label.contains("modéré") {
            ActivityLevel::Moderate
        } else if label.contains("very") || label.contains("tres") || label.contains("très") {
            ActivityLevel::VeryActive
        } else if label.contains("active") || label.contains("actif") {
            ActivityLevel::Active
        } else {
            warn!("Unrecognized activity level {:?}, assuming sedentary", label);
            ActivityLevel::Sedentary
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    Maintenance,
}

impl FitnessGoal {
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(goal) = label.map(|g| g.to_lowercase()) else {
            return FitnessGoal::Maintenance;
        };
        if ["loss", "perte", "seche", "sèche"].iter().any(|k| goal.contains(k)) {
            FitnessGoal::WeightLoss
        } else if ["gain", "prise", "masse"].iter().any(|k| goal.contains(k)) {
            FitnessGoal::MuscleGain
        } else {
            FitnessGoal::Maintenance
        }
    }

    pub fn calorie_adjustment(self) -> i32 {
        match self {
            FitnessGoal::WeightLoss => -500,
            FitnessGoal::MuscleGain => 300,
            FitnessGoal::Maintenance => 0,
        }
    }
}

/// Mifflin-St Jeor. Returns 0 when any input is missing or zero; callers
/// must treat 0 as "unknown", not as a real rate.
pub fn basal_metabolic_rate(
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    age: Option<i32>,
    sex: Option<&str>,
) -> i32 {
    let (Some(weight), Some(height), Some(age), Some(sex)) = (weight_kg, height_cm, age, sex)
    else {
        return 0;
    };
    if weight == 0.0 || height == 0.0 || age == 0 || sex.trim().is_empty() {
        return 0;
    }

    let sex = Sex::from_label(sex);
    if sex == Sex::Unrecognized {
        warn!("Unrecognized sex label, using midpoint BMR offset");
    }
    let bmr = 10.0 * weight + 6.25 * height - 5.0 * f64::from(age) + sex.bmr_offset();
    bmr as i32
}

pub fn total_energy_expenditure(bmr: i32, activity_level: Option<&str>) -> i32 {
    let level = ActivityLevel::from_label(activity_level);
    (f64::from(bmr) * level.factor()) as i32
}

pub fn target_calories(tdee: i32, goal: Option<&str>) -> i32 {
    tdee + FitnessGoal::from_label(goal).calorie_adjustment()
}

#[derive(Debug, Clone, Serialize)]
pub struct EnergyEstimate {
    pub bmr: i32,
    pub tdee: i32,
    pub daily_target: i32,
}

/// Profile-derived estimate, or the names of the fields that are missing.
pub fn estimate_for_user(user: &User, activity_level: Option<&str>) -> Result<EnergyEstimate, Vec<&'static str>> {
    let missing = missing_profile_fields(user);
    if !missing.is_empty() {
        return Err(missing);
    }
    let bmr = basal_metabolic_rate(user.weight_kg, user.height_cm, user.age, user.sex.as_deref());
    let tdee = total_energy_expenditure(bmr, activity_level);
    let daily_target = target_calories(tdee, user.goal.as_deref());
    debug!(
        "Energy estimate for user {}: bmr={} tdee={} target={}",
        user.id, bmr, tdee, daily_target
    );
    Ok(EnergyEstimate {
        bmr,
        tdee,
        daily_target,
    })
}

pub fn missing_profile_fields(user: &User) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if user.weight_kg.is_none_or(|w| w == 0.0) {
        missing.push("weight");
    }
    if user.height_cm.is_none_or(|h| h == 0.0) {
        missing.push("height");
    }
    if user.age.is_none_or(|a| a == 0) {
        missing.push("age");
    }
    if user.sex.as_deref().is_none_or(|s| s.trim().is_empty()) {
        missing.push("sex");
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmr_for_reference_male() {
        // 700 + 1093.75 - 150 + 5
        assert_eq!(
            basal_metabolic_rate(Some(70.0), Some(175.0), Some(30), Some("male")),
            1648
        );
        assert_eq!(
            basal_metabolic_rate(Some(70.0), Some(175.0), Some(30), Some("masculin")),
            1648
        );
    }

    #[test]
    fn bmr_sex_offsets() {
        let female = basal_metabolic_rate(Some(60.0), Some(165.0), Some(40), Some("F"));
        let other = basal_metabolic_rate(Some(60.0), Some(165.0), Some(40), Some("x"));
        let male = basal_metabolic_rate(Some(60.0), Some(165.0), Some(40), Some("homme"));
        // 600 + 1031.25 - 200 = 1431.25
        assert_eq!(female, 1270);
        assert_eq!(other, 1353);
        assert_eq!(male, 1436);
    }

    #[test]
    fn female_label_is_not_read_as_male() {
        assert_eq!(Sex::from_label("female"), Sex::Female);
        assert_eq!(Sex::from_label(" Male "), Sex::Male);
    }

    #[test]
    fn bmr_returns_zero_when_any_input_missing() {
        assert_eq!(basal_metabolic_rate(None, Some(175.0), Some(30), Some("m")), 0);
        assert_eq!(basal_metabolic_rate(Some(70.0), None, Some(30), Some("m")), 0);
        assert_eq!(basal_metabolic_rate(Some(70.0), Some(175.0), None, Some("m")), 0);
        assert_eq!(basal_metabolic_rate(Some(70.0), Some(175.0), Some(30), None), 0);
        assert_eq!(basal_metabolic_rate(Some(0.0), Some(175.0), Some(30), Some("m")), 0);
        assert_eq!(basal_metabolic_rate(Some(70.0), Some(175.0), Some(30), Some("  ")), 0);
    }

    #[test]
    fn bmr_strictly_increasing_in_weight() {
        let mut previous = 0;
        for weight in 40..150 {
            let bmr = basal_metabolic_rate(Some(f64::from(weight)), Some(180.0), Some(35), Some("f"));
            assert!(bmr > previous);
            previous = bmr;
        }
    }

    #[test]
    fn tdee_factors() {
        assert_eq!(total_energy_expenditure(1000, Some("sedentaire")), 1200);
        assert_eq!(total_energy_expenditure(1000, Some("light")), 1375);
        assert_eq!(total_energy_expenditure(1000, Some("modere")), 1550);
        assert_eq!(total_energy_expenditure(1000, Some("active")), 1725);
        assert_eq!(total_energy_expenditure(1000, Some("very active")), 1900);
        assert_eq!(total_energy_expenditure(1000, Some("tres_actif")), 1900);
        assert_eq!(total_energy_expenditure(1000, Some("lightly active")), 1375);
    }

    #[test]
    fn tdee_defaults_to_sedentary() {
        assert_eq!(total_energy_expenditure(1000, None), 1200);
        assert_eq!(total_energy_expenditure(1000, Some("")), 1200);
        assert_eq!(total_energy_expenditure(1000, Some("couch")), 1200);
    }

    #[test]
    fn tdee_strictly_increasing_in_bmr() {
        for level in ["sedentary", "light", "moderate", "active", "very active"] {
            let mut previous = -1;
            for bmr in 1000..1100 {
                let tdee = total_energy_expenditure(bmr, Some(level));
                assert!(tdee > previous, "{} at bmr {}", level, bmr);
                previous = tdee;
            }
        }
    }

    #[test]
    fn target_adjusts_for_goal() {
        assert_eq!(target_calories(2000, Some("weight-loss")), 1500);
        assert_eq!(target_calories(2000, Some("perte_poids")), 1500);
        assert_eq!(target_calories(2000, Some("seche")), 1500);
        assert_eq!(target_calories(2000, Some("muscle-gain")), 2300);
        assert_eq!(target_calories(2000, Some("prise_masse")), 2300);
        assert_eq!(target_calories(2000, Some("maintien")), 2000);
        assert_eq!(target_calories(2000, None), 2000);
    }
}
