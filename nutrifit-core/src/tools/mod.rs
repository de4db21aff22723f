//! Data-access tools exposed to the chat assistant.
//!
//! Each call is a `ToolCall` variant and always produces a JSON object, with
//! failures rendered as `{"error": ...}`.

use chrono::NaiveDate;
use diesel::prelude::*;
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::catalog::recipes::{list_unique_tags, search_recipes};
use crate::config::PlannerConfig;
use crate::db::models::ProfileUpdate;
use crate::db::operations;
use crate::errors::Result;
use crate::health::estimate_for_user;
use crate::planner::{self, Intensity};

/// Activity level the assistant reports calories for.
const PROFILE_ACTIVITY_LEVEL: &str = "sedentary";

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    GetHealthProfile {},
    UpdateProfile {
        #[serde(default)]
        age: Option<i32>,
        #[serde(default, alias = "sexe")]
        sex: Option<String>,
        #[serde(default, alias = "poids")]
        weight_kg: Option<f64>,
        #[serde(default, alias = "taille")]
        height_cm: Option<f64>,
        #[serde(default, alias = "objectif")]
        goal: Option<String>,
        #[serde(default)]
        equipment: Option<String>,
        #[serde(default)]
        training_days_per_week: Option<i32>,
    },
    SearchRecipes {
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        limit: Option<i64>,
    },
    GetExercises {},
    ListRecipeTags {},
    GenerateWeeklyPlan {
        start: NaiveDate,
        #[serde(default = "default_true")]
        include_meals: bool,
        #[serde(default = "default_true")]
        include_sport: bool,
    },
    ReadWeek {
        start: NaiveDate,
        end: NaiveDate,
    },
    SwapMeal {
        planning_id: i32,
        recipe_id: i32,
    },
    SwapSession {
        planning_id: i32,
        session_id: i32,
    },
    BuildSession {
        focus: String,
        #[serde(default)]
        equipment: Option<String>,
        #[serde(default)]
        duration_minutes: Option<i32>,
        #[serde(default)]
        intensity: Option<String>,
    },
}

impl ToolCall {
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::GetHealthProfile {} => "get_health_profile",
            ToolCall::UpdateProfile { .. } => "update_profile",
            ToolCall::SearchRecipes { .. } => "search_recipes",
            ToolCall::GetExercises {} => "get_exercises",
            ToolCall::ListRecipeTags {} => "list_recipe_tags",
            ToolCall::GenerateWeeklyPlan { .. } => "generate_weekly_plan",
            ToolCall::ReadWeek { .. } => "read_week",
            ToolCall::SwapMeal { .. } => "swap_meal",
            ToolCall::SwapSession { .. } => "swap_session",
            ToolCall::BuildSession { .. } => "build_session",
        }
    }
}

/// Function-calling declarations, one per `ToolCall` variant.
pub fn tool_definitions() -> Vec<Value> {
    let date = json!({"type": "string", "format": "date"});
    vec![
        json!({
            "name": "get_health_profile",
            "description": "Read the user's profile and daily calorie analysis. Call this first.",
            "parameters": {"type": "object", "properties": {}}
        }),
        json!({
            "name": "update_profile",
            "description": "Save physical information (age, sex, weight, height, goal, equipment, training days).",
            "parameters": {
                "type": "object",
                "properties": {
                    "age": {"type": "integer"},
                    "sex": {"type": "string"},
                    "weight_kg": {"type": "number"},
                    "height_cm": {"type": "number"},
                    "goal": {"type": "string", "enum": ["perte_poids", "prise_masse", "maintien"]},
                    "equipment": {"type": "string"},
                    "training_days_per_week": {"type": "integer", "minimum": 0, "maximum": 7}
                }
            }
        }),
        json!({
            "name": "search_recipes",
            "description": "Search recipes by name or tag.",
            "parameters": {
                "type": "object",
                "properties": {
                    "query": {"type": "string"},
                    "limit": {"type": "integer", "minimum": 1}
                }
            }
        }),
        json!({
            "name": "get_exercises",
            "description": "List available exercises.",
            "parameters": {"type": "object", "properties": {}}
        }),
        json!({
            "name": "list_recipe_tags",
            "description": "List every recipe tag, usable as a search query.",
            "parameters": {"type": "object", "properties": {}}
        }),
        json!({
            "name": "generate_weekly_plan",
            "description": "Replace the user's meals and workouts for the seven days from start.",
            "parameters": {
                "type": "object",
                "properties": {
                    "start": date,
                    "include_meals": {"type": "boolean"},
                    "include_sport": {"type": "boolean"}
                },
                "required": ["start"]
            }
        }),
        json!({
            "name": "read_week",
            "description": "Read planned meals between two dates, inclusive.",
            "parameters": {
                "type": "object",
                "properties": {"start": date, "end": date},
                "required": ["start", "end"]
            }
        }),
        json!({
            "name": "swap_meal",
            "description": "Replace the recipe of one planned meal.",
            "parameters": {
                "type": "object",
                "properties": {
                    "planning_id": {"type": "integer"},
                    "recipe_id": {"type": "integer"}
                },
                "required": ["planning_id", "recipe_id"]
            }
        }),
        json!({
            "name": "swap_session",
            "description": "Replace the workout session of one planned workout.",
            "parameters": {
                "type": "object",
                "properties": {
                    "planning_id": {"type": "integer"},
                    "session_id": {"type": "integer"}
                },
                "required": ["planning_id", "session_id"]
            }
        }),
        json!({
            "name": "build_session",
            "description": "Create a workout session for a focus and equipment.",
            "parameters": {
                "type": "object",
                "properties": {
                    "focus": {"type": "string", "enum": ["full_body", "upper", "lower", "push", "pull", "cardio"]},
                    "equipment": {"type": "string"},
                    "duration_minutes": {"type": "integer"},
                    "intensity": {"type": "string", "enum": ["low", "medium", "high"]}
                },
                "required": ["focus"]
            }
        }),
    ]
}

/// Run one tool for `user_id`. Never fails: errors come back as `{"error": ...}`.
pub fn dispatch<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    rng: &mut R,
    config: &PlannerConfig,
    user_id: i32,
    call: ToolCall,
) -> Value {
    let name = call.name();
    info!("Tool call {} for user {}", name, user_id);
    match execute(conn, rng, config, user_id, call) {
        Ok(value) => value,
        Err(e) => {
            warn!("Tool {} failed: {}", name, e);
            e.to_json()
        }
    }
}

/// Decode a tool name and its raw arguments, then dispatch.
pub fn dispatch_raw<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    rng: &mut R,
    config: &PlannerConfig,
    user_id: i32,
    name: &str,
    arguments: Value,
) -> Value {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    match serde_json::from_value::<ToolCall>(json!({"name": name, "arguments": arguments})) {
        Ok(call) => dispatch(conn, rng, config, user_id, call),
        Err(e) => {
            warn!("Rejected tool call {}: {}", name, e);
            json!({ "error": format!("unknown tool or invalid arguments for '{}': {}", name, e) })
        }
    }
}

fn execute<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    rng: &mut R,
    config: &PlannerConfig,
    user_id: i32,
    call: ToolCall,
) -> Result<Value> {
    match call {
        ToolCall::GetHealthProfile {} => {
            let user = operations::get_user(conn, user_id)?;
            match estimate_for_user(&user, Some(PROFILE_ACTIVITY_LEVEL)) {
                Ok(estimate) => Ok(json!({
                    "profile": {
                        "first_name": user.first_name,
                        "age": user.age,
                        "goal": user.goal,
                        "equipment": user.equipment,
                        "training_days_per_week": user.training_days_per_week,
                    },
                    "analysis": estimate,
                })),
                Err(missing) => Ok(json!({
                    "error": format!("Incomplete profile. Ask the user for: {}.", missing.join(", "))
                })),
            }
        }
        ToolCall::UpdateProfile {
            age,
            sex,
            weight_kg,
            height_cm,
            goal,
            equipment,
            training_days_per_week,
        } => {
            let changes = ProfileUpdate {
                age,
                sex,
                weight_kg,
                height_cm,
                goal,
                equipment,
                training_days_per_week,
                ..Default::default()
            };
            let user = operations::update_profile(conn, user_id, &changes)?;
            Ok(json!({
                "status": "success",
                "message": "Profile updated",
                "profile": user,
            }))
        }
        ToolCall::SearchRecipes { query, limit } => {
            let limit = limit.unwrap_or(config.recipe_search_limit).max(1);
            let recipes = search_recipes(conn, query.as_deref(), limit)?;
            if recipes.is_empty() {
                return Ok(json!({ "result": "No recipe found." }));
            }
            let found: Vec<Value> = recipes
                .iter()
                .map(|r| {
                    json!({
                        "id": r.id,
                        "name": r.name,
                        "calories": r.calories,
                        "description": r.description,
                    })
                })
                .collect();
            Ok(json!({ "recipes": found }))
        }
        ToolCall::GetExercises {} => {
            let exercises = operations::list_exercises(conn, 0, config.exercise_list_limit)?;
            let listed: Vec<Value> = exercises
                .iter()
                .map(|e| json!({ "id": e.id, "name": e.name, "type": e.exercise_type }))
                .collect();
            Ok(json!({ "exercises": listed }))
        }
        ToolCall::ListRecipeTags {} => Ok(json!({ "tags": list_unique_tags(conn)? })),
        ToolCall::GenerateWeeklyPlan {
            start,
            include_meals,
            include_sport,
        } => {
            let summary = planner::generate_weekly_plan(
                conn,
                rng,
                config,
                user_id,
                start,
                include_meals,
                include_sport,
            )?;
            Ok(serde_json::to_value(summary)?)
        }
        ToolCall::ReadWeek { start, end } => {
            let meals = planner::read_week(conn, user_id, start, end)?;
            Ok(json!({ "meals": meals }))
        }
        ToolCall::SwapMeal {
            planning_id,
            recipe_id,
        } => Ok(json!({ "swapped": planner::swap_meal(conn, planning_id, recipe_id)? })),
        ToolCall::SwapSession {
            planning_id,
            session_id,
        } => Ok(json!({ "swapped": planner::swap_session(conn, planning_id, session_id)? })),
        ToolCall::BuildSession {
            focus,
            equipment,
            duration_minutes,
            intensity,
        } => {
            let focus = focus.parse()?;
            let intensity = intensity
                .as_deref()
                .map(str::parse::<Intensity>)
                .transpose()?;
            let built = planner::build_session(
                conn,
                rng,
                config,
                focus,
                equipment.as_deref(),
                duration_minutes,
                intensity,
            )?;
            Ok(serde_json::to_value(built)?)
        }
    }
}
