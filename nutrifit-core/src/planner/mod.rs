//! Weekly planning: split scheduling, session building, meal and workout
//! generation, and point edits of the resulting calendar.

pub mod calendar;
pub mod favorites;
pub mod mutation;
pub mod session_builder;
pub mod split;
pub mod weekly;

pub use calendar::MealSlot;
pub use mutation::{read_week, swap_meal, swap_session};
pub use session_builder::{BuiltSession, Intensity, build_session};
pub use split::{determine_split, training_days};
pub use weekly::{CalorieTarget, PlanSummary, generate_weekly_plan};
