use serde_json::{Value, json};
use thiserror::Error as ThisError;

use crate::catalog::exercises::{EquipmentTier, Focus};

#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum NutrifitError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("user {0} not found")]
    UserNotFound(i32),

    #[error("recipe {0} not found")]
    RecipeNotFound(i32),

    #[error("not enough exercises for focus '{focus}' with {tier} equipment")]
    NotEnoughExercises { focus: Focus, tier: EquipmentTier },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NutrifitError>;

impl NutrifitError {
    pub fn invalid<D: std::fmt::Display>(d: D) -> Self {
        NutrifitError::InvalidInput(d.to_string())
    }

    /// Error shape shared by the HTTP and chat-tool layers.
    pub fn to_json(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_enough_exercises_names_focus_and_tier() {
        let err = NutrifitError::NotEnoughExercises {
            focus: Focus::Push,
            tier: EquipmentTier::Home,
        };
        assert_eq!(
            err.to_string(),
            "not enough exercises for focus 'push' with home equipment"
        );
        assert_eq!(
            err.to_json()["error"],
            "not enough exercises for focus 'push' with home equipment"
        );
    }
}
