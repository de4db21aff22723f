pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod health;
pub mod logging;
pub mod planner;
pub mod tools;

pub use errors::{NutrifitError, Result};
