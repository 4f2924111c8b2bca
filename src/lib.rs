pub mod api_connection;
pub mod cache;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod export;
pub mod logging;
pub mod meal_plan;
pub mod planner;
pub mod preferences;
pub mod prompts;
pub mod saved_plan;
pub mod scheduler;
pub mod schema;
pub mod session;
