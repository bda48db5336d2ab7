pub mod app;
pub mod board;
pub mod celebrate;
pub mod cli;
pub mod logging;
pub mod planner;
pub mod realm;
pub mod settings;
pub mod store;
pub mod theme;
pub mod types;
pub mod ui;
