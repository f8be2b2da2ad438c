pub mod app;
pub mod config;
pub mod controller;
pub mod encoding;
pub mod error;
pub mod gemini;
pub mod logging;
pub mod models;
pub mod routes;
pub mod web;

pub use app::build_app;
