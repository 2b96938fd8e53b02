//! HTTP server: routing, views, static files and configuration.

pub mod app;
pub mod config;
