//! Process configuration read once at startup.

pub mod app_config;
