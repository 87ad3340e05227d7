pub mod browser;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod profiles;
pub mod provider;
pub mod screens;
pub mod tui;
pub mod tui_shell;
pub mod view;
