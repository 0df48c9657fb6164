pub mod config;
pub mod event;
pub mod generation;
pub mod http;
pub mod library;
pub mod player;
pub mod settings;
pub mod studio;
pub mod ui;
pub mod util;
