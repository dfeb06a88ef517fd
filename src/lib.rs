//! Moose game library crate.

pub mod app;
pub mod audio;
pub mod collision;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod frontend;
pub mod game;
pub mod inventory;
pub mod logging;
pub mod platform;
pub mod player;
pub mod registry;
pub mod render;
pub mod save;
pub mod spawn;
