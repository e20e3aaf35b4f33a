//! Goldy Bot, a Discord command framework.
//!
//! Extensions contribute slash and prefix commands. The framework keeps them in a
//! shared registry, synchronizes slash commands with Discord and routes incoming
//! gateway events through a permission-checked invocation pipeline. Per-guild
//! configuration lives in a Sqlite database.

pub mod bot;
pub mod command;
pub mod config;
pub mod data;
pub mod discord;
pub mod error;
pub mod extensions;
pub mod model;
pub mod service;
pub mod startup;
pub mod state;
