//! Goldy Bot Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the bot
//! framework. This crate offers a builder pattern for creating test contexts with in-memory
//! SQLite databases, factories for persisted guild configuration, and fixtures producing raw
//! gateway payloads the way Discord delivers them.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **factory**: Database-backed entity factories
//! - **gateway**: JSON fixtures for `INTERACTION_CREATE` and `MESSAGE_CREATE` payloads
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::GuildConfig;
//!
//! #[tokio::test]
//! async fn test_guild_config() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(GuildConfig)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod gateway;
