//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let config = factory::guild_config::GuildConfigFactory::new(&db)
//!     .guild_id("987654321")
//!     .prefix("?")
//!     .build()
//!     .await?;
//! ```

pub mod guild_config;
pub mod helpers;

pub use guild_config::create_guild_config;
