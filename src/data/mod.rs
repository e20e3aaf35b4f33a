//! Database repository layer.
//!
//! Repositories use SeaORM entity models internally and return domain models so the
//! service layer never depends on the database representation.

pub mod guild_config;

pub use guild_config::GuildConfigRepository;

#[cfg(test)]
mod test;
