pub mod builder;
pub mod registry;
pub mod schema;

pub use builder::CommandBuilder;
pub use registry::{CommandRegistry, ComponentRegistry, GuildCache, Registry};
