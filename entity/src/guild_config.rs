use sea_orm::entity::prelude::*;

/// Per-guild configuration row.
///
/// List and map columns hold JSON-encoded text; they are decoded into the
/// domain `GuildConfig` at the repository boundary.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guild_config")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub guild_id: String,
    pub code_name: String,
    pub prefix: String,
    /// JSON object mapping role code names to role ids.
    pub roles: String,
    /// JSON array of extension names.
    pub allowed_extensions: String,
    /// JSON array of extension names.
    pub disallowed_extensions: String,
    /// JSON array of extension names.
    pub hidden_extensions: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
