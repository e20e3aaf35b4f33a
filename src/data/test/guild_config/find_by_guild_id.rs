use super::*;

/// Tests finding a stored guild config.
///
/// Verifies that the repository decodes the role map and the extension lists
/// stored as JSON text.
///
/// Expected: Ok(Some) with roles and extensions decoded
#[tokio::test]
async fn finds_existing_guild_config() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_guild_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_config::GuildConfigFactory::new(db)
        .guild_id("123456789")
        .code_name("home")
        .role("bot_dev", "555")
        .hidden_extension("admin")
        .build()
        .await?;

    let repo = GuildConfigRepository::new(db);
    let config = repo.find_by_guild_id(123456789).await?.unwrap();

    assert_eq!(config.guild_id, GuildId::new(123456789));
    assert_eq!(config.code_name, "home");
    assert_eq!(config.prefix, "!");
    assert_eq!(config.roles.get("bot_dev"), Some(&RoleId::new(555)));
    assert_eq!(config.hidden_extensions, vec!["admin".to_string()]);
    assert!(config.allowed_extensions.is_empty());

    Ok(())
}

/// Tests finding a guild that was never set up.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_guild_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_guild_config(db).await?;

    let repo = GuildConfigRepository::new(db);
    let result = repo.find_by_guild_id(999).await?;

    assert!(result.is_none());

    Ok(())
}
