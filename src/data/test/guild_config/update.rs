use super::*;

/// Tests updating an existing config.
///
/// Verifies that prefix, roles and extension lists are overwritten.
///
/// Expected: Ok with the new values returned and persisted
#[tokio::test]
async fn updates_existing_config() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_guild_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_config::GuildConfigFactory::new(db)
        .guild_id("42")
        .build()
        .await?;

    let mut config = GuildConfig::template(GuildId::new(42), "renamed");
    config.prefix = "?".to_string();
    config.roles.insert("mod".to_string(), RoleId::new(7));
    config.disallowed_extensions.push("fun".to_string());

    let repo = GuildConfigRepository::new(db);
    let updated = repo.update(&config).await?;

    assert_eq!(updated, config);
    assert_eq!(repo.find_by_guild_id(42).await?, Some(config));

    Ok(())
}

/// Tests updating a guild with no stored config.
///
/// Expected: Err(DbErr::RecordNotFound)
#[tokio::test]
async fn fails_for_missing_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_guild_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildConfigRepository::new(db);
    let result = repo.update(&GuildConfig::template(GuildId::new(42), "home")).await;

    assert!(matches!(result, Err(DbErr::RecordNotFound(_))));

    Ok(())
}
