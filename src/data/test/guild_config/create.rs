use super::*;

/// Tests creating a config from the default template.
///
/// Verifies that the stored row round-trips back to an equal config.
///
/// Expected: Ok with the template values persisted
#[tokio::test]
async fn creates_template_config() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_guild_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let template = GuildConfig::template(GuildId::new(42), "home");

    let repo = GuildConfigRepository::new(db);
    let created = repo.create(&template).await?;

    assert_eq!(created, template);
    assert_eq!(repo.find_by_guild_id(42).await?, Some(template));

    Ok(())
}

/// Tests that a guild can only be created once.
///
/// Verifies that the unique guild_id constraint rejects a second insert.
///
/// Expected: Err on the second create
#[tokio::test]
async fn rejects_duplicate_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_guild_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let template = GuildConfig::template(GuildId::new(42), "home");
    let repo = GuildConfigRepository::new(db);
    repo.create(&template).await?;

    let result = repo.create(&template).await;

    assert!(result.is_err());

    Ok(())
}
