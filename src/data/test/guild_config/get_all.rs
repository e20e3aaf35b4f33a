use super::*;

/// Tests listing every stored config.
///
/// Expected: Ok with one entry per stored guild
#[tokio::test]
async fn returns_all_configs() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_guild_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_guild_config(db).await?;
    factory::create_guild_config(db).await?;

    let repo = GuildConfigRepository::new(db);
    let configs = repo.get_all().await?;

    assert_eq!(configs.len(), 2);

    Ok(())
}
