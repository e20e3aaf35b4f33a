use crate::{data::guild_config::GuildConfigRepository, model::guild::GuildConfig};
use sea_orm::DbErr;
use serenity::all::{GuildId, RoleId};
use test_utils::{builder::TestBuilder, factory};

mod create;
mod find_by_guild_id;
mod get_all;
mod update;
