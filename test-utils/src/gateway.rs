//! Fixtures for raw gateway dispatch payloads.
//!
//! These functions build the `d` object of `INTERACTION_CREATE` and `MESSAGE_CREATE`
//! dispatches as JSON, simulating what Discord's gateway delivers. Snowflakes are
//! encoded as strings, as they are on the wire.
//!
//! ```rust,ignore
//! use test_utils::gateway;
//!
//! let data = gateway::command_interaction(1, 42, "weather", serde_json::json!([
//!     gateway::option("city", 3, "Paris"),
//! ]));
//! let event = GatewayEvent::from_raw("INTERACTION_CREATE", data)?;
//! ```

use serde_json::{json, Value};

/// Interaction type for slash commands.
pub const APPLICATION_COMMAND: u8 = 2;
/// Interaction type for message component presses.
pub const MESSAGE_COMPONENT: u8 = 3;

/// Builds a user object.
pub fn user(user_id: u64, username: &str, bot: bool) -> Value {
    json!({
        "id": user_id.to_string(),
        "username": username,
        "bot": bot,
    })
}

/// Builds a guild member object with no roles and no permissions.
pub fn member(user_id: u64) -> Value {
    json!({
        "user": user(user_id, &format!("user{}", user_id), false),
        "roles": [],
        "permissions": "0",
    })
}

/// Builds a slash command interaction invoked in a guild.
///
/// # Arguments
/// - `guild_id` - Guild the command was invoked in
/// - `user_id` - Invoking member
/// - `name` - Top-level command name
/// - `options` - JSON array of resolved options (see `option` and `sub_command`)
pub fn command_interaction(guild_id: u64, user_id: u64, name: &str, options: Value) -> Value {
    json!({
        "id": "900000000000000001",
        "application_id": "800000000000000001",
        "type": APPLICATION_COMMAND,
        "token": "interaction-token",
        "guild_id": guild_id.to_string(),
        "channel_id": "700000000000000001",
        "member": member(user_id),
        "data": {
            "id": "600000000000000001",
            "name": name,
            "type": 1,
            "options": options,
        },
    })
}

/// Builds a message component interaction (button press) invoked in a guild.
pub fn component_interaction(guild_id: u64, user_id: u64, custom_id: &str) -> Value {
    json!({
        "id": "900000000000000002",
        "application_id": "800000000000000001",
        "type": MESSAGE_COMPONENT,
        "token": "component-token",
        "guild_id": guild_id.to_string(),
        "channel_id": "700000000000000001",
        "member": member(user_id),
        "data": {
            "custom_id": custom_id,
            "component_type": 2,
        },
    })
}

/// Builds a resolved option value.
pub fn option(name: &str, kind: u8, value: impl Into<Value>) -> Value {
    json!({
        "name": name,
        "type": kind,
        "value": value.into(),
    })
}

/// Builds a sub-command option carrying its own nested options.
pub fn sub_command(name: &str, options: Value) -> Value {
    json!({
        "name": name,
        "type": 1,
        "options": options,
    })
}

/// Builds a guild text message.
///
/// # Arguments
/// - `guild_id` - Guild the message was posted in
/// - `user_id` - Author of the message
/// - `content` - Raw message text, prefix included
/// - `bot` - Whether the author is a bot account
pub fn message(guild_id: u64, user_id: u64, content: &str, bot: bool) -> Value {
    json!({
        "id": "500000000000000001",
        "channel_id": "700000000000000001",
        "guild_id": guild_id.to_string(),
        "author": user(user_id, &format!("user{}", user_id), bot),
        "member": { "roles": [] },
        "content": content,
    })
}

/// Replaces the member roles of an interaction or message payload.
pub fn with_roles(mut payload: Value, roles: &[u64]) -> Value {
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    payload["member"]["roles"] = json!(roles);
    payload
}

/// Replaces the member permission bits of an interaction payload.
pub fn with_permissions(mut payload: Value, permissions: u64) -> Value {
    payload["member"]["permissions"] = json!(permissions.to_string());
    payload
}
