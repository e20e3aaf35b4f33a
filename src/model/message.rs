use std::time::Duration;

use serde::Serialize;
use serenity::all::{ChannelId, CreateActionRow, CreateEmbed, GuildId, MessageId};

use crate::model::component::{ActionRow, Recipe};

/// Embed colours shared by the framework's own replies.
pub mod colour {
    pub const AKI_ORANGE: u32 = 0xF4900C;
    pub const AKI_RED: u32 = 0xDD2E44;
    pub const RED: u32 = 0xFF0000;
    pub const LIME_GREEN: u32 = 0x77B255;
    pub const GREY: u32 = 0x99AAB5;
    pub const INVISIBLE: u32 = 0x2B2D31;
}

/// Outbound message as sent to Discord.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<CreateEmbed>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<CreateActionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageReference {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<GuildId>,
}

/// A message that has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
}

/// A reply assembled by a handler and sent through `Platter::send_message`.
#[derive(Default)]
pub struct Reply {
    content: Option<String>,
    embeds: Vec<CreateEmbed>,
    rows: Vec<ActionRow>,
    reference: bool,
    delete_after: Option<Duration>,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new().content(content)
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn action_row(mut self, row: ActionRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Reference the invoking message when replying to a prefix command.
    ///
    /// Has no effect on interaction replies.
    pub fn reference(mut self, reference: bool) -> Self {
        self.reference = reference;
        self
    }

    /// Delete the sent message after the given delay.
    pub fn delete_after(mut self, delay: Duration) -> Self {
        self.delete_after = Some(delay);
        self
    }

    pub(crate) fn references_origin(&self) -> bool {
        self.reference
    }

    pub(crate) fn deletion_delay(&self) -> Option<Duration> {
        self.delete_after
    }

    /// Splits the reply into its wire body and the component recipes it carries.
    pub(crate) fn into_parts(self) -> (MessageBody, Vec<Recipe>) {
        let mut recipes = Vec::new();
        let components = self
            .rows
            .into_iter()
            .map(|row| {
                let (component, row_recipes) = row.into_parts();
                recipes.extend(row_recipes);
                component
            })
            .collect();

        let body = MessageBody {
            content: self.content,
            embeds: self.embeds,
            components,
            message_reference: None,
        };

        (body, recipes)
    }
}
