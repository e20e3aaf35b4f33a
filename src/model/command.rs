//! Command records and the option schemas sent to Discord.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Weak,
    },
};

use futures::future::BoxFuture;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serenity::all::{CommandId, Permissions};

use crate::{
    error::command::CommandError,
    model::{arguments::Arguments, platter::Platter},
};

/// Description used when a command or option does not set one.
pub const DEFAULT_DESCRIPTION: &str = "🪹 Oopsie daisy, looks like no description was set.";

/// Application command type for chat input (slash) commands.
pub const CHAT_INPUT: u8 = 1;

pub type HandlerFuture = BoxFuture<'static, Result<(), CommandError>>;
pub type Handler = Arc<dyn Fn(Arc<Platter>, Arguments) -> HandlerFuture + Send + Sync>;

/// Discord application command option type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OptionKind {
    SubCommand,
    SubCommandGroup,
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Number,
    Attachment,
}

impl OptionKind {
    pub fn is_sub_command(self) -> bool {
        matches!(self, Self::SubCommand | Self::SubCommandGroup)
    }
}

impl From<OptionKind> for u8 {
    fn from(kind: OptionKind) -> Self {
        match kind {
            OptionKind::SubCommand => 1,
            OptionKind::SubCommandGroup => 2,
            OptionKind::String => 3,
            OptionKind::Integer => 4,
            OptionKind::Boolean => 5,
            OptionKind::User => 6,
            OptionKind::Channel => 7,
            OptionKind::Role => 8,
            OptionKind::Mentionable => 9,
            OptionKind::Number => 10,
            OptionKind::Attachment => 11,
        }
    }
}

impl TryFrom<u8> for OptionKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::SubCommand,
            2 => Self::SubCommandGroup,
            3 => Self::String,
            4 => Self::Integer,
            5 => Self::Boolean,
            6 => Self::User,
            7 => Self::Channel,
            8 => Self::Role,
            9 => Self::Mentionable,
            10 => Self::Number,
            11 => Self::Attachment,
            other => return Err(format!("unknown application command option type {}", other)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub name: String,
    pub value: Value,
}

impl OptionChoice {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Platform-level description of one command option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDescriptor>,
}

/// Author-supplied metadata overriding the defaults of one parameter's option.
#[derive(Debug, Clone, PartialEq)]
pub struct SlashOption {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: OptionKind,
    pub required: bool,
    pub choices: Vec<OptionChoice>,
}

impl Default for SlashOption {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            kind: OptionKind::String,
            required: true,
            choices: Vec::new(),
        }
    }
}

impl SlashOption {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose the parameter to Discord under a different name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(mut self, kind: OptionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn choice(mut self, choice: OptionChoice) -> Self {
        self.choices.push(choice);
        self
    }
}

/// A declared handler parameter, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub option: Option<SlashOption>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            option: None,
        }
    }

    pub fn option(mut self, option: SlashOption) -> Self {
        self.option = Some(option);
        self
    }
}

/// Wire representation of an application command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub name: String,
    pub description: String,
    #[serde(rename = "type", default = "chat_input")]
    pub kind: u8,
    #[serde(default)]
    pub options: Vec<OptionDescriptor>,
    #[serde(default, deserialize_with = "permission_bits")]
    pub default_member_permissions: Option<String>,
}

/// An application command as Discord currently stores it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteCommand {
    pub id: CommandId,
    #[serde(flatten)]
    pub payload: CommandPayload,
}

fn chat_input() -> u8 {
    CHAT_INPUT
}

/// Accepts permission bits encoded as a string, a number or null.
fn permission_bits<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(bits)) => Some(bits),
        Some(Value::Number(bits)) => Some(bits.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Top-level chat input command, also invocable by prefix unless disabled.
    Slash,
    /// Child of a slash command.
    SubCommand,
    /// Message prefix command that is never synchronized to Discord.
    Prefix,
}

/// A registered command.
///
/// Built by `CommandBuilder`, which guarantees the schema is valid and that sub-commands
/// point back to their parent. The enabled and loaded flags are toggled at runtime.
pub struct CommandRecord {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) params: Vec<String>,
    pub(crate) schema: Vec<OptionDescriptor>,
    pub(crate) handler: Option<Handler>,
    pub(crate) required_roles: Vec<String>,
    pub(crate) hidden: bool,
    pub(crate) kind: CommandKind,
    pub(crate) allow_prefix: bool,
    pub(crate) extension: String,
    pub(crate) parent: Option<Weak<CommandRecord>>,
    pub(crate) children: Vec<Arc<CommandRecord>>,
    pub(crate) enabled: AtomicBool,
    pub(crate) loaded: AtomicBool,
}

impl CommandRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name including the parent's, e.g. `extensions disable`.
    pub fn full_name(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{} {}", parent.full_name(), self.name),
            None => self.name.clone(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Handler parameter names, aligned index-for-index with `schema`.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn schema(&self) -> &[OptionDescriptor] {
        &self.schema
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// Role code names of this command and its ancestors.
    pub fn required_roles(&self) -> Vec<String> {
        let mut roles = self
            .parent()
            .map(|parent| parent.required_roles())
            .unwrap_or_default();
        roles.extend(self.required_roles.iter().cloned());
        roles
    }

    /// Hidden commands are only visible to and usable by administrators.
    pub fn is_hidden(&self) -> bool {
        self.hidden || self.parent().is_some_and(|parent| parent.is_hidden())
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn allows_prefix(&self) -> bool {
        self.allow_prefix
    }

    /// Name of the extension that owns this command.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn parent(&self) -> Option<Arc<CommandRecord>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn children(&self) -> &[Arc<CommandRecord>] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<Arc<CommandRecord>> {
        self.children
            .iter()
            .find(|child| child.name == name)
            .cloned()
    }

    /// Enabled when neither this command nor any ancestor has been disabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
            && self.parent().is_none_or(|parent| parent.is_enabled())
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Marks this command and all of its sub-commands as loaded or unloaded.
    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.store(loaded, Ordering::SeqCst);
        for child in &self.children {
            child.set_loaded(loaded);
        }
    }

    /// Usage line shown in argument errors, e.g. `!weather {city}`.
    pub fn usage(&self, prefix: &str) -> String {
        let mut usage = format!("{}{}", prefix, self.full_name());
        for param in &self.params {
            usage.push_str(&format!(" {{{}}}", param));
        }
        usage
    }

    /// Payload synchronized to Discord for a top-level slash command.
    pub fn payload(&self) -> CommandPayload {
        CommandPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: CHAT_INPUT,
            options: self.schema.clone(),
            default_member_permissions: self
                .hidden
                .then(|| Permissions::ADMINISTRATOR.bits().to_string()),
        }
    }
}

impl fmt::Debug for CommandRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRecord")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("extension", &self.extension)
            .field("params", &self.params)
            .field("hidden", &self.hidden)
            .field("enabled", &self.enabled)
            .field("loaded", &self.loaded)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
