//! Declarative construction of command records.
//!
//! ```rust,ignore
//! let weather = CommandBuilder::slash("weather")
//!     .description("Shows the weather for a city")
//!     .param(Param::new("city"))
//!     .handler(|platter, args| async move {
//!         let city = args.get_str("city").unwrap_or_default().to_string();
//!         platter.send_message(Reply::text(format!("It's sunny in {}", city))).await?;
//!         Ok(())
//!     })
//!     .build("weather")?;
//! ```

use std::{
    collections::HashSet,
    future::Future,
    sync::{atomic::AtomicBool, Arc, Weak},
};

use crate::{
    command::schema::{compile_options, is_valid_name},
    error::{command::CommandError, config::ConfigError},
    model::{
        arguments::Arguments,
        command::{
            CommandKind, CommandRecord, Handler, OptionDescriptor, OptionKind, Param,
            DEFAULT_DESCRIPTION,
        },
        platter::Platter,
    },
};

pub struct CommandBuilder {
    name: String,
    description: Option<String>,
    params: Vec<Param>,
    required_roles: Vec<String>,
    hidden: bool,
    kind: CommandKind,
    allow_prefix: bool,
    handler: Option<Handler>,
    sub_commands: Vec<CommandBuilder>,
}

/// Validated builder contents, ready to be assembled into linked records.
struct Prepared {
    name: String,
    description: String,
    params: Vec<String>,
    schema: Vec<OptionDescriptor>,
    required_roles: Vec<String>,
    hidden: bool,
    kind: CommandKind,
    allow_prefix: bool,
    handler: Option<Handler>,
    sub_commands: Vec<Prepared>,
}

impl CommandBuilder {
    fn new(name: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            params: Vec::new(),
            required_roles: Vec::new(),
            hidden: false,
            kind,
            allow_prefix: true,
            handler: None,
            sub_commands: Vec::new(),
        }
    }

    /// A slash command that can also be invoked with the guild's prefix.
    pub fn slash(name: impl Into<String>) -> Self {
        Self::new(name, CommandKind::Slash)
    }

    /// A message command that is never registered with Discord.
    pub fn prefix(name: impl Into<String>) -> Self {
        Self::new(name, CommandKind::Prefix)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Require the invoker to hold this role. Holding any one required role is enough.
    ///
    /// Accepts a role code name from the guild config or a raw role id.
    pub fn required_role(mut self, role: impl Into<String>) -> Self {
        self.required_roles.push(role.into());
        self
    }

    /// Hide the command from non-administrators.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Whether the command may be invoked through a message prefix. Defaults to true.
    pub fn allow_prefix(mut self, allow_prefix: bool) -> Self {
        self.allow_prefix = allow_prefix;
        self
    }

    pub fn handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Arc<Platter>, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(move |platter, arguments| {
            Box::pin(handler(platter, arguments))
        }));
        self
    }

    pub fn sub_command(mut self, sub_command: CommandBuilder) -> Self {
        self.sub_commands.push(sub_command);
        self
    }

    /// Validates the command and builds it as part of `extension`.
    ///
    /// Sub-commands are built alongside their parent and hold a weak reference back to
    /// it. Fails without producing anything if any name or parameter is invalid.
    pub fn build(self, extension: &str) -> Result<Arc<CommandRecord>, ConfigError> {
        let prepared = self.prepare(None)?;
        Ok(assemble(prepared, extension, None))
    }

    fn prepare(self, parent: Option<&str>) -> Result<Prepared, ConfigError> {
        if !is_valid_name(&self.name) {
            return Err(ConfigError::InvalidCommandName(self.name));
        }

        let full_name = match parent {
            Some(parent) => format!("{} {}", parent, self.name),
            None => self.name.clone(),
        };

        if let Some(parent) = parent.filter(|_| !self.sub_commands.is_empty()) {
            return Err(ConfigError::NestedSubCommand {
                parent: parent.to_string(),
                name: self.name,
            });
        }

        let kind = if parent.is_some() {
            CommandKind::SubCommand
        } else {
            self.kind
        };

        if self.sub_commands.is_empty() {
            if self.handler.is_none() {
                return Err(ConfigError::MissingHandler(full_name));
            }

            let schema = compile_options(&full_name, &self.params)?;
            return Ok(Prepared {
                name: self.name,
                description: self
                    .description
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
                params: self.params.into_iter().map(|param| param.name).collect(),
                schema,
                required_roles: self.required_roles,
                hidden: self.hidden,
                kind,
                allow_prefix: self.allow_prefix,
                handler: self.handler,
                sub_commands: Vec::new(),
            });
        }

        if !self.params.is_empty() {
            return Err(ConfigError::GroupWithParameters(full_name));
        }

        let mut seen = HashSet::new();
        let mut sub_commands = Vec::with_capacity(self.sub_commands.len());
        for sub_command in self.sub_commands {
            if !seen.insert(sub_command.name.clone()) {
                return Err(ConfigError::DuplicateSubCommand {
                    parent: full_name,
                    name: sub_command.name,
                });
            }
            sub_commands.push(sub_command.prepare(Some(&full_name))?);
        }

        let schema = sub_commands
            .iter()
            .map(|sub_command| OptionDescriptor {
                name: sub_command.name.clone(),
                description: sub_command.description.clone(),
                kind: OptionKind::SubCommand,
                required: false,
                choices: Vec::new(),
                options: sub_command.schema.clone(),
            })
            .collect();

        Ok(Prepared {
            name: self.name,
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            params: Vec::new(),
            schema,
            required_roles: self.required_roles,
            hidden: self.hidden,
            kind,
            allow_prefix: self.allow_prefix,
            handler: self.handler,
            sub_commands,
        })
    }
}

fn assemble(
    prepared: Prepared,
    extension: &str,
    parent: Option<Weak<CommandRecord>>,
) -> Arc<CommandRecord> {
    Arc::new_cyclic(|this| {
        let children = prepared
            .sub_commands
            .into_iter()
            .map(|sub_command| assemble(sub_command, extension, Some(this.clone())))
            .collect();

        CommandRecord {
            name: prepared.name,
            description: prepared.description,
            params: prepared.params,
            schema: prepared.schema,
            handler: prepared.handler,
            required_roles: prepared.required_roles,
            hidden: prepared.hidden,
            kind: prepared.kind,
            allow_prefix: prepared.allow_prefix,
            extension: extension.to_string(),
            parent,
            children,
            enabled: AtomicBool::new(true),
            loaded: AtomicBool::new(false),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> CommandBuilder {
        CommandBuilder::slash(name).handler(|_, _| async { Ok::<(), CommandError>(()) })
    }

    #[test]
    fn builds_leaf_command_with_defaults() {
        let record = noop("weather")
            .param(Param::new("city"))
            .build("weather_ext")
            .unwrap();

        assert_eq!(record.name(), "weather");
        assert_eq!(record.description(), DEFAULT_DESCRIPTION);
        assert_eq!(record.params(), ["city".to_string()]);
        assert_eq!(record.schema()[0].kind, OptionKind::String);
        assert_eq!(record.extension(), "weather_ext");
        assert_eq!(record.kind(), CommandKind::Slash);
        assert!(record.allows_prefix());
        assert!(record.is_enabled());
        assert!(!record.is_loaded());
        assert!(record.parent().is_none());
    }

    #[test]
    fn sub_commands_link_back_to_parent() {
        let record = CommandBuilder::slash("extensions")
            .sub_command(noop("enable").param(Param::new("extension")))
            .sub_command(noop("disable").param(Param::new("extension")))
            .build("extensions")
            .unwrap();

        let disable = record.child("disable").unwrap();
        assert_eq!(disable.kind(), CommandKind::SubCommand);
        assert_eq!(disable.parent().unwrap().name(), "extensions");
        assert_eq!(disable.full_name(), "extensions disable");
        assert_eq!(record.schema().len(), 2);
        assert_eq!(record.schema()[1].kind, OptionKind::SubCommand);
        assert_eq!(record.schema()[1].options[0].name, "extension");
    }

    #[test]
    fn disabling_parent_disables_children() {
        let record = CommandBuilder::slash("extensions")
            .sub_command(noop("enable"))
            .build("extensions")
            .unwrap();
        let enable = record.child("enable").unwrap();

        record.disable();

        assert!(!enable.is_enabled());
        record.enable();
        assert!(enable.is_enabled());
    }

    #[test]
    fn hidden_command_payload_requires_administrator() {
        let record = noop("purge").hidden(true).build("admin").unwrap();

        assert_eq!(record.payload().default_member_permissions.as_deref(), Some("8"));
        assert_eq!(noop("ping").build("fun").unwrap().payload().default_member_permissions, None);
    }

    #[test]
    fn usage_lists_parameters_in_order() {
        let record = noop("nuke")
            .param(Param::new("city"))
            .param(Param::new("yield"))
            .build("fun")
            .unwrap();

        assert_eq!(record.usage("!"), "!nuke {city} {yield}");
    }

    #[test]
    fn rejects_invalid_definitions() {
        assert!(matches!(
            noop("Bad Name").build("x"),
            Err(ConfigError::InvalidCommandName(_))
        ));
        assert!(matches!(
            CommandBuilder::slash("nohandler").build("x"),
            Err(ConfigError::MissingHandler(_))
        ));
        assert!(matches!(
            CommandBuilder::slash("group")
                .param(Param::new("city"))
                .sub_command(noop("child"))
                .build("x"),
            Err(ConfigError::GroupWithParameters(_))
        ));
        assert!(matches!(
            CommandBuilder::slash("group")
                .sub_command(noop("child"))
                .sub_command(noop("child"))
                .build("x"),
            Err(ConfigError::DuplicateSubCommand { .. })
        ));
        assert!(matches!(
            CommandBuilder::slash("group")
                .sub_command(CommandBuilder::slash("child").sub_command(noop("leaf")))
                .build("x"),
            Err(ConfigError::NestedSubCommand { .. })
        ));
    }
}
