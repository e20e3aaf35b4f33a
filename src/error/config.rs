use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// Check the documentation or `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but its value could not be parsed.
    #[error("Invalid value '{value}' for environment variable {name}: {reason}")]
    InvalidEnvVar {
        name: String,
        value: String,
        reason: String,
    },

    /// `ALLOWED_GUILDS` is empty.
    #[error("Please add your guild id to ALLOWED_GUILDS")]
    AllowedGuildsNotSpecified,

    /// A command parameter name does not satisfy Discord's chat input naming rules.
    #[error("The parameter used in the command '{command}' is NOT allowed >> {parameter}")]
    InvalidParameterName { command: String, parameter: String },

    /// A command name does not satisfy Discord's chat input naming rules.
    #[error("The command name '{0}' is NOT allowed")]
    InvalidCommandName(String),

    /// Two sub-commands of the same parent share a name.
    #[error("The command '{parent}' already has a sub command named '{name}'")]
    DuplicateSubCommand { parent: String, name: String },

    /// Sub-commands were nested deeper than one level.
    #[error("The sub command '{parent} {name}' cannot have sub commands of its own")]
    NestedSubCommand { parent: String, name: String },

    /// A command with sub-commands also declared parameters.
    #[error("The command '{0}' has sub commands and therefore cannot take parameters")]
    GroupWithParameters(String),

    /// A command without sub-commands has no handler to call.
    #[error("The command '{0}' has no handler")]
    MissingHandler(String),
}
