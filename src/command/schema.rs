//! Compiles declared handler parameters into Discord option descriptors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::config::ConfigError,
    model::command::{OptionDescriptor, OptionKind, Param, DEFAULT_DESCRIPTION},
};

/// Discord's naming rule for chat input commands and options.
static CHAT_INPUT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-_\p{L}\p{N}\p{sc=Devanagari}\p{sc=Thai}]{1,32}$")
        .expect("chat input name pattern is a valid regex")
});

/// Whether `name` is usable as a command or option name.
///
/// Must match the chat input pattern and must not be entirely uppercase.
pub fn is_valid_name(name: &str) -> bool {
    CHAT_INPUT_NAME.is_match(name) && !is_all_uppercase(name)
}

/// True when the name has cased characters and none of them are lowercase.
fn is_all_uppercase(name: &str) -> bool {
    name.chars().any(char::is_uppercase) && !name.chars().any(char::is_lowercase)
}

/// Builds one option descriptor per parameter, in declaration order.
///
/// Parameters without metadata become required string options with the placeholder
/// description. Fails on the first parameter whose name breaks the naming rule.
pub fn compile_options(command: &str, params: &[Param]) -> Result<Vec<OptionDescriptor>, ConfigError> {
    params
        .iter()
        .map(|param| {
            if !is_valid_name(&param.name) {
                return Err(ConfigError::InvalidParameterName {
                    command: command.to_string(),
                    parameter: param.name.clone(),
                });
            }

            let descriptor = match &param.option {
                None => OptionDescriptor {
                    name: param.name.clone(),
                    description: DEFAULT_DESCRIPTION.to_string(),
                    kind: OptionKind::String,
                    required: true,
                    choices: Vec::new(),
                    options: Vec::new(),
                },
                Some(option) => OptionDescriptor {
                    name: option.name.clone().unwrap_or_else(|| param.name.clone()),
                    description: option
                        .description
                        .clone()
                        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
                    kind: option.kind,
                    required: option.required,
                    choices: option.choices.clone(),
                    options: Vec::new(),
                },
            };

            if !is_valid_name(&descriptor.name) {
                return Err(ConfigError::InvalidParameterName {
                    command: command.to_string(),
                    parameter: descriptor.name,
                });
            }

            Ok(descriptor)
        })
        .collect()
}
