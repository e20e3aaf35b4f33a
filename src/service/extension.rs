//! Extension loading, unloading and reloading.
//!
//! An extension is a named group of commands. Loading compiles its commands and
//! registers them; unloading removes them from the registry but keeps the compiled
//! records so a reload does not need the extension to rebuild anything. Component
//! recipes sent by an unloaded extension's commands are dropped on unload.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    command::{
        builder::CommandBuilder,
        registry::{CommandRegistry, ComponentRegistry},
    },
    error::AppError,
    model::command::CommandRecord,
};

/// A named group of commands.
pub trait Extension: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Declares the extension's commands. Handlers may capture `self`.
    fn commands(self: Arc<Self>) -> Vec<CommandBuilder>;
}

struct LoadedExtension {
    commands: Vec<Arc<CommandRecord>>,
    loaded: bool,
}

#[derive(Clone)]
pub struct ExtensionService {
    commands: CommandRegistry,
    components: ComponentRegistry,
    ignored: Arc<Vec<String>>,
    extensions: Arc<RwLock<HashMap<String, LoadedExtension>>>,
}

impl ExtensionService {
    pub fn new(
        commands: CommandRegistry,
        components: ComponentRegistry,
        ignored: Vec<String>,
    ) -> Self {
        Self {
            commands,
            components,
            ignored: Arc::new(ignored),
            extensions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Compiles and registers the extension's commands.
    ///
    /// # Returns
    /// - `Ok(true)`: Extension loaded
    /// - `Ok(false)`: Extension is on the ignore list and was skipped
    /// - `Err(AppError::ConfigErr)`: A command failed to compile, nothing was registered
    pub async fn load(&self, extension: Arc<dyn Extension>) -> Result<bool, AppError> {
        let name = extension.name().to_string();

        if self.is_ignored(&name) {
            tracing::info!("Extension '{}' is ignored, not loading it", name);
            return Ok(false);
        }

        let commands = Arc::clone(&extension)
            .commands()
            .into_iter()
            .map(|builder| builder.build(&name))
            .collect::<Result<Vec<_>, _>>()?;

        self.register(&commands).await;
        tracing::info!(
            "Loaded extension '{}' with {} command(s)",
            name,
            commands.len()
        );

        self.extensions.write().await.insert(
            name,
            LoadedExtension {
                commands,
                loaded: true,
            },
        );
        Ok(true)
    }

    /// Removes the extension's commands from the registry.
    ///
    /// # Returns
    /// - `Ok(true)`: Extension was unloaded
    /// - `Ok(false)`: Extension was already unloaded
    /// - `Err(AppError::UnknownExtension)`: No extension with that name was loaded
    pub async fn unload(&self, name: &str) -> Result<bool, AppError> {
        let mut extensions = self.extensions.write().await;
        let (key, extension) = find_mut(&mut extensions, name)
            .ok_or_else(|| AppError::UnknownExtension(name.to_string()))?;

        if !extension.loaded {
            return Ok(false);
        }

        self.commands.remove_values(&extension.commands).await;
        for command in &extension.commands {
            command.set_loaded(false);
        }
        extension.loaded = false;

        let recipes = self
            .components
            .remove_where(|bound| {
                bound
                    .origin
                    .command()
                    .is_some_and(|command| command.extension().eq_ignore_ascii_case(key))
            })
            .await;

        tracing::info!("Unloaded extension '{}', dropped {} component recipe(s)", key, recipes);
        Ok(true)
    }

    /// Registers the commands of a previously unloaded extension again.
    ///
    /// # Returns
    /// - `Ok(true)`: Extension was reloaded
    /// - `Ok(false)`: Extension was already loaded
    /// - `Err(AppError::UnknownExtension)`: No extension with that name was loaded
    pub async fn reload(&self, name: &str) -> Result<bool, AppError> {
        let mut extensions = self.extensions.write().await;
        let (key, extension) = find_mut(&mut extensions, name)
            .ok_or_else(|| AppError::UnknownExtension(name.to_string()))?;

        if extension.loaded {
            return Ok(false);
        }

        self.register(&extension.commands).await;
        extension.loaded = true;

        tracing::info!("Reloaded extension '{}'", key);
        Ok(true)
    }

    /// Whether the named extension is loaded, or `None` if it was never loaded.
    pub async fn is_loaded(&self, name: &str) -> Option<bool> {
        self.extensions
            .read()
            .await
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, extension)| extension.loaded)
    }

    /// Names of all known extensions with their loaded state, sorted by name.
    pub async fn list(&self) -> Vec<(String, bool)> {
        let mut list: Vec<_> = self
            .extensions
            .read()
            .await
            .iter()
            .map(|(name, extension)| (name.clone(), extension.loaded))
            .collect();
        list.sort();
        list
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignored
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(name))
    }

    async fn register(&self, commands: &[Arc<CommandRecord>]) {
        for command in commands {
            command.set_loaded(true);
        }
        self.commands
            .register_all(
                commands
                    .iter()
                    .map(|command| (command.name().to_string(), Arc::clone(command))),
            )
            .await;
    }
}

/// Looks an extension up by name, ignoring ASCII case.
fn find_mut<'m>(
    extensions: &'m mut HashMap<String, LoadedExtension>,
    name: &str,
) -> Option<(&'m String, &'m mut LoadedExtension)> {
    extensions
        .iter_mut()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use serenity::all::ButtonStyle;
    use test_utils::gateway;

    use super::*;
    use crate::{
        discord::mock::MockDiscord,
        error::command::CommandError,
        model::{
            command::Param,
            component::{ActionRow, Button},
            message::Reply,
            payload::GatewayEvent,
            platter::{Platter, PlatterKind, PlatterSource},
        },
    };

    struct Weather;

    impl Extension for Weather {
        fn name(&self) -> &str {
            "Weather"
        }

        fn commands(self: Arc<Self>) -> Vec<CommandBuilder> {
            vec![
                CommandBuilder::slash("weather")
                    .param(Param::new("city"))
                    .handler(|_, _| async { Ok::<(), CommandError>(()) }),
                CommandBuilder::slash("forecast").handler(|_, _| async { Ok::<(), CommandError>(()) }),
            ]
        }
    }

    struct Broken;

    impl Extension for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        fn commands(self: Arc<Self>) -> Vec<CommandBuilder> {
            vec![
                CommandBuilder::slash("fine").handler(|_, _| async { Ok::<(), CommandError>(()) }),
                CommandBuilder::slash("bad")
                    .param(Param::new("NOPE"))
                    .handler(|_, _| async { Ok::<(), CommandError>(()) }),
            ]
        }
    }

    #[tokio::test]
    async fn load_registers_commands() {
        let registry = CommandRegistry::new();
        let service = ExtensionService::new(registry.clone(), ComponentRegistry::new(), Vec::new());

        assert!(service.load(Arc::new(Weather)).await.unwrap());

        let weather = registry.lookup("weather").await.unwrap();
        assert!(weather.is_loaded());
        assert_eq!(weather.extension(), "Weather");
        assert_eq!(registry.len().await, 2);
        assert_eq!(service.list().await, vec![("Weather".to_string(), true)]);
    }

    #[tokio::test]
    async fn ignored_extensions_are_skipped() {
        let registry = CommandRegistry::new();
        let service = ExtensionService::new(
            registry.clone(),
            ComponentRegistry::new(),
            vec!["weather".to_string()],
        );

        assert!(!service.load(Arc::new(Weather)).await.unwrap());

        assert!(registry.is_empty().await);
        assert_eq!(service.is_loaded("weather").await, None);
    }

    /// Tests that a compile error aborts the whole extension.
    ///
    /// Expected: Err(ConfigErr) and nothing registered
    #[tokio::test]
    async fn invalid_command_fails_whole_extension() {
        let registry = CommandRegistry::new();
        let service = ExtensionService::new(registry.clone(), ComponentRegistry::new(), Vec::new());

        let result = service.load(Arc::new(Broken)).await;

        assert!(matches!(result, Err(AppError::ConfigErr(_))));
        assert!(registry.lookup("fine").await.is_none());
    }

    /// Tests the unload/reload cycle.
    ///
    /// Verifies that unloaded commands cannot be looked up and come back unchanged on
    /// reload, and that repeating either step reports no change.
    ///
    /// Expected: lookups follow the loaded state
    #[tokio::test]
    async fn unload_and_reload_toggle_registration() {
        let registry = CommandRegistry::new();
        let service = ExtensionService::new(registry.clone(), ComponentRegistry::new(), Vec::new());
        service.load(Arc::new(Weather)).await.unwrap();
        let original = registry.lookup("weather").await.unwrap();

        assert!(service.unload("weather").await.unwrap());
        assert!(!service.unload("weather").await.unwrap());
        assert!(registry.lookup("weather").await.is_none());
        assert!(!original.is_loaded());

        assert!(service.reload("Weather").await.unwrap());
        assert!(!service.reload("Weather").await.unwrap());
        let reloaded = registry.lookup("weather").await.unwrap();
        assert!(Arc::ptr_eq(&original, &reloaded));
        assert!(reloaded.is_loaded());
    }

    #[tokio::test]
    async fn unknown_extension_is_an_error() {
        let service = ExtensionService::new(CommandRegistry::new(), ComponentRegistry::new(), Vec::new());

        assert!(matches!(
            service.unload("nope").await,
            Err(AppError::UnknownExtension(name)) if name == "nope"
        ));
    }

    async fn send_button(
        components: &ComponentRegistry,
        command: Option<Arc<CommandRecord>>,
        custom_id: &str,
    ) {
        let raw = gateway::message(1, 42, "!weather", false);
        let Ok(GatewayEvent::Message(message)) = GatewayEvent::from_raw("MESSAGE_CREATE", raw)
        else {
            panic!("expected a message");
        };
        let platter = Arc::new(
            Platter::new(
                PlatterKind::PrefixCommand,
                PlatterSource::Message(message),
                command,
                None,
                Arc::new(MockDiscord::new()),
                components.clone(),
            )
            .unwrap(),
        );
        let button = Button::new(ButtonStyle::Primary, "Press")
            .custom_id(custom_id)
            .on_press(|_, _| async { Ok::<(), CommandError>(()) });

        platter
            .send_message(Reply::text("pick").action_row(ActionRow::new().button(button)))
            .await
            .unwrap();
    }

    /// Tests that unloading drops the extension's component recipes.
    ///
    /// Expected: the recipe sent by `weather` is gone, an unrelated recipe stays
    #[tokio::test]
    async fn unload_drops_component_recipes() {
        let registry = CommandRegistry::new();
        let components = ComponentRegistry::new();
        let service = ExtensionService::new(registry.clone(), components.clone(), Vec::new());
        service.load(Arc::new(Weather)).await.unwrap();
        let weather = registry.lookup("weather").await.unwrap();

        send_button(&components, Some(weather), "abc123").await;
        send_button(&components, None, "other").await;
        assert_eq!(components.len().await, 2);

        service.unload("weather").await.unwrap();

        assert!(components.lookup("abc123").await.is_none());
        assert!(components.lookup("other").await.is_some());
    }
}
