//! Interactive message components and the recipes that handle them.
//!
//! A `Button` with an `on_press` handler becomes a `Recipe` when the message carrying
//! it is sent. The recipe is registered under the button's custom id together with the
//! platter of the invocation that sent it, so the handler can reach back to the
//! original invoker.

use std::{fmt, sync::Arc};

use futures::future::BoxFuture;
use rand::{distr::Alphanumeric, Rng};
use serenity::all::{ButtonStyle, CreateActionRow, CreateButton, ReactionType};

use crate::{error::command::CommandError, model::platter::Platter};

/// Discord allows at most five buttons in a single action row.
pub const MAX_BUTTONS_PER_ROW: usize = 5;

const CUSTOM_ID_LENGTH: usize = 24;

pub type RecipeFuture = BoxFuture<'static, Result<(), CommandError>>;

/// Called with the component interaction's platter and the platter that sent the component.
pub type RecipeHandler = Arc<dyn Fn(Arc<Platter>, Arc<Platter>) -> RecipeFuture + Send + Sync>;

pub struct Button {
    label: String,
    style: ButtonStyle,
    custom_id: Option<String>,
    url: Option<String>,
    emoji: Option<String>,
    author_only: bool,
    handler: Option<RecipeHandler>,
}

impl Button {
    pub fn new(style: ButtonStyle, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style,
            custom_id: None,
            url: None,
            emoji: None,
            author_only: true,
            handler: None,
        }
    }

    /// A button that opens a URL. Link buttons never produce a recipe.
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::new(ButtonStyle::Secondary, label)
        }
    }

    /// Use a fixed custom id instead of a random one.
    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    /// Whether only the author of the originating invocation may press the button.
    pub fn author_only(mut self, author_only: bool) -> Self {
        self.author_only = author_only;
        self
    }

    pub fn on_press<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Arc<Platter>, Arc<Platter>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(move |pressed, origin| {
            Box::pin(handler(pressed, origin))
        }));
        self
    }

    fn into_parts(self) -> (CreateButton, Option<Recipe>) {
        if let Some(url) = self.url {
            let mut button = CreateButton::new_link(url).label(self.label);
            if let Some(emoji) = self.emoji {
                button = button.emoji(ReactionType::Unicode(emoji));
            }
            return (button, None);
        }

        let custom_id = self.custom_id.unwrap_or_else(random_custom_id);
        let mut button = CreateButton::new(custom_id.clone())
            .label(self.label)
            .style(self.style);
        if let Some(emoji) = self.emoji {
            button = button.emoji(ReactionType::Unicode(emoji));
        }

        let recipe = self.handler.map(|handler| Recipe {
            custom_id,
            author_only: self.author_only,
            handler,
        });

        (button, recipe)
    }
}

#[derive(Default)]
pub struct ActionRow {
    buttons: Vec<Button>,
}

impl ActionRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a button to the row.
    ///
    /// Buttons past the fifth are dropped with a warning.
    pub fn button(mut self, button: Button) -> Self {
        if self.buttons.len() >= MAX_BUTTONS_PER_ROW {
            tracing::warn!(
                "Action row already holds {} buttons, dropping '{}'",
                MAX_BUTTONS_PER_ROW,
                button.label
            );
            return self;
        }
        self.buttons.push(button);
        self
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub(crate) fn into_parts(self) -> (CreateActionRow, Vec<Recipe>) {
        let mut recipes = Vec::new();
        let buttons = self
            .buttons
            .into_iter()
            .map(|button| {
                let (component, recipe) = button.into_parts();
                recipes.extend(recipe);
                component
            })
            .collect();

        (CreateActionRow::Buttons(buttons), recipes)
    }
}

/// Handler registered for a component custom id.
pub struct Recipe {
    custom_id: String,
    author_only: bool,
    handler: RecipeHandler,
}

impl Recipe {
    pub fn new(custom_id: impl Into<String>, author_only: bool, handler: RecipeHandler) -> Self {
        Self {
            custom_id: custom_id.into(),
            author_only,
            handler,
        }
    }

    pub fn custom_id(&self) -> &str {
        &self.custom_id
    }

    pub fn is_author_only(&self) -> bool {
        self.author_only
    }

    pub fn handler(&self) -> &RecipeHandler {
        &self.handler
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("custom_id", &self.custom_id)
            .field("author_only", &self.author_only)
            .finish_non_exhaustive()
    }
}

/// A recipe together with the platter of the invocation that sent its component.
pub struct BoundRecipe {
    pub recipe: Recipe,
    pub origin: Arc<Platter>,
}

/// Generates a random alphanumeric custom id for a component.
pub fn random_custom_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CUSTOM_ID_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_custom_ids_are_alphanumeric_and_distinct() {
        let first = random_custom_id();
        let second = random_custom_id();

        assert_eq!(first.len(), CUSTOM_ID_LENGTH);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }

    #[test]
    fn only_buttons_with_handlers_produce_recipes() {
        let row = ActionRow::new()
            .button(
                Button::new(ButtonStyle::Primary, "Press")
                    .custom_id("abc123")
                    .on_press(|_, _| async { Ok::<(), CommandError>(()) }),
            )
            .button(Button::new(ButtonStyle::Secondary, "Inert"))
            .button(Button::link("Docs", "https://example.com"));

        let (_, recipes) = row.into_parts();

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].custom_id(), "abc123");
        assert!(recipes[0].is_author_only());
    }

    #[test]
    fn action_row_holds_at_most_five_buttons() {
        let row = (0..7).fold(ActionRow::new(), |row, i| {
            row.button(Button::new(ButtonStyle::Primary, format!("b{}", i)))
        });

        assert_eq!(row.len(), MAX_BUTTONS_PER_ROW);
    }
}
