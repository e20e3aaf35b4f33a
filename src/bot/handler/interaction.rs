use serde_json::{json, Value};
use serenity::all::{
    CommandDataOption, CommandDataOptionValue, CommandInteraction, ComponentInteraction, Context,
    Interaction, Member, User,
};

use crate::{
    model::payload::{
        GatewayEvent, InteractionData, InteractionKind, InteractionPayload, MemberPayload,
        OptionValue, UserPayload,
    },
    bot::handler::log_dispatch_error,
    service::dispatch::Dispatcher,
};

/// Handle slash command and component interactions
pub async fn handle_interaction(dispatcher: &Dispatcher, _ctx: Context, interaction: Interaction) {
    let payload = match &interaction {
        Interaction::Command(command) => command_payload(command),
        Interaction::Component(component) => component_payload(component),
        _ => return,
    };
    let id = payload.id;

    if let Err(e) = dispatcher.dispatch(GatewayEvent::Interaction(payload)).await {
        log_dispatch_error(format_args!("interaction {}", id), &e);
    }
}

fn command_payload(command: &CommandInteraction) -> InteractionPayload {
    InteractionPayload {
        id: command.id,
        application_id: command.application_id,
        kind: InteractionKind::ApplicationCommand,
        token: command.token.clone(),
        guild_id: command.guild_id,
        channel_id: Some(command.channel_id),
        member: command.member.as_deref().map(member_payload),
        user: Some(user_payload(&command.user)),
        data: Some(InteractionData {
            name: Some(command.data.name.clone()),
            custom_id: None,
            options: command.data.options.iter().map(option_value).collect(),
        }),
    }
}

fn component_payload(component: &ComponentInteraction) -> InteractionPayload {
    InteractionPayload {
        id: component.id,
        application_id: component.application_id,
        kind: InteractionKind::MessageComponent,
        token: component.token.clone(),
        guild_id: component.guild_id,
        channel_id: Some(component.channel_id),
        member: component.member.as_ref().map(member_payload),
        user: Some(user_payload(&component.user)),
        data: Some(InteractionData {
            name: None,
            custom_id: Some(component.data.custom_id.clone()),
            options: Vec::new(),
        }),
    }
}

pub(super) fn user_payload(user: &User) -> UserPayload {
    UserPayload {
        id: user.id,
        username: user.name.clone(),
        bot: user.bot,
    }
}

fn member_payload(member: &Member) -> MemberPayload {
    MemberPayload {
        user: Some(user_payload(&member.user)),
        roles: member.roles.clone(),
        permissions: member.permissions.map(|p| p.bits().to_string()),
    }
}

fn option_value(option: &CommandDataOption) -> OptionValue {
    let (value, options) = match &option.value {
        CommandDataOptionValue::SubCommand(options)
        | CommandDataOptionValue::SubCommandGroup(options) => {
            (None, options.iter().map(option_value).collect())
        }
        other => (scalar(other), Vec::new()),
    };

    OptionValue {
        name: option.name.clone(),
        kind: u8::from(option.value.kind()),
        value,
        options,
    }
}

/// Converts a scalar option value to JSON. Snowflakes become strings.
fn scalar(value: &CommandDataOptionValue) -> Option<Value> {
    Some(match value {
        CommandDataOptionValue::Boolean(value) => json!(value),
        CommandDataOptionValue::Integer(value) => json!(value),
        CommandDataOptionValue::Number(value) => json!(value),
        CommandDataOptionValue::String(value) => json!(value),
        CommandDataOptionValue::Attachment(id) => json!(id.to_string()),
        CommandDataOptionValue::Channel(id) => json!(id.to_string()),
        CommandDataOptionValue::Mentionable(id) => json!(id.to_string()),
        CommandDataOptionValue::Role(id) => json!(id.to_string()),
        CommandDataOptionValue::User(id) => json!(id.to_string()),
        _ => return None,
    })
}
