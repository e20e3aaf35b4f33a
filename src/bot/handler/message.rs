use serenity::all::{Context, Message, PartialMember};

use crate::{
    bot::handler::{interaction::user_payload, log_dispatch_error},
    model::payload::{GatewayEvent, MemberPayload, MessagePayload},
    service::dispatch::Dispatcher,
};

/// Handle message creation in a channel
pub async fn handle_message(dispatcher: &Dispatcher, _ctx: Context, message: Message) {
    let event = GatewayEvent::Message(message_payload(&message));

    if let Err(e) = dispatcher.dispatch(event).await {
        log_dispatch_error(format_args!("message {}", message.id), &e);
    }
}

fn message_payload(message: &Message) -> MessagePayload {
    MessagePayload {
        id: message.id,
        channel_id: message.channel_id,
        guild_id: message.guild_id,
        author: user_payload(&message.author),
        member: message.member.as_deref().map(member_payload),
        content: message.content.clone(),
    }
}

fn member_payload(member: &PartialMember) -> MemberPayload {
    MemberPayload {
        user: None,
        roles: member.roles.clone(),
        permissions: member.permissions.map(|p| p.bits().to_string()),
    }
}
