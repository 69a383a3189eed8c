//! Classification of incoming bot updates.
//!
//! Every update is routed to exactly one handler: callback queries win over
//! messages, messages whose text starts with `/` are commands, any other
//! message is plain.

use crate::models::telegram::{CallbackQuery, Message, Update};

/// Callback data opening the root menu.
pub const ROOT_MENU_CALLBACK: &str = "menu:root";

const MENU_CALLBACK_PREFIX: &str = "menu:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    Command,
    CallbackQuery,
    Message,
    Ignored,
}

impl UpdateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateKind::Command => "command",
            UpdateKind::CallbackQuery => "callback_query",
            UpdateKind::Message => "message",
            UpdateKind::Ignored => "ignored",
        }
    }
}

pub fn classify(update: &Update) -> UpdateKind {
    if update.callback_query.is_some() {
        return UpdateKind::CallbackQuery;
    }
    match &update.message {
        Some(message) if is_command(message) => UpdateKind::Command,
        Some(_) => UpdateKind::Message,
        None => UpdateKind::Ignored,
    }
}

fn is_command(message: &Message) -> bool {
    message.text.as_deref().is_some_and(|t| t.starts_with('/'))
}

/// A parsed bot command such as `/start promo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: String,
}

/// Parses a command text. The name is lower-cased and stripped of a
/// `@botname` suffix.
pub fn parse_command(text: &str) -> Option<Command> {
    let body = text.trim().strip_prefix('/')?;
    let (head, args) = match body.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (body, ""),
    };
    let name = head.split('@').next().unwrap_or_default().to_lowercase();
    if name.is_empty() {
        return None;
    }
    Some(Command {
        name,
        args: args.to_string(),
    })
}

/// Action encoded in an inline button's callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    RootMenu,
    OpenButton(i64),
    Unknown(String),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Self {
        if data == ROOT_MENU_CALLBACK {
            return CallbackAction::RootMenu;
        }
        match data
            .strip_prefix(MENU_CALLBACK_PREFIX)
            .and_then(|id| id.parse::<i64>().ok())
        {
            Some(id) if id > 0 => CallbackAction::OpenButton(id),
            _ => CallbackAction::Unknown(data.to_string()),
        }
    }

    pub fn from_query(query: &CallbackQuery) -> Self {
        Self::parse(query.data.as_deref().unwrap_or_default())
    }
}

/// Callback data that opens a menu button.
pub fn menu_callback_data(button_id: i64) -> String {
    format!("{}{}", MENU_CALLBACK_PREFIX, button_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::telegram::{Chat, User};

    fn message(text: Option<&str>) -> Message {
        Message {
            message_id: 1,
            from: None,
            chat: Chat {
                id: 9,
                kind: "private".to_string(),
            },
            date: 0,
            text: text.map(str::to_string),
        }
    }

    fn update(message: Option<Message>, callback: bool) -> Update {
        Update {
            update_id: 1,
            message,
            callback_query: callback.then(|| CallbackQuery {
                id: "q".to_string(),
                from: User {
                    id: 9,
                    is_bot: false,
                    first_name: "A".to_string(),
                    last_name: None,
                    username: None,
                    language_code: None,
                },
                message: None,
                data: Some("menu:root".to_string()),
            }),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&update(Some(message(Some("/start"))), false)), UpdateKind::Command);
        assert_eq!(classify(&update(Some(message(Some("hello"))), false)), UpdateKind::Message);
        assert_eq!(classify(&update(Some(message(None)), false)), UpdateKind::Message);
        assert_eq!(classify(&update(None, true)), UpdateKind::CallbackQuery);
        assert_eq!(classify(&update(Some(message(Some("/x"))), true)), UpdateKind::CallbackQuery);
        assert_eq!(classify(&update(None, false)), UpdateKind::Ignored);
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("/Start@PromoBot  ref_42 "),
            Some(Command {
                name: "start".to_string(),
                args: "ref_42".to_string()
            })
        );
        assert_eq!(parse_command("/help").unwrap().args, "");
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/@bot"), None);
        assert_eq!(parse_command("start"), None);
    }

    #[test]
    fn test_callback_action() {
        assert_eq!(CallbackAction::parse("menu:root"), CallbackAction::RootMenu);
        assert_eq!(CallbackAction::parse("menu:12"), CallbackAction::OpenButton(12));
        assert_eq!(
            CallbackAction::parse("menu:-1"),
            CallbackAction::Unknown("menu:-1".to_string())
        );
        assert_eq!(
            CallbackAction::parse("like:3"),
            CallbackAction::Unknown("like:3".to_string())
        );
        assert_eq!(CallbackAction::parse(&menu_callback_data(5)), CallbackAction::OpenButton(5));
    }
}
