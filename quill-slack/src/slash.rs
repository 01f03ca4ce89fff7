//! Slash command payloads and replies.

use serde::{Deserialize, Serialize};

/// The form Slack posts when a user runs a slash command.
///
/// Slack sends more fields than these (team and channel ids, trigger ids);
/// they are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct SlashCommand {
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub channel_name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Visible to everyone in the channel.
    InChannel,
    /// Visible only to the user who ran the command.
    Ephemeral,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlashReply {
    pub response_type: ResponseType,
    pub text: String,
}

impl SlashReply {
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::InChannel,
            text: text.into(),
        }
    }

    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
        }
    }
}

/// What a slash command asks the bot to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// `/quote [category]`
    Quote { category: Option<String> },
    /// `/quote share [category]`
    Share { category: Option<String> },
    Unknown { command: String },
}

impl Action {
    pub fn parse(command: &SlashCommand) -> Self {
        if command.command.trim() != "/quote" {
            return Action::Unknown {
                command: command.command.clone(),
            };
        }

        let text = command.text.trim();
        match text.split_once(char::is_whitespace) {
            Some(("share", rest)) => Action::Share {
                category: category(rest),
            },
            None if text == "share" => Action::Share { category: None },
            _ => Action::Quote {
                category: category(text),
            },
        }
    }
}

fn category(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}
