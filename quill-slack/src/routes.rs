use std::sync::Arc;

use quill::extract;
use quill::wrap::{JsonBody, TokenCheck, Trace};
use quill::{App, Handler, Json, Rejection, Request};
use secrecy::SecretString;

use crate::config::{AppConfig, Environment};
use crate::error::BotError;
use crate::quotes::{Quote, QuoteSource, QuotesClient};
use crate::rest::{ClientError, RestClient};
use crate::slash::{Action, SlashCommand, SlashReply};
use crate::webhook::{Attachment, Notifier, Webhook, WebhookMessage};

pub const GREETING: &str = "quill-slack is up. Try /quote in Slack.";

/// The bot's behavior, independent of how requests reach it.
pub struct Bot {
    quotes: Arc<dyn QuoteSource>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Bot {
    pub fn new(quotes: impl QuoteSource) -> Self {
        Self {
            quotes: Arc::new(quotes),
            notifier: None,
        }
    }

    pub fn notifier(mut self, notifier: impl Notifier) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Wire up the real collaborators described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let client = RestClient::new(config.quotes_timeout())?;

        let quotes = QuotesClient::new(client.clone(), config.quotes.base_url.clone())
            .api_key(config.quotes.api_key.clone());
        let bot = Bot::new(quotes);

        Ok(match &config.slack.webhook_url {
            Some(url) => bot.notifier(Webhook::new(client, url.clone())),
            None => bot,
        })
    }

    pub async fn answer(&self, command: &SlashCommand) -> Result<SlashReply, BotError> {
        match Action::parse(command) {
            Action::Quote { category } => {
                let quote = self.quotes.quote_of_the_day(category.as_deref()).await?;
                Ok(SlashReply::in_channel(quote.render()))
            }
            Action::Share { category } => match self.post_quote(category.as_deref()).await {
                Ok(quote) => Ok(SlashReply::ephemeral(format!("Shared: {}", quote.render()))),
                Err(BotError::WebhookNotConfigured) => Ok(SlashReply::ephemeral(
                    "Sharing is not set up: no incoming webhook is configured.",
                )),
                Err(err) => Err(err),
            },
            Action::Unknown { command } => Ok(SlashReply::ephemeral(format!(
                "Unknown command `{command}`. Try `/quote [category]` or `/quote share [category]`."
            ))),
        }
    }

    /// Fetch a quote and post it to the webhook.
    pub async fn post_quote(&self, category: Option<&str>) -> Result<Quote, BotError> {
        let notifier = self.notifier.as_ref().ok_or(BotError::WebhookNotConfigured)?;

        let quote = self.quotes.quote_of_the_day(category).await?;
        notifier
            .notify(&WebhookMessage::attachment(Attachment::for_quote(&quote)))
            .await?;

        Ok(quote)
    }
}

/// Build the bot's routes and middleware.
pub fn app(bot: Bot, token: SecretString, environment: Environment) -> App {
    let bot = Arc::new(bot);
    let slack = move |req: Request| slash_command(Arc::clone(&bot), req);

    let app = App::new()
        .wrap(Trace)
        .wrap(JsonBody)
        .get("/", root)
        .post("/slack", slack.wrap(TokenCheck::new(token)));

    mount_dump(app, environment)
}

async fn root(_: Request) -> &'static str {
    GREETING
}

async fn slash_command(bot: Arc<Bot>, req: Request) -> Result<Json<SlashReply>, Rejection> {
    let command: SlashCommand = extract::form(&req)?;
    tracing::info!(
        command = %command.command,
        user = command.user_name.as_deref().unwrap_or("-"),
        channel = command.channel_name.as_deref().unwrap_or("-"),
        "slash command"
    );

    Ok(Json(bot.answer(&command).await?))
}

#[cfg(feature = "dump-route")]
fn mount_dump(app: App, environment: Environment) -> App {
    if !environment.is_development() {
        return app;
    }

    tracing::warn!("request dump route enabled at /dump/*");
    app.get("/dump/*", dump)
}

#[cfg(not(feature = "dump-route"))]
fn mount_dump(app: App, _: Environment) -> App {
    app
}

#[cfg(feature = "dump-route")]
async fn dump(req: Request) -> serde_json::Value {
    req.describe()
}
