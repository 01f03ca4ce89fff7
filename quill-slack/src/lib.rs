//! A Slack slash-command bot that answers `/quote` with a quote of the day.
//!
//! The bot is a [`quill`] application: [`routes::app`] builds the routes and
//! middleware, and the binary serves them with [`quill_hyper::Server`].

pub mod config;
pub mod error;
pub mod logging;
pub mod quotes;
pub mod rest;
pub mod routes;
pub mod slash;
pub mod webhook;

pub use config::{AppConfig, Environment, LoadOptions};
pub use error::BotError;
pub use routes::{app, Bot};
