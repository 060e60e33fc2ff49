//! Application configuration stored as `config.json` in the data directory.
//!
//! Every section is optional; a missing file or section falls back to the
//! defaults below. `taskbell init` walks the user through the sections with
//! `dialoguer` prompts.

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Mail API token taken from the environment (or `.env`) instead of the file.
pub const MAIL_TOKEN_ENV: &str = "TASKBELL_MAIL_TOKEN";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ReminderConfig {
    /// Seconds between two periodic sweeps.
    pub interval_secs: u64,
    /// Release the reminded flag when delivery fails, so the next sweep retries.
    pub retry_on_failure: bool,
    /// Stop picking up new tasks once a sweep has run this long.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep_timeout_secs: Option<u64>,
    /// Characters of the description quoted in reminder mails.
    pub description_preview: usize,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            interval_secs: 300,
            retry_on_failure: false,
            sweep_timeout_secs: None,
            description_preview: 50,
        }
    }
}

impl ReminderConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn sweep_timeout(&self) -> Option<Duration> {
        self.sweep_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTransportKind {
    /// Write mails to the log instead of sending them.
    #[default]
    Log,
    /// POST mails as JSON to an HTTP mail relay.
    Http,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct MailConfig {
    pub transport: MailTransportKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct UserConfig {
    /// Acting user when `--user` is not given.
    pub username: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<ReminderConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<MailConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserConfig>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        DataStorage::new().get_path(CONFIG_FILE_NAME)
    }

    /// Loads the config file, or the defaults when there is none.
    pub fn read() -> Result<Config> {
        Self::read_from(&Self::path()?)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the config file. Returns whether there was one.
    pub fn delete() -> Result<bool> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    pub fn reminder_or_default(&self) -> ReminderConfig {
        self.reminder.clone().unwrap_or_default()
    }

    pub fn mail_or_default(&self) -> MailConfig {
        self.mail.clone().unwrap_or_default()
    }

    pub fn default_username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str()).filter(|u| !u.is_empty())
    }

    /// Interactive setup wizard, seeded with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        let modules = [
            ConfigModule {
                key: "reminder".to_string(),
                name: Message::ConfigModuleReminder.to_string(),
            },
            ConfigModule {
                key: "mail".to_string(),
                name: Message::ConfigModuleMail.to_string(),
            },
            ConfigModule {
                key: "user".to_string(),
                name: Message::ConfigModuleUser.to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&theme)
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "reminder" => {
                    let default = config.reminder_or_default();
                    msg_print!(Message::ConfigModuleReminder);
                    let interval_secs = Input::with_theme(&theme)
                        .with_prompt(Message::PromptReminderInterval.to_string())
                        .default(default.interval_secs)
                        .interact_text()?;
                    let retry_on_failure = Confirm::with_theme(&theme)
                        .with_prompt(Message::PromptRetryOnFailure.to_string())
                        .default(default.retry_on_failure)
                        .interact()?;
                    // 0 disables the timeout.
                    let sweep_timeout: u64 = Input::with_theme(&theme)
                        .with_prompt(Message::PromptSweepTimeout.to_string())
                        .default(default.sweep_timeout_secs.unwrap_or(0))
                        .interact_text()?;
                    let description_preview = Input::with_theme(&theme)
                        .with_prompt(Message::PromptDescriptionPreview.to_string())
                        .default(default.description_preview)
                        .interact_text()?;

                    config.reminder = Some(ReminderConfig {
                        interval_secs,
                        retry_on_failure,
                        sweep_timeout_secs: (sweep_timeout > 0).then_some(sweep_timeout),
                        description_preview,
                    });
                }
                "mail" => {
                    let default = config.mail_or_default();
                    msg_print!(Message::ConfigModuleMail);
                    let kinds = [MailTransportKind::Log, MailTransportKind::Http];
                    let transport = Select::with_theme(&theme)
                        .with_prompt(Message::PromptMailTransport.to_string())
                        .items(&["log", "http"])
                        .default(kinds.iter().position(|k| *k == default.transport).unwrap_or(0))
                        .interact()?;

                    let mut mail = MailConfig {
                        transport: kinds[transport],
                        ..default.clone()
                    };
                    if mail.transport == MailTransportKind::Http {
                        mail.api_url = Some(
                            Input::with_theme(&theme)
                                .with_prompt(Message::PromptMailApiUrl.to_string())
                                .default(default.api_url.unwrap_or_default())
                                .interact_text()?,
                        );
                        let token: String = Input::with_theme(&theme)
                            .with_prompt(Message::PromptMailApiToken.to_string())
                            .default(default.api_token.unwrap_or_default())
                            .allow_empty(true)
                            .interact_text()?;
                        mail.api_token = (!token.is_empty()).then_some(token);
                    }
                    let from: String = Input::with_theme(&theme)
                        .with_prompt(Message::PromptMailFromAddress.to_string())
                        .default(default.from_address.unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    mail.from_address = (!from.is_empty()).then_some(from);

                    config.mail = Some(mail);
                }
                "user" => {
                    msg_print!(Message::ConfigModuleUser);
                    let username = Input::with_theme(&theme)
                        .with_prompt(Message::PromptDefaultUser.to_string())
                        .default(config.default_username().unwrap_or_default().to_string())
                        .interact_text()?;
                    config.user = Some(UserConfig { username });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
