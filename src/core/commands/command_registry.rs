// Static command table, built once at startup.
//
// Descriptors say which trigger maps to which handler variant; the handler
// set says which implementation serves each variant. Building the registry
// checks both, so a typo'd trigger or a variant nobody implemented stops the
// bot at startup instead of silently never firing.

use super::command_handler::CommandHandler;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerVariant {
    Ping,
    BotInformation,
    Level,
    Leaderboard,
}

impl fmt::Display for HandlerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandlerVariant::Ping => "Ping",
            HandlerVariant::BotInformation => "BotInformation",
            HandlerVariant::Level => "Level",
            HandlerVariant::Leaderboard => "Leaderboard",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub trigger: String,
    pub variant: HandlerVariant,
}

impl CommandDescriptor {
    pub fn new(trigger: impl Into<String>, variant: HandlerVariant) -> Self {
        Self {
            trigger: trigger.into(),
            variant,
        }
    }
}

/// The commands the bot ships with.
pub fn default_descriptors() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new("ping", HandlerVariant::Ping),
        CommandDescriptor::new("bot-information", HandlerVariant::BotInformation),
        CommandDescriptor::new("level", HandlerVariant::Level),
        CommandDescriptor::new("leaderboard", HandlerVariant::Leaderboard),
    ]
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Command trigger must not be empty")]
    EmptyTrigger,

    #[error("Command trigger {0:?} must not contain whitespace")]
    InvalidTrigger(String),

    #[error("No handler bound for {variant} (trigger {trigger:?})")]
    UnboundVariant {
        trigger: String,
        variant: HandlerVariant,
    },
}

pub struct RegisteredCommand {
    pub trigger: String,
    pub variant: HandlerVariant,
    pub handler: Arc<dyn CommandHandler>,
}

pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
}

impl CommandRegistry {
    pub fn build(
        descriptors: Vec<CommandDescriptor>,
        handlers: &HashMap<HandlerVariant, Arc<dyn CommandHandler>>,
    ) -> Result<Self, RegistryError> {
        let mut commands = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            if descriptor.trigger.is_empty() {
                return Err(RegistryError::EmptyTrigger);
            }
            if descriptor.trigger.chars().any(char::is_whitespace) {
                return Err(RegistryError::InvalidTrigger(descriptor.trigger));
            }
            let handler = handlers.get(&descriptor.variant).cloned().ok_or_else(|| {
                RegistryError::UnboundVariant {
                    trigger: descriptor.trigger.clone(),
                    variant: descriptor.variant,
                }
            })?;

            commands.push(RegisteredCommand {
                trigger: descriptor.trigger,
                variant: descriptor.variant,
                handler,
            });
        }

        Ok(Self { commands })
    }

    /// Every command whose trigger equals `token` exactly, in registration order.
    /// Duplicated triggers all match.
    pub fn lookup<'a>(&'a self, token: &'a str) -> impl Iterator<Item = &'a RegisteredCommand> {
        self.commands.iter().filter(move |c| c.trigger == token)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
