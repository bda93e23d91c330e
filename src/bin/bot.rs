use anyhow::Result;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::OnceLock;

use serenity_help::config::{BotConfig, HelpSettings};
use serenity_help::error::HelpError;
use serenity_help::help::{search_query, HelpCommand};
use serenity_help::listing::HttpListingSource;
use serenity_help::paginator::{ComponentPaginator, SlashInvocation};
use serenity_help::registry::ModuleRegistry;

/// Commands this bot exposes, grouped by the module that owns them.
mod modules {
    use serenity::builder::CreateApplicationCommand;
    use serenity::model::application::command::{CommandOptionType, CommandType};

    pub fn utility() -> Vec<CreateApplicationCommand> {
        vec![
            CreateApplicationCommand::default()
                .name("ping")
                .description("Test bot responsiveness")
                .to_owned(),
            CreateApplicationCommand::default()
                .name("forget")
                .description("Clear your conversation history with the bot")
                .to_owned(),
        ]
    }

    pub fn reminders() -> Vec<CreateApplicationCommand> {
        vec![CreateApplicationCommand::default()
            .name("remind")
            .description("Manage reminders")
            .create_option(|sub| {
                sub.name("set")
                    .description("Set a reminder")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|option| {
                        option
                            .name("time")
                            .description("When to remind you (e.g., 30m, 2h, 1d)")
                            .kind(CommandOptionType::String)
                            .required(true)
                    })
                    .create_sub_option(|option| {
                        option
                            .name("message")
                            .description("What to remind you about")
                            .kind(CommandOptionType::String)
                            .required(true)
                    })
            })
            .create_option(|sub| {
                sub.name("list")
                    .description("View your reminders")
                    .kind(CommandOptionType::SubCommand)
            })
            .to_owned()]
    }

    pub fn analysis() -> Vec<CreateApplicationCommand> {
        vec![
            CreateApplicationCommand::default()
                .name("Analyze Message")
                .kind(CommandType::Message)
                .to_owned(),
            CreateApplicationCommand::default()
                .name("Analyze User")
                .kind(CommandType::User)
                .to_owned(),
        ]
    }
}

struct Handler {
    settings: HelpSettings,
    registry: ModuleRegistry,
    guild_id: Option<GuildId>,
    help: OnceLock<HelpCommand<HttpListingSource, ComponentPaginator>>,
}

impl Handler {
    fn new(settings: HelpSettings, guild_id: Option<GuildId>) -> Self {
        let mut registry = ModuleRegistry::new();
        registry
            .register_builders("utility", &modules::utility())
            .register_builders("reminders", &modules::reminders())
            .register_builders("analysis", &modules::analysis());

        Handler {
            settings,
            registry,
            guild_id,
            help: OnceLock::new(),
        }
    }

    fn all_commands(&self, help: &HelpCommand<HttpListingSource, ComponentPaginator>) -> Vec<CreateApplicationCommand> {
        let mut commands = Vec::new();
        commands.extend(modules::utility());
        commands.extend(modules::reminders());
        commands.extend(modules::analysis());
        if let Some(definition) = help.definition() {
            commands.push(definition);
        }
        commands
    }

    async fn register_commands(&self, ctx: &Context, commands: Vec<CreateApplicationCommand>) -> Result<()> {
        match self.guild_id {
            Some(guild_id) => {
                guild_id
                    .set_application_commands(&ctx.http, |builder| {
                        for command in commands {
                            builder.add_application_command(command);
                        }
                        builder
                    })
                    .await?;
                info!("Commands registered for guild: {}", guild_id);
            }
            None => {
                Command::set_global_application_commands(&ctx.http, |builder| {
                    for command in commands {
                        builder.add_application_command(command);
                    }
                    builder
                })
                .await?;
                info!("Global commands registered");
            }
        }
        Ok(())
    }

    async fn handle_command(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        match command.data.name.as_str() {
            "help" => {
                let help = self
                    .help
                    .get()
                    .ok_or_else(|| anyhow::anyhow!("help requested before the bot was ready"))?;
                let search = search_query(&command.data.options);
                let target = SlashInvocation {
                    ctx: ctx.clone(),
                    command: command.clone(),
                };
                help.send_help(&target, search.as_deref(), None).await
            }
            "ping" => respond(ctx, command, "🏓 Pong!").await,
            other => respond(ctx, command, &format!("`{}` is documented here but not implemented.", other)).await,
        }
    }
}

async fn respond(ctx: &Context, command: &ApplicationCommandInteraction, content: &str) -> Result<()> {
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content))
        })
        .await?;
    Ok(())
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        let help = self.help.get_or_init(|| {
            HelpCommand::new(
                HttpListingSource::new(ctx.http.clone()),
                self.registry.clone(),
                ComponentPaginator,
                self.settings.clone(),
            )
        });

        let commands = self.all_commands(help);
        if let Err(e) = self.register_commands(&ctx, commands).await {
            error!("❌ Failed to register commands: {}", e);
        } else {
            info!("✅ Successfully registered {} modules", self.registry.modules().count());
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        // Component clicks on help pages are consumed by the paginator's collector
        if let Interaction::ApplicationCommand(command) = interaction {
            if let Err(e) = self.handle_command(&ctx, &command).await {
                error!("Error handling slash command '{}': {}", command.data.name, e);

                let error_message = match e.downcast_ref::<HelpError>() {
                    Some(HelpError::NoCommands) => "❌ This bot has no registered commands yet.",
                    _ => "❌ Sorry, I encountered an error processing your command. Please try again.",
                };

                if let Err(why) = respond(&ctx, &command, error_message).await {
                    warn!("Failed to send error message: {}", why);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = BotConfig::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level)).init();

    info!("Starting help bot...");

    let settings = HelpSettings::from_env()?;
    let handler = Handler::new(settings, config.guild_id.map(GuildId));

    let intents = GatewayIntents::non_privileged();
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {}", e);
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Connecting to Discord gateway...");
    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {:?}", why);
        return Err(anyhow::anyhow!("Failed to establish gateway connection: {}", why));
    }

    Ok(())
}
