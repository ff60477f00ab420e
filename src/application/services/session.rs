//! Bot session - lifecycle state machine and the polling event loop

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::application::control::{ControlCommand, RELOAD_ACK_TTL};
use crate::application::errors::{BotError, CommandError};
use crate::application::messaging::{Gate, MessageParser, OwnerGate};
use crate::application::services::CommandService;
use crate::domain::entities::{Content, Message, Reply};
use crate::domain::traits::{Gateway, Inbound};
use crate::infrastructure::config::Config;
use crate::plugins::PluginManager;

/// Queue depth between the poller and the dispatcher; the poller
/// blocks when the dispatcher falls this far behind
const EVENT_QUEUE_DEPTH: usize = 64;

/// Pause before polling again after a transient failure
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Lifecycle of one bot process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconfigured,
    Configured,
    PluginsLoading,
    Ready,
    LoggingOut,
    Stopped,
}

/// The runtime bot instance: gateway, config, commands and plugins
pub struct BotSession<G: Gateway> {
    gateway: Arc<G>,
    config: Config,
    parser: MessageParser,
    commands: CommandService,
    plugins: PluginManager,
    gate: OwnerGate,
    state: SessionState,
}

impl<G: Gateway + 'static> BotSession<G> {
    /// Configures the session and runs the fail-soft startup plugin
    /// pass: every plugin that loads stays loaded, the rest are
    /// reported in one aggregate error.
    pub fn new(config: Config, plugins: PluginManager, gateway: G) -> Self {
        let gate = OwnerGate::new(config.owner_id());
        let commands = CommandService::new(config.bot.prefix.clone(), gate.clone());
        let parser = MessageParser::new(config.bot.prefix.clone());

        let mut session = Self {
            gateway: Arc::new(gateway),
            config,
            parser,
            commands,
            plugins,
            gate,
            state: SessionState::Unconfigured,
        };
        session.set_state(SessionState::Configured);

        session.set_state(SessionState::PluginsLoading);
        match session.plugins.load_all(&mut session.commands) {
            Ok(count) => info!("Loaded {} plugin(s)", count),
            Err(e) => {
                error!("{}", e);
                info!("Loaded {} plugin(s); the rest were skipped", session.plugins.len());
            }
        }
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    /// Connects and processes inbound events until the owner exits or
    /// the gateway closes. Authentication failures propagate to the
    /// caller; transient poll failures are retried after a pause.
    pub async fn run(&mut self) -> Result<(), BotError> {
        let identity = self.gateway.connect().await?;
        self.set_state(SessionState::Ready);
        info!(
            "Connected as {} (@{}); awaiting commands",
            identity.name, identity.username
        );

        let (tx, mut rx) = mpsc::channel::<Inbound>(EVENT_QUEUE_DEPTH);
        let poll_gateway = Arc::clone(&self.gateway);
        let poller = tokio::spawn(async move {
            loop {
                match poll_gateway.poll().await {
                    Ok(batch) => {
                        for event in batch {
                            if tx.send(event).await.is_err() {
                                return;
                            }
                        }
                    }
                    Err(BotError::Closed) => {
                        debug!("Event stream closed");
                        return;
                    }
                    Err(e) if e.is_auth() => {
                        error!("Authentication rejected while polling: {}", e);
                        return;
                    }
                    Err(e) => {
                        warn!("Poll failed: {}; retrying in {:?}", e, POLL_RETRY_DELAY);
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                    }
                }
            }
        });

        while let Some(event) = rx.recv().await {
            if self.dispatch(event).await.is_break() {
                break;
            }
        }

        poller.abort();
        self.set_state(SessionState::LoggingOut);
        if let Err(e) = self.gateway.close().await {
            warn!("Gateway close failed: {}", e);
        }
        self.set_state(SessionState::Stopped);
        info!("Session stopped");
        Ok(())
    }

    /// One event through the pipeline: parse, control commands first,
    /// then the registry. Break stops the event loop.
    async fn dispatch(&mut self, event: Inbound) -> ControlFlow<()> {
        let message = self.parser.parse(event);
        match &message.content {
            Content::Command { name, .. } => {
                if let Some(control) = ControlCommand::resolve(name) {
                    return self.handle_control(control, &message).await;
                }
                match self.commands.handle(&message) {
                    Ok(Some(reply)) => self.send_reply(&message.chat_id, reply).await,
                    Ok(None) => {}
                    Err(e) => {
                        self.send_reply(&message.chat_id, Reply::text(format!("Error: {}", e)))
                            .await
                    }
                }
            }
            Content::Text(_) => {
                debug!("Ignoring non-command message in chat {}", message.chat_id)
            }
            Content::Empty => {}
        }
        ControlFlow::Continue(())
    }

    async fn handle_control(
        &mut self,
        control: ControlCommand,
        message: &Message,
    ) -> ControlFlow<()> {
        if control.requires_owner() && self.gate.check(message.sender.as_ref()).is_err() {
            let sender = message
                .sender
                .as_ref()
                .map(|u| u.display_name().to_string())
                .unwrap_or_else(|| "unknown sender".to_string());
            warn!("Refused control command '{}' from {}", control.name(), sender);
            self.send_reply(
                &message.chat_id,
                Reply::text(format!("Error: {}", CommandError::PermissionDenied)),
            )
            .await;
            return ControlFlow::Continue(());
        }

        match control {
            ControlCommand::Reload => {
                match self.plugins.reload_all(&mut self.commands) {
                    Ok(count) => {
                        info!("Reloaded {} plugin(s)", count);
                        self.send_reply(
                            &message.chat_id,
                            Reply::text(format!("Reloaded {} plugin(s).", count))
                                .delete_after(RELOAD_ACK_TTL),
                        )
                        .await;
                    }
                    Err(e) => warn!("Reload aborted: {}", e),
                }
                ControlFlow::Continue(())
            }
            ControlCommand::Exit => {
                info!("Owner requested logout");
                ControlFlow::Break(())
            }
            // Placeholder: help has no behavior yet
            ControlCommand::Help => ControlFlow::Continue(()),
        }
    }

    /// Sends a reply; a transient reply schedules its own deletion
    async fn send_reply(&self, chat_id: &str, reply: Reply) {
        match self.gateway.send_message(chat_id, &reply.text).await {
            Ok(message_id) => {
                if let Some(delay) = reply.delete_after {
                    let gateway = Arc::clone(&self.gateway);
                    let chat_id = chat_id.to_string();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        if let Err(e) = gateway.delete_message(&chat_id, &message_id).await {
                            warn!("Failed to delete transient message {}: {}", message_id, e);
                        }
                    });
                }
            }
            Err(e) => error!("Failed to send message: {}", e),
        }
    }

    fn set_state(&mut self, state: SessionState) {
        debug!("Session state: {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}
