//! Dashboard command - live view of the key collection
//!
//! A single event loop owns the screen. It redraws on every tick, reacts to
//! countdown expirations and prompt input, and collects outcomes of remote
//! operations, which run as separate tasks so several may be in flight at once.

pub mod commands;
pub mod notification;
pub mod render;

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cli::{clipboard, resolve_key_id};
use crate::config::AppConfig;
use crate::domain::{ApiKeyId, DomainError, KeyServiceClient, Notification};
use crate::infrastructure::api_key::KeyListController;

use commands::{DashboardCommand, HELP_TEXT};
use notification::NotificationBoard;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// What the loop does after handling a prompt line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    ShowHelp,
    Quit,
}

/// Run the dashboard until `quit`, end of input or Ctrl+C
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let controller = Arc::new(crate::create_controller(config)?);
    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Notification>();
    let mut board = NotificationBoard::new(config.dashboard.notification_ttl());
    let expiring_soon_ms = config.dashboard.expiring_soon_ms();

    info!("Starting dashboard against {}", config.service.base_url);

    if let Err(e) = controller.load_all().await {
        board.show(Notification::from(&e));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = interval(config.dashboard.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut show_help = false;
    let mut input_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            Some(id) = controller.next_expired() => {
                spawn_expiration(&controller, id, &notify_tx);
            }
            Some(notification) = notify_rx.recv() => {
                board.show(notification);
            }
            line = lines.next_line(), if input_open => {
                match read_input(line) {
                    Input::Line(line) => {
                        show_help = false;
                        match handle_line(&line, &controller, &notify_tx).await {
                            Flow::Continue => {}
                            Flow::ShowHelp => show_help = true,
                            Flow::Quit => break,
                        }
                    }
                    Input::Closed => {
                        debug!("Input closed, leaving dashboard");
                        break;
                    }
                    Input::Skipped(notification) => board.show(notification),
                    Input::Failed(notification) => {
                        input_open = false;
                        board.show(notification);
                    }
                }
            }
            _ = &mut shutdown => {
                debug!("Interrupted, leaving dashboard");
                break;
            }
        }

        let keys = controller.snapshot().await;
        let quota = controller.quota().await;
        let mut screen = String::from(CLEAR_SCREEN);
        screen.push_str(&render::render_dashboard(
            &keys,
            &quota,
            board.current(),
            expiring_soon_ms,
        ));
        if show_help {
            screen.push('\n');
            screen.push_str(HELP_TEXT);
            screen.push('\n');
        }
        screen.push_str("\n> ");

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(screen.as_bytes())?;
        stdout.flush()?;
    }

    println!();
    Ok(())
}

/// Outcome of reading one prompt line
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Line(String),
    /// End of input
    Closed,
    /// The line could not be read, later lines still can
    Skipped(Notification),
    /// Input is unusable; the dashboard keeps running without a prompt
    Failed(Notification),
}

fn read_input(result: io::Result<Option<String>>) -> Input {
    match result {
        Ok(Some(line)) => Input::Line(line),
        Ok(None) => Input::Closed,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            warn!("Discarding unreadable input line: {}", e);
            Input::Skipped(Notification::error("Input ignored: not valid UTF-8"))
        }
        Err(e) => {
            warn!("Failed to read input: {}", e);
            Input::Failed(Notification::error(format!(
                "Failed to read input: {}. Press Ctrl+C to leave.",
                e
            )))
        }
    }
}

async fn handle_line<C>(
    line: &str,
    controller: &Arc<KeyListController<C>>,
    notify_tx: &mpsc::UnboundedSender<Notification>,
) -> Flow
where
    C: KeyServiceClient + 'static,
{
    match commands::parse_line(line) {
        Ok(Some(command)) => execute(command, controller, notify_tx).await,
        Ok(None) => Flow::Continue,
        Err(message) => {
            let _ = notify_tx.send(Notification::error(message));
            Flow::Continue
        }
    }
}

/// Dispatch one command; remote operations report back through `notify_tx`
async fn execute<C>(
    command: DashboardCommand,
    controller: &Arc<KeyListController<C>>,
    notify_tx: &mpsc::UnboundedSender<Notification>,
) -> Flow
where
    C: KeyServiceClient + 'static,
{
    match command {
        DashboardCommand::Generate { name } => {
            let controller = Arc::clone(controller);
            spawn_operation(notify_tx, async move {
                let label = commands::label(&name);
                outcome(
                    controller.generate(label.as_deref()).await,
                    Notification::key_generated(),
                )
            });
        }
        DashboardCommand::Rename { id, name } => {
            let id = match resolve(controller, &id).await {
                Ok(id) => id,
                Err(e) => return report(notify_tx, Notification::from(&e)),
            };
            let controller = Arc::clone(controller);
            spawn_operation(notify_tx, async move {
                outcome(
                    controller.rename(&id, &name.join(" ")).await,
                    Notification::key_updated(),
                )
            });
        }
        DashboardCommand::Revoke { id } => {
            let id = match resolve(controller, &id).await {
                Ok(id) => id,
                Err(e) => return report(notify_tx, Notification::from(&e)),
            };
            let controller = Arc::clone(controller);
            spawn_operation(notify_tx, async move {
                outcome(controller.revoke(&id).await, Notification::key_revoked())
            });
        }
        DashboardCommand::Copy { id } => {
            let notification = match copy_secret(controller, &id).await {
                Ok(()) => Notification::key_copied(),
                Err(e) => Notification::from(&e),
            };
            return report(notify_tx, notification);
        }
        DashboardCommand::Reload => {
            let controller = Arc::clone(controller);
            spawn_operation(notify_tx, async move {
                outcome(
                    controller.load_all().await,
                    Notification::success("Keys reloaded."),
                )
            });
        }
        DashboardCommand::Help => return Flow::ShowHelp,
        DashboardCommand::Quit => return Flow::Quit,
    }

    Flow::Continue
}

fn spawn_expiration<C>(
    controller: &Arc<KeyListController<C>>,
    id: ApiKeyId,
    notify_tx: &mpsc::UnboundedSender<Notification>,
) where
    C: KeyServiceClient + 'static,
{
    let controller = Arc::clone(controller);
    let tx = notify_tx.clone();

    tokio::spawn(async move {
        match controller.expire_locally(&id).await {
            Ok(true) => {
                let _ = tx.send(Notification::key_expired());
            }
            Ok(false) => {}
            Err(e) => {
                warn!("Expired key '{}' could not be revoked: {}", id, e);
                let _ = tx.send(Notification::from(&e));
            }
        }
    });
}

fn spawn_operation<F>(notify_tx: &mpsc::UnboundedSender<Notification>, operation: F)
where
    F: Future<Output = Notification> + Send + 'static,
{
    let tx = notify_tx.clone();
    tokio::spawn(async move {
        let _ = tx.send(operation.await);
    });
}

fn outcome<T>(result: Result<T, DomainError>, success: Notification) -> Notification {
    match result {
        Ok(_) => success,
        Err(e) => Notification::from(&e),
    }
}

fn report(notify_tx: &mpsc::UnboundedSender<Notification>, notification: Notification) -> Flow {
    let _ = notify_tx.send(notification);
    Flow::Continue
}

async fn resolve<C: KeyServiceClient>(
    controller: &KeyListController<C>,
    input: &str,
) -> Result<ApiKeyId, DomainError> {
    resolve_key_id(input, &controller.snapshot().await)
}

async fn copy_secret<C: KeyServiceClient>(
    controller: &KeyListController<C>,
    input: &str,
) -> Result<(), DomainError> {
    let id = resolve(controller, input).await?;
    let secret = controller.copy_secret(&id).await?;

    // Best effort: a terminal that cannot take the sequence just ignores it
    if let Err(e) = clipboard::copy(&secret) {
        warn!("Failed to write clipboard sequence: {}", e);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
