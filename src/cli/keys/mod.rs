//! One-shot key commands
//!
//! Each command loads the collection, settles keys that expired while nobody was
//! watching, performs one operation and prints its outcome.

use clap::Args;
use tracing::warn;

use crate::cli::dashboard::render;
use crate::cli::{clipboard, resolve_key_id, KeyArgs};
use crate::config::AppConfig;
use crate::domain::{Notification, NotificationKind};
use crate::infrastructure::api_key::{HttpKeyServiceClient, KeyListController};

type Controller = KeyListController<HttpKeyServiceClient>;

/// Arguments for the list command
#[derive(Args, Clone)]
pub struct ListArgs {
    /// Print keys as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the generate command
#[derive(Args, Clone)]
pub struct GenerateArgs {
    /// Label for the new key (defaults to "API Key N")
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for the rename command
#[derive(Args, Clone)]
pub struct RenameArgs {
    /// Key id, or a unique prefix of it
    pub id: String,

    /// New label
    #[arg(trailing_var_arg = true, required = true)]
    pub name: Vec<String>,
}

pub async fn list(config: &AppConfig, args: ListArgs) -> anyhow::Result<()> {
    let controller = load(config).await?;
    let keys = controller.snapshot().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&keys)?);
        return Ok(());
    }

    let quota = controller.quota().await;
    println!("{}", render::render_quota(keys.len(), &quota));
    if keys.is_empty() {
        println!("No Active API Keys");
    }
    for view in &keys {
        println!();
        print!("{}", render::render_key(view, config.dashboard.expiring_soon_ms()));
        println!("  {}", render::render_expiry_date(&view.key));
    }

    Ok(())
}

pub async fn generate(config: &AppConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let controller = load(config).await?;

    let key = controller.generate(args.name.as_deref()).await?;

    report(&Notification::key_generated());
    println!("{}  {}  {}", key.id(), key.display_name(), key.secret());
    Ok(())
}

pub async fn rename(config: &AppConfig, args: RenameArgs) -> anyhow::Result<()> {
    let controller = load(config).await?;
    let id = resolve_key_id(&args.id, &controller.snapshot().await)?;

    controller.rename(&id, &args.name.join(" ")).await?;

    report(&Notification::key_updated());
    Ok(())
}

pub async fn revoke(config: &AppConfig, args: KeyArgs) -> anyhow::Result<()> {
    let controller = load(config).await?;
    let id = resolve_key_id(&args.id, &controller.snapshot().await)?;

    controller.revoke(&id).await?;

    report(&Notification::key_revoked());
    Ok(())
}

pub async fn copy(config: &AppConfig, args: KeyArgs) -> anyhow::Result<()> {
    let controller = load(config).await?;
    let id = resolve_key_id(&args.id, &controller.snapshot().await)?;

    let secret = controller.copy_secret(&id).await?;
    clipboard::copy(&secret)?;

    eprintln!("{}", render::render_notification(&Notification::key_copied()));
    Ok(())
}

pub async fn config(config: &AppConfig) -> anyhow::Result<()> {
    let controller = load(config).await?;
    let quota = controller.quota().await;
    let live = controller.len().await;

    println!("Service:         {}", config.service.base_url);
    println!("Max active keys: {}", quota.max_keys);
    println!("Key lifetime:    {} days", quota.expiration_days);
    println!("{}", render::render_quota(live, &quota));
    println!("Keys remaining:  {}", quota.remaining(live));
    Ok(())
}

/// Build the controller, load the collection and settle expired keys
async fn load(config: &AppConfig) -> anyhow::Result<Controller> {
    let controller = crate::create_controller(config)?;
    controller.load_all().await?;

    for id in controller.take_expired().await {
        match controller.expire_locally(&id).await {
            Ok(true) => report(&Notification::key_expired()),
            Ok(false) => {}
            Err(e) => {
                warn!("Expired key '{}' could not be revoked: {}", id, e);
                report(&Notification::from(&e));
            }
        }
    }

    Ok(controller)
}

fn report(notification: &Notification) {
    match notification.kind {
        NotificationKind::Success => println!("{}", render::render_notification(notification)),
        NotificationKind::Error => eprintln!("{}", render::render_notification(notification)),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Command};

    #[test]
    fn test_rename_joins_trailing_words() {
        let cli = Cli::try_parse_from(["keydash", "rename", "3f1c", "Staging", "CI"]).unwrap();

        match cli.command {
            Some(Command::Rename(args)) => {
                assert_eq!(args.id, "3f1c");
                assert_eq!(args.name.join(" "), "Staging CI");
            }
            _ => panic!("expected rename command"),
        }
    }

    #[test]
    fn test_rename_requires_a_name() {
        assert!(Cli::try_parse_from(["keydash", "rename", "3f1c"]).is_err());
    }

    #[test]
    fn test_generate_and_list_flags() {
        let cli = Cli::try_parse_from(["keydash", "generate", "--name", "Production"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Generate(ref args)) if args.name.as_deref() == Some("Production")
        ));

        let cli = Cli::try_parse_from(["keydash", "list", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Command::List(ref args)) if args.json));
    }
}
