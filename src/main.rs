use clap::Parser;
use keydash::cli::{self, dashboard, keys, Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap(cli.base_url.as_deref());

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => dashboard::run(&config).await,
        Command::List(args) => keys::list(&config, args).await,
        Command::Generate(args) => keys::generate(&config, args).await,
        Command::Rename(args) => keys::rename(&config, args).await,
        Command::Revoke(args) => keys::revoke(&config, args).await,
        Command::Copy(args) => keys::copy(&config, args).await,
        Command::Config => keys::config(&config).await,
    }
}
