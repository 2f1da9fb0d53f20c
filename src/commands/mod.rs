pub mod backup;
pub mod init;
pub mod migrations;
pub mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the web server")]
    Serve(serve::ServeArgs),
    #[command(about = "Write the configuration file and create the database")]
    Init(init::InitArgs),
    #[command(about = "Back up or restore the database from Google Drive", arg_required_else_help = true)]
    Backup(backup::BackupArgs),
    #[command(about = "Inspect database migrations", arg_required_else_help = true)]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Serve(args) => serve::cmd(args).await,
            Commands::Init(args) => init::cmd(args),
            Commands::Backup(args) => backup::cmd(args).await,
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}
