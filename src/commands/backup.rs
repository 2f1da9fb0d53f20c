use crate::api::drive::Drive;
use crate::api::Backup;
use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::{msg_error_anyhow, msg_success, msg_warning};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    command: BackupCommand,
}

#[derive(Debug, Subcommand)]
enum BackupCommand {
    /// Upload the database, replacing the remote copy
    Push,
    /// Download the remote copy over the local database
    Pull,
}

pub async fn cmd(args: BackupArgs) -> Result<()> {
    let config = Config::load()?;
    let backup_config = config.backup.clone().ok_or_else(|| msg_error_anyhow!(Message::BackupNotConfigured))?;
    let db_path = config.database_path()?;

    let drive = Drive::connect(&backup_config).await?;
    let backup = Backup::new(drive, &backup_config.remote_file_name);
    let remote_name = backup_config.remote_file_name;

    match args.command {
        BackupCommand::Push => {
            if db_path.exists() {
                Db::open(&db_path)?.checkpoint()?;
            }
            let report = backup.push(&db_path).await?;
            if report.replaced > 0 {
                msg_success!(Message::BackupReplacedRemote(remote_name));
            } else {
                msg_success!(Message::BackupNewRemote(remote_name));
            }
            msg_success!(Message::BackupUploaded(report.file_id));
        }
        BackupCommand::Pull => {
            if backup.pull(&db_path).await? {
                msg_success!(Message::BackupDownloaded(db_path.display().to_string()));
            } else {
                msg_warning!(Message::BackupRemoteMissing(remote_name));
            }
        }
    }
    Ok(())
}
