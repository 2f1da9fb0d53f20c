//! Writes `config.json` and creates the database.

use crate::{
    db::db::Db,
    libs::{
        config::{AdminConfig, Config},
        messages::Message,
    },
    msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Admin login name
    #[arg(long, requires = "admin_password")]
    admin_username: Option<String>,

    /// Admin login password
    #[arg(long, requires = "admin_username")]
    admin_password: Option<String>,
}

/// Saves the current configuration (defaults for anything unset) and
/// migrates the database it points at.
pub fn cmd(args: InitArgs) -> Result<()> {
    let mut config = Config::read()?;
    if let (Some(username), Some(password)) = (args.admin_username, args.admin_password) {
        config.admin = Some(AdminConfig { username, password });
    }

    let path = config.save()?;
    msg_success!(Message::ConfigSaved(path.display().to_string()));

    if config.admin.is_none() {
        msg_warning!(Message::AdminNotConfigured);
    }

    Db::init(&config.database_path()?)?;
    Ok(())
}
