//! Display implementation for sitelog messages.
//!
//! All user-facing text, whether it ends up on the console, in a log line or
//! in the `detail` field of an HTTP error body, is defined here so wording
//! stays consistent between the CLI and the web API.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === LABORER MESSAGES ===
            Message::LaborerNotFound => "Labour not found".to_string(),
            Message::LaborerDeleted => "Laborer and associated attendance records deleted successfully".to_string(),
            Message::LaborerMismatch { path, body } => {
                format!("Laborer id {} in the body does not match laborer id {} in the path", body, path)
            }

            // === ATTENDANCE MESSAGES ===
            Message::AttendanceNotFound => "Attendance record not found".to_string(),
            Message::AttendanceDeleted => "Attendance record deleted successfully".to_string(),
            Message::AttendanceReceived(laborer_id) => format!("Received attendance for laborer {}", laborer_id),

            // === MATERIAL MESSAGES ===
            Message::MaterialNotFound => "Material not found".to_string(),
            Message::UnknownUnit(unit) => format!("Unknown unit '{}'", unit),

            // === SITE MESSAGES ===
            Message::SiteNotFound => "Site not found".to_string(),
            Message::SiteDeleted => "Site deleted successfully".to_string(),
            Message::SiteNameTaken(name) => format!("A site named '{}' already exists", name),
            Message::SiteInUse { materials, payments } => format!(
                "Site is still referenced by {} material(s) and {} payment(s); remove them first",
                materials, payments
            ),

            // === PAYMENT MESSAGES ===
            Message::PaymentNotFound => "Payment not found".to_string(),
            Message::PaymentDeleted => "Payment deleted successfully".to_string(),

            // === PAGINATION MESSAGES ===
            Message::LimitOutOfRange { limit, max } => format!("limit must be between 1 and {}, got {}", max, limit),
            Message::InvalidRequest(reason) => reason.clone(),

            // === SESSION MESSAGES ===
            Message::LoginSuccessful => "Login successful".to_string(),
            Message::LoginFailed(username) => format!("Login failed for {}", username),
            Message::LogoutSuccessful => "Logout successful".to_string(),
            Message::NotAuthenticated => "Not authenticated".to_string(),
            Message::InvalidCredentials => "Invalid username or password".to_string(),
            Message::AdminNotConfigured => "No admin account is configured".to_string(),

            // === PAGE MESSAGES ===
            Message::PageNotFound(path) => format!("Page not found: {}", path),

            // === SERVER MESSAGES ===
            Message::ServerListening(addr) => format!("Listening on http://{}", addr),
            Message::ServerShuttingDown => "Shutting down server...".to_string(),
            Message::DatabaseError => "Database error occurred".to_string(),
            Message::UnexpectedError => "An unexpected error occurred".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::ConfigInvalidEnv { key, value } => format!("Ignoring invalid value '{}' for {}", value, key),

            // === BACKUP MESSAGES ===
            Message::BackupNotConfigured => {
                "Backup is not configured. Set GOOGLE_DRIVE_FOLDER_ID and GOOGLE_CREDENTIALS_PATH".to_string()
            }
            Message::BackupUploaded(file_id) => format!("File uploaded to Google Drive successfully. File ID: {}", file_id),
            Message::BackupReplacedRemote(name) => format!("Deleted existing file '{}' on Google Drive.", name),
            Message::BackupNewRemote(name) => format!("File '{}' not found; a new file will be uploaded.", name),
            Message::BackupDownloaded(path) => format!("Downloaded file to {} successfully.", path),
            Message::BackupRemoteMissing(name) => format!("File '{}' not found in Google Drive.", name),
            Message::BackupDeletingRemote(file_id) => format!("Deleting remote copy {}", file_id),
            Message::BackupLocalMissing(path) => format!("Local database file {} does not exist", path),
            Message::BackupRequestFailed { status, body } => format!("Google Drive request failed ({}): {}", status, body),
            Message::ServiceAccountKeyInvalid(reason) => format!("Invalid service account key: {}", reason),

            // === MIGRATION MESSAGES ===
            Message::DatabaseVersion(version) => format!("Database schema version: {}", version),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database needs migration".to_string(),
            Message::MigrationHistory => "Applied migrations:".to_string(),
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed successfully".to_string(),
        };
        write!(f, "{}", text)
    }
}
