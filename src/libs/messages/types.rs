#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // === LABORER MESSAGES ===
    LaborerNotFound,
    LaborerDeleted,
    LaborerMismatch { path: i64, body: i64 },

    // === ATTENDANCE MESSAGES ===
    AttendanceNotFound,
    AttendanceDeleted,
    AttendanceReceived(i64), // laborer id

    // === MATERIAL MESSAGES ===
    MaterialNotFound,
    UnknownUnit(String),

    // === SITE MESSAGES ===
    SiteNotFound,
    SiteDeleted,
    SiteNameTaken(String),
    SiteInUse { materials: i64, payments: i64 },

    // === PAYMENT MESSAGES ===
    PaymentNotFound,
    PaymentDeleted,

    // === PAGINATION MESSAGES ===
    LimitOutOfRange { limit: u64, max: u64 },
    InvalidRequest(String),

    // === SESSION MESSAGES ===
    LoginSuccessful,
    LoginFailed(String), // username
    LogoutSuccessful,
    NotAuthenticated,
    InvalidCredentials,
    AdminNotConfigured,

    // === PAGE MESSAGES ===
    PageNotFound(String),

    // === SERVER MESSAGES ===
    ServerListening(String),
    ServerShuttingDown,
    DatabaseError,
    UnexpectedError,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved(String),
    ConfigInvalidEnv { key: String, value: String },

    // === BACKUP MESSAGES ===
    BackupNotConfigured,
    BackupUploaded(String),
    BackupReplacedRemote(String),
    BackupNewRemote(String),
    BackupDownloaded(String),
    BackupRemoteMissing(String),
    BackupDeletingRemote(String),
    BackupLocalMissing(String),
    BackupRequestFailed { status: u16, body: String },
    ServiceAccountKeyInvalid(String),

    // === MIGRATION MESSAGES ===
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
}
