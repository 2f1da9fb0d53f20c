#[cfg(test)]
mod tests {
    use sitelog::db::db::DB_FILE_NAME;
    use sitelog::libs::config::{AdminConfig, BackupConfig, Config, DEFAULT_PORT};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext { _temp_dir: temp_dir }
        }
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert!(config.admin.is_none());
        assert!(config.backup.is_none());
    }

    #[test]
    fn test_server_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("SITELOG_HOST", "127.0.0.1"),
            ("SITELOG_PORT", " 9000 "),
            ("SITELOG_FRONTEND_DIR", "/srv/frontend"),
            ("SITELOG_DB_PATH", "/var/lib/sitelog/site.db"),
        ]));

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.server.frontend_dir, PathBuf::from("/srv/frontend"));
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/var/lib/sitelog/site.db"));
    }

    #[test]
    fn test_invalid_port_and_blank_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[("SITELOG_PORT", "eighty"), ("SITELOG_HOST", "   ")]));

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_admin_needs_both_variables() {
        let mut config = Config::default();
        config.apply_env(env(&[("SITELOG_ADMIN_USERNAME", "admin")]));
        assert!(config.admin.is_none());

        config.apply_env(env(&[("SITELOG_ADMIN_USERNAME", "admin"), ("SITELOG_ADMIN_PASSWORD", "s3cret")]));
        assert_eq!(
            config.admin,
            Some(AdminConfig {
                username: "admin".to_string(),
                password: "s3cret".to_string(),
            })
        );
    }

    #[test]
    fn test_backup_from_environment() {
        let mut config = Config::default();
        config.apply_env(env(&[("GOOGLE_DRIVE_FOLDER_ID", "folder-1")]));
        assert!(config.backup.is_none());

        config.apply_env(env(&[
            ("GOOGLE_DRIVE_FOLDER_ID", "folder-1"),
            ("GOOGLE_CREDENTIALS_PATH", "/etc/sitelog/key.json"),
        ]));
        let backup = config.backup.clone().unwrap();
        assert_eq!(backup.folder_id, "folder-1");
        assert_eq!(backup.remote_file_name, DB_FILE_NAME);

        // With backup configured, a single variable overrides its own field
        config.apply_env(env(&[("GOOGLE_DRIVE_FOLDER_ID", "folder-2"), ("SITELOG_BACKUP_FILE_NAME", "site.db")]));
        let backup = config.backup.unwrap();
        assert_eq!(backup.folder_id, "folder-2");
        assert_eq!(backup.credentials_path, PathBuf::from("/etc/sitelog/key.json"));
        assert_eq!(backup.remote_file_name, "site.db");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"server": {"host": "127.0.0.1", "port": 8080, "frontend_dir": "web"},
                "backup": {"folder_id": "abc", "credentials_path": "key.json"}}"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.database.path.is_none());
        assert_eq!(config.backup.unwrap().remote_file_name, DB_FILE_NAME);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read(_ctx: &mut ConfigTestContext) {
        assert_eq!(Config::read().unwrap(), Config::default());

        let config = Config {
            admin: Some(AdminConfig {
                username: "admin".to_string(),
                password: "pw".to_string(),
            }),
            backup: Some(BackupConfig {
                folder_id: "folder".to_string(),
                credentials_path: PathBuf::from("key.json"),
                remote_file_name: "backup.db".to_string(),
            }),
            ..Config::default()
        };
        let path = config.save().unwrap();

        assert!(path.exists());
        assert_eq!(Config::read().unwrap(), config);
    }
}
