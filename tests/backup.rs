#[cfg(test)]
mod tests {
    use anyhow::Result;
    use parking_lot::Mutex;
    use sitelog::api::{Backup, RemoteFile, RemoteFolder};
    use sitelog::libs::messages::Message;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    #[derive(Default)]
    struct MemoryFolder {
        files: Mutex<Vec<(RemoteFile, Vec<u8>)>>,
        next_id: Mutex<u32>,
    }

    impl MemoryFolder {
        fn with_file(name: &str, content: &[u8]) -> Self {
            let folder = Self::default();
            folder.files.lock().push((
                RemoteFile {
                    id: "seed".to_string(),
                    name: name.to_string(),
                },
                content.to_vec(),
            ));
            folder
        }
    }

    impl RemoteFolder for &MemoryFolder {
        async fn find(&self, name: &str) -> Result<Vec<RemoteFile>> {
            Ok(self
                .files
                .lock()
                .iter()
                .filter(|(file, _)| file.name == name)
                .map(|(file, _)| file.clone())
                .collect())
        }

        async fn delete(&self, file_id: &str) -> Result<()> {
            self.files.lock().retain(|(file, _)| file.id != file_id);
            Ok(())
        }

        async fn upload(&self, name: &str, content: Vec<u8>) -> Result<String> {
            let mut next_id = self.next_id.lock();
            *next_id += 1;
            let id = format!("file-{}", *next_id);
            self.files.lock().push((
                RemoteFile {
                    id: id.clone(),
                    name: name.to_string(),
                },
                content,
            ));
            Ok(id)
        }

        async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
            self.files
                .lock()
                .iter()
                .find(|(file, _)| file.id == file_id)
                .map(|(_, content)| content.clone())
                .ok_or_else(|| anyhow::anyhow!("no file {}", file_id))
        }
    }

    struct BackupTestContext {
        temp_dir: TempDir,
        local: PathBuf,
    }

    impl AsyncTestContext for BackupTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let local = temp_dir.path().join("labour_management.db");
            BackupTestContext { temp_dir, local }
        }

        async fn teardown(self) {}
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_push_replaces_remote_copies(ctx: &mut BackupTestContext) {
        tokio::fs::write(&ctx.local, b"new contents").await.unwrap();
        let folder = MemoryFolder::with_file("labour_management.db", b"old contents");
        folder.files.lock().push((
            RemoteFile {
                id: "unrelated".to_string(),
                name: "notes.txt".to_string(),
            },
            b"keep".to_vec(),
        ));

        let report = Backup::new(&folder, "labour_management.db").push(&ctx.local).await.unwrap();

        assert_eq!(report.replaced, 1);
        let files = folder.files.lock();
        assert_eq!(files.len(), 2);
        let (uploaded, content) = files.iter().find(|(file, _)| file.id == report.file_id).unwrap();
        assert_eq!(uploaded.name, "labour_management.db");
        assert_eq!(content, b"new contents");
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_push_without_local_file_fails(ctx: &mut BackupTestContext) {
        let folder = MemoryFolder::with_file("labour_management.db", b"old contents");

        let result = Backup::new(&folder, "labour_management.db").push(&ctx.local).await;

        assert!(result.is_err());
        assert_eq!(folder.files.lock().len(), 1);
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_pull_without_remote_leaves_local(ctx: &mut BackupTestContext) {
        tokio::fs::write(&ctx.local, b"local contents").await.unwrap();
        let folder = MemoryFolder::default();

        let pulled = Backup::new(&folder, "labour_management.db").pull(&ctx.local).await.unwrap();

        assert!(!pulled);
        assert_eq!(tokio::fs::read(&ctx.local).await.unwrap(), b"local contents");
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_pull_replaces_local_and_drops_wal(ctx: &mut BackupTestContext) {
        tokio::fs::write(&ctx.local, b"local contents").await.unwrap();
        let wal = ctx.temp_dir.path().join("labour_management.db-wal");
        tokio::fs::write(&wal, b"stale wal").await.unwrap();
        let folder = MemoryFolder::with_file("labour_management.db", b"remote contents");

        let pulled = Backup::new(&folder, "labour_management.db").pull(&ctx.local).await.unwrap();

        assert!(pulled);
        assert_eq!(tokio::fs::read(&ctx.local).await.unwrap(), b"remote contents");
        assert!(!wal.exists());
        assert!(!ctx.temp_dir.path().join("labour_management.db-download").exists());
    }

    #[test]
    fn test_remote_deletion_message() {
        assert_eq!(
            Message::BackupDeletingRemote("file-7".to_string()).to_string(),
            "Deleting remote copy file-7"
        );
    }
}
