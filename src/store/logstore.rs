//! 日志存储接口与实现
//!
//! 审计日志按检查分流存储；核心通过窄接口追加记录，
//! 轮转器通过同一接口压缩和截断活动流

use crate::process::record::LogRecord;
use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// 日志存储trait
#[async_trait]
pub trait LogStore: Send + Sync {
    /// 向指定日志流追加一条记录
    async fn append(&self, stream_id: &str, record: &LogRecord) -> io::Result<()>;

    /// 枚举所有活动（未压缩）的日志流
    async fn list_active_streams(&self) -> io::Result<Vec<String>>;

    /// 将指定流的当前内容压缩为归档
    ///
    /// # 参数
    /// * `stream_id` - 活动流标识
    /// * `archive_id` - 归档标识（带时间戳后缀）
    async fn compress(&self, stream_id: &str, archive_id: &str) -> io::Result<()>;

    /// 将指定活动流截断为空
    async fn truncate(&self, stream_id: &str) -> io::Result<()>;
}

/// gzip压缩字节序列
fn gzip_bytes(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// 内存日志存储实现
///
/// 用于测试，记录按流保存，归档保存压缩后的字节
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    /// 活动流，以流id为键
    streams: RwLock<HashMap<String, Vec<LogRecord>>>,
    /// 归档存储，以归档id为键
    archives: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryLogStore {
    /// 创建空的内存日志存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取指定流的全部记录
    pub async fn records(&self, stream_id: &str) -> Vec<LogRecord> {
        let streams = self.streams.read().await;
        streams.get(stream_id).cloned().unwrap_or_default()
    }

    /// 列出全部归档id
    pub async fn archive_ids(&self) -> Vec<String> {
        let archives = self.archives.read().await;
        archives.keys().cloned().collect()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn append(&self, stream_id: &str, record: &LogRecord) -> io::Result<()> {
        let mut streams = self.streams.write().await;
        streams
            .entry(stream_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn list_active_streams(&self) -> io::Result<Vec<String>> {
        let streams = self.streams.read().await;
        Ok(streams
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn compress(&self, stream_id: &str, archive_id: &str) -> io::Result<()> {
        let content = {
            let streams = self.streams.read().await;
            let records = streams.get(stream_id).ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("日志流不存在: {stream_id}"))
            })?;

            let mut content = String::new();
            for record in records {
                let line = record
                    .to_json()
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                content.push_str(&line);
                content.push('\n');
            }
            content
        };

        let compressed = gzip_bytes(content.as_bytes())?;
        let mut archives = self.archives.write().await;
        archives.insert(archive_id.to_string(), compressed);
        Ok(())
    }

    async fn truncate(&self, stream_id: &str) -> io::Result<()> {
        let mut streams = self.streams.write().await;
        if let Some(records) = streams.get_mut(stream_id) {
            records.clear();
        }
        Ok(())
    }
}

/// 文件系统日志存储实现
///
/// 活动流是JSON行格式的`.log`文件，归档是gzip压缩的`.gz`文件
#[derive(Debug, Clone)]
pub struct FsLogStore {
    /// 日志目录
    dir: PathBuf,
}

impl FsLogStore {
    /// 创建文件系统日志存储，目录不存在时自动创建
    ///
    /// # 参数
    /// * `dir` - 日志目录路径
    ///
    /// # 返回
    /// * `io::Result<Self>` - 存储实例
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// 活动流文件路径
    fn stream_path(&self, stream_id: &str) -> PathBuf {
        self.dir.join(format!("{stream_id}.log"))
    }

    /// 归档文件路径
    fn archive_path(&self, archive_id: &str) -> PathBuf {
        self.dir.join(format!("{archive_id}.gz"))
    }
}

#[async_trait]
impl LogStore for FsLogStore {
    async fn append(&self, stream_id: &str, record: &LogRecord) -> io::Result<()> {
        let line = record
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.stream_path(stream_id))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }

    async fn list_active_streams(&self) -> io::Result<Vec<String>> {
        let mut streams = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("log") {
                continue;
            }
            // 已截断的空流不参与下一轮轮转
            if entry.metadata().await?.len() == 0 {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                streams.push(stem.to_string());
            }
        }

        Ok(streams)
    }

    async fn compress(&self, stream_id: &str, archive_id: &str) -> io::Result<()> {
        let content = tokio::fs::read(self.stream_path(stream_id)).await?;
        let compressed = gzip_bytes(&content)?;
        tokio::fs::write(self.archive_path(archive_id), compressed).await?;
        Ok(())
    }

    async fn truncate(&self, stream_id: &str) -> io::Result<()> {
        tokio::fs::write(self.stream_path(stream_id), b"").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Check, CheckState, Protocol};
    use crate::probe::ProbeOutcome;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn create_test_record(check_id: &str) -> LogRecord {
        let check = Check {
            id: check_id.to_string(),
            protocol: Protocol::Http,
            host: "localhost:8080".to_string(),
            path: "/".to_string(),
            method: "GET".to_string(),
            timeout_seconds: 5,
            success_codes: vec![200],
            state: None,
            last_checked: None,
            contact: "+8613800000000".to_string(),
        };
        LogRecord::new(check, ProbeOutcome::response(200), CheckState::Up, false)
    }

    fn gunzip(data: &[u8]) -> String {
        let mut decoder = GzDecoder::new(data);
        let mut content = String::new();
        decoder.read_to_string(&mut content).unwrap();
        content
    }

    #[tokio::test]
    async fn test_memory_store_append_and_list() {
        let store = MemoryLogStore::new();
        assert!(store.list_active_streams().await.unwrap().is_empty());

        store.append("a", &create_test_record("a")).await.unwrap();
        store.append("a", &create_test_record("a")).await.unwrap();
        store.append("b", &create_test_record("b")).await.unwrap();

        let mut streams = store.list_active_streams().await.unwrap();
        streams.sort();
        assert_eq!(streams, vec!["a", "b"]);
        assert_eq!(store.records("a").await.len(), 2);
    }

    #[tokio::test]
    async fn test_memory_store_compress_and_truncate() {
        let store = MemoryLogStore::new();
        store.append("a", &create_test_record("a")).await.unwrap();

        store.compress("a", "a-20260825").await.unwrap();
        store.truncate("a").await.unwrap();

        assert!(store.list_active_streams().await.unwrap().is_empty());
        assert_eq!(store.archive_ids().await, vec!["a-20260825"]);
    }

    #[tokio::test]
    async fn test_memory_store_compress_missing_stream() {
        let store = MemoryLogStore::new();
        let result = store.compress("missing", "missing-1").await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_fs_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsLogStore::new(dir.path()).unwrap();

        let record = create_test_record("web");
        store.append("web", &record).await.unwrap();
        store.append("web", &create_test_record("web")).await.unwrap();

        let streams = store.list_active_streams().await.unwrap();
        assert_eq!(streams, vec!["web"]);

        store.compress("web", "web-20260825120000").await.unwrap();
        store.truncate("web").await.unwrap();

        // 截断后的空流不再活动
        assert!(store.list_active_streams().await.unwrap().is_empty());

        // 归档解压后应还原两行JSON记录
        let archive = std::fs::read(dir.path().join("web-20260825120000.gz")).unwrap();
        let content = gunzip(&archive);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let restored = LogRecord::from_json(lines[0]).unwrap();
        assert_eq!(restored.check.id, "web");
    }
}
