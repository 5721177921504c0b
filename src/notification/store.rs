//! 本地存储 - channel 列表与已发出通知记录
//!
//! - `InMemoryChannelStore`：进程内 channel 列表（嵌入和测试用）
//! - `FileChannelStore`：JSON 文件保存 channel 列表，文件锁保证多进程串行
//! - `NotificationLog`：JSONL 记录已发出的通知

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use super::channel::{Channel, ChannelStore};
use super::descriptor::{NotificationDescriptor, Priority, Visibility};

/// 进程内 channel 存储
#[derive(Debug, Default)]
pub struct InMemoryChannelStore {
    channels: Mutex<Vec<Channel>>,
}

impl InMemoryChannelStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChannelStore for InMemoryChannelStore {
    fn list(&self) -> Result<Vec<Channel>> {
        let channels = self
            .channels
            .lock()
            .map_err(|_| anyhow::anyhow!("channel store lock poisoned"))?;
        Ok(channels.clone())
    }

    fn create(&self, channel: &Channel) -> Result<()> {
        let mut channels = self
            .channels
            .lock()
            .map_err(|_| anyhow::anyhow!("channel store lock poisoned"))?;
        // create-once：已存在时保留原 channel
        if !channels.iter().any(|c| c.id == channel.id) {
            channels.push(channel.clone());
        }
        Ok(())
    }
}

/// 文件 channel 存储
#[derive(Debug, Clone)]
pub struct FileChannelStore {
    path: PathBuf,
}

impl FileChannelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .with_context(|| format!("failed to open channel store {}", self.path.display()))
    }

    fn read_all(file: &mut File) -> Result<Vec<Channel>> {
        let mut content = String::new();
        file.seek(SeekFrom::Start(0))?;
        file.read_to_string(&mut content)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).context("corrupt channel store")
    }
}

impl ChannelStore for FileChannelStore {
    fn list(&self) -> Result<Vec<Channel>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut file = self.open()?;
        FileExt::lock_shared(&file)?;
        let channels = Self::read_all(&mut file);
        FileExt::unlock(&file)?;
        channels
    }

    fn create(&self, channel: &Channel) -> Result<()> {
        let mut file = self.open()?;
        file.lock_exclusive()?;

        let result = (|| -> Result<()> {
            let mut channels = Self::read_all(&mut file)?;
            if channels.iter().any(|c| c.id == channel.id) {
                return Ok(());
            }
            channels.push(channel.clone());

            file.set_len(0)?;
            file.seek(SeekFrom::Start(0))?;
            file.write_all(serde_json::to_string_pretty(&channels)?.as_bytes())?;
            file.flush()?;
            Ok(())
        })();

        FileExt::unlock(&file)?;
        result
    }
}

/// 已发出的通知记录（JSONL 格式）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// ISO8601 时间戳
    pub ts: DateTime<Utc>,
    pub tag: i32,
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// 提示音 URI（未覆盖时为空）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// 消息 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl NotificationRecord {
    pub fn from_descriptor(descriptor: &NotificationDescriptor) -> Self {
        Self {
            ts: Utc::now(),
            tag: descriptor.tag,
            channel_id: descriptor.channel.id.clone(),
            title: descriptor.title.clone(),
            body: descriptor.body.clone(),
            priority: descriptor.priority,
            visibility: Some(descriptor.visibility),
            sound: descriptor.sound.as_ref().map(|s| s.uri().to_string()),
            message_id: descriptor.extras.get("id").map(str::to_string),
        }
    }
}

const MAX_RECORDS: usize = 200;
const KEEP_AFTER_CLEANUP: usize = 100;

/// 通知记录文件
///
/// 追加和清理都在同目录的 `.lock` 文件上持有独占锁。
/// 清理会用 rename 替换记录文件，锁不能加在记录文件本身上。
#[derive(Debug, Clone)]
pub struct NotificationLog {
    path: PathBuf,
}

impl NotificationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// 追加记录（带文件锁），超过上限时保留最近的记录
    pub fn append(&self, record: &NotificationRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .with_context(|| format!("failed to open lock for {}", self.path.display()))?;
        lock.lock_exclusive()?;

        let result = self.append_locked(record);

        FileExt::unlock(&lock)?;
        result
    }

    fn append_locked(&self, record: &NotificationRecord) -> Result<()> {
        {
            let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            writeln!(file, "{}", serde_json::to_string(record)?)?;
        }

        let records = self.read_all();
        if records.len() > MAX_RECORDS {
            self.rewrite(&records[records.len() - KEEP_AFTER_CLEANUP..])?;
        }
        Ok(())
    }

    /// 读取最近 N 条
    pub fn read_recent(&self, n: usize) -> Vec<NotificationRecord> {
        let records = self.read_all();
        let start = records.len().saturating_sub(n);
        records[start..].to_vec()
    }

    fn read_all(&self) -> Vec<NotificationRecord> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };

        BufReader::new(file)
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect()
    }

    fn rewrite(&self, records: &[NotificationRecord]) -> Result<()> {
        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        {
            let mut temp_file = File::create(&temp_path)?;
            for record in records {
                writeln!(temp_file, "{}", serde_json::to_string(record)?)?;
            }
        }
        // 原子替换
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}
