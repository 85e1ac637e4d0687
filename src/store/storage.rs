//! セッションの永続化ストレージ
//!
//! キー・値の文字列ストア。セッションストアは`token`と`user`の2キーだけを使う。

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CuratorResult;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// 永続ストレージの抽象（書き込みは同期）
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> CuratorResult<()>;
    fn remove(&self, key: &str) -> CuratorResult<()>;
}

/// プロセス内のみのストレージ
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> CuratorResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CuratorResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// セッションファイルの構造
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    session: BTreeMap<String, String>,
}

/// TOMLファイルに保存するストレージ
///
/// 毎回ファイル全体を読み直して書き戻す。エントリが空になればファイルごと削除する。
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// # Arguments
    ///
    /// * `dir` - 保存先ディレクトリ（例: ~/.config/curator）
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join("session.toml"),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> CuratorResult<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    /// 読めないファイルは空として扱う（既存のエントリは失われる）
    fn read_or_discard(&self) -> SessionFile {
        self.read_file().unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                "⚠️ Discarding unreadable session file: {}",
                e
            );
            SessionFile::default()
        })
    }

    fn write_file(&self, file: &SessionFile) -> CuratorResult<()> {
        if file.session.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(file)?)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock();
        match self.read_file() {
            Ok(mut file) => file.session.remove(key),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "⚠️ Failed to read session file: {}",
                    e
                );
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> CuratorResult<()> {
        let _guard = self.lock.lock();
        // 壊れたファイルは上書きする
        let mut file = self.read_or_discard();
        file.session.insert(key.to_string(), value.to_string());
        self.write_file(&file)
    }

    fn remove(&self, key: &str) -> CuratorResult<()> {
        let _guard = self.lock.lock();
        let mut file = self.read_or_discard();
        if file.session.remove(key).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.write_file(&file)
    }
}
