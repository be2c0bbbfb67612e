use crate::domain::model::Document;
use crate::domain::port::{DocumentStore, StoreError};
use crate::domain::serialization::DocumentSerializer;
use async_trait::async_trait;

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

/// JSONファイルドキュメントストア
/// 単一のJSONファイルを永続化媒体としてドキュメント全体を読み書きする
///
/// ロードもセーブも常にファイル全体を対象とする。セーブは隣接する一時
/// ファイルへ書き込んだ後にリネームで置き換えるため、書き込み途中の
/// 失敗によって元のドキュメントが壊れることはない。
/// 各入出力は設定されたタイムアウトで打ち切られ、タイムアウトは
/// ストア利用不可として扱われる。
pub struct JsonDocumentStore {
    path: PathBuf,
    io_timeout: Duration,
    serializer: DocumentSerializer,
}

impl JsonDocumentStore {
    /// 新しいJSONファイルドキュメントストアを作成
    ///
    /// # Arguments
    /// * `path` - ドキュメントファイルのパス
    /// * `io_timeout` - 1回の読み書きに許容する時間
    pub fn new(path: impl Into<PathBuf>, io_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            io_timeout,
            serializer: DocumentSerializer::new(),
        }
    }

    /// セーブ時に使用する一時ファイルのパス
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl DocumentStore for JsonDocumentStore {
    async fn load(&self) -> Result<Document, StoreError> {
        let read = tokio::time::timeout(self.io_timeout, tokio::fs::read_to_string(&self.path))
            .await
            .map_err(|_| {
                StoreError::Unavailable(format!(
                    "ドキュメントの読み取りがタイムアウトしました: {}",
                    self.path.display()
                ))
            })?;

        let json = match read {
            Ok(json) => json,
            // ファイル未作成は初回起動として空のドキュメントを返す
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "ドキュメントを読み取れません: {}",
                    e
                )));
            }
        };

        self.serializer
            .deserialize_document(&json)
            .map_err(|e| StoreError::Unavailable(format!("ドキュメントをデコードできません: {}", e)))
    }

    async fn save(&self, document: &Document) -> Result<(), StoreError> {
        let json = self
            .serializer
            .serialize_document(document)
            .map_err(|e| StoreError::Unavailable(format!("ドキュメントをエンコードできません: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    StoreError::Unavailable(format!("ドキュメントの保存先を作成できません: {}", e))
                })?;
            }
        }

        let temp_path = self.temp_path();
        tokio::time::timeout(self.io_timeout, tokio::fs::write(&temp_path, json.as_bytes()))
            .await
            .map_err(|_| {
                StoreError::Unavailable(format!(
                    "ドキュメントの書き込みがタイムアウトしました: {}",
                    self.path.display()
                ))
            })?
            .map_err(|e| StoreError::Unavailable(format!("ドキュメントを書き込めません: {}", e)))?;

        // リネームによる置き換えで、途中失敗しても旧リビジョンが残る
        tokio::time::timeout(self.io_timeout, tokio::fs::rename(&temp_path, &self.path))
            .await
            .map_err(|_| {
                StoreError::Unavailable(format!(
                    "ドキュメントの置き換えがタイムアウトしました: {}",
                    self.path.display()
                ))
            })?
            .map_err(|e| StoreError::Unavailable(format!("ドキュメントを置き換えられません: {}", e)))?;

        Ok(())
    }
}
