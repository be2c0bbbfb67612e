use crate::domain::port::{AuditLogger, AuditStatus};
use async_trait::async_trait;
use chrono::Local;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use std::path::PathBuf;

/// ファイル監査ロガー
/// 完了した操作ごとの構造化レコードを操作名・日付別のログファイルに追記する
///
/// ファイル名は `API_{操作名}_{yyyy-MM-dd}.log`。各エントリは整形済みJSONを
/// 区切り線で挟んだ形式で出力される。記録は送りっぱなしであり、
/// 書き込みの失敗は標準エラー出力に報告されるだけで操作を失敗させない。
pub struct FileAuditLogger {
    logs_dir: PathBuf,
}

impl FileAuditLogger {
    /// 新しいファイル監査ロガーを作成
    ///
    /// # Arguments
    /// * `logs_dir` - ログファイルの出力先ディレクトリ
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
        }
    }

    async fn write_entry(
        &self,
        operation: &str,
        input: Option<Value>,
        output: Option<Value>,
        status: AuditStatus,
        error_message: Option<&str>,
    ) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.logs_dir).await?;

        let timestamp = Local::now();
        let file_name = format!("API_{}_{}.log", operation, timestamp.format("%Y-%m-%d"));
        let file_path = self.logs_dir.join(file_name);

        let entry = serde_json::json!({
            "Time": timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            "API": operation,
            "Status": status.as_str(),
            "Input": input.unwrap_or(Value::Null),
            "Output": output.unwrap_or(Value::Null),
            "ErrorMessage": error_message.unwrap_or(""),
        });
        let entry_json = serde_json::to_string_pretty(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let separator = "=".repeat(80);
        let log_line = format!("\n{}\n{}\n{}", separator, entry_json, separator);

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;
        file.write_all(log_line.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait]
impl AuditLogger for FileAuditLogger {
    async fn log_operation(
        &self,
        operation: &str,
        input: Option<Value>,
        output: Option<Value>,
        status: AuditStatus,
        error_message: Option<&str>,
    ) {
        if let Err(e) = self
            .write_entry(operation, input, output, status, error_message)
            .await
        {
            eprintln!("監査ログの書き込みに失敗しました（{}）: {}", operation, e);
        }
    }
}
