// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::Document;
use async_trait::async_trait;

/// ストアエラー
/// 永続化媒体の読み書きに失敗した場合のエラー
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// ドキュメントストアトレイト
/// ドキュメント集約全体の永続化を抽象化する
///
/// ロードとセーブがこのシステムで唯一正当な永続状態へのアクセス経路であり、
/// 上位層の状態変更は必ず「ロード → メモリ上で変更 → セーブ」の周期を経る。
/// 媒体への増分編集は存在しない。
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// ドキュメント全体をロードする
    /// 永続化媒体が未作成の場合は空のドキュメントを返す
    ///
    /// # Returns
    /// * `Ok(Document)` - ロード成功
    /// * `Err(StoreError)` - 媒体の読み取りまたはデコードに失敗
    async fn load(&self) -> Result<Document, StoreError>;

    /// ドキュメント全体をセーブする
    /// 前回の保存内容は完全に置き換えられる
    ///
    /// # Returns
    /// * `Ok(())` - セーブ成功
    /// * `Err(StoreError)` - 書き込みに失敗（永続状態は変更されていないとみなせる）
    async fn save(&self, document: &Document) -> Result<(), StoreError>;
}

/// 監査ログの結果区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Success,
    Failed,
    Error,
}

impl AuditStatus {
    /// ログ出力用の文字列表現を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Success => "Success",
            AuditStatus::Failed => "Failed",
            AuditStatus::Error => "Error",
        }
    }
}

/// 監査ロガートレイト
/// 完了した操作ごとの構造化レコードの記録を抽象化するポート
///
/// 記録は送りっぱなし（fire-and-forget）であり、
/// ログの失敗が操作自体を失敗させてはならない。
#[async_trait]
pub trait AuditLogger: Send + Sync {
    /// 操作の完了を記録する
    ///
    /// # Arguments
    /// * `operation` - 操作名（例: "SavePatient"）
    /// * `input` - 入力ペイロード
    /// * `output` - 出力ペイロード
    /// * `status` - 結果区分
    /// * `error_message` - エラーメッセージ（ある場合）
    async fn log_operation(
        &self,
        operation: &str,
        input: Option<serde_json::Value>,
        output: Option<serde_json::Value>,
        status: AuditStatus,
        error_message: Option<&str>,
    );
}
