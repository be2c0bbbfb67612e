/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 輸血オーダーの構造検証失敗（例: 必須項目の欠落、不正な性別コード）
    OrderValidation(String),
    /// 該当する在庫レコードが存在しない
    StockUnavailable(String),
    /// 在庫不足（要求数量が在庫数量を上回る）
    InsufficientStock(String),
    /// 無効な値（例: 血液型やRh因子として解釈できない文字列）
    InvalidValue(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::OrderValidation(msg) => write!(f, "Order validation failed: {}", msg),
            DomainError::StockUnavailable(msg) => write!(f, "Stock unavailable: {}", msg),
            DomainError::InsufficientStock(msg) => write!(f, "Insufficient stock: {}", msg),
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl DomainError {
    /// 呼び出し元へそのまま返すメッセージ本文を取り出す
    pub fn message(&self) -> &str {
        match self {
            DomainError::OrderValidation(msg)
            | DomainError::StockUnavailable(msg)
            | DomainError::InsufficientStock(msg)
            | DomainError::InvalidValue(msg) => msg,
        }
    }
}
