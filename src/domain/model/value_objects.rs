use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// 保存済みレコードの一意識別子
/// 在庫レコードと患者オーダーの両方に作成時に採番される
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// 新しい一意のRecordIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから RecordId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からRecordIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

/// ABO式血液型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    A,
    B,
    AB,
    O,
}

impl BloodGroup {
    /// 文字列からBloodGroupを作成
    /// 'A', 'B', 'AB', 'O' のみを受け付ける
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "A" => Ok(BloodGroup::A),
            "B" => Ok(BloodGroup::B),
            "AB" => Ok(BloodGroup::AB),
            "O" => Ok(BloodGroup::O),
            _ => Err(DomainError::InvalidValue(format!(
                "無効な血液型: '{}'（'A', 'B', 'AB', 'O' のいずれかを指定してください）",
                s
            ))),
        }
    }

    /// 文字列表現を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::A => "A",
            BloodGroup::B => "B",
            BloodGroup::AB => "AB",
            BloodGroup::O => "O",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rh因子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RhFactor {
    Positive,
    Negative,
}

impl RhFactor {
    /// 文字列からRhFactorを作成
    /// '+' と '-' のみを受け付ける
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "+" => Ok(RhFactor::Positive),
            "-" => Ok(RhFactor::Negative),
            _ => Err(DomainError::InvalidValue(format!(
                "無効なRh因子: '{}'（'+' または '-' を指定してください）",
                s
            ))),
        }
    }

    /// 文字列表現を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            RhFactor::Positive => "+",
            RhFactor::Negative => "-",
        }
    }
}

impl fmt::Display for RhFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// オーダー明細を表す値オブジェクト
/// 要求数量は受領した文字列表現のまま保持する（検証時に整数として解釈する）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    element_id: String,
    quantity: String,
    volume_ml: i64,
}

impl OrderLine {
    /// 新しいオーダー明細を作成
    pub fn new(element_id: String, quantity: String, volume_ml: i64) -> Self {
        Self {
            element_id,
            quantity,
            volume_ml,
        }
    }

    /// 製剤コードを取得
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// 要求数量（文字列表現）を取得
    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    /// 要求数量を正の整数として解釈する
    /// 正の整数でない場合はNone
    pub fn parsed_quantity(&self) -> Option<u32> {
        self.quantity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|q| *q >= 1)
    }

    /// 要求容量（ml）を取得
    pub fn volume_ml(&self) -> i64 {
        self.volume_ml
    }
}

/// 在庫検索条件を表す値オブジェクト
/// 空白のみの文字列条件と0以下の容量条件は「条件なし」に正規化される
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryFilter {
    abo: Option<String>,
    rh: Option<String>,
    element_id: Option<String>,
    volume_ml: Option<u32>,
}

impl InventoryFilter {
    /// 正規化済みの検索条件を作成
    pub fn new(
        abo: Option<String>,
        rh: Option<String>,
        element_id: Option<String>,
        volume_ml: Option<i64>,
    ) -> Self {
        Self {
            abo: Self::normalize_text(abo),
            rh: Self::normalize_text(rh),
            element_id: Self::normalize_text(element_id),
            volume_ml: volume_ml.and_then(|v| u32::try_from(v).ok()).filter(|v| *v > 0),
        }
    }

    fn normalize_text(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 条件がひとつも指定されていないか
    pub fn is_empty(&self) -> bool {
        self.abo.is_none()
            && self.rh.is_none()
            && self.element_id.is_none()
            && self.volume_ml.is_none()
    }

    /// 血液型条件を取得
    pub fn abo(&self) -> Option<&str> {
        self.abo.as_deref()
    }

    /// Rh因子条件を取得
    pub fn rh(&self) -> Option<&str> {
        self.rh.as_deref()
    }

    /// 製剤コード条件を取得
    pub fn element_id(&self) -> Option<&str> {
        self.element_id.as_deref()
    }

    /// 容量条件を取得
    pub fn volume_ml(&self) -> Option<u32> {
        self.volume_ml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_creation() {
        let id1 = RecordId::new();
        let id2 = RecordId::new();
        assert_ne!(id1, id2, "Each RecordId should be unique");
    }

    #[test]
    fn test_blood_group_from_string_valid() {
        assert_eq!(BloodGroup::from_string("A").unwrap(), BloodGroup::A);
        assert_eq!(BloodGroup::from_string("B").unwrap(), BloodGroup::B);
        assert_eq!(BloodGroup::from_string("AB").unwrap(), BloodGroup::AB);
        assert_eq!(BloodGroup::from_string("O").unwrap(), BloodGroup::O);
    }

    #[test]
    fn test_blood_group_from_string_invalid() {
        assert!(BloodGroup::from_string("C").is_err());
        assert!(BloodGroup::from_string("a").is_err()); // 小文字は不可
        assert!(BloodGroup::from_string("").is_err());
    }

    #[test]
    fn test_rh_factor_from_string() {
        assert_eq!(RhFactor::from_string("+").unwrap(), RhFactor::Positive);
        assert_eq!(RhFactor::from_string("-").unwrap(), RhFactor::Negative);
        assert!(RhFactor::from_string("plus").is_err());
    }

    #[test]
    fn test_order_line_parsed_quantity() {
        let line = OrderLine::new("RBC".to_string(), "3".to_string(), 250);
        assert_eq!(line.parsed_quantity(), Some(3));

        let line = OrderLine::new("RBC".to_string(), " 7 ".to_string(), 250);
        assert_eq!(line.parsed_quantity(), Some(7));
    }

    #[test]
    fn test_order_line_parsed_quantity_invalid() {
        let zero = OrderLine::new("RBC".to_string(), "0".to_string(), 250);
        assert_eq!(zero.parsed_quantity(), None);

        let negative = OrderLine::new("RBC".to_string(), "-2".to_string(), 250);
        assert_eq!(negative.parsed_quantity(), None);

        let text = OrderLine::new("RBC".to_string(), "two".to_string(), 250);
        assert_eq!(text.parsed_quantity(), None);
    }

    #[test]
    fn test_inventory_filter_normalization() {
        let filter = InventoryFilter::new(
            Some("  O ".to_string()),
            Some("".to_string()),
            None,
            Some(0),
        );
        assert_eq!(filter.abo(), Some("O"));
        assert_eq!(filter.rh(), None);
        assert_eq!(filter.element_id(), None);
        assert_eq!(filter.volume_ml(), None);
    }

    #[test]
    fn test_inventory_filter_is_empty() {
        let empty = InventoryFilter::new(None, Some("   ".to_string()), None, Some(-5));
        assert!(empty.is_empty());

        let with_abo = InventoryFilter::new(Some("A".to_string()), None, None, None);
        assert!(!with_abo.is_empty());
    }
}
