use crate::domain::error::DomainError;
use crate::domain::model::{BloodGroup, InventoryFilter, RecordId, RhFactor};

/// 在庫レコード集約
/// 血液型・Rh因子・製剤コード・容量をキーとする血液製剤の在庫数量を管理する
///
/// (血液型, Rh, 製剤コード, 容量) の組は事実上の自然キーだが一意性は強制されない。
/// 重複が存在する場合、照合はドキュメント順で最初の一致を採用する。
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRecord {
    id: RecordId,
    blood_group: BloodGroup,
    rh: RhFactor,
    element_id: String,
    element_name: String,
    volume_ml: u32,
    quantity: u32,
}

impl InventoryRecord {
    /// 新しい在庫レコードを作成
    /// RecordIdは作成時に採番される
    ///
    /// # Arguments
    /// * `blood_group` - ABO式血液型
    /// * `rh` - Rh因子
    /// * `element_id` - 製剤コード
    /// * `element_name` - 製剤表示名
    /// * `volume_ml` - 1単位あたりの容量（ml、0より大きい）
    /// * `quantity` - 在庫数量
    pub fn new(
        blood_group: BloodGroup,
        rh: RhFactor,
        element_id: String,
        element_name: String,
        volume_ml: u32,
        quantity: u32,
    ) -> Result<Self, DomainError> {
        if element_id.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "製剤コード（ElementID）は空にできません".to_string(),
            ));
        }
        if volume_ml == 0 {
            return Err(DomainError::InvalidValue(
                "容量（Volume）は0より大きい値を指定してください".to_string(),
            ));
        }
        Ok(Self {
            id: RecordId::new(),
            blood_group,
            rh,
            element_id,
            element_name,
            volume_ml,
            quantity,
        })
    }

    /// 保存済みデータから在庫レコードを再構築
    /// ドキュメントストアでの使用を想定
    pub fn reconstruct(
        id: RecordId,
        blood_group: BloodGroup,
        rh: RhFactor,
        element_id: String,
        element_name: String,
        volume_ml: u32,
        quantity: u32,
    ) -> Self {
        Self {
            id,
            blood_group,
            rh,
            element_id,
            element_name,
            volume_ml,
            quantity,
        }
    }

    /// レコードIDを取得
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// 血液型を取得
    pub fn blood_group(&self) -> BloodGroup {
        self.blood_group
    }

    /// Rh因子を取得
    pub fn rh(&self) -> RhFactor {
        self.rh
    }

    /// 製剤コードを取得
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// 製剤表示名を取得
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// 容量（ml）を取得
    pub fn volume_ml(&self) -> u32 {
        self.volume_ml
    }

    /// 在庫数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// 4項目の自然キーに一致するか判定する
    /// 文字列条件は前後の空白を除いた完全一致、容量は整数の完全一致
    pub fn matches_key(&self, abo: &str, rh: &str, element_id: &str, volume_ml: i64) -> bool {
        self.blood_group.as_str() == abo.trim()
            && self.rh.as_str() == rh.trim()
            && self.element_id.trim() == element_id.trim()
            && i64::from(self.volume_ml) == volume_ml
    }

    /// 検索条件に一致するか判定する
    /// 指定されなかった条件は制約を課さない
    pub fn matches_filter(&self, filter: &InventoryFilter) -> bool {
        if let Some(abo) = filter.abo() {
            if self.blood_group.as_str() != abo {
                return false;
            }
        }
        if let Some(rh) = filter.rh() {
            if self.rh.as_str() != rh {
                return false;
            }
        }
        if let Some(element_id) = filter.element_id() {
            if self.element_id.trim() != element_id {
                return false;
            }
        }
        if let Some(volume_ml) = filter.volume_ml() {
            if self.volume_ml != volume_ml {
                return false;
            }
        }
        true
    }

    /// 指定された数量の在庫が利用可能かチェック
    pub fn has_available_stock(&self, quantity: u32) -> bool {
        self.quantity >= quantity
    }

    /// 在庫を引き落とす
    /// 在庫数量が負になる引き落としは拒否される
    ///
    /// # Returns
    /// * `Ok(())` - 引き落とし成功
    /// * `Err(DomainError::InsufficientStock)` - 在庫不足
    pub fn deduct(&mut self, quantity: u32) -> Result<(), DomainError> {
        if !self.has_available_stock(quantity) {
            return Err(DomainError::InsufficientStock(format!(
                "在庫が不足しています（要求 {} 単位、在庫 {} 単位）",
                quantity, self.quantity
            )));
        }
        self.quantity -= quantity;
        Ok(())
    }
}
