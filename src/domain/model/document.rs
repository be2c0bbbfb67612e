use crate::domain::error::DomainError;
use crate::domain::model::{InventoryFilter, InventoryRecord, PatientOrder, RecordId};

use std::collections::HashMap;

/// ドキュメント集約
/// 在庫レコード列と患者オーダー列を束ねる単一のルート集約
///
/// 永続化の単位はこの集約全体であり、常にまとめて読み書きされる。
/// 部分的な更新は存在しない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    inventory: Vec<InventoryRecord>,
    patient_orders: Vec<PatientOrder>,
}

impl Document {
    /// 保存済みデータからドキュメントを再構築
    pub fn reconstruct(inventory: Vec<InventoryRecord>, patient_orders: Vec<PatientOrder>) -> Self {
        Self {
            inventory,
            patient_orders,
        }
    }

    /// 在庫レコード列を取得
    pub fn inventory(&self) -> &[InventoryRecord] {
        &self.inventory
    }

    /// 患者オーダー列を取得
    pub fn patient_orders(&self) -> &[PatientOrder] {
        &self.patient_orders
    }

    /// 検索条件に一致する在庫レコードを返す
    /// 条件が空の場合は全レコードを返す
    pub fn filter_inventory(&self, filter: &InventoryFilter) -> Vec<&InventoryRecord> {
        self.inventory
            .iter()
            .filter(|record| record.matches_filter(filter))
            .collect()
    }

    /// 4項目の自然キーに一致する最初の在庫レコードを返す
    /// 数量の充足チェックはここでは行わない
    pub fn find_match(
        &self,
        abo: &str,
        rh: &str,
        element_id: &str,
        volume_ml: i64,
    ) -> Option<&InventoryRecord> {
        self.inventory
            .iter()
            .find(|record| record.matches_key(abo, rh, element_id, volume_ml))
    }

    /// オーダーを受理し、明細ごとの在庫引き落としとオーダーの追記を行う
    ///
    /// 全明細が成立する場合のみ変更を適用する（全部成功か全部失敗）。
    /// 一致する在庫レコードが存在しない明細は致命的エラーとして扱い、
    /// オーダー全体を拒否する。同一レコードに複数明細が重なる場合は
    /// 合算した数量で充足を判定する。
    ///
    /// # Returns
    /// * `Ok(())` - 受理成功（在庫を引き落とし、オーダーを追記済み）
    /// * `Err(DomainError)` - 受理失敗（ドキュメントは変更されない）
    pub fn fulfill_order(&mut self, order: PatientOrder) -> Result<(), DomainError> {
        let abo = order.blood_group().unwrap_or("");
        let rh = order.rh().unwrap_or("");

        // 第1パス: 全明細を在庫レコードへ対応付け、合算数量で充足を確認する
        let mut deductions: Vec<(usize, u32)> = Vec::with_capacity(order.items().len());
        let mut pending: HashMap<usize, u32> = HashMap::new();
        for (index, line) in order.items().iter().enumerate() {
            let requested = line.parsed_quantity().ok_or_else(|| {
                DomainError::OrderValidation(format!(
                    "ListOrder[{}].Quantityが不正です（正の整数が必要、受領値: '{}'）",
                    index,
                    line.quantity()
                ))
            })?;

            let position = self
                .inventory
                .iter()
                .position(|record| {
                    record.matches_key(abo, rh, line.element_id(), line.volume_ml())
                })
                .ok_or_else(|| {
                    DomainError::StockUnavailable(format!(
                        "ListOrder[{}]: 血液型{}{}、製剤'{}'、容量{}mlに一致する在庫が見つかりません",
                        index,
                        abo,
                        rh,
                        line.element_id(),
                        line.volume_ml()
                    ))
                })?;

            let already_pending = pending.get(&position).copied().unwrap_or(0);
            let available = self.inventory[position].quantity().saturating_sub(already_pending);
            if requested > available {
                return Err(DomainError::InsufficientStock(format!(
                    "ListOrder[{}]: 在庫が不足しています（要求 {} 単位、在庫 {} 単位）",
                    index, requested, available
                )));
            }
            pending.insert(position, already_pending + requested);
            deductions.push((position, requested));
        }

        // 第2パス: 引き落としを適用し、オーダーを履歴に追記する
        for (position, quantity) in deductions {
            self.inventory[position].deduct(quantity)?;
        }
        self.patient_orders.push(order);
        Ok(())
    }

    /// 在庫レコードを追加
    pub fn add_inventory_record(&mut self, record: InventoryRecord) {
        self.inventory.push(record);
    }

    /// 指定IDの在庫レコードを置き換える
    /// 置き換え後もレコードIDは維持される
    ///
    /// # Returns
    /// * `true` - 置き換え成功
    /// * `false` - 指定IDのレコードが存在しない
    pub fn replace_inventory_record(&mut self, id: RecordId, record: InventoryRecord) -> bool {
        match self.inventory.iter().position(|r| r.id() == id) {
            Some(position) => {
                self.inventory[position] = InventoryRecord::reconstruct(
                    id,
                    record.blood_group(),
                    record.rh(),
                    record.element_id().to_string(),
                    record.element_name().to_string(),
                    record.volume_ml(),
                    record.quantity(),
                );
                true
            }
            None => false,
        }
    }

    /// 指定IDの在庫レコードを削除する
    pub fn remove_inventory_record(&mut self, id: RecordId) -> bool {
        match self.inventory.iter().position(|r| r.id() == id) {
            Some(position) => {
                self.inventory.remove(position);
                true
            }
            None => false,
        }
    }

    /// 患者オーダーを追記する（在庫の引き落としは行わない）
    pub fn add_patient_order(&mut self, order: PatientOrder) {
        self.patient_orders.push(order);
    }

    /// 指定IDの患者オーダーを置き換える
    /// 置き換え後もレコードIDは維持される
    pub fn replace_patient_order(&mut self, id: RecordId, order: PatientOrder) -> bool {
        match self.patient_orders.iter().position(|o| o.id() == id) {
            Some(position) => {
                self.patient_orders[position] = PatientOrder::reconstruct(
                    id,
                    order.pid().to_string(),
                    order.order_id().to_string(),
                    order.patient_name().to_string(),
                    order.insure_number().map(str::to_string),
                    order.treatment_code().map(str::to_string),
                    order.order_date().to_string(),
                    order.age().to_string(),
                    order.sex().to_string(),
                    order.blood_group().map(str::to_string),
                    order.rh().map(str::to_string),
                    order.address().map(str::to_string),
                    order.doctor_id().map(str::to_string),
                    order.doctor_name().map(str::to_string),
                    order.location_id().map(str::to_string),
                    order.location_name().map(str::to_string),
                    order.items().to_vec(),
                );
                true
            }
            None => false,
        }
    }

    /// 指定IDの患者オーダーを削除する
    pub fn remove_patient_order(&mut self, id: RecordId) -> bool {
        match self.patient_orders.iter().position(|o| o.id() == id) {
            Some(position) => {
                self.patient_orders.remove(position);
                true
            }
            None => false,
        }
    }
}
