// ドメインサービス
// 集約単体に属さない検証ロジックを実装

use crate::domain::error::DomainError;
use crate::domain::model::{Document, InventoryFilter, PatientOrder};

use chrono::{DateTime, NaiveDateTime};

/// 輸血オーダー検証サービス
/// 構造検証（第1段階）と在庫充足検証（第2段階）を提供する
///
/// どちらの段階も純粋関数であり、永続化への副作用を持たない。
/// 検証は固定された順序で評価され、最初の違反で即座に打ち切る。
/// 同じ不正なオーダーに対しては常に同じ項目が最初に報告される。
pub struct OrderValidator;

impl OrderValidator {
    /// 第1段階: オーダーの構造検証
    /// 入出力を伴わず、オーダー自身の整合性のみを確認する
    ///
    /// # Returns
    /// * `Ok(())` - 検証成功
    /// * `Err(DomainError::OrderValidation)` - 最初に違反した項目のメッセージ
    pub fn validate_structure(order: &PatientOrder) -> Result<(), DomainError> {
        if order.pid().trim().is_empty() {
            return Err(DomainError::OrderValidation(
                "PIDは必須です（患者番号が空です）".to_string(),
            ));
        }

        if order.order_id().trim().is_empty() {
            return Err(DomainError::OrderValidation(
                "OrderIDは必須です（オーダー番号が空です）".to_string(),
            ));
        }

        if order.patient_name().trim().is_empty() {
            return Err(DomainError::OrderValidation(
                "PatientNameは必須です（患者氏名が空です）".to_string(),
            ));
        }

        if order.order_date().trim().is_empty() {
            return Err(DomainError::OrderValidation(
                "OrderDateは必須です（指示日時が空です）".to_string(),
            ));
        }

        if !Self::parses_as_date_time(order.order_date()) {
            return Err(DomainError::OrderValidation(format!(
                "OrderDateが不正です（'yyyy-MM-dd HH:mm:ss' 形式が必要、受領値: '{}'）",
                order.order_date()
            )));
        }

        if order.age().trim().is_empty() {
            return Err(DomainError::OrderValidation(
                "Ageは必須です（年齢が空です）".to_string(),
            ));
        }

        match order.age().trim().parse::<i64>() {
            Ok(age) if (0..=150).contains(&age) => {}
            _ => {
                return Err(DomainError::OrderValidation(format!(
                    "Ageが不正です（0から150の整数が必要、受領値: '{}'）",
                    order.age()
                )));
            }
        }

        if order.sex().trim().is_empty() {
            return Err(DomainError::OrderValidation(
                "Sexは必須です（性別が空です）".to_string(),
            ));
        }

        if order.sex() != "M" && order.sex() != "F" {
            return Err(DomainError::OrderValidation(format!(
                "Sexが不正です（'M' または 'F' のみ有効、受領値: '{}'）",
                order.sex()
            )));
        }

        if let Some(blood_group) = order.blood_group() {
            if !blood_group.trim().is_empty()
                && !matches!(blood_group, "A" | "B" | "AB" | "O")
            {
                return Err(DomainError::OrderValidation(format!(
                    "BloodGroupが不正です（'A', 'B', 'AB', 'O' のみ有効、受領値: '{}'）",
                    blood_group
                )));
            }
        }

        if let Some(rh) = order.rh() {
            if !rh.trim().is_empty() && rh != "+" && rh != "-" {
                return Err(DomainError::OrderValidation(format!(
                    "Rhが不正です（'+' または '-' のみ有効、受領値: '{}'）",
                    rh
                )));
            }
        }

        for (index, line) in order.items().iter().enumerate() {
            if line.quantity().trim().is_empty() {
                return Err(DomainError::OrderValidation(format!(
                    "ListOrder[{}].Quantityが空です",
                    index
                )));
            }

            if line.parsed_quantity().is_none() {
                return Err(DomainError::OrderValidation(format!(
                    "ListOrder[{}].Quantityが不正です（正の整数が必要、受領値: '{}'）",
                    index,
                    line.quantity()
                )));
            }

            if line.element_id().trim().is_empty() {
                return Err(DomainError::OrderValidation(format!(
                    "ListOrder[{}].ElementIDが空です",
                    index
                )));
            }

            if line.volume_ml() <= 0 {
                return Err(DomainError::OrderValidation(format!(
                    "ListOrder[{}].Volumeが不正です（0より大きい値が必要、受領値: {}）",
                    index,
                    line.volume_ml()
                )));
            }
        }

        Ok(())
    }

    /// 第2段階: 在庫充足検証
    /// 明細ごとにオーダーの血液型・Rh因子と製剤コードで在庫を絞り込み、
    /// 容量が一致するレコードの存在と数量の充足を確認する
    ///
    /// 読み取りのみで在庫は変更しない。第1段階の成功を前提とする。
    ///
    /// # Returns
    /// * `Ok(())` - 全明細が充足
    /// * `Err(DomainError)` - 最初に充足しなかった明細のメッセージ
    pub fn validate_stock(order: &PatientOrder, document: &Document) -> Result<(), DomainError> {
        for (index, line) in order.items().iter().enumerate() {
            let filter = InventoryFilter::new(
                order.blood_group().map(str::to_string),
                order.rh().map(str::to_string),
                Some(line.element_id().to_string()),
                None,
            );
            let candidates = document.filter_inventory(&filter);

            let matched = candidates
                .iter()
                .find(|record| i64::from(record.volume_ml()) == line.volume_ml());

            let matched = match matched {
                Some(record) => record,
                None => {
                    return Err(DomainError::StockUnavailable(format!(
                        "ListOrder[{}]: 血液型{}{}、製剤'{}'、容量{}mlの在庫が見つかりません",
                        index,
                        order.blood_group().unwrap_or(""),
                        order.rh().unwrap_or(""),
                        line.element_id(),
                        line.volume_ml()
                    )));
                }
            };

            let requested = line.parsed_quantity().ok_or_else(|| {
                DomainError::OrderValidation(format!(
                    "ListOrder[{}].Quantityが不正です（正の整数が必要、受領値: '{}'）",
                    index,
                    line.quantity()
                ))
            })?;

            if !matched.has_available_stock(requested) {
                return Err(DomainError::InsufficientStock(format!(
                    "ListOrder[{}]: 在庫が不足しています（要求 {} 単位、在庫 {} 単位）",
                    index,
                    requested,
                    matched.quantity()
                )));
            }
        }

        Ok(())
    }

    /// 日時文字列として解釈できるか確認する
    /// 'yyyy-MM-dd HH:mm:ss' 形式、次にRFC 3339の順で試行する
    fn parses_as_date_time(value: &str) -> bool {
        if NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M:%S").is_ok() {
            return true;
        }
        DateTime::parse_from_rfc3339(value.trim()).is_ok()
    }
}
