use crate::domain::error::DomainError;
use crate::domain::model::{
    BloodGroup, InventoryFilter, InventoryRecord, OrderLine, PatientOrder, RhFactor,
};
use serde::{Deserialize, Serialize};

/// 在庫照会用のリクエストDTO
/// すべての項目は省略可能で、省略された項目は制約を課さない
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InventoryQueryRequest {
    #[serde(rename = "ABO", default)]
    pub abo: Option<String>,
    #[serde(rename = "Rh", default)]
    pub rh: Option<String>,
    #[serde(rename = "ElementID", default)]
    pub element_id: Option<String>,
    #[serde(rename = "Volume", default)]
    pub volume_ml: Option<i64>,
}

impl InventoryQueryRequest {
    /// 正規化済みの検索条件へ変換
    pub fn into_filter(self) -> InventoryFilter {
        InventoryFilter::new(self.abo, self.rh, self.element_id, self.volume_ml)
    }
}

/// 患者オーダー受付用のリクエストDTO
/// 外部システムの契約に合わせたPascalCaseフィールド名を使用する
#[derive(Debug, Serialize, Deserialize)]
pub struct PatientOrderRequest {
    #[serde(rename = "PID", default)]
    pub pid: Option<String>,
    #[serde(rename = "OrderID", default)]
    pub order_id: Option<String>,
    #[serde(rename = "PatientName", default)]
    pub patient_name: Option<String>,
    #[serde(rename = "InsureNumber", default)]
    pub insure_number: Option<String>,
    #[serde(rename = "TREATMENT_CODE", default)]
    pub treatment_code: Option<String>,
    #[serde(rename = "OrderDate", default)]
    pub order_date: Option<String>,
    #[serde(rename = "Age", default)]
    pub age: Option<String>,
    #[serde(rename = "Sex", default)]
    pub sex: Option<String>,
    #[serde(rename = "BloodGroup", default)]
    pub blood_group: Option<String>,
    #[serde(rename = "Rh", default)]
    pub rh: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "DoctorID", default)]
    pub doctor_id: Option<String>,
    #[serde(rename = "DoctorName", default)]
    pub doctor_name: Option<String>,
    #[serde(rename = "LocationID", default)]
    pub location_id: Option<String>,
    #[serde(rename = "LocationName", default)]
    pub location_name: Option<String>,
    #[serde(rename = "ListOrder", default)]
    pub list_order: Vec<OrderItemRequest>,
}

/// オーダー明細用のリクエストDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemRequest {
    #[serde(rename = "ElementID", default)]
    pub element_id: String,
    #[serde(rename = "Quantity", default)]
    pub quantity: Option<String>,
    #[serde(rename = "Volume", default)]
    pub volume_ml: i64,
}

impl PatientOrderRequest {
    /// ドメインの患者オーダーへ変換
    /// 欠落した必須項目は空文字列として渡し、検証サービスに報告させる
    pub fn into_order(self) -> PatientOrder {
        PatientOrder::new(
            self.pid.unwrap_or_default(),
            self.order_id.unwrap_or_default(),
            self.patient_name.unwrap_or_default(),
            self.insure_number,
            self.treatment_code,
            self.order_date.unwrap_or_default(),
            self.age.unwrap_or_default(),
            self.sex.unwrap_or_default(),
            self.blood_group,
            self.rh,
            self.address,
            self.doctor_id,
            self.doctor_name,
            self.location_id,
            self.location_name,
            self.list_order
                .into_iter()
                .map(|item| {
                    OrderLine::new(
                        item.element_id,
                        item.quantity.unwrap_or_default(),
                        item.volume_ml,
                    )
                })
                .collect(),
        )
    }
}

/// 在庫レコード作成・更新用のリクエストDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct InventoryItemRequest {
    #[serde(rename = "ABO", default)]
    pub abo: Option<String>,
    #[serde(rename = "Rh", default)]
    pub rh: Option<String>,
    #[serde(rename = "ElementID", default)]
    pub element_id: Option<String>,
    #[serde(rename = "ElementName", default)]
    pub element_name: Option<String>,
    #[serde(rename = "Volume", default)]
    pub volume_ml: i64,
    #[serde(rename = "Quantity", default)]
    pub quantity: i64,
}

impl InventoryItemRequest {
    /// ドメインの在庫レコードへ変換
    /// 項目値の検証は型付きコンストラクタに委ねる
    pub fn into_record(self) -> Result<InventoryRecord, DomainError> {
        let blood_group = BloodGroup::from_string(self.abo.unwrap_or_default().trim())?;
        let rh = RhFactor::from_string(self.rh.unwrap_or_default().trim())?;

        let volume_ml = u32::try_from(self.volume_ml).map_err(|_| {
            DomainError::InvalidValue(format!(
                "容量（Volume）は0より大きい値を指定してください（受領値: {}）",
                self.volume_ml
            ))
        })?;
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            DomainError::InvalidValue(format!(
                "数量（Quantity）は0以上の値を指定してください（受領値: {}）",
                self.quantity
            ))
        })?;

        InventoryRecord::new(
            blood_group,
            rh,
            self.element_id.unwrap_or_default(),
            self.element_name.unwrap_or_default(),
            volume_ml,
            quantity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_query_request_deserialization() {
        let json = r#"{ "ABO": "O", "Rh": "+", "ElementID": "RBC", "Volume": 250 }"#;
        let request: InventoryQueryRequest = serde_json::from_str(json).unwrap();
        let filter = request.into_filter();
        assert_eq!(filter.abo(), Some("O"));
        assert_eq!(filter.volume_ml(), Some(250));
    }

    #[test]
    fn test_inventory_query_request_empty_body_is_empty_filter() {
        let request: InventoryQueryRequest = serde_json::from_str("{}").unwrap();
        assert!(request.into_filter().is_empty());
    }

    #[test]
    fn test_patient_order_request_uses_legacy_field_names() {
        let json = r#"{
            "PID": "P001",
            "OrderID": "ORD-001",
            "PatientName": "山田太郎",
            "TREATMENT_CODE": "T42",
            "OrderDate": "2024-01-15 10:30:00",
            "Age": "45",
            "Sex": "M",
            "BloodGroup": "O",
            "Rh": "+",
            "ListOrder": [
                { "ElementID": "RBC", "Quantity": "2", "Volume": 250 }
            ]
        }"#;
        let request: PatientOrderRequest = serde_json::from_str(json).unwrap();
        let order = request.into_order();
        assert_eq!(order.pid(), "P001");
        assert_eq!(order.treatment_code(), Some("T42"));
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].quantity(), "2");
        assert_eq!(order.items()[0].volume_ml(), 250);
    }

    #[test]
    fn test_patient_order_request_missing_fields_become_empty() {
        let request: PatientOrderRequest = serde_json::from_str("{}").unwrap();
        let order = request.into_order();
        assert_eq!(order.pid(), "");
        assert_eq!(order.blood_group(), None);
        assert!(order.items().is_empty());
    }

    #[test]
    fn test_inventory_item_request_into_record() {
        let json = r#"{
            "ABO": "A",
            "Rh": "-",
            "ElementID": "FFP",
            "ElementName": "新鮮凍結血漿",
            "Volume": 200,
            "Quantity": 3
        }"#;
        let request: InventoryItemRequest = serde_json::from_str(json).unwrap();
        let record = request.into_record().unwrap();
        assert_eq!(record.blood_group(), BloodGroup::A);
        assert_eq!(record.rh(), RhFactor::Negative);
        assert_eq!(record.volume_ml(), 200);
        assert_eq!(record.quantity(), 3);
    }

    #[test]
    fn test_inventory_item_request_invalid_blood_group() {
        let request = InventoryItemRequest {
            abo: Some("Z".to_string()),
            rh: Some("+".to_string()),
            element_id: Some("RBC".to_string()),
            element_name: None,
            volume_ml: 250,
            quantity: 1,
        };
        assert!(request.into_record().is_err());
    }

    #[test]
    fn test_inventory_item_request_negative_quantity() {
        let request = InventoryItemRequest {
            abo: Some("O".to_string()),
            rh: Some("+".to_string()),
            element_id: Some("RBC".to_string()),
            element_name: None,
            volume_ml: 250,
            quantity: -1,
        };
        assert!(request.into_record().is_err());
    }
}
