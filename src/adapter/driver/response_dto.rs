use crate::domain::model::{Document, InventoryRecord, OrderLine, PatientOrder};
use serde::{Deserialize, Serialize};

/// オーダー受付結果のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct PatientOrderResponse {
    #[serde(rename = "IsSuccess")]
    pub is_success: bool,
    #[serde(rename = "ErrorMessage")]
    pub error_message: String,
}

impl PatientOrderResponse {
    /// 受理成功のレスポンスを作成
    pub fn success() -> Self {
        Self {
            is_success: true,
            error_message: String::new(),
        }
    }

    /// 受理失敗のレスポンスを作成
    pub fn failure(error_message: String) -> Self {
        Self {
            is_success: false,
            error_message,
        }
    }
}

/// 在庫照会のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct InventoryQueryResponse {
    #[serde(rename = "IsSuccess")]
    pub is_success: bool,
    #[serde(rename = "ErrorMessage")]
    pub error_message: Option<String>,
    #[serde(rename = "InventoryInfo")]
    pub inventory_info: Vec<InventoryInfoResponse>,
}

/// 在庫レコード用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct InventoryInfoResponse {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "ABO")]
    pub abo: String,
    #[serde(rename = "Rh")]
    pub rh: String,
    #[serde(rename = "ElementID")]
    pub element_id: String,
    #[serde(rename = "ElementName")]
    pub element_name: String,
    #[serde(rename = "Volume")]
    pub volume_ml: u32,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
}

impl InventoryInfoResponse {
    /// ドメインオブジェクトからInventoryInfoResponseを作成
    pub fn from_record(record: &InventoryRecord) -> Self {
        Self {
            id: record.id().to_string(),
            abo: record.blood_group().as_str().to_string(),
            rh: record.rh().as_str().to_string(),
            element_id: record.element_id().to_string(),
            element_name: record.element_name().to_string(),
            volume_ml: record.volume_ml(),
            quantity: record.quantity(),
        }
    }
}

/// 患者オーダー用のレスポンスDTO
/// 受領時のPascalCaseフィールド名のまま返す
#[derive(Debug, Serialize, Deserialize)]
pub struct PatientOrderView {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "PID")]
    pub pid: String,
    #[serde(rename = "OrderID")]
    pub order_id: String,
    #[serde(rename = "PatientName")]
    pub patient_name: String,
    #[serde(rename = "InsureNumber")]
    pub insure_number: Option<String>,
    #[serde(rename = "TREATMENT_CODE")]
    pub treatment_code: Option<String>,
    #[serde(rename = "OrderDate")]
    pub order_date: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "BloodGroup")]
    pub blood_group: Option<String>,
    #[serde(rename = "Rh")]
    pub rh: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "DoctorID")]
    pub doctor_id: Option<String>,
    #[serde(rename = "DoctorName")]
    pub doctor_name: Option<String>,
    #[serde(rename = "LocationID")]
    pub location_id: Option<String>,
    #[serde(rename = "LocationName")]
    pub location_name: Option<String>,
    #[serde(rename = "ListOrder")]
    pub list_order: Vec<OrderItemView>,
}

/// オーダー明細用のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemView {
    #[serde(rename = "ElementID")]
    pub element_id: String,
    #[serde(rename = "Quantity")]
    pub quantity: String,
    #[serde(rename = "Volume")]
    pub volume_ml: i64,
}

impl PatientOrderView {
    /// ドメインオブジェクトからPatientOrderViewを作成
    pub fn from_order(order: &PatientOrder) -> Self {
        Self {
            id: order.id().to_string(),
            pid: order.pid().to_string(),
            order_id: order.order_id().to_string(),
            patient_name: order.patient_name().to_string(),
            insure_number: order.insure_number().map(str::to_string),
            treatment_code: order.treatment_code().map(str::to_string),
            order_date: order.order_date().to_string(),
            age: order.age().to_string(),
            sex: order.sex().to_string(),
            blood_group: order.blood_group().map(str::to_string),
            rh: order.rh().map(str::to_string),
            address: order.address().map(str::to_string),
            doctor_id: order.doctor_id().map(str::to_string),
            doctor_name: order.doctor_name().map(str::to_string),
            location_id: order.location_id().map(str::to_string),
            location_name: order.location_name().map(str::to_string),
            list_order: order.items().iter().map(OrderItemView::from_line).collect(),
        }
    }
}

impl OrderItemView {
    /// ドメインオブジェクトからOrderItemViewを作成
    pub fn from_line(line: &OrderLine) -> Self {
        Self {
            element_id: line.element_id().to_string(),
            quantity: line.quantity().to_string(),
            volume_ml: line.volume_ml(),
        }
    }
}

/// ドキュメント全体のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct AllDataResponse {
    #[serde(rename = "inventory")]
    pub inventory: Vec<InventoryInfoResponse>,
    #[serde(rename = "patientOrders")]
    pub patient_orders: Vec<PatientOrderView>,
}

impl AllDataResponse {
    /// ドキュメントからAllDataResponseを作成
    pub fn from_document(document: &Document) -> Self {
        Self {
            inventory: document
                .inventory()
                .iter()
                .map(InventoryInfoResponse::from_record)
                .collect(),
            patient_orders: document
                .patient_orders()
                .iter()
                .map(PatientOrderView::from_order)
                .collect(),
        }
    }
}

/// CRUD操作結果のレスポンスDTO
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse {
    #[serde(rename = "IsSuccess")]
    pub is_success: bool,
    #[serde(rename = "ErrorMessage")]
    pub error_message: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MutationResponse {
    /// 成功のレスポンスを作成
    pub fn success(message: &str) -> Self {
        Self {
            is_success: true,
            error_message: String::new(),
            message: message.to_string(),
            id: None,
        }
    }

    /// 作成されたレコードIDを含む成功のレスポンスを作成
    pub fn created(message: &str, id: String) -> Self {
        Self {
            is_success: true,
            error_message: String::new(),
            message: message.to_string(),
            id: Some(id),
        }
    }

    /// 失敗のレスポンスを作成
    pub fn failure(error_message: String) -> Self {
        Self {
            is_success: false,
            error_message,
            message: String::new(),
            id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BloodGroup, RhFactor};

    #[test]
    fn test_inventory_info_response_serialization() {
        let record = InventoryRecord::new(
            BloodGroup::O,
            RhFactor::Positive,
            "RBC".to_string(),
            "赤血球濃厚液".to_string(),
            250,
            5,
        )
        .unwrap();

        let response = InventoryInfoResponse::from_record(&record);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"ABO\":\"O\""));
        assert!(json.contains("\"Rh\":\"+\""));
        assert!(json.contains("\"ElementID\":\"RBC\""));
        assert!(json.contains("\"Volume\":250"));
        assert!(json.contains("\"Quantity\":5"));
        assert!(json.contains("\"Id\""));
    }

    #[test]
    fn test_patient_order_response_envelope() {
        let success = PatientOrderResponse::success();
        let json = serde_json::to_string(&success).unwrap();
        assert!(json.contains("\"IsSuccess\":true"));
        assert!(json.contains("\"ErrorMessage\":\"\""));

        let failure = PatientOrderResponse::failure("在庫が不足しています".to_string());
        let json = serde_json::to_string(&failure).unwrap();
        assert!(json.contains("\"IsSuccess\":false"));
        assert!(json.contains("在庫が不足しています"));
    }

    #[test]
    fn test_mutation_response_id_omitted_when_absent() {
        let response = MutationResponse::success("在庫レコードを更新しました");
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("\"Id\""));

        let response = MutationResponse::created("在庫レコードを作成しました", "abc".to_string());
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"Id\":\"abc\""));
    }
}
