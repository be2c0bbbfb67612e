// ドキュメントのシリアライゼーション
// 永続化表現（レガシー互換のPascalCaseフィールド名）とドメインモデルの相互変換

use crate::domain::model::{
    BloodGroup, Document, InventoryRecord, OrderLine, PatientOrder, RecordId, RhFactor,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// シリアライゼーションエラー
#[derive(Debug, Clone, PartialEq)]
pub enum SerializationError {
    /// エンコード失敗
    Encode(String),
    /// デコード失敗（JSONとして不正、またはスキーマ違反）
    Decode(String),
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializationError::Encode(msg) => write!(f, "Serialization failed: {}", msg),
            SerializationError::Decode(msg) => write!(f, "Deserialization failed: {}", msg),
        }
    }
}

impl std::error::Error for SerializationError {}

/// ドキュメント全体の永続化表現
/// セクションが存在しない場合は空のリストとしてデコードする
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(rename = "Inventory", default)]
    pub inventory: Vec<InventoryRecordData>,
    #[serde(rename = "PatientOrders", default)]
    pub patient_orders: Vec<PatientOrderData>,
}

/// 在庫レコードの永続化表現
/// `Id` を持たないレガシードキュメントはデコード時に新しいIDを採番する
#[derive(Debug, Serialize, Deserialize)]
pub struct InventoryRecordData {
    #[serde(rename = "Id", default)]
    pub id: Option<Uuid>,
    #[serde(rename = "ABO")]
    pub abo: String,
    #[serde(rename = "Rh")]
    pub rh: String,
    #[serde(rename = "ElementID")]
    pub element_id: String,
    #[serde(rename = "ElementName", default)]
    pub element_name: String,
    #[serde(rename = "Volume")]
    pub volume_ml: u32,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
}

/// 患者オーダーの永続化表現
#[derive(Debug, Serialize, Deserialize)]
pub struct PatientOrderData {
    #[serde(rename = "Id", default)]
    pub id: Option<Uuid>,
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
    pub list_order: Vec<OrderLineData>,
}

/// オーダー明細の永続化表現
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderLineData {
    #[serde(rename = "ElementID", default)]
    pub element_id: String,
    #[serde(rename = "Quantity", default)]
    pub quantity: Option<String>,
    #[serde(rename = "Volume", default)]
    pub volume_ml: i64,
}

impl InventoryRecordData {
    /// ドメインオブジェクトから永続化表現を作成
    pub fn from_record(record: &InventoryRecord) -> Self {
        Self {
            id: Some(record.id().as_uuid()),
            abo: record.blood_group().as_str().to_string(),
            rh: record.rh().as_str().to_string(),
            element_id: record.element_id().to_string(),
            element_name: record.element_name().to_string(),
            volume_ml: record.volume_ml(),
            quantity: record.quantity(),
        }
    }

    /// 永続化表現からドメインオブジェクトを再構築
    pub fn into_record(self) -> Result<InventoryRecord, SerializationError> {
        let blood_group = BloodGroup::from_string(&self.abo)
            .map_err(|e| SerializationError::Decode(e.to_string()))?;
        let rh = RhFactor::from_string(&self.rh)
            .map_err(|e| SerializationError::Decode(e.to_string()))?;
        let id = self.id.map(RecordId::from_uuid).unwrap_or_default();
        Ok(InventoryRecord::reconstruct(
            id,
            blood_group,
            rh,
            self.element_id,
            self.element_name,
            self.volume_ml,
            self.quantity,
        ))
    }
}

impl PatientOrderData {
    /// ドメインオブジェクトから永続化表現を作成
    pub fn from_order(order: &PatientOrder) -> Self {
        Self {
            id: Some(order.id().as_uuid()),
            pid: Some(order.pid().to_string()),
            order_id: Some(order.order_id().to_string()),
            patient_name: Some(order.patient_name().to_string()),
            insure_number: order.insure_number().map(str::to_string),
            treatment_code: order.treatment_code().map(str::to_string),
            order_date: Some(order.order_date().to_string()),
            age: Some(order.age().to_string()),
            sex: Some(order.sex().to_string()),
            blood_group: order.blood_group().map(str::to_string),
            rh: order.rh().map(str::to_string),
            address: order.address().map(str::to_string),
            doctor_id: order.doctor_id().map(str::to_string),
            doctor_name: order.doctor_name().map(str::to_string),
            location_id: order.location_id().map(str::to_string),
            location_name: order.location_name().map(str::to_string),
            list_order: order.items().iter().map(OrderLineData::from_line).collect(),
        }
    }

    /// 永続化表現からドメインオブジェクトを再構築
    pub fn into_order(self) -> PatientOrder {
        let id = self.id.map(RecordId::from_uuid).unwrap_or_default();
        PatientOrder::reconstruct(
            id,
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
            self.list_order.into_iter().map(OrderLineData::into_line).collect(),
        )
    }
}

impl OrderLineData {
    /// ドメインオブジェクトから永続化表現を作成
    pub fn from_line(line: &OrderLine) -> Self {
        Self {
            element_id: line.element_id().to_string(),
            quantity: Some(line.quantity().to_string()),
            volume_ml: line.volume_ml(),
        }
    }

    /// 永続化表現からドメインオブジェクトを再構築
    pub fn into_line(self) -> OrderLine {
        OrderLine::new(
            self.element_id,
            self.quantity.unwrap_or_default(),
            self.volume_ml,
        )
    }
}

/// ドキュメントシリアライザー
/// ドキュメント全体をJSON文字列と相互変換する
pub struct DocumentSerializer;

impl DocumentSerializer {
    /// 新しいシリアライザーを作成
    pub fn new() -> Self {
        Self
    }

    /// ドキュメント全体をJSON文字列にシリアライズ
    /// 保存内容は常に全置換であるため、整形済みJSONとして出力する
    pub fn serialize_document(&self, document: &Document) -> Result<String, SerializationError> {
        let data = DocumentData {
            inventory: document
                .inventory()
                .iter()
                .map(InventoryRecordData::from_record)
                .collect(),
            patient_orders: document
                .patient_orders()
                .iter()
                .map(PatientOrderData::from_order)
                .collect(),
        };
        serde_json::to_string_pretty(&data).map_err(|e| SerializationError::Encode(e.to_string()))
    }

    /// JSON文字列からドキュメント全体をデシリアライズ
    /// セクションが存在しない場合は空のリストとして扱う
    pub fn deserialize_document(&self, json: &str) -> Result<Document, SerializationError> {
        let data: DocumentData =
            serde_json::from_str(json).map_err(|e| SerializationError::Decode(e.to_string()))?;

        let mut inventory = Vec::with_capacity(data.inventory.len());
        for record_data in data.inventory {
            inventory.push(record_data.into_record()?);
        }

        let patient_orders = data
            .patient_orders
            .into_iter()
            .map(PatientOrderData::into_order)
            .collect();

        Ok(Document::reconstruct(inventory, patient_orders))
    }
}

impl Default for DocumentSerializer {
    fn default() -> Self {
        Self::new()
    }
}
