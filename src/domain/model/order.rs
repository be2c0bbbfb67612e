use crate::domain::model::{OrderLine, RecordId};

/// 患者オーダーエンティティ
/// 受領した輸血オーダーを受領時の表現のまま保持する
///
/// 受理が唯一の状態遷移であり、受理後は履歴として不変になる。
/// 年齢やオーダー日時などの項目は外部システムの契約に合わせて
/// 文字列表現のまま保持し、検証サービスで解釈する。
#[derive(Debug, Clone, PartialEq)]
pub struct PatientOrder {
    id: RecordId,
    pid: String,
    order_id: String,
    patient_name: String,
    insure_number: Option<String>,
    treatment_code: Option<String>,
    order_date: String,
    age: String,
    sex: String,
    blood_group: Option<String>,
    rh: Option<String>,
    address: Option<String>,
    doctor_id: Option<String>,
    doctor_name: Option<String>,
    location_id: Option<String>,
    location_name: Option<String>,
    items: Vec<OrderLine>,
}

impl PatientOrder {
    /// 新しい患者オーダーを作成
    /// RecordIdは作成時に採番される
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pid: String,
        order_id: String,
        patient_name: String,
        insure_number: Option<String>,
        treatment_code: Option<String>,
        order_date: String,
        age: String,
        sex: String,
        blood_group: Option<String>,
        rh: Option<String>,
        address: Option<String>,
        doctor_id: Option<String>,
        doctor_name: Option<String>,
        location_id: Option<String>,
        location_name: Option<String>,
        items: Vec<OrderLine>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            pid,
            order_id,
            patient_name,
            insure_number,
            treatment_code,
            order_date,
            age,
            sex,
            blood_group,
            rh,
            address,
            doctor_id,
            doctor_name,
            location_id,
            location_name,
            items,
        }
    }

    /// 保存済みデータから患者オーダーを再構築
    /// ドキュメントストアでの使用を想定
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: RecordId,
        pid: String,
        order_id: String,
        patient_name: String,
        insure_number: Option<String>,
        treatment_code: Option<String>,
        order_date: String,
        age: String,
        sex: String,
        blood_group: Option<String>,
        rh: Option<String>,
        address: Option<String>,
        doctor_id: Option<String>,
        doctor_name: Option<String>,
        location_id: Option<String>,
        location_name: Option<String>,
        items: Vec<OrderLine>,
    ) -> Self {
        Self {
            id,
            pid,
            order_id,
            patient_name,
            insure_number,
            treatment_code,
            order_date,
            age,
            sex,
            blood_group,
            rh,
            address,
            doctor_id,
            doctor_name,
            location_id,
            location_name,
            items,
        }
    }

    /// レコードIDを取得
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// 患者番号（PID）を取得
    pub fn pid(&self) -> &str {
        &self.pid
    }

    /// オーダー番号を取得
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// 患者氏名を取得
    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    /// 保険証番号を取得
    pub fn insure_number(&self) -> Option<&str> {
        self.insure_number.as_deref()
    }

    /// 治療コードを取得
    pub fn treatment_code(&self) -> Option<&str> {
        self.treatment_code.as_deref()
    }

    /// オーダー指示日時（文字列表現）を取得
    pub fn order_date(&self) -> &str {
        &self.order_date
    }

    /// 年齢（文字列表現）を取得
    pub fn age(&self) -> &str {
        &self.age
    }

    /// 性別コードを取得
    pub fn sex(&self) -> &str {
        &self.sex
    }

    /// 要求血液型を取得
    pub fn blood_group(&self) -> Option<&str> {
        self.blood_group.as_deref()
    }

    /// 要求Rh因子を取得
    pub fn rh(&self) -> Option<&str> {
        self.rh.as_deref()
    }

    /// 住所を取得
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// 指示医IDを取得
    pub fn doctor_id(&self) -> Option<&str> {
        self.doctor_id.as_deref()
    }

    /// 指示医氏名を取得
    pub fn doctor_name(&self) -> Option<&str> {
        self.doctor_name.as_deref()
    }

    /// 病棟IDを取得
    pub fn location_id(&self) -> Option<&str> {
        self.location_id.as_deref()
    }

    /// 病棟名を取得
    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    /// オーダー明細のリストを取得
    pub fn items(&self) -> &[OrderLine] {
        &self.items
    }
}
