use crate::application::ApplicationError;
use crate::domain::model::{Document, PatientOrder};
use crate::domain::port::DocumentStore;
use std::sync::Arc;

/// オーダークエリサービス
/// 読み取り専用のオーダー操作とドキュメント全体の取得を提供する
pub struct OrderQueryService {
    store: Arc<dyn DocumentStore>,
}

impl OrderQueryService {
    /// 新しいオーダークエリサービスを作成
    ///
    /// # Arguments
    /// * `store` - ドキュメントストア
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// すべての患者オーダーを取得
    /// 受理順（ドキュメント順）で返す
    ///
    /// # Returns
    /// * `Ok(Vec<PatientOrder>)` - 患者オーダーのリスト
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_all_orders(&self) -> Result<Vec<PatientOrder>, ApplicationError> {
        let document = self.store.load().await?;
        Ok(document.patient_orders().to_vec())
    }

    /// ドキュメント全体のスナップショットを取得
    ///
    /// # Returns
    /// * `Ok(Document)` - 在庫列とオーダー列を含むドキュメント
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_document(&self) -> Result<Document, ApplicationError> {
        self.store.load().await.map_err(ApplicationError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BloodGroup, InventoryRecord, OrderLine, RhFactor};
    use crate::domain::port::StoreError;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    // テスト用のインメモリドキュメントストア
    struct InMemoryDocumentStore {
        document: Mutex<Document>,
    }

    impl InMemoryDocumentStore {
        fn new(document: Document) -> Self {
            Self {
                document: Mutex::new(document),
            }
        }
    }

    #[async_trait]
    impl DocumentStore for InMemoryDocumentStore {
        async fn load(&self) -> Result<Document, StoreError> {
            Ok(self.document.lock().await.clone())
        }

        async fn save(&self, document: &Document) -> Result<(), StoreError> {
            *self.document.lock().await = document.clone();
            Ok(())
        }
    }

    fn sample_order() -> PatientOrder {
        PatientOrder::new(
            "P001".to_string(),
            "ORD-001".to_string(),
            "山田太郎".to_string(),
            None,
            None,
            "2024-01-15 10:30:00".to_string(),
            "45".to_string(),
            "M".to_string(),
            Some("O".to_string()),
            Some("+".to_string()),
            None,
            None,
            None,
            None,
            None,
            vec![OrderLine::new("RBC".to_string(), "2".to_string(), 250)],
        )
    }

    #[tokio::test]
    async fn test_get_all_orders() {
        let store = Arc::new(InMemoryDocumentStore::new(Document::reconstruct(
            Vec::new(),
            vec![sample_order()],
        )));
        let service = OrderQueryService::new(store);

        let orders = service.get_all_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id(), "ORD-001");
    }

    #[tokio::test]
    async fn test_get_document_returns_both_sections() {
        let record = InventoryRecord::new(
            BloodGroup::O,
            RhFactor::Positive,
            "RBC".to_string(),
            "赤血球濃厚液".to_string(),
            250,
            5,
        )
        .unwrap();
        let store = Arc::new(InMemoryDocumentStore::new(Document::reconstruct(
            vec![record],
            vec![sample_order()],
        )));
        let service = OrderQueryService::new(store);

        let document = service.get_document().await.unwrap();
        assert_eq!(document.inventory().len(), 1);
        assert_eq!(document.patient_orders().len(), 1);
    }
}
