mod inventory_query_service;
mod order_query_service;

pub use inventory_query_service::InventoryQueryService;
pub use order_query_service::OrderQueryService;

use crate::application::ApplicationError;
use crate::domain::model::{InventoryRecord, PatientOrder, RecordId};
use crate::domain::port::DocumentStore;
use crate::domain::service::OrderValidator;
use std::sync::Arc;
use tokio::sync::Mutex;

/// ドキュメント書き込みロック
/// すべての変更系操作は「ロード → メモリ上で変更 → セーブ」の周期全体を
/// このロックの下で実行する。2つの同時受理が同じ保存前スナップショットを
/// 読み込み、後勝ちで互いの引き落としを上書きする失われた更新を防ぐ。
pub type DocumentWriteLock = Arc<Mutex<()>>;

/// オーダーアプリケーションサービス
/// オーダー受理（検証と在庫引き落とし）とオーダーのCRUDを提供する
pub struct OrderApplicationService {
    store: Arc<dyn DocumentStore>,
    write_lock: DocumentWriteLock,
}

impl OrderApplicationService {
    /// 新しいオーダーアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `store` - ドキュメントストア
    /// * `write_lock` - 変更系操作で共有するドキュメント書き込みロック
    pub fn new(store: Arc<dyn DocumentStore>, write_lock: DocumentWriteLock) -> Self {
        Self { store, write_lock }
    }

    /// 輸血オーダーを受理する
    ///
    /// 処理の流れ:
    /// 1. 構造検証（入出力なし、ロック外）
    /// 2. 書き込みロックを取得
    /// 3. ドキュメントの最新スナップショットをロード
    /// 4. 同一スナップショットに対して在庫充足を検証
    /// 5. 在庫を引き落とし、オーダーを追記（全部成功か全部失敗）
    /// 6. ドキュメント全体をセーブ
    ///
    /// セーブ前のあらゆる失敗は永続状態に影響しない。
    ///
    /// # Returns
    /// * `Ok(())` - 受理成功
    /// * `Err(ApplicationError)` - 検証失敗または永続化失敗
    pub async fn submit_order(&self, order: PatientOrder) -> Result<(), ApplicationError> {
        OrderValidator::validate_structure(&order)?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;
        OrderValidator::validate_stock(&order, &document)?;
        document.fulfill_order(order)?;
        self.store.save(&document).await?;
        Ok(())
    }

    /// 患者オーダーを直接作成する（在庫の引き落としは行わない）
    /// 構造検証のみを通過させるレガシー互換の登録経路
    ///
    /// # Returns
    /// * `Ok(RecordId)` - 作成されたオーダーのID
    /// * `Err(ApplicationError)` - 検証失敗または永続化失敗
    pub async fn create_order(&self, order: PatientOrder) -> Result<RecordId, ApplicationError> {
        OrderValidator::validate_structure(&order)?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;
        let id = order.id();
        document.add_patient_order(order);
        self.store.save(&document).await?;
        Ok(id)
    }

    /// 指定IDの患者オーダーを更新する
    ///
    /// # Returns
    /// * `Ok(())` - 更新成功
    /// * `Err(ApplicationError::NotFound)` - 指定IDのオーダーが存在しない
    pub async fn update_order(
        &self,
        id: RecordId,
        order: PatientOrder,
    ) -> Result<(), ApplicationError> {
        OrderValidator::validate_structure(&order)?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;
        if !document.replace_patient_order(id, order) {
            return Err(ApplicationError::NotFound(format!(
                "患者オーダーが見つかりません: {}",
                id
            )));
        }
        self.store.save(&document).await?;
        Ok(())
    }

    /// 指定IDの患者オーダーを削除する
    ///
    /// # Returns
    /// * `Ok(())` - 削除成功
    /// * `Err(ApplicationError::NotFound)` - 指定IDのオーダーが存在しない
    pub async fn delete_order(&self, id: RecordId) -> Result<(), ApplicationError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;
        if !document.remove_patient_order(id) {
            return Err(ApplicationError::NotFound(format!(
                "患者オーダーが見つかりません: {}",
                id
            )));
        }
        self.store.save(&document).await?;
        Ok(())
    }
}

/// 在庫アプリケーションサービス
/// 在庫レコードのCRUDを提供する
pub struct InventoryApplicationService {
    store: Arc<dyn DocumentStore>,
    write_lock: DocumentWriteLock,
}

impl InventoryApplicationService {
    /// 新しい在庫アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `store` - ドキュメントストア
    /// * `write_lock` - 変更系操作で共有するドキュメント書き込みロック
    pub fn new(store: Arc<dyn DocumentStore>, write_lock: DocumentWriteLock) -> Self {
        Self { store, write_lock }
    }

    /// 新しい在庫レコードを作成する
    ///
    /// # Returns
    /// * `Ok(RecordId)` - 作成されたレコードのID
    /// * `Err(ApplicationError)` - 永続化失敗
    pub async fn create_record(
        &self,
        record: InventoryRecord,
    ) -> Result<RecordId, ApplicationError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;
        let id = record.id();
        document.add_inventory_record(record);
        self.store.save(&document).await?;
        Ok(id)
    }

    /// 指定IDの在庫レコードを更新する
    /// レコードIDは維持される
    ///
    /// # Returns
    /// * `Ok(())` - 更新成功
    /// * `Err(ApplicationError::NotFound)` - 指定IDのレコードが存在しない
    pub async fn update_record(
        &self,
        id: RecordId,
        record: InventoryRecord,
    ) -> Result<(), ApplicationError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;
        if !document.replace_inventory_record(id, record) {
            return Err(ApplicationError::NotFound(format!(
                "在庫レコードが見つかりません: {}",
                id
            )));
        }
        self.store.save(&document).await?;
        Ok(())
    }

    /// 指定IDの在庫レコードを削除する
    ///
    /// # Returns
    /// * `Ok(())` - 削除成功
    /// * `Err(ApplicationError::NotFound)` - 指定IDのレコードが存在しない
    pub async fn delete_record(&self, id: RecordId) -> Result<(), ApplicationError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;
        if !document.remove_inventory_record(id) {
            return Err(ApplicationError::NotFound(format!(
                "在庫レコードが見つかりません: {}",
                id
            )));
        }
        self.store.save(&document).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::domain::model::{BloodGroup, Document, OrderLine, RhFactor};
    use crate::domain::port::StoreError;
    use async_trait::async_trait;

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

        async fn snapshot(&self) -> Document {
            self.document.lock().await.clone()
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

    fn stocked_document() -> Document {
        Document::reconstruct(
            vec![InventoryRecord::new(
                BloodGroup::O,
                RhFactor::Positive,
                "RBC".to_string(),
                "赤血球濃厚液".to_string(),
                250,
                5,
            )
            .unwrap()],
            Vec::new(),
        )
    }

    fn valid_order(quantity: &str) -> PatientOrder {
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
            vec![OrderLine::new("RBC".to_string(), quantity.to_string(), 250)],
        )
    }

    fn build_services(
        document: Document,
    ) -> (
        Arc<InMemoryDocumentStore>,
        OrderApplicationService,
        InventoryApplicationService,
    ) {
        let store = Arc::new(InMemoryDocumentStore::new(document));
        let write_lock: DocumentWriteLock = Arc::new(Mutex::new(()));
        let order_service =
            OrderApplicationService::new(store.clone(), write_lock.clone());
        let inventory_service =
            InventoryApplicationService::new(store.clone(), write_lock);
        (store, order_service, inventory_service)
    }

    #[tokio::test]
    async fn test_submit_order_deducts_stock_and_appends_order() {
        let (store, order_service, _) = build_services(stocked_document());

        let result = order_service.submit_order(valid_order("2")).await;
        assert!(result.is_ok());

        let document = store.snapshot().await;
        assert_eq!(document.inventory()[0].quantity(), 3);
        assert_eq!(document.patient_orders().len(), 1);
        assert_eq!(document.patient_orders()[0].order_id(), "ORD-001");
    }

    #[tokio::test]
    async fn test_submit_order_insufficient_stock_rejected_without_mutation() {
        let (store, order_service, _) = build_services(stocked_document());

        let result = order_service.submit_order(valid_order("10")).await;
        assert!(matches!(
            result,
            Err(ApplicationError::DomainError(DomainError::InsufficientStock(_)))
        ));

        let document = store.snapshot().await;
        assert_eq!(document.inventory()[0].quantity(), 5);
        assert!(document.patient_orders().is_empty());
    }

    #[tokio::test]
    async fn test_submit_order_structural_failure_before_any_io() {
        let (store, order_service, _) = build_services(stocked_document());

        let invalid = PatientOrder::new(
            "P001".to_string(),
            "ORD-001".to_string(),
            "山田太郎".to_string(),
            None,
            None,
            "2024-01-15 10:30:00".to_string(),
            "45".to_string(),
            "X".to_string(), // 不正な性別コード
            Some("O".to_string()),
            Some("+".to_string()),
            None,
            None,
            None,
            None,
            None,
            vec![OrderLine::new("RBC".to_string(), "2".to_string(), 250)],
        );

        let result = order_service.submit_order(invalid).await;
        let err = match result {
            Err(ApplicationError::DomainError(e)) => e,
            other => panic!("unexpected result: {:?}", other),
        };
        assert!(err.message().contains("Sex"));

        let document = store.snapshot().await;
        assert_eq!(document.inventory()[0].quantity(), 5);
        assert!(document.patient_orders().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_submissions_never_over_deduct() {
        // 在庫5単位に対して3単位の受理を2件同時に実行した場合、
        // 成功するのは必ず1件のみで、合計引き落としが在庫を超えることはない
        let (store, order_service, _) = build_services(stocked_document());
        let service = Arc::new(order_service);

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.submit_order(valid_order("3")).await })
        };
        let second = {
            let service = service.clone();
            tokio::spawn(async move { service.submit_order(valid_order("3")).await })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(succeeded, 1);

        let document = store.snapshot().await;
        assert_eq!(document.inventory()[0].quantity(), 2);
        assert_eq!(document.patient_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_create_order_does_not_deduct_stock() {
        let (store, order_service, _) = build_services(stocked_document());

        let result = order_service.create_order(valid_order("2")).await;
        assert!(result.is_ok());

        let document = store.snapshot().await;
        assert_eq!(document.inventory()[0].quantity(), 5);
        assert_eq!(document.patient_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_update_order_unknown_id_is_not_found() {
        let (_, order_service, _) = build_services(stocked_document());

        let result = order_service
            .update_order(RecordId::new(), valid_order("2"))
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_order_roundtrip() {
        let (store, order_service, _) = build_services(stocked_document());

        let id = order_service.create_order(valid_order("2")).await.unwrap();
        assert!(order_service.delete_order(id).await.is_ok());

        let document = store.snapshot().await;
        assert!(document.patient_orders().is_empty());

        let result = order_service.delete_order(id).await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_inventory_crud_by_id() {
        let (store, _, inventory_service) = build_services(Document::default());

        let record = InventoryRecord::new(
            BloodGroup::A,
            RhFactor::Negative,
            "FFP".to_string(),
            "新鮮凍結血漿".to_string(),
            200,
            3,
        )
        .unwrap();
        let id = inventory_service.create_record(record).await.unwrap();

        let updated = InventoryRecord::new(
            BloodGroup::A,
            RhFactor::Negative,
            "FFP".to_string(),
            "新鮮凍結血漿".to_string(),
            200,
            9,
        )
        .unwrap();
        assert!(inventory_service.update_record(id, updated).await.is_ok());

        let document = store.snapshot().await;
        assert_eq!(document.inventory()[0].id(), id);
        assert_eq!(document.inventory()[0].quantity(), 9);

        assert!(inventory_service.delete_record(id).await.is_ok());
        let result = inventory_service.delete_record(id).await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }
}
