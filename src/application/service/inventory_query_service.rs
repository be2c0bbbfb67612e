use crate::application::ApplicationError;
use crate::domain::model::{InventoryFilter, InventoryRecord};
use crate::domain::port::DocumentStore;
use std::sync::Arc;

/// 在庫クエリサービス
/// 読み取り専用の在庫操作を提供する
///
/// 読み取りは書き込みロックを取得せず、ロード時点のスナップショットに
/// 対して実行される。読み取りの鮮度は結果整合でよい。
pub struct InventoryQueryService {
    store: Arc<dyn DocumentStore>,
}

impl InventoryQueryService {
    /// 新しい在庫クエリサービスを作成
    ///
    /// # Arguments
    /// * `store` - ドキュメントストア
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// すべての在庫レコードを取得
    /// ドキュメント順で返す
    ///
    /// # Returns
    /// * `Ok(Vec<InventoryRecord>)` - 在庫レコードのリスト
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_all_records(&self) -> Result<Vec<InventoryRecord>, ApplicationError> {
        let document = self.store.load().await?;
        Ok(document.inventory().to_vec())
    }

    /// 検索条件に一致する在庫レコードを取得
    /// 指定されなかった条件は制約を課さない
    ///
    /// # Arguments
    /// * `filter` - 正規化済みの検索条件
    ///
    /// # Returns
    /// * `Ok(Vec<InventoryRecord>)` - 条件に一致した在庫レコードのリスト
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn filter_records(
        &self,
        filter: &InventoryFilter,
    ) -> Result<Vec<InventoryRecord>, ApplicationError> {
        let document = self.store.load().await?;
        Ok(document
            .filter_inventory(filter)
            .into_iter()
            .cloned()
            .collect())
    }
}
