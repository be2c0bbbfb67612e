use bloodbank_order_management::adapter::driven::{FileAuditLogger, JsonDocumentStore};
use bloodbank_order_management::adapter::driver::rest_api::{create_router, AppStateInner};
use bloodbank_order_management::adapter::StoreConfig;
use bloodbank_order_management::application::service::{
    InventoryApplicationService, InventoryQueryService, OrderApplicationService, OrderQueryService,
};
use bloodbank_order_management::domain::port::{AuditLogger, DocumentStore};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 血液製剤在庫・輸血オーダー管理システム REST API ===");
    println!();

    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    // ストア設定を読み込む
    let config = StoreConfig::from_env()?;
    println!("ドキュメントストア: {}", config.data_file.display());
    println!("監査ログ出力先: {}", config.logs_dir.display());

    // ドキュメントストアと監査ロガーを作成
    let store: Arc<dyn DocumentStore> = Arc::new(JsonDocumentStore::new(
        config.data_file.clone(),
        Duration::from_secs(config.io_timeout_secs),
    ));
    let audit_logger: Arc<dyn AuditLogger> = Arc::new(FileAuditLogger::new(config.logs_dir.clone()));

    // すべての変更系操作で共有するドキュメント書き込みロックを作成
    let write_lock = Arc::new(Mutex::new(()));

    // アプリケーションサービスを作成
    let order_service = Arc::new(OrderApplicationService::new(
        store.clone(),
        write_lock.clone(),
    ));
    let inventory_service = Arc::new(InventoryApplicationService::new(
        store.clone(),
        write_lock.clone(),
    ));
    let inventory_query_service = Arc::new(InventoryQueryService::new(store.clone()));
    let order_query_service = Arc::new(OrderQueryService::new(store.clone()));

    // アプリケーション状態を作成
    let app_state = AppStateInner {
        order_service,
        inventory_service,
        inventory_query_service,
        order_query_service,
        audit_logger,
    };

    // REST APIルーターを作成
    let app = create_router()
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // サーバーを起動
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    println!("REST APIサーバーが起動しました: http://{}", config.bind_addr);
    println!("API仕様:");
    println!("  POST   /LisReceiver/web/GetInventory - 在庫照会（条件なしで全件取得）");
    println!("  GET    /LisReceiver/web/GetAllData - 全データ取得");
    println!("  POST   /LisReceiver/web/SavePatient - 輸血オーダー受付（在庫引き落とし）");
    println!("  GET    /LisReceiver/web/GetPatientOrders - 患者オーダー一覧取得");
    println!("  POST   /LisReceiver/web/CreateInventory - 在庫レコード作成");
    println!("  PUT    /LisReceiver/web/UpdateInventory/:id - 在庫レコード更新");
    println!("  DELETE /LisReceiver/web/DeleteInventory/:id - 在庫レコード削除");
    println!("  POST   /LisReceiver/web/CreatePatientOrder - 患者オーダー作成");
    println!("  PUT    /LisReceiver/web/UpdatePatientOrder/:id - 患者オーダー更新");
    println!("  DELETE /LisReceiver/web/DeletePatientOrder/:id - 患者オーダー削除");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
