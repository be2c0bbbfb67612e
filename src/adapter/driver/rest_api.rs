use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapter::driver::request_dto::{
    InventoryItemRequest, InventoryQueryRequest, PatientOrderRequest,
};
use crate::adapter::driver::response_dto::{
    AllDataResponse, InventoryInfoResponse, InventoryQueryResponse, MutationResponse,
    PatientOrderResponse, PatientOrderView,
};
use crate::application::service::{
    InventoryApplicationService, InventoryQueryService, OrderApplicationService, OrderQueryService,
};
use crate::application::ApplicationError;
use crate::domain::model::RecordId;
use crate::domain::port::{AuditLogger, AuditStatus};

// アプリケーションサービスを含む状態
pub type AppState = AppStateInner;

#[derive(Clone)]
pub struct AppStateInner {
    pub order_service: Arc<OrderApplicationService>,
    pub inventory_service: Arc<InventoryApplicationService>,
    pub inventory_query_service: Arc<InventoryQueryService>,
    pub order_query_service: Arc<OrderQueryService>,
    pub audit_logger: Arc<dyn AuditLogger>,
}

// REST APIルーターを作成
// 外部システムとの互換性のため、レガシーのパス接頭辞を維持する
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/LisReceiver/web/GetInventory", post(get_inventory))
        .route("/LisReceiver/web/GetAllData", get(get_all_data))
        .route("/LisReceiver/web/SavePatient", post(save_patient))
        .route("/LisReceiver/web/GetPatientOrders", get(get_patient_orders))
        .route("/LisReceiver/web/CreateInventory", post(create_inventory))
        .route("/LisReceiver/web/UpdateInventory/:id", put(update_inventory))
        .route("/LisReceiver/web/DeleteInventory/:id", delete(delete_inventory))
        .route("/LisReceiver/web/CreatePatientOrder", post(create_patient_order))
        .route("/LisReceiver/web/UpdatePatientOrder/:id", put(update_patient_order))
        .route("/LisReceiver/web/DeletePatientOrder/:id", delete(delete_patient_order))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bloodbank-order-management",
        "version": "0.1.0"
    }))
}

// 在庫照会エンドポイント
// ボディなし、または条件がすべて空の場合は全在庫を返す
async fn get_inventory(
    State(state): State<AppState>,
    body: Option<Json<InventoryQueryRequest>>,
) -> Result<Json<InventoryQueryResponse>, (StatusCode, Json<InventoryQueryResponse>)> {
    let filter = body
        .map(|Json(request)| request.into_filter())
        .unwrap_or_default();

    let result = if filter.is_empty() {
        // 条件なしは「全件取得」という別の要求として扱う
        state.inventory_query_service.get_all_records().await
    } else {
        state.inventory_query_service.filter_records(&filter).await
    };

    match result {
        Ok(records) => Ok(Json(InventoryQueryResponse {
            is_success: true,
            error_message: None,
            inventory_info: records.iter().map(InventoryInfoResponse::from_record).collect(),
        })),
        Err(err) => {
            let (status, message) = map_application_error(&err);
            Err((
                status,
                Json(InventoryQueryResponse {
                    is_success: false,
                    error_message: Some(message),
                    inventory_info: Vec::new(),
                }),
            ))
        }
    }
}

// 全データ取得エンドポイント
async fn get_all_data(
    State(state): State<AppState>,
) -> Result<Json<AllDataResponse>, (StatusCode, Json<MutationResponse>)> {
    match state.order_query_service.get_document().await {
        Ok(document) => Ok(Json(AllDataResponse::from_document(&document))),
        Err(err) => {
            let (status, message) = map_application_error(&err);
            Err((status, Json(MutationResponse::failure(message))))
        }
    }
}

// 輸血オーダー受付エンドポイント
// 検証（構造 + 在庫充足）を通過した場合のみ在庫を引き落とし、オーダーを記録する
async fn save_patient(
    State(state): State<AppState>,
    Json(request): Json<PatientOrderRequest>,
) -> Result<Json<PatientOrderResponse>, (StatusCode, Json<PatientOrderResponse>)> {
    let input = serde_json::to_value(&request).ok();
    let order = request.into_order();

    match state.order_service.submit_order(order).await {
        Ok(()) => {
            let response = PatientOrderResponse::success();
            state
                .audit_logger
                .log_operation(
                    "SavePatient",
                    input,
                    serde_json::to_value(&response).ok(),
                    AuditStatus::Success,
                    None,
                )
                .await;
            Ok(Json(response))
        }
        Err(err) => {
            let (status, message) = map_application_error(&err);
            let response = PatientOrderResponse::failure(message.clone());
            state
                .audit_logger
                .log_operation(
                    "SavePatient",
                    input,
                    serde_json::to_value(&response).ok(),
                    audit_status_for(&err),
                    Some(&message),
                )
                .await;
            Err((status, Json(response)))
        }
    }
}

// 患者オーダー一覧取得エンドポイント
async fn get_patient_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientOrderView>>, (StatusCode, Json<MutationResponse>)> {
    match state.order_query_service.get_all_orders().await {
        Ok(orders) => Ok(Json(orders.iter().map(PatientOrderView::from_order).collect())),
        Err(err) => {
            let (status, message) = map_application_error(&err);
            Err((status, Json(MutationResponse::failure(message))))
        }
    }
}

// 在庫レコード作成エンドポイント
async fn create_inventory(
    State(state): State<AppState>,
    Json(request): Json<InventoryItemRequest>,
) -> Result<Json<MutationResponse>, (StatusCode, Json<MutationResponse>)> {
    let input = serde_json::to_value(&request).ok();

    let result = match request.into_record() {
        Ok(record) => state
            .inventory_service
            .create_record(record)
            .await
            .map(|id| MutationResponse::created("在庫レコードを作成しました", id.to_string())),
        Err(err) => Err(ApplicationError::from(err)),
    };

    respond_mutation(&state, "CreateInventory", input, result).await
}

// 在庫レコード更新エンドポイント
async fn update_inventory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<InventoryItemRequest>,
) -> Result<Json<MutationResponse>, (StatusCode, Json<MutationResponse>)> {
    let input = serde_json::to_value(&request).ok();

    let result = match request.into_record() {
        Ok(record) => state
            .inventory_service
            .update_record(RecordId::from_uuid(id), record)
            .await
            .map(|()| MutationResponse::success("在庫レコードを更新しました")),
        Err(err) => Err(ApplicationError::from(err)),
    };

    respond_mutation(&state, "UpdateInventory", input, result).await
}

// 在庫レコード削除エンドポイント
async fn delete_inventory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MutationResponse>, (StatusCode, Json<MutationResponse>)> {
    let input = Some(serde_json::json!({ "Id": id.to_string() }));

    let result = state
        .inventory_service
        .delete_record(RecordId::from_uuid(id))
        .await
        .map(|()| MutationResponse::success("在庫レコードを削除しました"));

    respond_mutation(&state, "DeleteInventory", input, result).await
}

// 患者オーダー直接作成エンドポイント
// 構造検証のみを行い、在庫の引き落としは行わない
async fn create_patient_order(
    State(state): State<AppState>,
    Json(request): Json<PatientOrderRequest>,
) -> Result<Json<MutationResponse>, (StatusCode, Json<MutationResponse>)> {
    let input = serde_json::to_value(&request).ok();
    let order = request.into_order();

    let result = state
        .order_service
        .create_order(order)
        .await
        .map(|id| MutationResponse::created("患者オーダーを作成しました", id.to_string()));

    respond_mutation(&state, "CreatePatientOrder", input, result).await
}

// 患者オーダー更新エンドポイント
async fn update_patient_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PatientOrderRequest>,
) -> Result<Json<MutationResponse>, (StatusCode, Json<MutationResponse>)> {
    let input = serde_json::to_value(&request).ok();
    let order = request.into_order();

    let result = state
        .order_service
        .update_order(RecordId::from_uuid(id), order)
        .await
        .map(|()| MutationResponse::success("患者オーダーを更新しました"));

    respond_mutation(&state, "UpdatePatientOrder", input, result).await
}

// 患者オーダー削除エンドポイント
async fn delete_patient_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MutationResponse>, (StatusCode, Json<MutationResponse>)> {
    let input = Some(serde_json::json!({ "Id": id.to_string() }));

    let result = state
        .order_service
        .delete_order(RecordId::from_uuid(id))
        .await
        .map(|()| MutationResponse::success("患者オーダーを削除しました"));

    respond_mutation(&state, "DeletePatientOrder", input, result).await
}

// CRUD操作の結果を監査ログに記録し、レスポンスへ変換する
async fn respond_mutation(
    state: &AppState,
    operation: &str,
    input: Option<serde_json::Value>,
    result: Result<MutationResponse, ApplicationError>,
) -> Result<Json<MutationResponse>, (StatusCode, Json<MutationResponse>)> {
    match result {
        Ok(response) => {
            state
                .audit_logger
                .log_operation(
                    operation,
                    input,
                    serde_json::to_value(&response).ok(),
                    AuditStatus::Success,
                    None,
                )
                .await;
            Ok(Json(response))
        }
        Err(err) => {
            let (status, message) = map_application_error(&err);
            let response = MutationResponse::failure(message.clone());
            state
                .audit_logger
                .log_operation(
                    operation,
                    input,
                    serde_json::to_value(&response).ok(),
                    audit_status_for(&err),
                    Some(&message),
                )
                .await;
            Err((status, Json(response)))
        }
    }
}

// アプリケーションエラーをHTTPステータスと呼び出し元向けメッセージにマッピング
// 検証エラーはそのまま返すが、ストアの内部原因はログにのみ残す
fn map_application_error(err: &ApplicationError) -> (StatusCode, String) {
    match err {
        ApplicationError::DomainError(domain_err) => {
            (StatusCode::BAD_REQUEST, domain_err.message().to_string())
        }
        ApplicationError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        ApplicationError::StoreError(store_err) => {
            eprintln!("ストア操作に失敗しました: {}", store_err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ドキュメントストアを利用できません".to_string(),
            )
        }
    }
}

// 監査ログの結果区分を決定する
fn audit_status_for(err: &ApplicationError) -> AuditStatus {
    match err {
        ApplicationError::DomainError(_) | ApplicationError::NotFound(_) => AuditStatus::Failed,
        ApplicationError::StoreError(_) => AuditStatus::Error,
    }
}
