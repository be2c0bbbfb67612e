// 駆動される側アダプター（ドキュメントストア・監査ロガー実装）

mod file_audit_logger;
mod json_document_store;

pub use file_audit_logger::FileAuditLogger;
pub use json_document_store::JsonDocumentStore;
