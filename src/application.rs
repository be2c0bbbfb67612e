// アプリケーション層
// ユースケースの調整とドメイン層・アダプター層の橋渡し

pub mod error;
pub mod service;

pub use error::ApplicationError;
