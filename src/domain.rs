// ドメイン層
// 血液製剤在庫と輸血オーダーのモデル、ポート、検証サービス

pub mod error;
pub mod model;
pub mod port;
pub mod serialization;
pub mod service;
