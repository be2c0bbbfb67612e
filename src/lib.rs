// 血液製剤在庫・輸血オーダー管理システム
// 在庫照会、輸血オーダー受付（検証と在庫引き落とし）、在庫・オーダーのCRUDを提供する

pub mod adapter;
pub mod application;
pub mod domain;
