// ドメインモデル（エンティティと値オブジェクト）

mod document;
mod inventory;
mod order;
mod value_objects;

pub use value_objects::{
    BloodGroup,
    InventoryFilter,
    OrderLine,
    RecordId,
    RhFactor,
};

pub use document::Document;
pub use inventory::InventoryRecord;
pub use order::PatientOrder;
