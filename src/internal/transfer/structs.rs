pub mod sha256_hook;
pub mod transfer_error;
pub mod transfer_hooks_container;
pub mod transfer_plan;

// 重导出公共类型
pub use sha256_hook::Sha256Hook;
pub use transfer_error::TransferError;
pub use transfer_hooks_container::TransferHooksContainer;
pub use transfer_plan::{TransferDirection, TransferPlan};
