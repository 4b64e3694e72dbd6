//! 云存储内容传输引擎。
//!
//! - 上传：把本地文件或任意异步字节流编码为流式 multipart 请求，不整体读入内存
//! - 下载：按固定大小的 Range 窗口串行下载，单窗口重试，416 视为对象结束
//! - 续传：未完成的下载保存在 `<目标>.__incomplete`，下次从其末尾回退一个块后继续
//! - 钩子：上传读取与下载写入都可挂接按字节顺序观察数据的钩子
//!
//! 入口为 [`content::ContentService`]。

/// 内部导出的模块
mod internal;


pub mod session {
    use crate::internal;
    pub use internal::session::structs::ContentSession;
}

pub mod node {
    use crate::internal;
    pub use internal::node::enums::NodeKind;
    pub use internal::node::structs::*;
}

/// 上传与下载共用的钩子、错误类型与块大小
pub mod transfer {
    use crate::internal;
    pub use internal::transfer::FS_BLOCK_SIZE;
    pub use internal::transfer::structs::{
        Sha256Hook, TransferDirection, TransferError, TransferHooksContainer,
        TransferPlan,
    };
    pub use internal::transfer::traits::*;
}

pub mod upload {
    use crate::internal;
    pub use internal::upload::functions::guess_mime;
    pub use internal::upload::functions::mime::DEFAULT_MIME;
    pub use internal::upload::structs::*;
}

pub mod download {
    use crate::internal;
    pub use internal::download::orchestrator::staging_path;
    pub use internal::download::structs::download_options::{
        DEFAULT_CHUNK_SIZE, DEFAULT_RETRY_CEILING, PARTIAL_SUFFIX,
        UNKNOWN_LENGTH_CEILING,
    };
    pub use internal::download::structs::*;
}

pub mod content {
    use crate::internal;
    pub use internal::content::impl_service::DEFAULT_THUMBNAIL_DIM;
    pub use internal::content::structs::ContentService;
}
