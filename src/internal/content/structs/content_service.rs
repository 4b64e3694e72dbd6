use crate::internal::session::structs::ContentSession;

/// 内容服务：在一个会话之上提供节点创建、上传、覆盖、下载与缩略图操作。
///
/// 各操作的实现按类别分布在 `impl_service` 下；服务本身只持有会话，
/// 克隆开销与 `ContentSession` 相同。
#[derive(Debug, Clone)]
pub struct ContentService {
    pub(crate) session: ContentSession,
}

impl ContentService {
    pub fn new(session: ContentSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &ContentSession {
        &self.session
    }
}
