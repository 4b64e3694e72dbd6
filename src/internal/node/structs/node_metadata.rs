use serde::Serialize;

use crate::internal::node::enums::NodeKind;

/// 创建节点时发送的元数据：`{"kind":..,"name":..,"parents":[..]}`
///
/// 上传时作为 multipart 的 `metadata` 部分，创建文件夹时直接作为 JSON 请求体。
#[derive(Debug, Clone, Serialize)]
pub struct NodeMetadata {
    pub kind: NodeKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
}

impl NodeMetadata {
    pub fn file(name: impl Into<String>, parent: Option<&str>) -> Self {
        Self::new(NodeKind::File, name, parent)
    }

    pub fn folder(name: impl Into<String>, parent: Option<&str>) -> Self {
        Self::new(NodeKind::Folder, name, parent)
    }

    fn new(kind: NodeKind, name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            kind,
            name: name.into(),
            parents: parent.map(|p| vec![p.to_string()]),
        }
    }
}
