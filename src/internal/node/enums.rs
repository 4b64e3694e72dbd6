use serde::{Deserialize, Serialize};

/// 节点类型，对应服务端 JSON 中的 `kind` 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// 普通文件
    #[serde(rename = "FILE")]
    File,
    /// 文件夹（容器节点）
    #[serde(rename = "FOLDER")]
    Folder,
    /// 本库不关心的其他类型（如资产节点）
    #[serde(other, skip_serializing)]
    Other,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "FILE",
            NodeKind::Folder => "FOLDER",
            NodeKind::Other => "OTHER",
        }
    }
}
