use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::internal::node::enums::NodeKind;

/// 服务端返回的节点对象（创建、上传、覆盖接口的响应体）
///
/// 只解析本库用得到的字段，其余字段忽略；缺失的可选字段按默认值处理。
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// 节点标识，不透明字符串
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub kind: NodeKind,
    /// 父节点标识列表
    #[serde(default)]
    pub parents: Vec<String>,
    /// 节点状态，如 `AVAILABLE`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
    /// 文件内容属性；文件夹没有此字段
    #[serde(default)]
    pub content_properties: Option<ContentProperties>,
}

/// 对应 `contentProperties`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentProperties {
    /// 内容大小（字节）
    #[serde(default)]
    pub size: Option<u64>,
    /// 服务端计算的 MD5
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl Node {
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// 内容大小；未知时为 `None`，可直接作为下载时声明的长度
    pub fn size(&self) -> Option<u64> {
        self.content_properties.as_ref().and_then(|p| p.size)
    }
}
