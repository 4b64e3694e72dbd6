use core::fmt;

use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use url::Url;

use crate::internal::transfer::structs::TransferError;

/// 会话结构体
///
/// 该结构体定位
/// - 保存 HTTP 客户端与两个基础地址：元数据地址（创建节点）与内容地址（上传、下载、覆盖、缩略图）
/// - 认证与会话刷新不在本库范围内，调用方可传入已配置好的 `Client`，或用访问令牌快速创建
///
/// 两个基础地址在创建时都会补齐结尾的 `/`，之后只通过追加路径段拼接，不会越出基础路径。
#[derive(Clone)]
pub struct ContentSession {
    pub client: Client, // 内部是Arc，不需要特殊处理
    pub metadata_url: Url,
    pub content_url: Url,
}

impl ContentSession {
    /// 使用访问令牌创建会话，令牌以 `Bearer` 形式放入默认请求头
    pub fn new(
        access_token: &str,
        metadata_url: &str,
        content_url: &str,
    ) -> Result<Self, String> {
        let client = _create_bearer_client(access_token)?;
        Self::with_client(client, metadata_url, content_url)
    }

    /// 使用调用方已配置好的客户端创建会话（连接池、超时、TLS 等由调用方决定）
    pub fn with_client(
        client: Client,
        metadata_url: &str,
        content_url: &str,
    ) -> Result<Self, String> {
        Ok(Self {
            client,
            metadata_url: _format_base_url(metadata_url)?,
            content_url: _format_base_url(content_url)?,
        })
    }

    /// 元数据地址下 `nodes` 资源
    pub(crate) fn metadata_nodes_url(&self) -> Result<Url, TransferError> {
        _append_segments(&self.metadata_url, &["nodes"])
    }

    /// 内容地址下 `nodes` 资源
    pub(crate) fn content_nodes_url(&self) -> Result<Url, TransferError> {
        _append_segments(&self.content_url, &["nodes"])
    }

    /// 内容地址下某节点的内容资源：`nodes/{node_id}/content`，节点标识作为单个路径段编码
    pub(crate) fn node_content_url(
        &self,
        node_id: &str,
    ) -> Result<Url, TransferError> {
        _append_segments(&self.content_url, &["nodes", node_id, "content"])
    }
}

/// 防止debug泄漏令牌
impl fmt::Debug for ContentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentSession")
            .field("client", &"<Client with hidden authorization>")
            .field("metadata_url", &self.metadata_url.as_str())
            .field("content_url", &self.content_url.as_str())
            .finish()
    }
}

fn _format_base_url(url: &str) -> Result<Url, String> {
    if url.is_empty() {
        return Err("路径为空".to_string());
    }

    let mut base_url = Url::parse(url).map_err(|e| e.to_string())?;

    if base_url.cannot_be_a_base() {
        return Err("地址不能作为基础路径".to_string());
    }

    if !base_url.path().ends_with('/') {
        let new_path = format!("{}/", base_url.path());
        base_url.set_path(&new_path);
    }

    Ok(base_url)
}

fn _append_segments(base: &Url, segments: &[&str]) -> Result<Url, TransferError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| TransferError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn _create_bearer_client(access_token: &str) -> Result<Client, String> {
    let mut headers = HeaderMap::new();

    let mut auth_value =
        HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|e| e.to_string())?;
    auth_value.set_sensitive(true);

    headers.insert(AUTHORIZATION, auth_value);

    Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| e.to_string())
}
