use std::path::Path;

use log::{debug, info};
use reqwest::{Method, StatusCode};

use crate::internal::content::structs::ContentService;
use crate::internal::node::structs::{Node, NodeMetadata};
use crate::internal::transfer::structs::TransferError;
use crate::internal::upload::structs::{ChunkedSourceReader, MultipartStream};

use super::impl_upload::{MultipartRequest, base_name};

impl ContentService {
    /// 在元数据服务上创建文件夹，期望 201。
    ///
    /// 同名节点已存在时服务端返回 409，原样作为 `Protocol` 错误交给调用方。
    pub async fn create_folder(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<Node, TransferError> {
        let url = self.session.metadata_nodes_url()?;
        let body = NodeMetadata::folder(name, parent);
        debug!("POST {} 创建文件夹 \"{}\"", url, name);

        let resp = self.session.client.post(url).json(&body).send().await?;
        if resp.status() != StatusCode::CREATED {
            return Err(TransferError::from_response(resp).await);
        }

        let node = resp.json::<Node>().await?;
        info!("已创建文件夹 \"{}\" ({})", name, node.id);
        Ok(node)
    }

    /// 创建空文件节点；`name` 只取最后一段。空内容总是抑制去重。
    pub async fn create_file(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<Node, TransferError> {
        let name = base_name(Path::new(name));
        let metadata = NodeMetadata::file(name.clone(), parent);
        let reader = ChunkedSourceReader::new(tokio::io::empty());
        let body = MultipartStream::new(Some(&metadata), reader)?.file_name(&name);

        self.send_multipart(MultipartRequest {
            method: Method::POST,
            url: self.session.content_nodes_url()?,
            suppress_deduplication: true,
            body,
            expected: StatusCode::CREATED,
        })
        .await
    }

    /// 把节点内容替换为空，期望 200。
    pub async fn clear_file(&self, node_id: &str) -> Result<Node, TransferError> {
        let reader = ChunkedSourceReader::new(tokio::io::empty());
        let body = MultipartStream::new(None::<&NodeMetadata>, reader)?;

        self.send_multipart(MultipartRequest {
            method: Method::PUT,
            url: self.session.node_content_url(node_id)?,
            suppress_deduplication: false,
            body,
            expected: StatusCode::OK,
        })
        .await
    }
}
