//! 上传与覆盖：把文件或异步字节流编码为 multipart 请求体并流式发送。
//!
//! - 新建节点：POST `{content}/nodes`，期望 201，请求体带 metadata 部分
//! - 覆盖内容：PUT `{content}/nodes/{id}/content`，期望 200，请求体只有 content 部分
//!
//! 请求体按块从源读取，不会整体读入内存；读取钩子看到的是发送出去的原始内容字节。

use std::path::Path;
use std::sync::PoisonError;

use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, Method, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncRead;
use url::Url;

use crate::internal::content::structs::ContentService;
use crate::internal::node::structs::{Node, NodeMetadata};
use crate::internal::transfer::structs::{
    TransferError, TransferHooksContainer, TransferPlan,
};
use crate::internal::upload::functions::guess_mime;
use crate::internal::upload::structs::{
    ChunkedSourceReader, MultipartStream, UploadOptions,
};

/// 一次 multipart 请求的参数（形参超过 3 个，用 struct 承载）。
pub(super) struct MultipartRequest<R> {
    pub method: Method,
    pub url: Url,
    pub suppress_deduplication: bool,
    pub body: MultipartStream<R>,
    pub expected: StatusCode,
}

/// 上传目标：新建节点（带 metadata 部分）或替换已有节点的内容。
enum UploadTarget<'a> {
    Create { metadata: NodeMetadata },
    Replace { node_id: &'a str },
}

/// 从字节源发起一次上传时的参数（形参超过 3 个，用 struct 承载）。
struct SourceUpload<'a, R> {
    source: R,
    file_name: &'a str,
    payload_len: Option<u64>,
    suppress_deduplication: bool,
    target: UploadTarget<'a>,
    hooks: TransferHooksContainer,
}

impl ContentService {
    /// 上传本地文件为新节点，节点名取文件的基本名。
    ///
    /// 空文件总是抑制服务端去重。
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        parent: Option<&str>,
        options: UploadOptions,
    ) -> Result<Node, TransferError> {
        let path = path.as_ref();
        let name = base_name(path);
        let (file, size) = open_local(path).await?;

        info!("上传文件 \"{}\"（{} 字节）", path.display(), size);
        self.send_source(SourceUpload {
            source: file,
            file_name: &name,
            payload_len: Some(size),
            suppress_deduplication: options.suppress_deduplication(Some(size)),
            target: UploadTarget::Create {
                metadata: NodeMetadata::file(name.clone(), parent),
            },
            hooks: options.read_hooks,
        })
        .await
    }

    /// 把异步字节流上传为新节点；流的长度未知，读到 EOF 为止。
    pub async fn upload_stream<R>(
        &self,
        stream: R,
        file_name: &str,
        parent: Option<&str>,
        options: UploadOptions,
    ) -> Result<Node, TransferError>
    where
        R: AsyncRead + Unpin + Send + Sync + 'static,
    {
        self.send_source(SourceUpload {
            source: stream,
            file_name,
            payload_len: None,
            suppress_deduplication: options.suppress_deduplication(None),
            target: UploadTarget::Create {
                metadata: NodeMetadata::file(file_name, parent),
            },
            hooks: options.read_hooks,
        })
        .await
    }

    /// 用本地文件替换已有节点的内容，节点元数据保持不变。去重规则与新建上传相同。
    pub async fn overwrite_file(
        &self,
        node_id: &str,
        path: impl AsRef<Path>,
        options: UploadOptions,
    ) -> Result<Node, TransferError> {
        let path = path.as_ref();
        let name = base_name(path);
        let (file, size) = open_local(path).await?;

        info!("覆盖节点 {} 的内容，来源 \"{}\"", node_id, path.display());
        self.send_source(SourceUpload {
            source: file,
            file_name: &name,
            payload_len: Some(size),
            suppress_deduplication: options.suppress_deduplication(Some(size)),
            target: UploadTarget::Replace { node_id },
            hooks: options.read_hooks,
        })
        .await
    }

    /// 用异步字节流替换已有节点的内容。
    ///
    /// 不携带去重参数，`options.deduplication` 在这里不起作用。
    pub async fn overwrite_stream<R>(
        &self,
        node_id: &str,
        stream: R,
        options: UploadOptions,
    ) -> Result<Node, TransferError>
    where
        R: AsyncRead + Unpin + Send + Sync + 'static,
    {
        self.send_source(SourceUpload {
            source: stream,
            file_name: "content",
            payload_len: None,
            suppress_deduplication: false,
            target: UploadTarget::Replace { node_id },
            hooks: options.read_hooks,
        })
        .await
    }

    /// 钩子阶段：请求前 `before_start`；读取时 `on_chunk` 与 `on_progress`；
    /// 服务端返回预期状态后 `after_complete`。
    async fn send_source<R>(
        &self,
        upload: SourceUpload<'_, R>,
    ) -> Result<Node, TransferError>
    where
        R: AsyncRead + Unpin + Send + Sync + 'static,
    {
        let SourceUpload {
            source,
            file_name,
            payload_len,
            suppress_deduplication,
            target,
            mut hooks,
        } = upload;

        hooks
            .run_before_start(&TransferPlan::upload(payload_len))
            .await?;

        let reader = ChunkedSourceReader::with_hooks(source, hooks)
            .expected_len(payload_len);
        let shared_hooks = reader.shared_hooks();

        let (method, url, metadata, expected) = match target {
            UploadTarget::Create { metadata } => (
                Method::POST,
                self.session.content_nodes_url()?,
                Some(metadata),
                StatusCode::CREATED,
            ),
            UploadTarget::Replace { node_id } => (
                Method::PUT,
                self.session.node_content_url(node_id)?,
                None,
                StatusCode::OK,
            ),
        };

        let body = MultipartStream::new(metadata.as_ref(), reader)?
            .file_name(file_name)
            .mime(guess_mime(file_name));

        let node = self
            .send_multipart(MultipartRequest {
                method,
                url,
                suppress_deduplication,
                body,
                expected,
            })
            .await?;

        // 请求体已被消费，从共享句柄取回钩子
        let mut hooks = std::mem::take(
            &mut *shared_hooks.lock().unwrap_or_else(PoisonError::into_inner),
        );
        hooks.run_after_complete().await;
        Ok(node)
    }

    /// 发送 multipart 请求并把响应解析为节点；状态码不符时返回 `Protocol`。
    pub(super) async fn send_multipart<R>(
        &self,
        request: MultipartRequest<R>,
    ) -> Result<Node, TransferError>
    where
        R: AsyncRead + Unpin + Send + Sync + 'static,
    {
        let MultipartRequest {
            method,
            url,
            suppress_deduplication,
            body,
            expected,
        } = request;

        debug!("{} {} (suppress={})", method, url, suppress_deduplication);

        let mut builder = self
            .session
            .client
            .request(method, url)
            .header(CONTENT_TYPE, body.content_type());
        if suppress_deduplication {
            builder = builder.query(&[("suppress", "deduplication")]);
        }

        let resp = builder.body(Body::wrap_stream(body)).send().await?;
        if resp.status() != expected {
            return Err(TransferError::from_response(resp).await);
        }

        Ok(resp.json::<Node>().await?)
    }
}

async fn open_local(path: &Path) -> Result<(File, u64), TransferError> {
    let file = File::open(path).await.map_err(TransferError::OpenFile)?;
    let size = file
        .metadata()
        .await
        .map_err(TransferError::ReadFile)?
        .len();
    Ok((file, size))
}

/// 路径的最后一段；没有文件名部分时退回整个路径。
pub(super) fn base_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
