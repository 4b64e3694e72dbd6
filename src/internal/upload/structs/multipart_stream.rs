//! 流式 multipart/form-data 编码器。
//!
//! 按需依次产出以下片段，不预先计算总长度，也不把整份内容读入内存：
//!
//! 1. `metadata` 部分（JSON）；未提供元数据时整段跳过（覆盖上传只换内容）
//! 2. `content` 部分的头
//! 3. 反复从字节源读取的内容块，直到读出空块
//! 4. 结束边界
//!
//! 每次编码都会生成新的随机边界。流只能消费一次，发送时需使用分块传输编码。

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use futures_util::Stream;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use tokio::io::AsyncRead;

use crate::internal::transfer::FS_BLOCK_SIZE;
use crate::internal::transfer::structs::TransferError;
use crate::internal::upload::functions::mime::DEFAULT_MIME;

use super::chunked_source_reader::ChunkedSourceReader;

/// 编码进行到的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncodeStage {
    Metadata,
    ContentHeader,
    Content,
    Closing,
    Done,
}

pub struct MultipartStream<R> {
    boundary: String,
    metadata_part: Option<Bytes>,
    file_name: String,
    mime: String,
    source: ChunkedSourceReader<R>,
    stage: EncodeStage,
}

impl<R> MultipartStream<R>
where
    R: AsyncRead + Unpin,
{
    /// 创建编码器；`metadata` 为 `None` 时不产出 metadata 部分。
    pub fn new<M: Serialize>(
        metadata: Option<&M>,
        source: ChunkedSourceReader<R>,
    ) -> Result<Self, TransferError> {
        let boundary = random_boundary();
        let metadata_part = match metadata {
            Some(m) => {
                let json = serde_json::to_string(m)?;
                Some(Bytes::from(format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"metadata\"\r\n\r\n{json}\r\n"
                )))
            }
            None => None,
        };

        Ok(Self {
            boundary,
            metadata_part,
            file_name: "content".to_string(),
            mime: DEFAULT_MIME.to_string(),
            source,
            stage: EncodeStage::Metadata,
        })
    }

    /// 设置 content 部分的文件名（服务端不以此命名，仅做展示）。
    pub fn file_name(mut self, name: &str) -> Self {
        if !name.is_empty() {
            self.file_name = name.to_string();
        }
        self
    }

    /// 设置 content 部分的 `Content-Type`。
    pub fn mime(mut self, mime: &str) -> Self {
        self.mime = mime.to_string();
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// 请求头 `Content-Type` 的值
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    fn content_header(&self) -> Bytes {
        let encoded_name = utf8_percent_encode(&self.file_name, NON_ALPHANUMERIC);
        Bytes::from(format!(
            "--{}\r\nContent-Disposition: form-data; name=\"content\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            self.boundary, encoded_name, self.mime
        ))
    }

    fn closing(&self) -> Bytes {
        Bytes::from(format!("\r\n--{}--\r\n", self.boundary))
    }
}

impl<R> Stream for MultipartStream<R>
where
    R: AsyncRead + Unpin,
{
    type Item = std::io::Result<Bytes>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match this.stage {
                EncodeStage::Metadata => {
                    this.stage = EncodeStage::ContentHeader;
                    if let Some(part) = this.metadata_part.take() {
                        return Poll::Ready(Some(Ok(part)));
                    }
                }
                EncodeStage::ContentHeader => {
                    this.stage = EncodeStage::Content;
                    return Poll::Ready(Some(Ok(this.content_header())));
                }
                EncodeStage::Content => {
                    match ready!(this.source.poll_read_block(cx, FS_BLOCK_SIZE)) {
                        Ok(block) if block.is_empty() => {
                            this.stage = EncodeStage::Closing;
                        }
                        Ok(block) => return Poll::Ready(Some(Ok(block))),
                        Err(e) => {
                            this.stage = EncodeStage::Done;
                            return Poll::Ready(Some(Err(e)));
                        }
                    }
                }
                EncodeStage::Closing => {
                    this.stage = EncodeStage::Done;
                    return Poll::Ready(Some(Ok(this.closing())));
                }
                EncodeStage::Done => return Poll::Ready(None),
            }
        }
    }
}

/// 32 位十六进制随机边界
fn random_boundary() -> String {
    format!("{:032x}", rand::random::<u128>())
}
