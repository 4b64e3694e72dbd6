//! 分片下载：发起单段 Range 请求，返回响应供流式读取。

use reqwest::header::RANGE;
use reqwest::{Client, Response};
use url::Url;

use crate::internal::download::structs::ChunkWindow;
use crate::internal::transfer::structs::TransferError;

/// 发起 Range 请求时的参数（形参超过 3 个时用 struct 承载）。
pub struct FetchRangeParams<'a> {
    pub client: &'a Client,
    pub url: &'a Url,
    pub window: ChunkWindow,
}

/// 发起单段 Range GET 请求，不检查状态码，由调用方决定如何处理。
pub async fn fetch_range_response(
    params: FetchRangeParams<'_>,
) -> Result<Response, TransferError> {
    let resp = params
        .client
        .get(params.url.clone())
        .header(RANGE, params.window.range_header())
        .send()
        .await?;
    Ok(resp)
}
