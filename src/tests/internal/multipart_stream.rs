//! 流式 multipart 编码测试：按边界拆分后逐部分比对。

use futures_util::StreamExt;

use crate::node::NodeMetadata;
use crate::tests::{CollectHook, split_multipart, test_data};
use crate::transfer::FS_BLOCK_SIZE;
use crate::upload::{ChunkedSourceReader, MultipartStream};

async fn encode<R>(mut stream: MultipartStream<R>) -> Vec<u8>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut body = Vec::new();
    while let Some(piece) = stream.next().await {
        body.extend_from_slice(&piece.unwrap());
    }
    body
}

#[tokio::test]
async fn metadata_and_content_parts() {
    let data = test_data(FS_BLOCK_SIZE * 2 + 5);
    let metadata = NodeMetadata::file("报告 2024.pdf", Some("parent-1"));
    let reader = ChunkedSourceReader::new(data.as_slice());
    let stream = MultipartStream::new(Some(&metadata), reader)
        .unwrap()
        .file_name("报告 2024.pdf")
        .mime("application/pdf");
    let boundary = stream.boundary().to_string();
    assert_eq!(
        stream.content_type(),
        format!("multipart/form-data; boundary={}", boundary)
    );

    let body = encode(stream).await;
    let parts = split_multipart(&body, &boundary);
    assert_eq!(parts.len(), 2);

    let (headers, json) = &parts[0];
    assert_eq!(headers, "Content-Disposition: form-data; name=\"metadata\"");
    let value: serde_json::Value = serde_json::from_slice(json).unwrap();
    assert_eq!(value["kind"], "FILE");
    assert_eq!(value["name"], "报告 2024.pdf");
    assert_eq!(value["parents"][0], "parent-1");

    let (headers, content) = &parts[1];
    assert!(headers.starts_with("Content-Disposition: form-data; name=\"content\"; filename=\""));
    assert!(headers.contains("%E6%8A%A5%E5%91%8A%202024%2Epdf"));
    assert!(headers.ends_with("Content-Type: application/pdf"));
    assert_eq!(content, &data);
}

#[tokio::test]
async fn without_metadata_only_content_part() {
    let reader = ChunkedSourceReader::new(&b"new content"[..]);
    let stream = MultipartStream::new(None::<&NodeMetadata>, reader).unwrap();
    let boundary = stream.boundary().to_string();

    let body = encode(stream).await;
    let parts = split_multipart(&body, &boundary);
    assert_eq!(parts.len(), 1);
    assert!(parts[0].0.contains("name=\"content\"; filename=\"content\""));
    assert!(parts[0].0.ends_with("Content-Type: application/octet-stream"));
    assert_eq!(parts[0].1, b"new content");
}

#[tokio::test]
async fn empty_source_still_has_content_part() {
    let metadata = NodeMetadata::file("empty.txt", None);
    let reader = ChunkedSourceReader::new(tokio::io::empty());
    let stream = MultipartStream::new(Some(&metadata), reader).unwrap();
    let boundary = stream.boundary().to_string();

    let body = encode(stream).await;
    let parts = split_multipart(&body, &boundary);
    assert_eq!(parts.len(), 2);
    assert!(parts[1].1.is_empty());

    let value: serde_json::Value = serde_json::from_slice(&parts[0].1).unwrap();
    assert!(value.get("parents").is_none());
}

#[tokio::test]
async fn boundary_is_fresh_per_encoder() {
    let a = MultipartStream::new(None::<&NodeMetadata>, ChunkedSourceReader::new(&b""[..]))
        .unwrap();
    let b = MultipartStream::new(None::<&NodeMetadata>, ChunkedSourceReader::new(&b""[..]))
        .unwrap();
    assert_eq!(a.boundary().len(), 32);
    assert_ne!(a.boundary(), b.boundary());
}

#[tokio::test]
async fn read_hooks_observe_raw_content_only() {
    let data = test_data(FS_BLOCK_SIZE + 1);
    let hook = CollectHook::default();
    let reader = ChunkedSourceReader::new(data.as_slice()).with_hook(hook.clone());
    let metadata = NodeMetadata::file("x.bin", None);

    let body = encode(MultipartStream::new(Some(&metadata), reader).unwrap()).await;
    assert!(body.len() > data.len());
    assert_eq!(hook.bytes(), data);
}

#[test]
fn mime_follows_extension() {
    use crate::upload::{DEFAULT_MIME, guess_mime};
    assert_eq!(guess_mime("photo.JPG"), "image/jpeg");
    assert_eq!(guess_mime("notes.txt"), "text/plain");
    assert_eq!(guess_mime("report.pdf"), "application/pdf");
    assert_eq!(guess_mime("dir.v2/data.json"), "application/json");
    assert_eq!(guess_mime("blob.unknownext"), DEFAULT_MIME);
    assert_eq!(guess_mime(".bashrc"), DEFAULT_MIME);
    assert_eq!(guess_mime("README"), DEFAULT_MIME);
}
