//! 内容服务测试：创建节点、上传与覆盖的请求形态、去重参数、缩略图与单段读取。

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::node::NodeKind;
use crate::tests::{
    CollectHook, RangeResponder, boundary_of, content_path, mock_service, split_multipart,
    test_data,
};
use crate::transfer::{FS_BLOCK_SIZE, TransferError, TransferPlan};
use crate::upload::UploadOptions;

fn file_node(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "kind": "FILE",
        "parents": ["root"],
        "status": "AVAILABLE",
        "createdDate": "2024-05-01T08:00:00.000Z",
        "modifiedDate": "2024-05-01T08:00:00.000Z",
        "contentProperties": { "size": 11, "md5": "abc", "contentType": "text/plain" }
    })
}

async fn mount_upload(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/content/nodes"))
        .respond_with(ResponseTemplate::new(status).set_body_json(file_node("n-new", "a.txt")))
        .mount(server)
        .await;
}

async fn mount_overwrite(server: &MockServer, node_id: &str) {
    Mock::given(method("PUT"))
        .and(path(content_path(node_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_node(node_id, "a.txt")))
        .mount(server)
        .await;
}

async fn single_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests.remove(0)
}

fn suppress_param(request: &Request) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == "suppress")
        .map(|(_, v)| v.into_owned())
}

// ═══════════════════════════════════════════════════════════
// 创建节点
// ═══════════════════════════════════════════════════════════

#[tokio::test]
async fn create_folder_posts_metadata() {
    let (server, service) = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/metadata/nodes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "f-1",
            "name": "照片",
            "kind": "FOLDER",
            "parents": ["root"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let node = service.create_folder("照片", Some("root")).await.unwrap();
    assert_eq!(node.id, "f-1");
    assert!(node.is_folder());
    assert_eq!(node.size(), None);

    let request = single_request(&server).await;
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body, json!({ "kind": "FOLDER", "name": "照片", "parents": ["root"] }));
}

#[tokio::test]
async fn create_folder_conflict_is_protocol_error() {
    let (server, service) = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/metadata/nodes"))
        .respond_with(ResponseTemplate::new(409).set_body_string("name exists"))
        .mount(&server)
        .await;

    match service.create_folder("dup", None).await {
        Err(TransferError::Protocol { status, body }) => {
            assert_eq!(status, 409);
            assert_eq!(body, "name exists");
        }
        other => panic!("预期 Protocol，得到 {:?}", other),
    }
}

#[tokio::test]
async fn create_file_uploads_empty_content() {
    let (server, service) = mock_service().await;
    mount_upload(&server, 201).await;

    let node = service.create_file("dir/sub/empty.txt", None).await.unwrap();
    assert_eq!(node.kind, NodeKind::File);
    assert_eq!(node.size(), Some(11));

    let request = single_request(&server).await;
    assert_eq!(suppress_param(&request).as_deref(), Some("deduplication"));

    let parts = split_multipart(&request.body, &boundary_of(&request));
    assert_eq!(parts.len(), 2);
    let metadata: serde_json::Value = serde_json::from_slice(&parts[0].1).unwrap();
    assert_eq!(metadata["name"], "empty.txt");
    assert!(parts[1].1.is_empty());
}

#[tokio::test]
async fn clear_file_puts_empty_content_without_metadata() {
    let (server, service) = mock_service().await;
    mount_overwrite(&server, "n-1").await;

    service.clear_file("n-1").await.unwrap();

    let request = single_request(&server).await;
    assert_eq!(suppress_param(&request), None);
    let parts = split_multipart(&request.body, &boundary_of(&request));
    assert_eq!(parts.len(), 1);
    assert!(parts[0].0.contains("name=\"content\""));
    assert!(parts[0].1.is_empty());
}

// ═══════════════════════════════════════════════════════════
// 上传
// ═══════════════════════════════════════════════════════════

#[tokio::test]
async fn upload_file_streams_content_and_metadata() {
    let (server, service) = mock_service().await;
    mount_upload(&server, 201).await;
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("notes.txt");
    let data = test_data(FS_BLOCK_SIZE * 2 + 99);
    std::fs::write(&local, &data).unwrap();

    let hook = CollectHook::default();
    let node = service
        .upload_file(&local, Some("parent-9"), UploadOptions::new().with_hook(hook.clone()))
        .await
        .unwrap();
    assert_eq!(node.id, "n-new");

    let request = single_request(&server).await;
    assert_eq!(suppress_param(&request).as_deref(), Some("deduplication"));

    let parts = split_multipart(&request.body, &boundary_of(&request));
    let metadata: serde_json::Value = serde_json::from_slice(&parts[0].1).unwrap();
    assert_eq!(metadata, json!({ "kind": "FILE", "name": "notes.txt", "parents": ["parent-9"] }));
    assert!(parts[1].0.contains("filename=\"notes%2Etxt\""));
    assert!(parts[1].0.ends_with("Content-Type: text/plain"));
    assert_eq!(parts[1].1, data);

    assert_eq!(hook.bytes(), data);
    assert_eq!(hook.events(), vec!["before_start", "after_complete"]);
    assert_eq!(hook.plans(), vec![TransferPlan::upload(Some(data.len() as u64))]);

    let progress = hook.progress();
    assert_eq!(progress.last(), Some(&(data.len() as u64, Some(data.len() as u64))));
    assert!(progress.windows(2).all(|p| p[0].0 < p[1].0));
}

#[tokio::test]
async fn upload_stream_closure_hooks_see_every_stage() {
    use std::sync::{Arc, Mutex};

    let (server, service) = mock_service().await;
    mount_upload(&server, 201).await;
    let data = test_data(FS_BLOCK_SIZE + 1);

    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    let options = UploadOptions::new()
        .with_before_start_hook(move |plan: TransferPlan| {
            let l = l1.clone();
            async move {
                l.lock().unwrap().push(format!("start {:?} {:?}", plan.direction, plan.total));
                Ok(())
            }
        })
        .with_on_progress_hook(move |done, total| {
            l2.lock().unwrap().push(format!("at {} {:?}", done, total))
        })
        .with_after_complete_hook(move || {
            let l = l3.clone();
            async move {
                l.lock().unwrap().push("done".to_string());
            }
        });

    service
        .upload_stream(std::io::Cursor::new(data.clone()), "s.bin", None, options)
        .await
        .unwrap();

    let log = log.lock().unwrap().clone();
    assert_eq!(log.first().map(String::as_str), Some("start Upload None"));
    assert_eq!(log.last().map(String::as_str), Some("done"));
    assert_eq!(log[log.len() - 2], format!("at {} None", data.len()));
}

#[tokio::test]
async fn deduplication_opt_in_omits_suppress() {
    let (server, service) = mock_service().await;
    mount_upload(&server, 201).await;
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("a.txt");
    std::fs::write(&local, b"hello world").unwrap();

    service
        .upload_file(&local, None, UploadOptions::new().deduplication(true))
        .await
        .unwrap();

    assert_eq!(suppress_param(&single_request(&server).await), None);
}

#[tokio::test]
async fn empty_file_always_suppresses_deduplication() {
    let (server, service) = mock_service().await;
    mount_upload(&server, 201).await;
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("zero.bin");
    std::fs::write(&local, b"").unwrap();

    service
        .upload_file(&local, None, UploadOptions::new().deduplication(true))
        .await
        .unwrap();

    let request = single_request(&server).await;
    assert_eq!(suppress_param(&request).as_deref(), Some("deduplication"));
}

#[tokio::test]
async fn upload_stream_reads_until_eof() {
    let (server, service) = mock_service().await;
    Mock::given(method("POST"))
        .and(path("/content/nodes"))
        .and(query_param("suppress", "deduplication"))
        .respond_with(ResponseTemplate::new(201).set_body_json(file_node("n-s", "stream.log")))
        .expect(1)
        .mount(&server)
        .await;

    let data = test_data(FS_BLOCK_SIZE + 5);
    let node = service
        .upload_stream(std::io::Cursor::new(data.clone()), "stream.log", None, UploadOptions::new())
        .await
        .unwrap();
    assert_eq!(node.id, "n-s");

    let request = single_request(&server).await;
    let parts = split_multipart(&request.body, &boundary_of(&request));
    assert_eq!(parts[1].1, data);
}

#[tokio::test]
async fn upload_unexpected_status_is_protocol_error() {
    let (server, service) = mock_service().await;
    mount_upload(&server, 200).await;

    let hook = CollectHook::default();
    let result = service
        .upload_stream(&b"abc"[..], "a.txt", None, UploadOptions::new().with_hook(hook.clone()))
        .await;
    assert!(matches!(result, Err(TransferError::Protocol { status: 200, .. })));
    assert_eq!(hook.events(), vec!["before_start"]);
}

#[tokio::test]
async fn aborting_upload_hook_sends_nothing() {
    let (server, service) = mock_service().await;
    mount_upload(&server, 201).await;

    let result = service
        .upload_stream(
            &b"abc"[..],
            "a.txt",
            None,
            UploadOptions::new().with_hook(CollectHook::aborting()),
        )
        .await;
    assert!(matches!(result, Err(TransferError::HookAbort(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════
// 覆盖
// ═══════════════════════════════════════════════════════════

#[tokio::test]
async fn overwrite_file_sends_content_part_only() {
    let (server, service) = mock_service().await;
    mount_overwrite(&server, "n-7").await;
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("v2.json");
    std::fs::write(&local, br#"{"v":2}"#).unwrap();

    service
        .overwrite_file("n-7", &local, UploadOptions::new())
        .await
        .unwrap();

    let request = single_request(&server).await;
    assert_eq!(request.method.as_str(), "PUT");
    assert_eq!(suppress_param(&request).as_deref(), Some("deduplication"));

    let parts = split_multipart(&request.body, &boundary_of(&request));
    assert_eq!(parts.len(), 1);
    assert!(parts[0].0.ends_with("Content-Type: application/json"));
    assert_eq!(parts[0].1, br#"{"v":2}"#);
}

#[tokio::test]
async fn overwrite_stream_sends_no_suppress_by_default() {
    let (server, service) = mock_service().await;
    mount_overwrite(&server, "n-9").await;

    service
        .overwrite_stream("n-9", &b"fresh bytes"[..], UploadOptions::new())
        .await
        .unwrap();

    let request = single_request(&server).await;
    assert_eq!(request.method.as_str(), "PUT");
    assert_eq!(request.url.query(), None);
    assert_eq!(suppress_param(&request), None);
}

#[tokio::test]
async fn overwrite_stream_with_deduplication() {
    let (server, service) = mock_service().await;
    mount_overwrite(&server, "n-8").await;

    let chunks = CollectHook::default();
    service
        .overwrite_stream(
            "n-8",
            &b"replacement"[..],
            UploadOptions::new().deduplication(true).with_hook(chunks.clone()),
        )
        .await
        .unwrap();

    let request = single_request(&server).await;
    assert_eq!(suppress_param(&request), None);
    assert_eq!(chunks.bytes(), b"replacement");
}

#[tokio::test]
async fn overwrite_missing_node_is_protocol_error() {
    let (server, service) = mock_service().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such node"))
        .mount(&server)
        .await;

    let result = service
        .overwrite_stream("missing", &b"x"[..], UploadOptions::new())
        .await;
    assert!(matches!(result, Err(TransferError::Protocol { status: 404, .. })));
}

// ═══════════════════════════════════════════════════════════
// 缩略图与单段读取
// ═══════════════════════════════════════════════════════════

#[tokio::test]
async fn thumbnail_uses_view_box() {
    let (server, service) = mock_service().await;
    Mock::given(method("GET"))
        .and(path(content_path("img-1")))
        .and(query_param("viewBox", "128"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(content_path("img-1")))
        .and(query_param("viewBox", "512"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"big-jpeg".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let small = dir.path().join("small.jpg");
    let big = dir.path().join("big.jpg");
    service.download_thumbnail("img-1", &small, None).await.unwrap();
    service.download_thumbnail("img-1", &big, Some(512)).await.unwrap();

    assert_eq!(std::fs::read(&small).unwrap(), b"jpeg-bytes");
    assert_eq!(std::fs::read(&big).unwrap(), b"big-jpeg");
}

#[tokio::test]
async fn thumbnail_failure_writes_nothing() {
    let (server, service) = mock_service().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("none.jpg");
    let result = service.download_thumbnail("img-x", &target, None).await;
    assert!(matches!(result, Err(TransferError::Protocol { status: 404, .. })));
    assert!(!target.exists());
}

#[tokio::test]
async fn download_chunk_returns_requested_range() {
    let (server, service) = mock_service().await;
    let data = test_data(10_000);
    Mock::given(method("GET"))
        .and(path(content_path("n-c")))
        .respond_with(RangeResponder::new(data.clone()))
        .mount(&server)
        .await;

    let bytes = service.download_chunk("n-c", 2_000, 500).await.unwrap();
    assert_eq!(bytes, &data[2_000..2_500]);
    assert!(service.download_chunk("n-c", 0, 0).await.unwrap().is_empty());

    let request = single_request(&server).await;
    assert_eq!(
        request.headers.get("range").unwrap().to_str().unwrap(),
        "bytes=2000-2499"
    );
}

#[tokio::test]
async fn response_chunk_past_end_is_protocol_error() {
    let (server, service) = mock_service().await;
    Mock::given(method("GET"))
        .and(path(content_path("n-c")))
        .respond_with(RangeResponder::new(test_data(100)))
        .mount(&server)
        .await;

    let result = service.response_chunk("n-c", 500, 10).await;
    assert!(matches!(result, Err(TransferError::Protocol { status: 416, .. })));
}

#[tokio::test]
async fn node_id_is_encoded_as_single_segment() {
    let (server, service) = mock_service().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_node("x", "a.txt")))
        .mount(&server)
        .await;

    service
        .overwrite_stream("id with/slash", &b"x"[..], UploadOptions::new())
        .await
        .unwrap();

    let request = single_request(&server).await;
    assert_eq!(request.url.path(), "/content/nodes/id%20with%2Fslash/content");
}
