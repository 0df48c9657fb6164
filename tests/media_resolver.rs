//! Media fetching and downloading against a local HTTP server.

use melody::{
    library::Track,
    player::{MediaError, MediaResolver},
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn track_at(server: &MockServer, prompt: &str) -> Track {
    Track::generated(
        prompt,
        format!("{}/files/abc:download?alt=media&key=k", server.uri()),
        "[Verse] ...",
    )
}

#[tokio::test]
async fn test_fetch_writes_bytes_to_cache() {
    let server = MockServer::start().await;
    let cache = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/files/abc:download"))
        .and(query_param("key", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not really mp4".to_vec()))
        .mount(&server)
        .await;

    let track = track_at(&server, "lofi beat");
    let resolver = MediaResolver::new(cache.path()).unwrap();
    let handle = resolver.fetch(&track).await.unwrap();

    assert_eq!(handle.track_id(), track.id());
    assert!(handle.path().starts_with(cache.path()));
    assert_eq!(std::fs::read(handle.path()).unwrap(), b"not really mp4");
    assert_eq!(handle.duration(), None);

    let path = handle.path().to_path_buf();
    drop(handle);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_fetch_reports_http_status() {
    let server = MockServer::start().await;
    let cache = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/files/abc:download"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resolver = MediaResolver::new(cache.path()).unwrap();
    let err = resolver
        .fetch(&track_at(&server, "lofi beat"))
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::Status(404)));
}

#[tokio::test]
async fn test_download_never_overwrites() {
    let server = MockServer::start().await;
    let cache = tempfile::tempdir().unwrap();
    let downloads = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/files/abc:download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"song".to_vec()))
        .mount(&server)
        .await;

    let resolver = MediaResolver::new(cache.path()).unwrap();
    let track = track_at(&server, "lofi beat");

    let first = resolver.download(&track, downloads.path()).await.unwrap();
    let second = resolver.download(&track, downloads.path()).await.unwrap();

    assert_eq!(first, downloads.path().join("lofi_beat.m4a"));
    assert_eq!(second, downloads.path().join("lofi_beat (1).m4a"));
    assert_eq!(std::fs::read(&second).unwrap(), b"song");
}

fn is_empty_dir(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test]
async fn test_fetch_errors_hide_the_credential() {
    let cache = tempfile::tempdir().unwrap();
    let track = Track::generated(
        "p",
        "http://127.0.0.1:1/files/x?alt=media&key=SECRET-KEY",
        "[Verse] ...",
    );

    let resolver = MediaResolver::new(cache.path()).unwrap();
    let err = resolver.fetch(&track).await.unwrap_err();

    assert!(matches!(err, MediaError::Fetch(_)));
    assert!(!err.to_string().contains("SECRET-KEY"), "{err}");
    assert!(!format!("{err:?}").contains("SECRET-KEY"));

    let err = resolver
        .download(&track, cache.path())
        .await
        .unwrap_err();
    assert!(!err.to_string().contains("SECRET-KEY"), "{err}");
}

#[tokio::test]
async fn test_download_releases_its_handle() {
    let server = MockServer::start().await;
    let cache = tempfile::tempdir().unwrap();
    let downloads = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/files/abc:download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"song".to_vec()))
        .mount(&server)
        .await;

    let resolver = MediaResolver::new(cache.path()).unwrap();
    let track = track_at(&server, "lofi beat");

    resolver.download(&track, downloads.path()).await.unwrap();
    assert!(is_empty_dir(cache.path()));

    // Destination is a file, so the copy step fails after the fetch.
    let blocker = downloads.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();
    let err = resolver.download(&track, &blocker).await.unwrap_err();

    assert!(matches!(err, MediaError::Io(_)));
    assert!(is_empty_dir(cache.path()));
}
