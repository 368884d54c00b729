//! Static fallback behavior: base-directory serving with the context
//! path (and only the context path) stripped.

use devmux::config::FallbackConfig;

mod common;

#[tokio::test]
async fn serves_files_from_the_base_directory() {
    let compiler = common::start_echo_backend().await;
    let base = tempfile::tempdir().unwrap();
    std::fs::write(base.path().join("hello.txt"), "hello").unwrap();
    let config = common::test_config(
        FallbackConfig::Static {
            base_dir: base.path().to_path_buf(),
        },
        compiler.port(),
        &["tests"],
    );
    let front = common::spawn_front_end(config).await;

    let res = common::client()
        .get(format!("http://{}/hello.txt", front))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "hello");
}

#[tokio::test]
async fn missing_files_are_not_found() {
    let compiler = common::start_echo_backend().await;
    let base = tempfile::tempdir().unwrap();
    let config = common::test_config(
        FallbackConfig::Static {
            base_dir: base.path().to_path_buf(),
        },
        compiler.port(),
        &["tests"],
    );
    let front = common::spawn_front_end(config).await;

    let res = common::client()
        .get(format!("http://{}/nope.txt", front))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn index_file_resolves_at_the_root() {
    let compiler = common::start_echo_backend().await;
    let base = tempfile::tempdir().unwrap();
    std::fs::write(base.path().join("index.html"), "<html>home</html>").unwrap();
    let config = common::test_config(
        FallbackConfig::Static {
            base_dir: base.path().to_path_buf(),
        },
        compiler.port(),
        &["tests"],
    );
    let front = common::spawn_front_end(config).await;

    let res = common::client()
        .get(format!("http://{}/", front))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "<html>home</html>");
}

#[tokio::test]
async fn context_path_is_stripped_before_file_lookup() {
    let compiler = common::start_echo_backend().await;
    let base = tempfile::tempdir().unwrap();
    std::fs::write(base.path().join("page.txt"), "inside context").unwrap();
    let mut config = common::test_config(
        FallbackConfig::Static {
            base_dir: base.path().to_path_buf(),
        },
        compiler.port(),
        &["tests"],
    );
    config.context_path = Some("context".to_string());
    let front = common::spawn_front_end(config).await;

    // The file lives at <base>/page.txt and is addressed under the
    // context path.
    let res = common::client()
        .get(format!("http://{}/context/page.txt", front))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "inside context");

    // Outside the context the same file is unreachable.
    let res = common::client()
        .get(format!("http://{}/page.txt", front))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}
