//! Integration tests for the chartview binary

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{Builder, Header};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run chartview with a clean environment for the variables it reads
async fn chartview(args: &[&str]) -> std::process::Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_chartview"))
        .args(args)
        .env_remove("CHART_REPOS")
        .env_remove("CHARTVIEW_CONFIG")
        .env_remove("REDIS_URL")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("Failed to execute chartview")
}

fn chart_archive() -> Vec<u8> {
    let files = [
        ("app-deploy/Chart.yaml", "name: app-deploy\nversion: v0.0.1\n"),
        ("app-deploy/values.yaml", "replicaCount: 1\n"),
        ("app-deploy/templates/deployment.yaml", "apiVersion: apps/v1\nkind: Deployment\n"),
    ];

    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, content) in files {
        let mut header = Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, content.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

async fn chart_repository() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stable/index.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "apiVersion: v1\nentries:\n  app-deploy:\n    - name: app-deploy\n      version: v0.0.1\n      urls: [app-deploy-v0.0.1.tgz]\n",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stable/app-deploy-v0.0.1.tgz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(chart_archive()))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_help_lists_commands() {
    let output = chartview(&["--help"]).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("seed"));
}

#[tokio::test]
async fn test_seed_missing_file_is_input_error() {
    let output = chartview(&[
        "seed",
        "--store",
        "memory",
        "--repo-seed",
        "/nonexistent/repos.json",
    ])
    .await;

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/nonexistent/repos.json"));
}

#[tokio::test]
async fn test_seed_malformed_repositories_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let seed = dir.path().join("repos.json");
    std::fs::write(&seed, "{ not json").unwrap();

    let output = chartview(&[
        "seed",
        "--store",
        "memory",
        "--repo-seed",
        seed.to_str().unwrap(),
    ])
    .await;

    assert_eq!(output.status.code(), Some(3));
}

#[tokio::test]
async fn test_bad_settings_file_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("chartview.yaml");
    std::fs::write(&config, "seed_concurrency: 0\n").unwrap();

    let output = chartview(&["seed", "--config", config.to_str().unwrap()]).await;

    assert_eq!(output.status.code(), Some(64));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_seed_into_sqlite() {
    let repository = chart_repository().await;
    let dir = tempfile::tempdir().unwrap();
    let seed = dir.path().join("repos.json");
    std::fs::write(
        &seed,
        format!(r#"[{{"name":"stable","url":"{}/stable"}}]"#, repository.uri()),
    )
    .unwrap();
    let database = dir.path().join("cache.db");

    let output = chartview(&[
        "seed",
        "--store",
        "sqlite",
        "--sqlite-path",
        database.to_str().unwrap(),
        "--repo-seed",
        seed.to_str().unwrap(),
    ])
    .await;

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "seed failed: {}", stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Seeded 1 repositories, 1 charts, 1 versions"));
    assert!(database.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_seed_reports_failures() {
    let repository = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let seed = dir.path().join("repos.json");
    std::fs::write(
        &seed,
        format!(r#"[{{"name":"stable","url":"{}/stable"}}]"#, repository.uri()),
    )
    .unwrap();

    let output = chartview(&[
        "seed",
        "--store",
        "memory",
        "--repo-seed",
        seed.to_str().unwrap(),
    ])
    .await;

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 failure(s):"));
    assert!(stdout.contains("stable (index)"));
}
