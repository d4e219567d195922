use std::{fs, path::Path, sync::Arc, time::Duration};

use axum::http::StatusCode;
use axum_test::TestServer;
use scrapectl_core::{
    JobControlError, JobController, JobState, StartScrapeRequest,
    engine::{DirectoryScrapeEngine, IdentifierScraper},
};
use scrapectl_server::{
    AppState, create_app,
    infra::config::{ConfigLoader, FileConfigSource},
};
use tempfile::TempDir;
use tokio::time::{sleep, timeout};

fn write_config(path: &Path, port: u16, media_root: &Path, safe_dir: &Path) {
    fs::write(
        path,
        format!(
            "[server]\nport = {port}\n\n[library]\nmedia_roots = [\"{}\"]\nsafe_dirs = [\"{}\"]\n",
            media_root.display(),
            safe_dir.display()
        ),
    )
    .unwrap();
}

fn file_backed_controller(config_path: &Path) -> JobController {
    JobController::new(
        Arc::new(DirectoryScrapeEngine::new(Arc::new(IdentifierScraper::new()))),
        Arc::new(FileConfigSource::new(
            ConfigLoader::new().with_config_path(config_path),
        )),
    )
}

async fn wait_until_idle(controller: &JobController) {
    timeout(Duration::from_secs(5), async {
        while controller.state() != JobState::Idle {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not drain in time");
}

#[tokio::test]
async fn safe_dir_edits_apply_to_the_next_start() {
    let root = TempDir::new().unwrap();
    let old = root.path().join("old");
    let new = root.path().join("new");
    fs::create_dir_all(&old).unwrap();
    fs::create_dir_all(&new).unwrap();
    let old_file = old.join("ABC-001.mp4");
    let new_file = new.join("DEF-002.mp4");
    fs::write(&old_file, b"fake").unwrap();
    fs::write(&new_file, b"fake").unwrap();

    let config_path = root.path().join("scrapectl.toml");
    write_config(&config_path, 3000, &old, &old);
    let controller = file_backed_controller(&config_path);

    controller
        .start(StartScrapeRequest::single(old_file.to_string_lossy()))
        .await
        .unwrap();
    wait_until_idle(&controller).await;

    write_config(&config_path, 3000, &new, &new);

    controller
        .start(StartScrapeRequest::single(new_file.to_string_lossy()))
        .await
        .unwrap();
    wait_until_idle(&controller).await;

    let err = controller
        .start(StartScrapeRequest::single(old_file.to_string_lossy()))
        .await
        .unwrap_err();
    assert!(matches!(err, JobControlError::PathAccessDenied(_)), "{err}");

    let server = TestServer::new(create_app(AppState::new(controller))).unwrap();
    server
        .get("/api/v1/files/list")
        .add_query_param("path", old.to_string_lossy())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    let listing: serde_json::Value = server
        .get("/api/v1/files/list")
        .add_query_param("path", new.to_string_lossy())
        .await
        .json();
    assert_eq!(listing["total"], 1);
}

#[tokio::test]
async fn listener_port_does_not_gate_a_start() {
    let root = TempDir::new().unwrap();
    let media = root.path().join("media");
    fs::create_dir_all(&media).unwrap();
    fs::write(media.join("ABC-001.mp4"), b"fake").unwrap();

    let config_path = root.path().join("scrapectl.toml");
    write_config(&config_path, 0, &media, &media);
    let controller = file_backed_controller(&config_path);

    let response = controller
        .start(StartScrapeRequest::default())
        .await
        .unwrap();
    assert_eq!(response.status, JobState::Running);
    wait_until_idle(&controller).await;
    assert_eq!(controller.results().success.len(), 1);
}
