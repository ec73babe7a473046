//! End-to-end: mock files on disk answer live HTTP requests.

mod common;

use mock_proxy::config::{PropsMatch, ProxyConfig, RouteConfig};

use common::{spawn_proxy, write_mock};

fn test_config(data_root: &std::path::Path) -> ProxyConfig {
    ProxyConfig {
        data_root: data_root.to_path_buf(),
        routes: vec![RouteConfig {
            name: "orders".to_string(),
            path_prefix: "/orders".to_string(),
            dir: "orders".to_string(),
            match_props: PropsMatch::Only(vec!["id".to_string()]),
            ..RouteConfig::default()
        }],
        ..ProxyConfig::default()
    }
}

#[tokio::test]
async fn serves_recorded_mock_from_disk() {
    let data_root = tempfile::tempdir().unwrap();
    write_mock(
        data_root.path(),
        "orders/GET/orders__7/id=7",
        r#"{"id": 7, "status": "shipped"}"#,
    );

    let (addr, _shutdown) = spawn_proxy(test_config(data_root.path())).await;

    let response = reqwest::get(format!("http://{}/orders/7?id=7&token=abc", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"id": 7, "status": "shipped"}"#
    );
}

#[tokio::test]
async fn missing_mock_answers_404_without_upstream() {
    let data_root = tempfile::tempdir().unwrap();
    let (addr, _shutdown) = spawn_proxy(test_config(data_root.path())).await;

    let response = reqwest::get(format!("http://{}/orders/99?id=99", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn unrouted_path_answers_404() {
    let data_root = tempfile::tempdir().unwrap();
    let (addr, _shutdown) = spawn_proxy(test_config(data_root.path())).await;

    let response = reqwest::get(format!("http://{}/users/1", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn admin_status_is_served_from_reserved_prefix() {
    let data_root = tempfile::tempdir().unwrap();
    let (addr, _shutdown) = spawn_proxy(test_config(data_root.path())).await;

    let response = reqwest::get(format!("http://{}/__status", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "operational");
}

#[tokio::test]
async fn reserved_prefix_never_hits_the_mock_tree() {
    let data_root = tempfile::tempdir().unwrap();
    let (addr, _shutdown) = spawn_proxy(test_config(data_root.path())).await;

    let response = reqwest::get(format!("http://{}/__not-an-endpoint", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
