//! Control socket integration tests
//!
//! Full client/server sessions over a Unix socket: queries, catalog reload
//! and shutdown.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::{tempdir, NamedTempFile};

use site_scout::config::IpcConfig;
use site_scout::feasibility::CostInputs;
use site_scout::ipc::{ErrorCode, IpcClient, IpcCommand, IpcHandler, IpcResponse, IpcServer};
use site_scout::site::{SiteQuery, SiteService};
use site_scout::zoning::{Provenance, RegionCatalog};

// ============================================================================
// Test Helpers
// ============================================================================

fn test_config(socket_path: PathBuf) -> IpcConfig {
    IpcConfig {
        socket_path,
        ..IpcConfig::default()
    }
}

async fn wait_for_socket(path: &Path) {
    for _ in 0..50 {
        if path.exists() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

async fn start_server(
    service: SiteService,
    socket_path: &Path,
) -> tokio::task::JoinHandle<Result<(), site_scout::IpcError>> {
    let handler = Arc::new(IpcHandler::new(Arc::new(service)));
    let server = IpcServer::new(test_config(socket_path.to_path_buf()), handler);
    let handle = tokio::spawn(async move { server.run().await });
    wait_for_socket(socket_path).await;
    handle
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_site_session() {
    let dir = tempdir().unwrap();
    let socket_path = dir.path().join("site.sock");
    let server = start_server(SiteService::builtin(), &socket_path).await;
    let client = IpcClient::new(&socket_path);

    let response = client
        .send(IpcCommand::SearchSite(SiteQuery::by_address(
            "Main Street, Springfield",
        )))
        .await
        .unwrap();
    let IpcResponse::Site(record) = response else {
        panic!("Expected Site, got {response:?}");
    };
    assert!(!record.identity.geocode_fallback);

    let response = client
        .send(IpcCommand::GetSite {
            site_id: record.identity.id.clone(),
        })
        .await
        .unwrap();
    assert!(matches!(response, IpcResponse::Site(ref r) if *r == record));

    let response = client
        .send(IpcCommand::GetZoning {
            lat: Some(42.33),
            lng: Some(-83.045),
        })
        .await
        .unwrap();
    match response {
        IpcResponse::Zoning(resolution) => {
            assert_eq!(resolution.district.district, "B4");
            assert_eq!(resolution.provenance, Provenance::Locality);
        }
        other => panic!("Expected Zoning, got {other:?}"),
    }

    let response = client.send(IpcCommand::GetCacheStats).await.unwrap();
    match response {
        IpcResponse::CacheStats(stats) => assert!(stats.hits >= 1),
        other => panic!("Expected CacheStats, got {other:?}"),
    }

    let response = client.send(IpcCommand::Shutdown).await.unwrap();
    assert!(!response.is_error());

    let result = tokio::time::timeout(Duration::from_secs(2), server).await;
    assert!(result.is_ok(), "server should stop after shutdown command");
}

#[tokio::test]
async fn test_environmental_and_feasibility_queries() {
    let dir = tempdir().unwrap();
    let socket_path = dir.path().join("env.sock");
    let server = start_server(SiteService::builtin(), &socket_path).await;
    let client = IpcClient::new(&socket_path);

    for command in [
        IpcCommand::GetClimate {
            lat: Some(40.0),
            lng: Some(-74.0),
        },
        IpcCommand::GetSolar {
            lat: Some(40.0),
            lng: Some(-74.0),
        },
        IpcCommand::GetFloodRisk {
            lat: Some(40.0),
            lng: Some(-74.0),
        },
        IpcCommand::GetCostIndices,
        IpcCommand::CalculateCosts(CostInputs::new(25_000.0, 2).with_location("Chicago")),
    ] {
        let response = client.send(command).await.unwrap();
        assert!(!response.is_error(), "unexpected error: {response:?}");
    }

    let response = client
        .send(IpcCommand::GetFloodRisk {
            lat: None,
            lng: Some(-74.0),
        })
        .await
        .unwrap();
    assert!(matches!(
        response,
        IpcResponse::Error(ref e) if e.code == ErrorCode::InvalidParameters
    ));

    let response = client
        .send(IpcCommand::CalculateCosts(CostInputs::new(-5.0, 1)))
        .await
        .unwrap();
    assert!(response.is_error());

    client.send(IpcCommand::Shutdown).await.unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(2), server).await;
}

#[tokio::test]
async fn test_reload_over_socket() {
    let dir = tempdir().unwrap();
    let socket_path = dir.path().join("reload.sock");

    let mut catalog_file = NamedTempFile::new().unwrap();
    catalog_file
        .write_all(
            serde_json::to_string(&RegionCatalog {
                regions: Vec::new(),
                ..RegionCatalog::builtin()
            })
            .unwrap()
            .as_bytes(),
        )
        .unwrap();

    let service = SiteService::builtin().with_catalog_path(catalog_file.path());
    let server = start_server(service, &socket_path).await;
    let client = IpcClient::new(&socket_path);

    let response = client.send(IpcCommand::ReloadCatalog).await.unwrap();
    assert!(matches!(response, IpcResponse::CatalogReloaded { version: 2 }));

    match client.send(IpcCommand::Status).await.unwrap() {
        IpcResponse::Status(status) => {
            assert_eq!(status.catalog_version, 2);
            assert_eq!(status.regions, 0);
            assert_eq!(status.localities, 0);
        }
        other => panic!("Expected Status, got {other:?}"),
    }

    // Michigan is gone, so Detroit resolves through the global palette
    let response = client
        .send(IpcCommand::GetZoning {
            lat: Some(42.33),
            lng: Some(-83.045),
        })
        .await
        .unwrap();
    assert!(matches!(
        response,
        IpcResponse::Zoning(ref r) if r.provenance == Provenance::GlobalGeneric
    ));

    // A broken file keeps the current catalog
    catalog_file.as_file().set_len(0).unwrap();
    let response = client.send(IpcCommand::ReloadCatalog).await.unwrap();
    assert!(matches!(
        response,
        IpcResponse::Error(ref e) if e.code == ErrorCode::OperationFailed
    ));

    client.send(IpcCommand::Shutdown).await.unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(2), server).await;
}

#[tokio::test]
async fn test_concurrent_clients() {
    let dir = tempdir().unwrap();
    let socket_path = dir.path().join("concurrent.sock");
    let server = start_server(SiteService::builtin(), &socket_path).await;

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let client = IpcClient::new(&socket_path);
            tokio::spawn(async move {
                let lat = 42.0 + f64::from(i) * 0.125;
                client
                    .send(IpcCommand::SearchSite(SiteQuery::by_coordinates(lat, -84.0)))
                    .await
            })
        })
        .collect();

    for task in tasks {
        let response = task.await.unwrap().unwrap();
        assert!(matches!(response, IpcResponse::Site(_)));
    }

    client_shutdown(&socket_path).await;
    let _ = tokio::time::timeout(Duration::from_secs(2), server).await;
}

async fn client_shutdown(socket_path: &Path) {
    let response = IpcClient::new(socket_path)
        .send(IpcCommand::Shutdown)
        .await
        .unwrap();
    assert!(matches!(response, IpcResponse::Success { .. }));
}
