/// Catalogue sync into a real SQLite file
use std::sync::Arc;

use mort_mcp::*;
use tempfile::NamedTempFile;

use crate::support::FakeGateway;

fn catalogue_gateway() -> FakeGateway {
    FakeGateway {
        customers: vec![Customer {
            id: "cus_1".to_string(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            created: 1_700_000_000,
        }],
        products: vec![Product {
            id: "prod_1".to_string(),
            name: "Pro plan".to_string(),
            description: Some("Everything".to_string()),
            created: 1_700_000_100,
        }],
        prices: vec![
            Price {
                id: "price_1".to_string(),
                product: "prod_1".to_string(),
                amount: Some(2999),
                currency: "usd".to_string(),
                recurring: Some(Recurring { interval: Interval::Month }),
            },
            Price {
                id: "price_orphan".to_string(),
                product: "prod_elsewhere".to_string(),
                amount: Some(100),
                currency: "usd".to_string(),
                recurring: None,
            },
        ],
        ..FakeGateway::default()
    }
}

#[tokio::test]
async fn test_sync_stores_catalogue_and_skips_orphan_prices() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");
    let gateway = Arc::new(catalogue_gateway());

    let server = PaymentsServer::with_gateway(gateway.clone(), ServerConfig::default()).unwrap();
    let report = server.sync(&storage, 50).await.unwrap();

    assert_eq!(
        report,
        SyncReport {
            customers: 1,
            products: 1,
            prices: 1,
            skipped_prices: 1,
        }
    );

    let ops: Vec<String> = gateway.calls().into_iter().map(|(op, _)| op).collect();
    assert_eq!(ops, vec!["list_customers", "list_products", "list_prices"]);
    for (_, query) in gateway.calls() {
        assert_eq!(query["limit"], 50);
    }

    let prices = storage.list_prices().unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].stripe_id, "price_1");
    assert_eq!(prices[0].interval, Some(Interval::Month));
}

#[tokio::test]
async fn test_repeated_sync_is_idempotent_across_reopen() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_path_buf();
    let gateway = Arc::new(catalogue_gateway());

    let first_ids = {
        let storage = SqliteStorage::new(&db_path).unwrap();
        sync_catalog(&*gateway, &storage, 10).await.unwrap();
        storage.list_products().unwrap().into_iter().map(|p| p.id).collect::<Vec<_>>()
    };

    // Second server with same database path
    let storage = SqliteStorage::new(&db_path).unwrap();
    sync_catalog(&*gateway, &storage, 10).await.unwrap();

    let second_ids: Vec<i64> = storage.list_products().unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(first_ids, second_ids);
    assert_eq!(storage.list_customers().unwrap().len(), 1);
    assert_eq!(storage.list_prices().unwrap().len(), 1);
}

#[tokio::test]
async fn test_gateway_failure_aborts_sync() {
    let storage = SqliteStorage::in_memory().unwrap();
    let gateway = FakeGateway::failing("invalid api key");

    let err = sync_catalog(&gateway, &storage, 10).await.unwrap_err();
    assert!(matches!(err, SyncError::Gateway(GatewayError::Api { status: 402, .. })));
    assert!(storage.list_customers().unwrap().is_empty());
}

#[tokio::test]
async fn test_out_of_range_page_size_is_rejected() {
    let storage = SqliteStorage::in_memory().unwrap();
    let gateway = FakeGateway::default();

    let err = sync_catalog(&gateway, &storage, 0).await.unwrap_err();
    assert!(matches!(err, SyncError::Options(DomainError::InvalidLimit(0))));
}
