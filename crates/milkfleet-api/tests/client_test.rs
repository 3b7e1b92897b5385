#![allow(clippy::unwrap_used)]
// Integration tests for `BackendClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use milkfleet_api::types::{AmountRequest, NewDeviceRequest, PriceUpdate, UpdateVendorRequest};
use milkfleet_api::{BackendClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BackendClient) {
    let server = MockServer::start().await;
    let client = BackendClient::with_client(reqwest::Client::new(), &server.uri()).unwrap();
    (server, client)
}

// ── Vendor ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_vendor() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vendor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "v1",
            "name": "Amina",
            "shopName": "Fresh Dairy Corner"
        })))
        .mount(&server)
        .await;

    let vendor = client.vendor().await.unwrap();
    assert_eq!(vendor.id, "v1");
    assert_eq!(vendor.shop_name, "Fresh Dairy Corner");
}

#[tokio::test]
async fn test_update_vendor_echoes_entity() {
    let (server, client) = setup().await;

    let req = UpdateVendorRequest {
        name: "Amina".into(),
        shop_name: "New Corner".into(),
    };

    Mock::given(method("PUT"))
        .and(path("/api/vendor/v1"))
        .and(body_json(json!({"name": "Amina", "shopName": "New Corner"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "v1",
            "name": "Amina",
            "shopName": "New Corner"
        })))
        .mount(&server)
        .await;

    let vendor = client.update_vendor("v1", &req).await.unwrap();
    assert_eq!(vendor.shop_name, "New Corner");
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "D1",
                "name": "Market Square",
                "status": "online",
                "isTampered": false,
                "lastUpdated": "2024-06-15T10:30:00Z",
                "capacity": 80.0,
                "temperature": 4.2
            },
            {
                "id": "D2",
                "name": "Bus Station",
                "status": "offline",
                "isTampered": true,
                "capacity": 10.0
            }
        ])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id, "D1");
    assert_eq!(devices[0].status, "online");
    assert!(!devices[0].is_tampered);
    assert!(devices[1].is_tampered);
    assert!(devices[1].last_updated.is_none());
    assert_eq!(devices[1].capacity, Some(10.0));
}

#[tokio::test]
async fn test_add_device_message_ack() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "device added"})))
        .mount(&server)
        .await;

    let req = NewDeviceRequest {
        name: "Harbour".into(),
        capacity: Some(100.0),
    };
    client.add_device(&req).await.unwrap();
}

// ── Pricing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_pricing_success_ack() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/pricing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "price updated"
        })))
        .mount(&server)
        .await;

    client
        .set_pricing(&PriceUpdate {
            price_per_litre: 1.25,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_set_pricing_rejected_ack() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/pricing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "price locked by operator"
        })))
        .mount(&server)
        .await;

    let result = client
        .set_pricing(&PriceUpdate {
            price_per_litre: 1.25,
        })
        .await;

    match result {
        Err(Error::Rejected { message }) => assert_eq!(message, "price locked by operator"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

// ── Account ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_withdraw_returns_updated_account() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/account/withdraw"))
        .and(body_json(json!({"amount": 50.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "balance": 150.0,
            "withdrawals": [
                {"id": "w1", "amount": 50.0, "timestamp": "2024-06-15T10:30:00Z"}
            ]
        })))
        .mount(&server)
        .await;

    let account = client.withdraw(&AmountRequest { amount: 50.0 }).await.unwrap();
    assert_eq!(account.balance, 150.0);
    assert_eq!(account.withdrawals.len(), 1);
}

#[tokio::test]
async fn test_withdraw_error_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/account/withdraw"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "insufficient funds"})),
        )
        .mount(&server)
        .await;

    let result = client.withdraw(&AmountRequest { amount: 999.0 }).await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "insufficient funds");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cash_payments() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/account/cash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "c1", "deviceId": "D1", "amount": 2.5, "timestamp": "2024-06-15T09:00:00Z"}
        ])))
        .mount(&server)
        .await;

    let payments = client.list_cash_payments().await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].device_id, "D1");
}

// ── Malformed responses ─────────────────────────────────────────────

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

#[tokio::test]
async fn test_plain_error_body_falls_back_to_raw() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/pricing"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    match client.pricing().await {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream down");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
