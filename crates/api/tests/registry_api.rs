//! HTTP-level integration tests for registries, items, guest purchases and
//! owner bookkeeping.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete, get, patch_json, post_empty, post_json, post_json_localized, put_json,
};
use cradle_events::{EVENT_GIFT_PURCHASED, EVENT_GIFT_THANK_YOU};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_registry(pool: &PgPool) -> serde_json::Value {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/registries",
        serde_json::json!({
            "title": "Baby Lopez",
            "owner_name": "Maria",
            "owner_email": "maria@example.com",
            "arrival_date": "2026-12-01",
            "slug": "baby-lopez"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn create_item(pool: &PgPool, registry_id: i64, name: &str, quantity: i32) -> i64 {
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/registries/{registry_id}/items"),
        serde_json::json!({"name": name, "category": "feeding", "quantity": quantity}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

fn guest(name: &str, quantity: i32) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "quantity": quantity
    })
}

async fn buy(pool: &PgPool, item_id: i64, name: &str, quantity: i32) -> axum::response::Response {
    post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{item_id}/purchases"),
        guest(name, quantity),
    )
    .await
}

async fn item_json(pool: &PgPool, item_id: i64) -> serde_json::Value {
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{item_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_get_registry(pool: PgPool) {
    let registry = create_registry(&pool).await;
    assert_eq!(registry["title"], "Baby Lopez");
    assert_eq!(registry["slug"], "baby-lopez");
    let id = registry["id"].as_i64().unwrap();

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/registries/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["owner_name"], "Maria");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_registry_rejects_bad_email(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/registries",
        serde_json::json!({"title": "T", "owner_name": "O", "owner_email": "nope"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_returns_409(pool: PgPool) {
    create_registry(&pool).await;
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/registries",
        serde_json::json!({
            "title": "Other",
            "owner_name": "Jo",
            "owner_email": "jo@example.com",
            "slug": "baby-lopez"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_registry_returns_204_then_404(pool: PgPool) {
    let id = create_registry(&pool).await["id"].as_i64().unwrap();

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/registries/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/registries/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_item_reports_progress(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let item_id = create_item(&pool, registry_id, "Bottles", 4).await;

    let item = item_json(&pool, item_id).await;
    assert_eq!(item["name"], "Bottles");
    assert_eq!(item["category"], "feeding");
    assert_eq!(item["quantity"], 4);
    assert_eq!(item["remaining"], 4);
    assert_eq!(item["fulfilled"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_item_validates_input(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/registries/{registry_id}/items");

    for body in [
        serde_json::json!({"name": "  "}),
        serde_json::json!({"name": "Crib", "quantity": 0}),
        serde_json::json!({"name": "Crib", "category": "furniture"}),
        serde_json::json!({"name": "Crib", "price_cents": -5}),
    ] {
        let response = post_json(common::build_test_app(pool.clone()), &uri, body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_item_for_missing_registry_returns_404(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/registries/999999/items",
        serde_json::json!({"name": "Crib"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_quantity_edit_below_received_is_rejected(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let item_id = create_item(&pool, registry_id, "Bibs", 5).await;
    assert_eq!(buy(&pool, item_id, "Ana", 3).await.status(), StatusCode::CREATED);

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{item_id}"),
        serde_json::json!({"quantity": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{item_id}"),
        serde_json::json!({"quantity": 3, "is_most_wanted": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["quantity"], 3);
    assert_eq!(json["data"]["fulfilled"], true);
    assert_eq!(json["data"]["is_most_wanted"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_item_removes_purchases(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let item_id = create_item(&pool, registry_id, "Swing", 1).await;
    buy(&pool, item_id, "Ana", 1).await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{item_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/items/{item_id}/purchases"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Guest purchases
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_guests_share_an_item_until_fulfilled(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let item_id = create_item(&pool, registry_id, "Onesies", 3).await;

    let response = buy(&pool, item_id, "Ana", 1).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let receipt = body_json(response).await["data"].clone();
    assert_eq!(receipt["quantity_received"], 1);
    assert_eq!(receipt["remaining"], 2);
    assert_eq!(receipt["fulfilled"], false);

    let receipt = body_json(buy(&pool, item_id, "Ben", 2).await).await["data"].clone();
    assert_eq!(receipt["fulfilled"], true);

    let response = buy(&pool, item_id, "Cy", 1).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ALREADY_FULFILLED");
    assert!(json["error"].as_str().unwrap().starts_with("Someone already bought"));

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/items/{item_id}/purchases"),
    )
    .await;
    let purchases = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(purchases.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_over_request_reports_remaining_in_guest_language(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let item_id = create_item(&pool, registry_id, "Wipes", 3).await;
    buy(&pool, item_id, "Ana", 1).await;

    let response = post_json_localized(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{item_id}/purchases"),
        guest("Ben", 3),
        "es-ES,es;q=0.9",
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_REMAINING");
    assert_eq!(json["remaining"], 2);
    assert!(json["error"].as_str().unwrap().starts_with("Solo quedan 2"));

    // Nothing changed.
    assert_eq!(item_json(&pool, item_id).await["quantity_received"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_buyer_details_return_400(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let item_id = create_item(&pool, registry_id, "Rattle", 1).await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{item_id}/purchases"),
        serde_json::json!({"name": "Ana", "email": "not-an-email", "quantity": 1}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = buy(&pool, item_id, "Ana", 0).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purchase_of_missing_item_returns_404(pool: PgPool) {
    let response = buy(&pool, 999_999, "Ana", 1).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "This gift is no longer on the registry."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purchase_publishes_owner_and_buyer_events(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let item_id = create_item(&pool, registry_id, "Stroller", 1).await;

    let state = common::test_state(pool.clone());
    let mut rx = state.event_bus.subscribe();
    let response = post_json(
        common::build_test_app_with_state(state),
        &format!("/api/v1/items/{item_id}/purchases"),
        guest("Ana", 1),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let owner = rx.recv().await.unwrap();
    let buyer = rx.recv().await.unwrap();
    assert_eq!(owner.event_type, EVENT_GIFT_PURCHASED);
    assert_eq!(buyer.event_type, EVENT_GIFT_THANK_YOU);
    let notice = owner.purchase_notice().unwrap();
    assert_eq!(notice.registry_id, registry_id);
    assert_eq!(notice.item_name, "Stroller");
    assert_eq!(notice.buyer_email, "ana@example.com");
}

// ---------------------------------------------------------------------------
// Owner counter operations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_on_then_off_restores_ledger(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let item_id = create_item(&pool, registry_id, "Diapers", 5).await;
    buy(&pool, item_id, "Ana", 2).await;

    let uri = format!("/api/v1/items/{item_id}/toggle-fulfilled");
    let on = body_json(post_empty(common::build_test_app(pool.clone()), &uri).await).await;
    assert_eq!(on["data"]["quantity_received"], 5);
    assert_eq!(on["data"]["fulfilled"], true);

    let off = body_json(post_empty(common::build_test_app(pool.clone()), &uri).await).await;
    assert_eq!(off["data"]["quantity_received"], 2);
    assert_eq!(off["data"]["remaining"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_received_clamps_and_reconcile_restores(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let item_id = create_item(&pool, registry_id, "Blankets", 4).await;
    buy(&pool, item_id, "Ana", 1).await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{item_id}/received"),
        serde_json::json!({"quantity_received": 10}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["quantity_received"], 4);

    let response = post_empty(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{item_id}/reconcile"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await["data"].clone();
    assert_eq!(outcome["previous"], 4);
    assert_eq!(outcome["reconciled"], 1);
    assert_eq!(item_json(&pool, item_id).await["quantity_received"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_background_repair_fixes_drift_but_not_overrides(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let drifted = create_item(&pool, registry_id, "Cream", 3).await;
    let overridden = create_item(&pool, registry_id, "Lotion", 3).await;

    // A counter edited behind the protocol's back.
    cradle_db::repositories::ItemRepo::set_received(&pool, drifted, 2, false)
        .await
        .unwrap();
    put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{overridden}/received"),
        serde_json::json!({"quantity_received": 3}),
    )
    .await;

    let state = common::test_state(pool.clone());
    let repaired =
        cradle_api::background::reconciliation::repair_drift(&pool, &state.reconciler, 0)
            .await
            .unwrap();
    assert_eq!(repaired, 1);

    assert_eq!(item_json(&pool, drifted).await["quantity_received"], 0);
    assert_eq!(item_json(&pool, overridden).await["quantity_received"], 3);
}

// ---------------------------------------------------------------------------
// Guest view and owner bookkeeping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_view_hides_private_fulfilled_and_owner_email(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let open = create_item(&pool, registry_id, "Crib", 1).await;
    let done = create_item(&pool, registry_id, "Mobile", 1).await;
    let private = create_item(&pool, registry_id, "Pump", 1).await;
    buy(&pool, done, "Ana", 1).await;
    put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/items/{private}"),
        serde_json::json!({"is_private": true}),
    )
    .await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/public/baby-lopez").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(!json.to_string().contains("maria@example.com"));
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap(), open);
    assert_eq!(items[0]["remaining"], 1);

    let response = get(common::build_test_app(pool.clone()), "/api/v1/public/nobody-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Knowing the id does not let a guest buy a private item.
    let response = buy(&pool, private, "Ben", 1).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(item_json(&pool, private).await["quantity_received"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_bookkeeping_and_summary(pool: PgPool) {
    let registry_id = create_registry(&pool).await["id"].as_i64().unwrap();
    let item_id = create_item(&pool, registry_id, "Bath tub", 2).await;
    let purchase_id = body_json(buy(&pool, item_id, "Ana", 1).await).await["data"]["purchase_id"]
        .as_i64()
        .unwrap();
    buy(&pool, item_id, "Ben", 1).await;

    let summary_uri = format!("/api/v1/registries/{registry_id}/gift-summary");
    let summary = body_json(get(common::build_test_app(pool.clone()), &summary_uri).await).await;
    assert_eq!(summary["data"]["confirmed_purchases"], 2);
    assert_eq!(summary["data"]["unseen"], 2);
    assert_eq!(summary["data"]["fulfilled_items"], 1);

    let response = patch_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/purchases/{purchase_id}"),
        serde_json::json!({"is_received": true, "thanked": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let purchase = body_json(response).await["data"].clone();
    assert_eq!(purchase["is_received"], true);
    assert!(purchase["thanked_at"].is_string());

    let response = post_empty(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/registries/{registry_id}/purchases/mark-seen"),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["updated"], 2);

    let summary = body_json(get(common::build_test_app(pool.clone()), &summary_uri).await).await;
    assert_eq!(summary["data"]["unseen"], 0);
    assert_eq!(summary["data"]["awaiting_thanks"], 0);

    let response = patch_json(
        common::build_test_app(pool),
        "/api/v1/purchases/999999",
        serde_json::json!({"is_seen": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
