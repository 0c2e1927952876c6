mod common;

use std::sync::Arc;

use common::{FlakyStore, categories_of, category, product};
use shared::catalog::{AssignmentOp, CatalogError, DesiredProducts};
use storefront_server::db::{CatalogStore, MemoryStore};
use storefront_server::services::CategorySyncService;

const X: i64 = 10;
const Y: i64 = 20;

fn seeded() -> FlakyStore {
    FlakyStore::new(MemoryStore::with_data(
        vec![category(X, "flowers", None), category(Y, "gifts", None)],
        vec![
            product(1, "p1", 1000, &[X]),
            product(2, "p2", 2000, &[X, Y]),
            product(3, "p3", 3000, &[Y]),
        ],
    ))
}

fn desired(ids: &[i64]) -> DesiredProducts {
    ids.iter().copied().collect()
}

#[tokio::test]
async fn test_sync_replaces_carrier_set() {
    let store = seeded();
    let service = CategorySyncService::new(Arc::new(store.clone()));

    let result = service.sync(X, &desired(&[2, 3])).await.unwrap();

    assert_eq!(result.removed, 1);
    assert_eq!(result.added, 1);
    assert!(result.ignored.is_empty());
    assert_eq!(result.message(), "Successfully updated flowers assignments.");

    assert_eq!(categories_of(&store, 1).await, Vec::<i64>::new());
    assert_eq!(categories_of(&store, 2).await, vec![X, Y]);
    assert_eq!(categories_of(&store, 3).await, vec![X, Y]);
    assert_eq!(service.assigned_products(X).await.unwrap(), vec![2, 3]);
}

#[tokio::test]
async fn test_sync_leaves_other_categories_alone() {
    let store = seeded();
    let service = CategorySyncService::new(Arc::new(store.clone()));

    service.sync(X, &desired(&[])).await.unwrap();

    assert_eq!(service.assigned_products(X).await.unwrap(), Vec::<i64>::new());
    assert_eq!(service.assigned_products(Y).await.unwrap(), vec![2, 3]);
}

#[tokio::test]
async fn test_sync_unknown_category_performs_no_writes() {
    let store = seeded();
    let service = CategorySyncService::new(Arc::new(store.clone()));

    let err = service.sync(999, &desired(&[1])).await.unwrap_err();

    assert!(matches!(err, CatalogError::NotFound { .. }));
    assert_eq!(store.assignment_writes(), 0);
    assert_eq!(categories_of(&store, 1).await, vec![X]);
}

#[tokio::test]
async fn test_sync_twice_is_idempotent() {
    let store = seeded();
    let service = CategorySyncService::new(Arc::new(store.clone()));

    service.sync(X, &desired(&[2, 3])).await.unwrap();
    let writes = store.assignment_writes();
    assert_eq!(writes, 2);

    let second = service.sync(X, &desired(&[2, 3])).await.unwrap();
    assert_eq!(second.removed, 0);
    assert_eq!(second.added, 0);
    assert_eq!(store.assignment_writes(), writes);
}

#[tokio::test]
async fn test_sync_ignores_unknown_products() {
    let store = seeded();
    let service = CategorySyncService::new(Arc::new(store.clone()));

    let result = service.sync(Y, &desired(&[1, 404])).await.unwrap();

    assert_eq!(result.ignored, vec![404]);
    assert_eq!(result.added, 1);
    assert_eq!(result.removed, 2);
    assert_eq!(service.assigned_products(Y).await.unwrap(), vec![1]);
    assert!(store.find_product(404).await.unwrap().is_none());
}

#[tokio::test]
async fn test_sync_reports_partial_failure_after_all_writes() {
    let store = seeded();
    store.fail_for(1);
    let service = CategorySyncService::new(Arc::new(store.clone()));

    let err = service.sync(X, &desired(&[2, 3])).await.unwrap_err();

    let CatalogError::PartialFailure { result, failed } = err else {
        panic!("expected partial failure, got {err:?}");
    };
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].product_id, 1);
    assert_eq!(failed[0].op, AssignmentOp::Remove);
    assert_eq!(result.added, 1);
    assert_eq!(result.removed, 0);

    // The addition for P3 went through despite the failed removal
    assert_eq!(categories_of(&store, 3).await, vec![X, Y]);
    assert_eq!(categories_of(&store, 1).await, vec![X]);

    // Re-submitting once the store recovers converges
    store.heal();
    let retry = service.sync(X, &desired(&[2, 3])).await.unwrap();
    assert_eq!(retry.removed, 1);
    assert_eq!(retry.added, 0);
    assert_eq!(service.assigned_products(X).await.unwrap(), vec![2, 3]);
}

#[tokio::test]
async fn test_sync_round_trip() {
    let store = seeded();
    let service = CategorySyncService::new(Arc::new(store.clone()));

    let before = service.assigned_products(Y).await.unwrap();
    let result = service.sync(Y, &before.iter().copied().collect()).await.unwrap();

    assert_eq!(result.removed + result.added, 0);
    assert_eq!(service.assigned_products(Y).await.unwrap(), before);
}

#[tokio::test]
async fn test_assigned_products_unknown_category() {
    let service = CategorySyncService::new(Arc::new(seeded()));
    let err = service.assigned_products(404).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}
