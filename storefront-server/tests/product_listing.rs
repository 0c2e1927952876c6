mod common;

use std::sync::Arc;

use common::{category, product};
use rust_decimal::Decimal;
use shared::catalog::CatalogError;
use shared::models::{ProductCreate, ProductQuery, ProductSort, ProductUpdate};
use storefront_server::db::MemoryStore;
use storefront_server::services::ProductService;

fn catalog() -> ProductService {
    let mut featured = product(4, "rose-bouquet", 4500, &[3]);
    featured.is_featured = true;

    let store = MemoryStore::with_data(
        vec![
            category(1, "flowers", None),
            category(2, "bouquets", Some(1)),
            category(3, "roses", Some(2)),
            category(5, "gifts", None),
        ],
        vec![
            product(1, "tulips", 1500, &[1]),
            product(2, "mixed-bouquet", 3000, &[2]),
            product(3, "teddy-bear", 2000, &[5]),
            featured,
            product(6, "gift-rose", 1000, &[5, 3]),
        ],
    );
    ProductService::new(Arc::new(store))
}

fn ids(products: &[shared::models::Product]) -> Vec<i64> {
    products.iter().map(|p| p.id).collect()
}

fn by_category(reference: &str) -> ProductQuery {
    ProductQuery {
        category: Some(reference.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_list_defaults_to_newest_first() {
    let products = catalog().list(&ProductQuery::default()).await.unwrap();
    assert_eq!(ids(&products), vec![6, 4, 3, 2, 1]);
}

#[tokio::test]
async fn test_category_filter_includes_descendants() {
    let service = catalog();

    let flowers = service.list(&by_category("flowers")).await.unwrap();
    assert_eq!(ids(&flowers), vec![6, 4, 2, 1]);

    let bouquets = service.list(&by_category("2")).await.unwrap();
    assert_eq!(ids(&bouquets), vec![6, 4, 2]);

    let gifts = service.list(&by_category("gifts")).await.unwrap();
    assert_eq!(ids(&gifts), vec![6, 3]);
}

#[tokio::test]
async fn test_unknown_category_filter_is_ignored() {
    let products = catalog().list(&by_category("no-such-thing")).await.unwrap();
    assert_eq!(products.len(), 5);
}

#[tokio::test]
async fn test_featured_sort_and_limit() {
    let service = catalog();

    let featured = service
        .list(&ProductQuery {
            featured: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&featured), vec![4]);

    let cheapest = service
        .list(&ProductQuery {
            sort: Some(ProductSort::PriceAsc),
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&cheapest), vec![6, 1]);

    let priciest = service
        .list(&ProductQuery {
            category: Some("flowers".to_string()),
            sort: Some(ProductSort::PriceDesc),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&priciest), vec![4, 2, 1, 6]);
}

#[tokio::test]
async fn test_create_checks_categories() {
    let service = catalog();

    let created = service
        .create(ProductCreate {
            name: "Sunflowers".to_string(),
            price: Decimal::new(1250, 2),
            category_ids: vec![1, 1, 2],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.slug, "sunflowers");
    assert_eq!(created.category_ids, vec![1, 2]);
    assert_eq!(service.get(created.id).await.unwrap(), created);

    let err = service
        .create(ProductCreate {
            name: "Ghost".to_string(),
            price: Decimal::ONE,
            category_ids: vec![404],
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));

    let err = service
        .create(ProductCreate {
            name: "Negative".to_string(),
            price: Decimal::new(-1, 0),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidInput(_)));
}

#[tokio::test]
async fn test_update_and_delete() {
    let service = catalog();

    let updated = service
        .update(
            1,
            ProductUpdate {
                price: Some(Decimal::new(1750, 2)),
                category_ids: Some(vec![5]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, Decimal::new(1750, 2));
    assert_eq!(updated.category_ids, vec![5]);

    let err = service
        .update(
            1,
            ProductUpdate {
                slug: Some("teddy-bear".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::SlugTaken { .. }));

    service.delete(1).await.unwrap();
    assert!(matches!(
        service.get(1).await.unwrap_err(),
        CatalogError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_update_sets_and_clears_compare_at_price() {
    let service = catalog();
    let set = |value: Option<Decimal>| ProductUpdate {
        compare_at_price: Some(value),
        ..Default::default()
    };

    let updated = service.update(1, set(Some(Decimal::new(1900, 2)))).await.unwrap();
    assert_eq!(updated.compare_at_price, Some(Decimal::new(1900, 2)));

    // Absent field keeps the current value
    let kept = service
        .update(
            1,
            ProductUpdate {
                is_featured: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(kept.compare_at_price, Some(Decimal::new(1900, 2)));

    let cleared = service.update(1, set(None)).await.unwrap();
    assert_eq!(cleared.compare_at_price, None);
    assert_eq!(service.get(1).await.unwrap().compare_at_price, None);
}

#[test]
fn test_update_payload_compare_at_price_forms() {
    let payload: ProductUpdate = serde_json::from_str(r#"{"compare_at_price": null}"#).unwrap();
    assert_eq!(payload.compare_at_price, Some(None));

    let payload: ProductUpdate = serde_json::from_str(r#"{"compare_at_price": 19.5}"#).unwrap();
    assert_eq!(payload.compare_at_price, Some(Some(Decimal::new(195, 1))));

    let payload: ProductUpdate = serde_json::from_str(r#"{"name": "Tulips"}"#).unwrap();
    assert_eq!(payload.compare_at_price, None);
}
