//! Shopify product export (CSV) parsing
//!
//! A Shopify export has one row per variant/image. Rows are grouped by
//! `Handle`: the first row of a handle defines the product, later rows only
//! contribute additional distinct `Image Src` values. Rows without a handle
//! are skipped.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::catalog::{CatalogError, CatalogResult};
use shared::models::{ImportProduct, ProductStatus};

/// Category used when a row has neither a custom nor a standard product type
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShopifyRow {
    #[serde(rename = "Handle")]
    handle: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Body (HTML)")]
    body_html: String,
    #[serde(rename = "Variant Price")]
    price: String,
    #[serde(rename = "Variant Compare At Price")]
    compare_at_price: String,
    #[serde(rename = "Custom Product Type")]
    custom_type: String,
    #[serde(rename = "Standard Product Type")]
    standard_type: String,
    #[serde(rename = "Tags")]
    tags: String,
    #[serde(rename = "Variant Inventory Qty")]
    inventory: String,
    #[serde(rename = "Image Src")]
    image_src: String,
    #[serde(rename = "SEO Title")]
    seo_title: String,
    #[serde(rename = "SEO Description")]
    seo_description: String,
    #[serde(rename = "Published")]
    published: String,
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|s| !s.is_empty())
}

impl ShopifyRow {
    fn into_product(self) -> ImportProduct {
        let handle = self.handle;
        let name = first_non_empty(&[self.title.as_str(), handle.as_str()])
            .unwrap_or("Untitled Product")
            .to_string();
        let description = first_non_empty(&[self.body_html.as_str(), self.title.as_str(), handle.as_str()])
            .unwrap_or_default()
            .to_string();
        let category = first_non_empty(&[self.custom_type.as_str(), self.standard_type.as_str()])
            .unwrap_or(FALLBACK_CATEGORY)
            .to_string();

        ImportProduct {
            name,
            slug: handle,
            description,
            price: parse_decimal(&self.price).unwrap_or(Decimal::ZERO),
            compare_at_price: parse_decimal(&self.compare_at_price),
            category,
            tags: self
                .tags
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
            inventory: self.inventory.trim().parse().unwrap_or(0),
            images: Some(self.image_src)
                .filter(|s| !s.is_empty())
                .into_iter()
                .collect(),
            seo_title: self.seo_title,
            seo_description: self.seo_description,
            status: if self.published.eq_ignore_ascii_case("true") {
                ProductStatus::Active
            } else {
                ProductStatus::Draft
            },
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    raw.trim().parse::<Decimal>().ok()
}

/// Parse a Shopify CSV export into import records, in first-seen handle order
pub fn parse_shopify_csv(text: &str) -> CatalogResult<Vec<ImportProduct>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut products: Vec<ImportProduct> = Vec::new();
    let mut by_handle: HashMap<String, usize> = HashMap::new();

    for (line, record) in reader.deserialize::<ShopifyRow>().enumerate() {
        let row = record.map_err(|e| {
            CatalogError::ImportParse(format!("CSV row {} is malformed: {e}", line + 2))
        })?;
        if row.handle.is_empty() {
            continue;
        }

        match by_handle.get(&row.handle) {
            Some(&i) => {
                let images = &mut products[i].images;
                if !row.image_src.is_empty() && !images.contains(&row.image_src) {
                    images.push(row.image_src);
                }
            }
            None => {
                by_handle.insert(row.handle.clone(), products.len());
                products.push(row.into_product());
            }
        }
    }

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
Handle,Title,Body (HTML),Variant Price,Variant Compare At Price,Custom Product Type,Tags,Variant Inventory Qty,Image Src,SEO Title,Published
red-roses,Red Roses,\"<p>A dozen, hand-tied</p>\",49.90,59.90,Flowers,\"roses, red ,valentine\",12,https://cdn.example/roses-1.jpg,Red Roses Bouquet,TRUE
red-roses,,,,,,,,https://cdn.example/roses-2.jpg,,
red-roses,,,,,,,,https://cdn.example/roses-1.jpg,,
,Orphan row,,1.00,,,,,,,
choco-box,,,abc,,,,,,,false
";

    #[test]
    fn test_groups_rows_by_handle() {
        let products = parse_shopify_csv(EXPORT).unwrap();
        assert_eq!(products.len(), 2);

        let roses = &products[0];
        assert_eq!(roses.name, "Red Roses");
        assert_eq!(roses.slug, "red-roses");
        assert_eq!(roses.description, "<p>A dozen, hand-tied</p>");
        assert_eq!(roses.price, Decimal::new(4990, 2));
        assert_eq!(roses.compare_at_price, Some(Decimal::new(5990, 2)));
        assert_eq!(roses.category, "Flowers");
        assert_eq!(roses.tags, vec!["roses", "red", "valentine"]);
        assert_eq!(roses.inventory, 12);
        assert_eq!(
            roses.images,
            vec!["https://cdn.example/roses-1.jpg", "https://cdn.example/roses-2.jpg"]
        );
        assert_eq!(roses.seo_title, "Red Roses Bouquet");
        assert_eq!(roses.status, ProductStatus::Active);
    }

    #[test]
    fn test_missing_values_fall_back() {
        let products = parse_shopify_csv(EXPORT).unwrap();
        let choco = &products[1];
        assert_eq!(choco.name, "choco-box");
        assert_eq!(choco.description, "choco-box");
        assert_eq!(choco.price, Decimal::ZERO);
        assert_eq!(choco.compare_at_price, None);
        assert_eq!(choco.category, FALLBACK_CATEGORY);
        assert!(choco.images.is_empty());
        assert_eq!(choco.status, ProductStatus::Draft);
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(parse_shopify_csv("Handle,Title\n").unwrap().is_empty());
        assert!(parse_shopify_csv("").unwrap().is_empty());
    }
}
