use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

/// Fallback category that adopts the products of any deleted category.
/// Fixed row seeded in the remote schema; it can never be deleted.
pub const GENERAL_CATEGORY_ID: Uuid = uuid!("00000000-0000-0000-0000-000000000001");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub order_index: i32,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estado {
    Activo,
    Inactivo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub codigo: String,
    pub name: String,
    pub price: f64,
    pub order_index: i32,
    pub estado: Estado,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Row of the `products_with_category` view consumed by the TV boards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithCategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub order_index: i32,
    pub estado: Estado,
    #[serde(default)]
    pub is_featured: bool,
    pub category_name: String,
    pub category_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub name: String,
    pub file_url: String,
    pub order_index: i32,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Row of the `galeria` table. `price` is free-form display text, not a
/// number, because the board renders it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: Uuid,
    pub product: String,
    pub price: String,
    pub image_url: String,
    pub order_index: i32,
    #[serde(default)]
    pub created_at: Option<String>,
}

// Write payloads. Each maps one-to-one onto the columns the corresponding
// mutation is allowed to touch.

#[derive(Debug, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub order_index: i32,
}

#[derive(Debug, Serialize)]
pub struct CategoryChanges {
    pub name: String,
    pub order_index: i32,
}

#[derive(Debug, Serialize)]
pub struct NewProduct {
    pub category_id: Uuid,
    pub codigo: String,
    pub name: String,
    pub price: f64,
    pub order_index: i32,
    pub estado: Estado,
}

#[derive(Debug, Serialize)]
pub struct ProductChanges {
    pub category_id: Uuid,
    pub codigo: String,
    pub name: String,
    pub price: f64,
    pub order_index: i32,
}

#[derive(Debug, Serialize)]
pub struct FeaturedChange {
    pub is_featured: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoryReassign {
    pub category_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct NewVideo {
    pub name: String,
    pub file_url: String,
    pub order_index: i32,
}

#[derive(Debug, Serialize)]
pub struct VideoChanges {
    pub name: String,
    pub order_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewGalleryItem {
    pub product: String,
    pub price: String,
    pub image_url: String,
    pub order_index: i32,
}

#[derive(Debug, Serialize)]
pub struct GalleryChanges {
    pub product: String,
    pub price: String,
    pub order_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderChange {
    pub order_index: i32,
}

/// Minimal projection used to gather the order indices already in use
/// within a scope before validating a write.
#[derive(Debug, Deserialize)]
pub struct OrderRow {
    pub order_index: i32,
}

/// Minimal projection used when only a row's file URL is needed, for
/// best-effort blob cleanup.
#[derive(Debug, Deserialize)]
pub struct FileUrlRow {
    pub file_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageUrlRow {
    pub image_url: String,
}
