//! Public TV-board reads.
//!
//! Unauthenticated, cache-first endpoints feeding the signage screens. Each
//! board reads through its redis key with the long TTL; admin mutations
//! delete the key, so a board refresh after a change sees fresh data without
//! waiting out the TTL. With the cache down the boards read the store
//! directly.

use std::sync::Arc;

use axum::{extract::State, Json};
use lacteos_store::{
    models::{Category, GalleryItem, Product, ProductWithCategory, Video},
    Query,
};
use serde::{Deserialize, Serialize};

use crate::{
    cache::{TV_GALLERY, TV_MENU, TV_PRODUCTS, TV_VIDEOS},
    error::AppError,
    state::AppState,
    validate::MAX_FEATURED,
};

/// Featured-products board: up to 14 active featured products, in display
/// order, with their category columns from the joined view.
pub async fn featured_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductWithCategory>>, AppError> {
    if let Some(rows) = state
        .cache
        .get_json::<Vec<ProductWithCategory>>(TV_PRODUCTS)
        .await
    {
        return Ok(Json(rows));
    }

    let rows: Vec<ProductWithCategory> = state
        .data
        .select(
            Query::table("products_with_category")
                .eq("estado", "activo")
                .eq("is_featured", true)
                .order("order_index.asc,name.asc")
                .limit(MAX_FEATURED),
        )
        .await?;
    state.cache.put_json(TV_PRODUCTS, &rows).await;
    Ok(Json(rows))
}

/// One menu-board section: a category and its active products in display
/// order.
#[derive(Debug, Serialize, Deserialize)]
pub struct MenuSection {
    pub category: Category,
    pub products: Vec<Product>,
}

/// Full menu board: every category in order, each with its active products.
pub async fn menu_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MenuSection>>, AppError> {
    if let Some(sections) = state.cache.get_json::<Vec<MenuSection>>(TV_MENU).await {
        return Ok(Json(sections));
    }

    let categories: Vec<Category> = state
        .data
        .select(Query::table("categories").order("order_index.asc"))
        .await?;
    let products: Vec<Product> = state
        .data
        .select(
            Query::table("products")
                .eq("estado", "activo")
                .order("order_index.asc,name.asc"),
        )
        .await?;

    let sections: Vec<MenuSection> = categories
        .into_iter()
        .map(|category| {
            let products = products
                .iter()
                .filter(|product| product.category_id == category.id)
                .cloned()
                .collect();
            MenuSection { category, products }
        })
        .collect();

    state.cache.put_json(TV_MENU, &sections).await;
    Ok(Json(sections))
}

pub async fn gallery_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GalleryItem>>, AppError> {
    if let Some(rows) = state.cache.get_json::<Vec<GalleryItem>>(TV_GALLERY).await {
        return Ok(Json(rows));
    }

    let rows: Vec<GalleryItem> = state
        .data
        .select(Query::table("galeria").order("order_index.asc"))
        .await?;
    state.cache.put_json(TV_GALLERY, &rows).await;
    Ok(Json(rows))
}

pub async fn videos_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Video>>, AppError> {
    if let Some(rows) = state.cache.get_json::<Vec<Video>>(TV_VIDEOS).await {
        return Ok(Json(rows));
    }

    let rows: Vec<Video> = state
        .data
        .select(Query::table("videos").order("order_index.asc"))
        .await?;
    state.cache.put_json(TV_VIDEOS, &rows).await;
    Ok(Json(rows))
}
