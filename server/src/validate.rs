//! Field validation run before any write reaches the remote store.
//!
//! Every check here is pure. Input arrives as the raw strings of a form
//! submission; output is a field-to-message map, empty when the write may
//! proceed. A field carries at most one message, the first rule that failed
//! for it, while failures on different fields are all reported together.
//!
//! Order-index uniqueness is checked against a caller-supplied set of
//! indices already in use within the relevant scope (all categories, one
//! category's products, all videos, all gallery items). On update the caller
//! excludes the record's own current value. Nothing remote enforces the
//! invariant, so two concurrent writers can still violate it; that window is
//! closed by the per-scope locks in the handlers, not here.

use std::collections::BTreeMap;

pub type FieldErrors = BTreeMap<&'static str, String>;

pub const CATEGORY_NAME_MAX: usize = 100;
pub const PRODUCT_CODE_MAX: usize = 50;
pub const PRODUCT_NAME_MAX: usize = 200;
pub const VIDEO_NAME_MAX: usize = 200;
pub const GALLERY_PRODUCT_MAX: usize = 200;

pub const PRICE_MAX: f64 = 999_999.99;
pub const PRICE_DECIMALS_MAX: usize = 2;

/// Ceiling for category and product order indices.
pub const ORDER_MAX: i32 = 9999;
/// Ceiling for video and gallery order indices (the boards page in smaller
/// steps).
pub const BOARD_ORDER_MAX: i32 = 999;

pub const MAX_FEATURED: usize = 14;

pub const MAX_VIDEO_BYTES: usize = 50 * 1024 * 1024;
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "webm", "ogg", "mov"];
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

pub fn validate_category(name: &str, order_index: &str, existing_orders: &[i32]) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let name = name.trim();
    if name.is_empty() {
        errors.insert("name", "El nombre es obligatorio".into());
    } else if name.chars().count() > CATEGORY_NAME_MAX {
        errors.insert("name", format!("Máximo {CATEGORY_NAME_MAX} caracteres"));
    }

    match parse_order(order_index) {
        None => {
            errors.insert("order_index", "El orden debe ser un número".into());
        }
        Some(order) if !(1..=i64::from(ORDER_MAX)).contains(&order) => {
            errors.insert("order_index", format!("Orden entre 1 y {ORDER_MAX} (sin 0)"));
        }
        Some(order) if existing_orders.contains(&(order as i32)) => {
            errors.insert("order_index", "Ese orden ya está usado por otra categoría".into());
        }
        Some(_) => {}
    }

    errors
}

pub fn validate_product(
    codigo: &str,
    name: &str,
    price: &str,
    category_id: &str,
    order_index: &str,
    existing_orders_in_category: &[i32],
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let codigo = codigo.trim();
    if codigo.is_empty() {
        errors.insert("codigo", "El código es obligatorio".into());
    } else if codigo.chars().count() > PRODUCT_CODE_MAX {
        errors.insert("codigo", format!("Máximo {PRODUCT_CODE_MAX} caracteres"));
    } else if !codigo
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        errors.insert("codigo", "Solo letras, números, guiones y guión bajo".into());
    }

    let name = name.trim();
    if name.is_empty() {
        errors.insert("name", "El nombre es obligatorio".into());
    } else if name.chars().count() > PRODUCT_NAME_MAX {
        errors.insert("name", format!("Máximo {PRODUCT_NAME_MAX} caracteres"));
    }

    let raw_price = price.trim();
    match raw_price.parse::<f64>() {
        Err(_) => {
            errors.insert("price", "Precio inválido".into());
        }
        // "NaN" and "inf" parse as f64 but are not prices.
        Ok(p) if !p.is_finite() => {
            errors.insert("price", "Precio inválido".into());
        }
        Ok(p) if p < 0.0 => {
            errors.insert("price", "El precio no puede ser negativo".into());
        }
        Ok(p) if p > PRICE_MAX => {
            errors.insert("price", "Máximo $999,999.99".into());
        }
        Ok(_) => {
            if decimal_digits(raw_price) > PRICE_DECIMALS_MAX {
                errors.insert("price", format!("Máximo {PRICE_DECIMALS_MAX} decimales"));
            }
        }
    }

    if category_id.trim().is_empty() {
        errors.insert("category_id", "Selecciona una categoría".into());
    }

    match parse_order(order_index) {
        None => {
            errors.insert("order_index", "El orden debe ser un número".into());
        }
        Some(order) if !(1..=i64::from(ORDER_MAX)).contains(&order) => {
            errors.insert("order_index", format!("Orden entre 1 y {ORDER_MAX} (sin 0)"));
        }
        Some(order) if existing_orders_in_category.contains(&(order as i32)) => {
            errors.insert("order_index", "Ese orden ya está usado en esta categoría".into());
        }
        Some(_) => {}
    }

    errors
}

pub fn validate_video(name: &str, order_index: &str, existing_orders: &[i32]) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let name = name.trim();
    if name.is_empty() {
        errors.insert("name", "El nombre es obligatorio.".into());
    } else if name.chars().count() > VIDEO_NAME_MAX {
        errors.insert("name", format!("Máximo {VIDEO_NAME_MAX} caracteres."));
    }

    board_order_check(&mut errors, order_index, existing_orders);

    errors
}

pub fn validate_gallery(
    product: &str,
    price: &str,
    order_index: &str,
    existing_orders: &[i32],
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let product = product.trim();
    if product.is_empty() {
        errors.insert("product", "El producto es obligatorio.".into());
    } else if product.chars().count() > GALLERY_PRODUCT_MAX {
        errors.insert("product", format!("Máximo {GALLERY_PRODUCT_MAX} caracteres."));
    }

    if price.trim().is_empty() {
        errors.insert("price", "El precio es obligatorio.".into());
    }

    board_order_check(&mut errors, order_index, existing_orders);

    errors
}

fn board_order_check(errors: &mut FieldErrors, order_index: &str, existing_orders: &[i32]) {
    match parse_order(order_index) {
        None => {
            errors.insert("order_index", "El orden debe ser un número.".into());
        }
        Some(order) if order < 1 => {
            errors.insert("order_index", "El orden debe ser al menos 1.".into());
        }
        Some(order) if order > i64::from(BOARD_ORDER_MAX) => {
            errors.insert(
                "order_index",
                format!("El orden no puede superar {BOARD_ORDER_MAX}."),
            );
        }
        Some(order) if existing_orders.contains(&(order as i32)) => {
            errors.insert("order_index", "Ese orden ya está en uso.".into());
        }
        Some(_) => {}
    }
}

// Parses into i64 so values past i32 still read as numbers and land on the
// range arm rather than the not-a-number one.
fn parse_order(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn decimal_digits(raw: &str) -> usize {
    raw.split_once('.').map_or(0, |(_, frac)| frac.len())
}

/// File checks for a video upload. Returns the normalized extension on
/// success, the user-facing message for the `file` field otherwise.
pub fn check_video_file(file_name: &str, size: usize) -> Result<String, String> {
    if size == 0 {
        return Err("Selecciona un archivo de video.".into());
    }
    if size > MAX_VIDEO_BYTES {
        return Err(format!(
            "El video supera el límite de 50 MB. Tamaño: {:.1} MB",
            size as f64 / (1024.0 * 1024.0)
        ));
    }
    let ext = extension(file_name, "mp4");
    if !VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        return Err("Formatos permitidos: mp4, webm, ogg, mov".into());
    }
    Ok(ext)
}

/// File checks for a gallery image upload.
pub fn check_image_file(file_name: &str, size: usize) -> Result<String, String> {
    if size == 0 {
        return Err("Selecciona una imagen.".into());
    }
    if size > MAX_IMAGE_BYTES {
        return Err(format!(
            "La imagen supera el límite de 10 MB. Tamaño: {:.1} MB",
            size as f64 / (1024.0 * 1024.0)
        ));
    }
    let ext = extension(file_name, "jpg");
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err("Formatos permitidos: jpg, png, webp, gif".into());
    }
    Ok(ext)
}

fn extension(file_name: &str, fallback: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
