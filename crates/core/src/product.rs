//! Product (property listing) validation.

use serde_json::Value;

use crate::error::CoreError;

/// Product type used when the caller does not specify one.
pub const DEFAULT_PRODUCT_TYPE: &str = "real_estate";

/// Validate a listing price: finite and not negative.
pub fn validate_price(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::Validation(format!(
            "Price must be a non-negative number (got {price})"
        )));
    }
    Ok(())
}

/// Product metadata (bedrooms, location, images, ...) must be a JSON object.
pub fn validate_metadata(metadata: &Value) -> Result<(), CoreError> {
    if metadata.is_object() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Product metadata must be a JSON object".into(),
        ))
    }
}
