//! Input boundary for products entered by a user.
//!
//! The model accepts any values; the invariants (non-empty name, non-negative
//! price and stock) are checked here, before a product reaches the client.

use thiserror::Error;

use crate::types::Product;

/// Why a form could not be turned into a product.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("price is not a number: {0:?}")]
    InvalidPrice(String),

    #[error("price must not be negative")]
    NegativePrice,

    #[error("stock is not a whole number: {0:?}")]
    InvalidStock(String),

    #[error("stock must not be negative")]
    NegativeStock,
}

/// Raw text fields of a product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub stock: String,
}

impl ProductForm {
    /// Prefill a form from an existing product, for editing.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
        }
    }

    /// Parse and validate the form into a product without an id.
    pub fn parse(&self) -> Result<Product, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let price_text = self.price.trim();
        let price: f64 = price_text
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite())
            .ok_or_else(|| ValidationError::InvalidPrice(price_text.to_string()))?;

        let stock_text = self.stock.trim();
        let stock: i64 = stock_text
            .parse()
            .map_err(|_| ValidationError::InvalidStock(stock_text.to_string()))?;

        let product = Product::new(name, price, stock);
        validate(&product)?;
        Ok(product)
    }
}

/// Check the invariants on an already-built product.
pub fn validate(product: &Product) -> Result<(), ValidationError> {
    if product.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !product.price.is_finite() {
        return Err(ValidationError::InvalidPrice(product.price.to_string()));
    }
    if product.price < 0.0 {
        return Err(ValidationError::NegativePrice);
    }
    if product.stock < 0 {
        return Err(ValidationError::NegativeStock);
    }
    Ok(())
}
