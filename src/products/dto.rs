use rust_decimal::Decimal;
use serde::Deserialize;

use super::repo_types::ProductData;
use crate::error::AppError;

/// `products.price` is `NUMERIC(12, 2)`.
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 10_000_000_000;

/// Body of `POST /api/products` and `PUT /api/products/:id`.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl TryFrom<ProductRequest> for ProductData {
    type Error = AppError;

    fn try_from(req: ProductRequest) -> Result<Self, Self::Error> {
        let name = req.name.trim().to_owned();
        if name.is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if req.price < Decimal::ZERO {
            return Err(AppError::validation("Price must not be negative"));
        }
        if req.price >= Decimal::from(PRICE_LIMIT) {
            return Err(AppError::validation("Price must be below 10000000000"));
        }
        if req.price.normalize().scale() > PRICE_SCALE {
            return Err(AppError::validation("Price must have at most 2 decimal places"));
        }
        if req.stock < 0 {
            return Err(AppError::validation("Stock must not be negative"));
        }
        Ok(Self {
            name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            image_url: req.image_url,
            category_id: req.category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(json: serde_json::Value) -> ProductRequest {
        serde_json::from_value(json).expect("valid request json")
    }

    #[test]
    fn accepts_numeric_and_string_prices() {
        let a: ProductData = req(serde_json::json!({"name": "Pen", "price": 1.5, "stock": 3}))
            .try_into()
            .expect("valid");
        let b: ProductData = req(serde_json::json!({"name": "Pen", "price": "1.50", "stock": 3}))
            .try_into()
            .expect("valid");
        assert_eq!(a.price, b.price);
        assert_eq!(a.category_id, None);
    }

    #[test]
    fn rejects_blank_name_and_negative_amounts() {
        for body in [
            serde_json::json!({"name": " ", "price": 1, "stock": 1}),
            serde_json::json!({"name": "Pen", "price": -1, "stock": 1}),
            serde_json::json!({"name": "Pen", "price": 1, "stock": -2}),
            serde_json::json!({"name": "Pen", "price": "-0.01", "stock": 1}),
        ] {
            let res: Result<ProductData, _> = req(body).try_into();
            assert!(matches!(res, Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn rejects_prices_the_column_cannot_hold() {
        for price in ["10000000000", "99999999999", "1.999", "0.001"] {
            let res: Result<ProductData, _> =
                req(serde_json::json!({"name": "Pen", "price": price, "stock": 1})).try_into();
            assert!(matches!(res, Err(AppError::Validation(_))), "accepted {price}");
        }
    }

    #[test]
    fn accepts_zero_and_largest_price() {
        for price in ["-0", "-0.00", "0", "9999999999.99", "1.500"] {
            let body = serde_json::json!({"name": "Pen", "price": price, "stock": 1});
            let data: ProductData = req(body)
                .try_into()
                .unwrap_or_else(|e| panic!("rejected {price}: {e:?}"));
            assert!(data.price >= Decimal::ZERO);
        }
    }
}
