use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::DomainError,
    value_objects::{ProductId, ProductImage},
};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Prices are persisted as NUMERIC(18, 2)
pub const MAX_PRICE_SCALE: u32 = 2;
/// Exclusive upper bound on prices: at most 16 integer digits
pub const PRICE_LIMIT: i64 = 10_000_000_000_000_000;

/// Product category. `Undefined` is the "no category set" sentinel and is
/// rejected by every invariant check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductCategory {
    #[default]
    Undefined,
    Electronics,
    Books,
    Clothing,
    Home,
    Sports,
    Toys,
    Food,
    Beauty,
    Other,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 10] = [
        ProductCategory::Undefined,
        ProductCategory::Electronics,
        ProductCategory::Books,
        ProductCategory::Clothing,
        ProductCategory::Home,
        ProductCategory::Sports,
        ProductCategory::Toys,
        ProductCategory::Food,
        ProductCategory::Beauty,
        ProductCategory::Other,
    ];

    pub fn is_defined(&self) -> bool {
        *self != ProductCategory::Undefined
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Undefined => "Undefined",
            ProductCategory::Electronics => "Electronics",
            ProductCategory::Books => "Books",
            ProductCategory::Clothing => "Clothing",
            ProductCategory::Home => "Home",
            ProductCategory::Sports => "Sports",
            ProductCategory::Toys => "Toys",
            ProductCategory::Food => "Food",
            ProductCategory::Beauty => "Beauty",
            ProductCategory::Other => "Other",
        }
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog product (aggregate root).
///
/// Invariants, checked on construction and by every mutator before any
/// field is touched:
/// - name is non-blank and at most [`MAX_NAME_LEN`] characters
/// - description is non-blank and at most [`MAX_DESCRIPTION_LEN`] characters
/// - price is strictly positive
/// - category is not [`ProductCategory::Undefined`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: Decimal,
    category: ProductCategory,
    active: bool,
    image: Option<ProductImage>,
}

/// Persisted state of a product, used to rehydrate it from storage
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: ProductCategory,
    pub active: bool,
    pub image: Option<ProductImage>,
}

impl Product {
    /// Create a new active product with a fresh identifier
    pub fn create(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        category: ProductCategory,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let description = description.into();

        check_name(&name)?;
        check_description(&description)?;
        check_price(price)?;
        check_category(category)?;

        Ok(Self {
            id: ProductId::generate(),
            name,
            description,
            price,
            category,
            active: true,
            image: None,
        })
    }

    /// Rebuild a product from persisted state, re-checking every invariant
    pub fn restore(snapshot: ProductSnapshot) -> Result<Self, DomainError> {
        check_name(&snapshot.name)?;
        check_description(&snapshot.description)?;
        check_price(snapshot.price)?;
        check_category(snapshot.category)?;

        Ok(Self {
            id: snapshot.id,
            name: snapshot.name,
            description: snapshot.description,
            price: snapshot.price,
            category: snapshot.category,
            active: snapshot.active,
            image: snapshot.image,
        })
    }

    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            category: self.category,
            active: self.active,
            image: self.image.clone(),
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn category(&self) -> ProductCategory {
        self.category
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn image(&self) -> Option<&ProductImage> {
        self.image.as_ref()
    }

    pub fn change_name(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        check_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn change_description(
        &mut self,
        description: impl Into<String>,
    ) -> Result<(), DomainError> {
        let description = description.into();
        check_description(&description)?;
        self.description = description;
        Ok(())
    }

    pub fn change_price(&mut self, price: Decimal) -> Result<(), DomainError> {
        check_price(price)?;
        self.price = price;
        Ok(())
    }

    pub fn change_category(&mut self, category: ProductCategory) -> Result<(), DomainError> {
        check_category(category)?;
        self.category = category;
        Ok(())
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Replace the current image, if any
    pub fn change_image(&mut self, image: ProductImage) {
        self.image = Some(image);
    }

    pub fn remove_image(&mut self) {
        self.image = None;
    }
}

fn check_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::BlankProductName);
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(DomainError::ProductNameTooLong {
            actual: len,
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

fn check_description(description: &str) -> Result<(), DomainError> {
    if description.trim().is_empty() {
        return Err(DomainError::BlankProductDescription);
    }

    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(DomainError::ProductDescriptionTooLong {
            actual: len,
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

fn check_price(price: Decimal) -> Result<(), DomainError> {
    if price <= Decimal::ZERO {
        return Err(DomainError::NonPositivePrice);
    }
    let scale = price.normalize().scale();
    if scale > MAX_PRICE_SCALE {
        return Err(DomainError::PriceTooPrecise {
            scale,
            max: MAX_PRICE_SCALE,
        });
    }
    if price >= Decimal::from(PRICE_LIMIT) {
        return Err(DomainError::PriceTooLarge);
    }
    Ok(())
}

fn check_category(category: ProductCategory) -> Result<(), DomainError> {
    if !category.is_defined() {
        return Err(DomainError::UndefinedCategory);
    }
    Ok(())
}
