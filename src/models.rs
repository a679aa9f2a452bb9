// Typed schemas for the storefront tables

use crate::error::Result;
use crate::record::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Binds a model type to the table its records live in
pub trait Schema: Serialize + for<'de> Deserialize<'de> + Clone {
    /// Table name, e.g. "products"
    fn table_name() -> &'static str
    where
        Self: Sized;

    fn id(&self) -> &str;
}

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Catalog category, matched to products by `slug`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Registered shopper
///
/// The wishlist holds product ids. Orders are kept on the user as well as in
/// the orders table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub wishlist: Vec<String>,
    #[serde(default)]
    pub orders: Vec<Order>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

/// Line of an order: a product snapshot and a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    pub title: String,
    pub price: f64,
    pub quantity: u32,
}

impl OrderItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Placed order
///
/// Orders nested in a user record carry numeric ids and no timestamps, so
/// both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_id")]
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total: f64,
    #[serde(default)]
    pub item_count: u32,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Sum of item subtotals
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(OrderItem::subtotal).sum()
    }
}

impl Schema for Product {
    fn table_name() -> &'static str {
        "products"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Schema for Category {
    fn table_name() -> &'static str {
        "categories"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Schema for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Schema for Order {
    fn table_name() -> &'static str {
        "orders"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// A stored record decoded according to the table it came from
#[derive(Debug, Clone, PartialEq)]
pub enum TypedRecord {
    Product(Product),
    Category(Category),
    User(User),
    Order(Order),
    /// Table without a known schema
    Other(Record),
}

impl TypedRecord {
    /// Decode `record` using the schema registered for `table`
    ///
    /// Records of a known table that do not fit its schema are an error.
    pub fn from_record(table: &str, record: &Record) -> Result<Self> {
        let typed = match table {
            t if t == Product::table_name() => TypedRecord::Product(record.decode()?),
            t if t == Category::table_name() => TypedRecord::Category(record.decode()?),
            t if t == User::table_name() => TypedRecord::User(record.decode()?),
            t if t == Order::table_name() => TypedRecord::Order(record.decode()?),
            _ => TypedRecord::Other(record.clone()),
        };
        Ok(typed)
    }

    pub fn id(&self) -> &str {
        match self {
            TypedRecord::Product(p) => p.id(),
            TypedRecord::Category(c) => c.id(),
            TypedRecord::User(u) => u.id(),
            TypedRecord::Order(o) => o.id(),
            TypedRecord::Other(r) => &r.id,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Str(String),
    Num(serde_json::Number),
}

impl From<IdRepr> for String {
    fn from(id: IdRepr) -> Self {
        match id {
            IdRepr::Str(s) => s,
            IdRepr::Num(n) => n.to_string(),
        }
    }
}

/// Ids written as JSON numbers read back as their decimal string
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    IdRepr::deserialize(deserializer).map(String::from)
}

fn lenient_ids<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    let ids = Vec::<IdRepr>::deserialize(deserializer)?;
    Ok(ids.into_iter().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => Record::new(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_product_from_record() {
        let r = record(json!({
            "title": "Basketball",
            "description": "Official size basketball",
            "price": 24.99,
            "originalPrice": 34.99,
            "category": "sports",
            "inStock": true,
            "stock": 80,
            "rating": 4.2,
            "reviews": 29
        }));

        let typed = TypedRecord::from_record("products", &r).unwrap();
        match typed {
            TypedRecord::Product(p) => {
                assert_eq!(p.id, r.id);
                assert_eq!(p.title, "Basketball");
                assert_eq!(p.original_price, Some(34.99));
                assert_eq!(p.stock, 80);
                assert_eq!(p.created_at, r.created_at);
            }
            other => panic!("expected product, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_table_falls_back() {
        let r = record(json!({"productId": "p1", "quantity": 2}));

        let typed = TypedRecord::from_record("cart", &r).unwrap();
        assert_eq!(typed, TypedRecord::Other(r.clone()));
        assert_eq!(typed.id(), r.id);
    }

    #[test]
    fn test_known_table_rejects_wrong_shape() {
        let r = record(json!({"name": "no email"}));
        assert!(TypedRecord::from_record("users", &r).is_err());
    }

    #[test]
    fn test_user_with_nested_numeric_order_ids() {
        let r = record(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "password": "secret1",
            "wishlist": ["p1", 1700000000000u64],
            "orders": [{
                "id": 1700000000123u64,
                "userId": "u1",
                "items": [{"id": "p1", "title": "Yoga Mat", "price": 49.99, "quantity": 2}],
                "total": 99.98,
                "itemCount": 2,
                "status": "completed",
                "orderDate": "2024-03-01T10:00:00.000Z"
            }]
        }));

        let user: User = r.decode().unwrap();
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.wishlist, vec!["p1", "1700000000000"]);
        assert_eq!(user.orders[0].id, "1700000000123");
        assert_eq!(user.orders[0].status, OrderStatus::Completed);
        assert!((user.orders[0].items_total() - 99.98).abs() < 1e-9);
    }

    #[test]
    fn test_order_status_serialization() {
        assert_eq!(serde_json::to_string(&OrderStatus::Cancelled).unwrap(), "\"cancelled\"");
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Product::table_name(), "products");
        assert_eq!(Category::table_name(), "categories");
        assert_eq!(User::table_name(), "users");
        assert_eq!(Order::table_name(), "orders");
    }
}
