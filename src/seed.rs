// Sample catalog for a fresh store

use crate::backend::Backend;
use crate::error::Result;
use crate::models::{Category, Product, Schema};
use crate::record::Fields;
use crate::store::Store;
use serde_json::{Value, json};
use tracing::info;

/// (title, description, price, original price, category, icon, image, badge, stock, rating, reviews)
type ProductRow = (&'static str, &'static str, f64, f64, &'static str, &'static str, &'static str, &'static str, i64, f64, u32);

const SAMPLE_PRODUCTS: &[ProductRow] = &[
    ("Sony WH-1000XM5", "Premium quality wireless headphones with noise cancellation", 199.99, 249.99, "electronics", "fas fa-headphones", "images/products/mx5.jpg", "Sale", 50, 4.5, 128),
    ("Smart Fitness Watch", "Track your fitness goals with this advanced smartwatch", 299.99, 349.99, "electronics", "fas fa-clock", "images/products/smartwatch.jpeg", "New", 25, 4.8, 89),
    ("Cotton T-Shirt", "Comfortable and stylish cotton t-shirt for everyday wear", 29.99, 39.99, "fashion", "fas fa-tshirt", "images/products/cloths.jpeg", "Sale", 100, 4.2, 45),
    ("Denim Jeans", "Classic blue denim jeans with perfect fit", 79.99, 99.99, "fashion", "fas fa-user-tie", "images/products/jeans.jpeg", "Popular", 75, 4.3, 67),
    ("Coffee Maker", "Automatic coffee maker for your perfect morning brew", 149.99, 179.99, "home", "fas fa-coffee", "images/products/coffeemaker.jpeg", "Sale", 30, 4.6, 92),
    ("Garden Tools Set", "Complete set of gardening tools for your backyard", 89.99, 119.99, "home", "fas fa-seedling", "images/products/gardentoolset.jpeg", "Bundle", 20, 4.4, 34),
    ("Yoga Mat", "Non-slip yoga mat for your fitness routine", 49.99, 69.99, "sports", "fas fa-dumbbell", "images/products/yogamat.jpeg", "Sale", 60, 4.1, 56),
    ("Running Shoes", "Comfortable running shoes with advanced cushioning", 129.99, 159.99, "sports", "fas fa-running", "images/products/sportshoes.jpeg", "New", 40, 4.7, 78),
    ("Laptop Stand", "Adjustable laptop stand for better ergonomics", 39.99, 49.99, "electronics", "fas fa-laptop", "images/products/stand.jpeg", "Sale", 35, 4.0, 23),
    ("Winter Jacket", "Warm and stylish winter jacket for cold weather", 159.99, 199.99, "fashion", "fas fa-user", "images/products/jacket.jpeg", "Winter", 15, 4.5, 41),
    ("Air Purifier", "HEPA air purifier for clean indoor air", 199.99, 249.99, "home", "fas fa-wind", "images/products/air.jpeg", "Health", 12, 4.8, 67),
    ("Basketball", "Official size basketball for indoor and outdoor play", 24.99, 34.99, "sports", "fas fa-basketball-ball", "images/products/balls.jpeg", "Sale", 80, 4.2, 29),
    ("Jet2Holidays airplane merch", "Nothing beats a Jet2 holiday", 5.99, 12.99, "electronics", "fas fa-airplane", "images/products/jet2holiday.jpg", "Easter Egg", 999, 9.11, 100),
    ("Google Play GiftCard", "DO NOT REDEEM THE CARD", 99.99, 129.99, "electronics", "fas fa-credit-card", "images/products/google_giftcard.jpg", "Easter Egg", 999, 10.0, 1),
    ("Sport Shoe", "Recommended by Fared", 99.99, 129.99, "sports", "fas fa-shoe-prints", "images/products/toe.jpeg", "Easter Egg", 999, 10.0, 1),
];

/// (name, slug, icon, description)
const SAMPLE_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("Electronics", "electronics", "fas fa-laptop", "Latest gadgets and electronic devices"),
    ("Fashion", "fashion", "fas fa-tshirt", "Trendy clothing and accessories"),
    ("Home & Garden", "home", "fas fa-home", "Everything for your home and garden"),
    ("Sports", "sports", "fas fa-dumbbell", "Sports equipment and fitness gear"),
];

/// Seed products and categories into whichever of the two tables is empty
///
/// Returns the number of records created. Tables that already hold records
/// are left alone, so seeding twice is harmless.
pub fn seed_sample_data<B: Backend>(store: &mut Store<B>) -> Result<usize> {
    let mut created = 0;

    if store.read(Product::table_name())?.is_empty() {
        for row in SAMPLE_PRODUCTS {
            store.create(Product::table_name(), product_fields(row))?;
            created += 1;
        }
    }

    if store.read(Category::table_name())?.is_empty() {
        for &(name, slug, icon, description) in SAMPLE_CATEGORIES {
            let fields = json!({
                "name": name,
                "slug": slug,
                "icon": icon,
                "description": description,
                "productCount": 0,
            });
            store.create(Category::table_name(), into_fields(fields))?;
            created += 1;
        }
    }

    info!(created, "Seeded sample data");
    Ok(created)
}

/// Clear every table and seed the sample catalog again
///
/// Returns the number of records created.
pub fn reset_sample_data<B: Backend>(store: &mut Store<B>) -> Result<usize> {
    store.clear_all()?;
    seed_sample_data(store)
}

fn product_fields(row: &ProductRow) -> Fields {
    let &(title, description, price, original_price, category, icon, image, badge, stock, rating, reviews) = row;
    into_fields(json!({
        "title": title,
        "description": description,
        "price": price,
        "originalPrice": original_price,
        "category": category,
        "icon": icon,
        "image": image,
        "badge": badge,
        "inStock": stock > 0,
        "stock": stock,
        "rating": rating,
        "reviews": reviews,
    }))
}

fn into_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}
