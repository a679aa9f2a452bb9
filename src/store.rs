// Generic record store over a string-keyed backend

use crate::backend::Backend;
use crate::config::{Config, DEFAULT_STORE_NAME, DEFAULT_TABLES, FORMAT_VERSION};
use crate::error::{Result, StoreError};
use crate::models::Schema;
use crate::query::{Criteria, Page, SortOrder, sort_records};
use crate::record::{Fields, Record};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Record count and last write time of one table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    pub count: usize,
    /// Latest `updatedAt`/`createdAt` in milliseconds since epoch, `None` for an empty table
    pub last_updated: Option<i64>,
}

/// Every configured table and its records
pub type Snapshot = BTreeMap<String, Vec<Record>>;

/// Named tables of JSON records
///
/// Each table is one JSON array stored under `{name}_{table}`. Every
/// operation reads the whole table from the backend and writes the whole
/// table back; nothing is cached between calls.
pub struct Store<B: Backend> {
    name: String,
    version: String,
    tables: Vec<String>,
    backend: B,
}

impl Store<Box<dyn Backend>> {
    /// Open the backend named in `config` and make sure every table exists
    pub fn open(config: &Config) -> Result<Self> {
        let backend = config.open_backend()?;
        let mut store = Store::with_config(backend, config)?;
        store.ensure_tables()?;
        Ok(store)
    }
}

impl<B: Backend> Store<B> {
    /// Store with the default name and table list
    pub fn new(backend: B) -> Self {
        Self {
            name: DEFAULT_STORE_NAME.to_string(),
            version: FORMAT_VERSION.to_string(),
            tables: DEFAULT_TABLES.iter().map(|t| t.to_string()).collect(),
            backend,
        }
    }

    /// Store using the name and tables from `config`
    pub fn with_config(backend: B, config: &Config) -> Result<Self> {
        Self::validate_table_name(&config.store_name)?;
        for table in &config.tables {
            Self::validate_table_name(table)?;
        }

        Ok(Self {
            name: config.store_name.clone(),
            version: config.version.clone(),
            tables: config.tables.clone(),
            backend,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Configured table names
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Backend key holding `table`
    pub fn table_key(&self, table: &str) -> Result<String> {
        Self::validate_table_name(table)?;
        Ok(format!("{}_{}", self.name, table))
    }

    // ========================================================================
    // CRUD API
    // ========================================================================

    /// Insert a record with a fresh id and creation time
    pub fn create(&mut self, table: &str, fields: Fields) -> Result<Record> {
        let result = (|| -> Result<Record> {
            let mut records = self.load(table)?;
            let record = Record::new(fields);
            records.push(record.clone());
            self.save(table, &records)?;
            Ok(record)
        })();

        Self::logged("create", table, result).inspect(|r| debug!(table, id = %r.id, "Created record"))
    }

    /// All records of `table` in insertion order
    pub fn read(&self, table: &str) -> Result<Vec<Record>> {
        Self::logged("read", table, self.load(table))
    }

    /// First record of `table` with this id
    pub fn get(&self, table: &str, id: &str) -> Result<Option<Record>> {
        let result = self.load(table).map(|records| records.into_iter().find(|r| r.id == id));
        Self::logged("get", table, result)
    }

    /// Like `get`, but a missing record is `StoreError::NotFound`
    pub fn require(&self, table: &str, id: &str) -> Result<Record> {
        self.get(table, id)?.ok_or_else(|| StoreError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        })
    }

    /// Shallow-merge `fields` into the record and stamp `updatedAt`
    ///
    /// Returns `None` without writing if no record has this id.
    pub fn update(&mut self, table: &str, id: &str, fields: Fields) -> Result<Option<Record>> {
        let result = (|| -> Result<Option<Record>> {
            let mut records = self.load(table)?;
            let Some(record) = records.iter_mut().find(|r| r.id == id) else {
                return Ok(None);
            };
            record.merge(fields);
            let updated = record.clone();
            self.save(table, &records)?;
            Ok(Some(updated))
        })();

        Self::logged("update", table, result)
    }

    /// Remove the record with this id
    ///
    /// Returns true if a record was removed. Deleting a missing id succeeds
    /// and returns false.
    pub fn delete(&mut self, table: &str, id: &str) -> Result<bool> {
        let result = (|| -> Result<bool> {
            let mut records = self.load(table)?;
            let before = records.len();
            records.retain(|r| r.id != id);
            let removed = records.len() != before;
            self.save(table, &records)?;
            Ok(removed)
        })();

        Self::logged("delete", table, result).inspect(|removed| debug!(table, id, removed, "Deleted record"))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Case-insensitive substring search
    ///
    /// With no `fields`, every string-valued field is searched, including
    /// `id` and the timestamps. An empty query returns the whole table.
    pub fn search<S: AsRef<str>>(&self, table: &str, query: &str, fields: &[S]) -> Result<Vec<Record>> {
        let result = self.load(table).map(|records| {
            if query.is_empty() {
                return records;
            }

            let needle = query.to_lowercase();
            let hit = |s: &str| s.to_lowercase().contains(&needle);

            records
                .into_iter()
                .filter(|record| {
                    if fields.is_empty() {
                        record.string_values().any(|s| hit(&*s))
                    } else {
                        fields.iter().any(|field| {
                            record
                                .value(field.as_ref())
                                .is_some_and(|v| v.as_str().is_some_and(|s| hit(s)))
                        })
                    }
                })
                .collect()
        });

        Self::logged("search", table, result)
    }

    /// Records satisfying every criterion
    pub fn filter(&self, table: &str, criteria: &Criteria) -> Result<Vec<Record>> {
        let result = self
            .load(table)
            .map(|records| records.into_iter().filter(|r| criteria.matches(r)).collect());
        Self::logged("filter", table, result)
    }

    /// Records ordered by one field; equal values keep their stored order
    pub fn sort(&self, table: &str, field: &str, order: SortOrder) -> Result<Vec<Record>> {
        let result = self.load(table).map(|mut records| {
            sort_records(&mut records, field, order);
            records
        });
        Self::logged("sort", table, result)
    }

    /// One 1-indexed page of `limit` records
    pub fn paginate(&self, table: &str, page: usize, limit: usize) -> Result<Page> {
        if limit == 0 {
            return Self::logged(
                "paginate",
                table,
                Err(StoreError::InvalidArgument("Page limit must be at least 1".to_string())),
            );
        }

        let result = self.load(table).map(|records| Page::slice(records, page, limit));
        Self::logged("paginate", table, result)
    }

    /// Every record of `T`'s table, decoded
    pub fn list_as<T: Schema>(&self) -> Result<Vec<T>> {
        self.read(T::table_name())?.iter().map(Record::decode).collect()
    }

    /// One record of `T`'s table, decoded
    pub fn get_as<T: Schema>(&self, id: &str) -> Result<Option<T>> {
        self.get(T::table_name(), id)?.map(|r| r.decode()).transpose()
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Write an empty table for every configured table that has no key yet
    ///
    /// Returns the number of tables created.
    pub fn ensure_tables(&mut self) -> Result<usize> {
        let mut created = 0;
        for table in self.tables.clone() {
            let key = self.table_key(&table)?;
            if self.backend.get(&key)?.is_none() {
                self.backend.set(&key, "[]".to_string())?;
                created += 1;
            }
        }

        if created > 0 {
            info!(store = %self.name, created, "Created empty tables");
        }
        Ok(created)
    }

    /// Count and last write time for every configured table
    pub fn stats(&self) -> Result<BTreeMap<String, TableStats>> {
        let mut stats = BTreeMap::new();
        for table in &self.tables {
            let records = self.read(table)?;
            let last_updated = records.iter().map(|r| r.last_modified().timestamp_millis()).max();
            stats.insert(
                table.clone(),
                TableStats {
                    count: records.len(),
                    last_updated,
                },
            );
        }
        Ok(stats)
    }

    /// Remove every configured table, then recreate them empty
    pub fn clear_all(&mut self) -> Result<()> {
        for table in self.tables.clone() {
            let key = self.table_key(&table)?;
            self.backend.remove(&key)?;
        }
        info!(store = %self.name, "Cleared all tables");

        self.ensure_tables()?;
        Ok(())
    }

    /// Records of every configured table
    pub fn export_data(&self) -> Result<Snapshot> {
        let mut data = Snapshot::new();
        for table in &self.tables {
            data.insert(table.clone(), self.read(table)?);
        }
        Ok(data)
    }

    /// Replace configured tables with the given records
    ///
    /// Tables that are not configured are skipped. Returns the number of
    /// tables written.
    pub fn import_data(&mut self, data: Snapshot) -> Result<usize> {
        let mut written = 0;
        for (table, records) in data {
            if !self.tables.contains(&table) {
                warn!(table, "Skipping import of unknown table");
                continue;
            }
            Self::logged("import", &table, self.save(&table, &records))?;
            written += 1;
        }

        info!(store = %self.name, written, "Imported tables");
        Ok(written)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn load(&self, table: &str) -> Result<Vec<Record>> {
        let key = self.table_key(table)?;
        match self.backend.get(&key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, table: &str, records: &[Record]) -> Result<()> {
        let key = self.table_key(table)?;
        let json = serde_json::to_string(records)?;
        self.backend.set(&key, json)
    }

    fn logged<T>(op: &str, table: &str, result: Result<T>) -> Result<T> {
        result.inspect_err(|e| warn!(op, table, error = %e, "Store operation failed"))
    }

    fn validate_table_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(StoreError::InvalidName("Table name cannot be empty".to_string()));
        }
        if name.len() > 64 {
            return Err(StoreError::InvalidName(format!("{} (max 64 chars)", name)));
        }
        if !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(StoreError::InvalidName(format!(
                "{} (must be alphanumeric with _/-)",
                name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FileBackend, MemoryBackend, SqliteBackend};
    use crate::models::Product;
    use crate::query::Criteria;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn memory_store() -> Store<MemoryBackend> {
        Store::new(MemoryBackend::new())
    }

    fn product(title: &str, category: &str, price: f64) -> Fields {
        fields(json!({
            "title": title,
            "description": format!("{} description", title),
            "price": price,
            "category": category,
            "inStock": true,
        }))
    }

    #[test]
    fn test_table_key_format() {
        let store = memory_store();
        assert_eq!(store.table_key("products").unwrap(), "cloudkart_db_products");
    }

    #[test]
    fn test_create_then_get_returns_superset() {
        let mut store = memory_store();
        let input = fields(json!({"title": "Basketball", "price": 24.99, "tags": ["ball"]}));

        let created = store.create("products", input.clone()).unwrap();
        let fetched = store.get("products", &created.id).unwrap().unwrap();

        for (k, v) in &input {
            assert_eq!(fetched.fields.get(k), Some(v));
        }
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.created_at, created.created_at);
        assert!(fetched.updated_at.is_none());
    }

    #[test]
    fn test_create_persists_json_array() {
        let mut store = memory_store();
        let created = store.create("cart", fields(json!({"productId": "p1", "quantity": 2}))).unwrap();

        let raw = store.backend().get("cloudkart_db_cart").unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], json!(created.id));
        assert_eq!(value[0]["quantity"], json!(2));
        assert!(value[0]["createdAt"].is_string());
    }

    #[test]
    fn test_read_missing_table_is_empty() {
        let store = memory_store();
        assert!(store.read("reviews").unwrap().is_empty());
        assert!(store.get("reviews", "nope").unwrap().is_none());
    }

    #[test]
    fn test_read_keeps_insertion_order() {
        let mut store = memory_store();
        for title in ["a", "b", "c"] {
            store.create("products", product(title, "home", 1.0)).unwrap();
        }

        let titles: Vec<_> = store
            .read("products")
            .unwrap()
            .iter()
            .map(|r| r.fields["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_update_with_empty_fields_only_stamps() {
        let mut store = memory_store();
        let created = store.create("products", product("Yoga Mat", "sports", 49.99)).unwrap();

        let updated = store.update("products", &created.id, Fields::new()).unwrap().unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.fields, created.fields);
        assert!(updated.updated_at.is_some());

        let fetched = store.get("products", &created.id).unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = memory_store();
        let created = store.create("products", product("Jacket", "fashion", 159.99)).unwrap();

        let updated = store
            .update("products", &created.id, fields(json!({"price": 129.99, "badge": "Winter"})))
            .unwrap()
            .unwrap();

        assert_eq!(updated.fields["price"], json!(129.99));
        assert_eq!(updated.fields["badge"], json!("Winter"));
        assert_eq!(updated.fields["title"], json!("Jacket"));
    }

    #[test]
    fn test_update_missing_returns_none() {
        let mut store = memory_store();
        store.create("products", product("Jacket", "fashion", 1.0)).unwrap();

        let result = store.update("products", "missing", fields(json!({"a": 1}))).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = memory_store();
        let created = store.create("products", product("Basketball", "sports", 24.99)).unwrap();

        assert!(store.delete("products", &created.id).unwrap());
        assert!(store.get("products", &created.id).unwrap().is_none());
        assert!(!store.delete("products", &created.id).unwrap());
    }

    #[test]
    fn test_require_reports_not_found() {
        let store = memory_store();
        let err = store.require("products", "missing").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_search_scenario() {
        let mut store = memory_store();
        let none: [&str; 0] = [];
        assert!(store.search("products", "", &none).unwrap().is_empty());

        let created = store.create("products", fields(json!({"title": "Basketball"}))).unwrap();

        let found = store.search("products", "ball", &["title"]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);
    }

    #[test]
    fn test_search_case_insensitive_and_field_scoped() {
        let mut store = memory_store();
        store.create("products", product("Coffee Maker", "home", 149.99)).unwrap();
        store.create("products", product("Laptop Stand", "electronics", 39.99)).unwrap();

        let none: [&str; 0] = [];
        assert_eq!(store.search("products", "COFFEE", &none).unwrap().len(), 1);
        assert_eq!(store.search("products", "electronics", &none).unwrap().len(), 1);
        assert!(store.search("products", "electronics", &["title"]).unwrap().is_empty());
        assert_eq!(store.search("products", "description", &["description"]).unwrap().len(), 2);
        // Numbers are never searched
        assert!(store.search("products", "39", &["price"]).unwrap().is_empty());
    }

    #[test]
    fn test_search_empty_query_returns_all() {
        let mut store = memory_store();
        store.create("products", product("a", "home", 1.0)).unwrap();
        store.create("products", product("b", "home", 1.0)).unwrap();

        assert_eq!(store.search("products", "", &["title"]).unwrap().len(), 2);
    }

    #[test]
    fn test_filter_matches_exact_subset() {
        let mut store = memory_store();
        store.create("products", product("Headphones", "electronics", 199.99)).unwrap();
        store.create("products", product("T-Shirt", "fashion", 29.99)).unwrap();
        store.create("products", product("Watch", "electronics", 299.99)).unwrap();

        let filtered = store
            .filter("products", &Criteria::new().eq("category", "electronics"))
            .unwrap();
        let expected: Vec<Record> = store
            .read("products")
            .unwrap()
            .into_iter()
            .filter(|r| r.fields["category"] == json!("electronics"))
            .collect();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered, expected);
    }

    #[test]
    fn test_filter_membership_and_conjunction() {
        let mut store = memory_store();
        store.create("products", product("Headphones", "electronics", 199.99)).unwrap();
        store.create("products", product("T-Shirt", "fashion", 29.99)).unwrap();
        store.create("products", product("Mat", "sports", 49.99)).unwrap();

        let criteria = Criteria::from(fields(json!({"category": ["fashion", "sports"]})));
        assert_eq!(store.filter("products", &criteria).unwrap().len(), 2);

        let criteria = Criteria::new()
            .any_of("category", ["fashion", "sports"])
            .eq("price", 49.99);
        let found = store.filter("products", &criteria).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fields["title"], json!("Mat"));
    }

    #[test]
    fn test_sort_numeric_and_desc() {
        let mut store = memory_store();
        store.create("products", product("b", "home", 100.0)).unwrap();
        store.create("products", product("a", "home", 9.5)).unwrap();
        store.create("products", product("c", "home", 20.0)).unwrap();

        let asc = store.sort("products", "price", SortOrder::Asc).unwrap();
        let prices: Vec<f64> = asc.iter().map(|r| r.fields["price"].as_f64().unwrap()).collect();
        assert_eq!(prices, vec![9.5, 20.0, 100.0]);

        let desc = store.sort("products", "title", SortOrder::Desc).unwrap();
        let titles: Vec<&str> = desc.iter().map(|r| r.fields["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["c", "b", "a"]);

        // Sorting returns copies; stored order is unchanged
        let stored = store.read("products").unwrap();
        assert_eq!(stored[0].fields["title"], json!("b"));
    }

    #[test]
    fn test_paginate_second_page() {
        let mut store = memory_store();
        for i in 1..=25 {
            store.create("products", fields(json!({"n": i}))).unwrap();
        }

        let page = store.paginate("products", 2, 10).unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 10);
        let ns: Vec<i64> = page.data.iter().map(|r| r.fields["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, (11..=20).collect::<Vec<_>>());

        assert!(store.paginate("products", 9, 10).unwrap().data.is_empty());
    }

    #[test]
    fn test_paginate_zero_limit_is_error() {
        let store = memory_store();
        let err = store.paginate("products", 1, 0).unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_quota_failure_leaves_table_unchanged() {
        let mut store = Store::new(MemoryBackend::with_quota(400));
        let first = store.create("products", fields(json!({"title": "small"}))).unwrap();

        let big = "x".repeat(500);
        let err = store.create("products", fields(json!({"title": big}))).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));

        let records = store.read("products").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, first.id);
    }

    #[test]
    fn test_malformed_table_is_serialization_error() {
        let mut store = memory_store();
        store
            .backend_mut()
            .set("cloudkart_db_products", "{not json".to_string())
            .unwrap();

        assert!(matches!(store.read("products"), Err(StoreError::Serialization(_))));
        assert!(matches!(
            store.create("products", fields(json!({"title": "x"}))),
            Err(StoreError::Serialization(_))
        ));
        // The corrupt value is left alone
        assert_eq!(
            store.backend().get("cloudkart_db_products").unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_invalid_table_name() {
        let mut store = memory_store();
        assert!(matches!(store.read("bad/name"), Err(StoreError::InvalidName(_))));
        assert!(matches!(store.create("", Fields::new()), Err(StoreError::InvalidName(_))));
        assert!(store.read(&"a".repeat(65)).is_err());
        assert!(store.read("valid-name_1").is_ok());
    }

    #[test]
    fn test_typed_reads() {
        let mut store = memory_store();
        let created = store.create("products", product("Basketball", "sports", 24.99)).unwrap();

        let products: Vec<Product> = store.list_as().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Basketball");

        let one: Option<Product> = store.get_as(&created.id).unwrap();
        assert_eq!(one.unwrap().price, 24.99);
        assert!(store.get_as::<Product>("missing").unwrap().is_none());
    }

    #[test]
    fn test_ensure_tables_and_stats() {
        let mut store = memory_store();
        assert_eq!(store.ensure_tables().unwrap(), 7);
        assert_eq!(store.ensure_tables().unwrap(), 0);

        let created = store.create("products", product("Basketball", "sports", 24.99)).unwrap();
        let stats = store.stats().unwrap();

        assert_eq!(stats.len(), 7);
        assert_eq!(stats["products"].count, 1);
        assert_eq!(stats["products"].last_updated, Some(created.created_at.timestamp_millis()));
        assert_eq!(stats["users"].count, 0);
        assert!(stats["users"].last_updated.is_none());

        std::thread::sleep(std::time::Duration::from_millis(5));
        let newer = store.create("products", product("Yoga Mat", "sports", 49.99)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let updated = store.update("products", &created.id, Fields::new()).unwrap().unwrap();
        let updated_at = updated.updated_at.unwrap();
        assert!(updated_at > newer.created_at);

        let stats = store.stats().unwrap();
        assert_eq!(stats["products"].count, 2);
        assert_eq!(stats["products"].last_updated, Some(updated_at.timestamp_millis()));
    }

    #[test]
    fn test_clear_all_recreates_empty_tables() {
        let mut store = memory_store();
        store.create("products", product("Basketball", "sports", 24.99)).unwrap();
        store.backend_mut().set("unrelated", "keep".to_string()).unwrap();

        store.clear_all().unwrap();

        assert!(store.read("products").unwrap().is_empty());
        assert_eq!(store.backend().get("cloudkart_db_products").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.backend().get("unrelated").unwrap().as_deref(), Some("keep"));
    }

    #[test]
    fn test_export_import_between_backends() {
        let mut source = memory_store();
        source.create("products", product("Basketball", "sports", 24.99)).unwrap();
        source.create("categories", fields(json!({"name": "Sports", "slug": "sports"}))).unwrap();

        let mut snapshot = source.export_data().unwrap();
        assert_eq!(snapshot.len(), 7);
        snapshot.insert("ghosts".to_string(), Vec::new());

        let mut target = Store::new(SqliteBackend::open_in_memory().unwrap());
        assert_eq!(target.import_data(snapshot).unwrap(), 7);

        assert_eq!(target.read("products").unwrap(), source.read("products").unwrap());
        assert!(target.backend().get("cloudkart_db_ghosts").unwrap().is_none());
    }

    #[test]
    fn test_with_config_custom_name() {
        let config = Config {
            store_name: "shop".to_string(),
            tables: vec!["items".to_string()],
            ..Config::default()
        };
        let mut store = Store::with_config(MemoryBackend::new(), &config).unwrap();
        store.create("items", fields(json!({"a": 1}))).unwrap();

        assert!(store.backend().get("shop_items").unwrap().is_some());
        assert_eq!(store.stats().unwrap().len(), 1);

        let bad = Config {
            tables: vec!["no spaces".to_string()],
            ..Config::default()
        };
        assert!(Store::with_config(MemoryBackend::new(), &bad).is_err());
    }

    #[test]
    fn test_sqlite_store_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kartstore.db");

        let id = {
            let mut store = Store::new(SqliteBackend::open(&path).unwrap());
            store.create("users", fields(json!({"email": "a@b.c"}))).unwrap().id
        };

        let store = Store::new(SqliteBackend::open(&path).unwrap());
        let user = store.get("users", &id).unwrap().unwrap();
        assert_eq!(user.fields["email"], json!("a@b.c"));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp = TempDir::new().unwrap();
        let mut store = Store::new(FileBackend::open(temp.path()).unwrap());

        let created = store.create("wishlist", fields(json!({"productId": "p1"}))).unwrap();
        assert!(temp.path().join("cloudkart_db_wishlist.json").exists());

        store.delete("wishlist", &created.id).unwrap();
        assert!(store.read("wishlist").unwrap().is_empty());
    }

    #[test]
    fn test_open_from_config() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            backend: crate::config::BackendConfig::File {
                dir: temp.path().to_path_buf(),
            },
            ..Config::default()
        };

        let store = Store::open(&config).unwrap();
        assert_eq!(store.backend().keys().unwrap().len(), 7);
    }
}
