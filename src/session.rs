// Mock sign-in: users table plus a cached pointer to the current user

use crate::backend::Backend;
use crate::error::{Result, StoreError};
use crate::models::{Schema, User};
use crate::record::{Fields, Record};
use crate::store::Store;
use serde_json::{Value, json};
use tracing::{debug, info};

pub const MIN_PASSWORD_LEN: usize = 6;

const CLEARABLE_FIELDS: [&str; 3] = ["phone", "dob", "address"];

/// Sign-up form contents
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login state over a store
///
/// The logged-in user is copied under its own backend key, outside any
/// table. The copy is refreshed on login, registration and `save_user`;
/// changes made to the users table by other means leave it stale.
pub struct Session<'a, B: Backend> {
    store: &'a mut Store<B>,
    key: String,
}

impl<'a, B: Backend> Session<'a, B> {
    pub fn new(store: &'a mut Store<B>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Create an account and sign it in
    pub fn register(&mut self, form: &Registration) -> Result<User> {
        if form.password != form.confirm_password {
            return Err(StoreError::PasswordMismatch);
        }
        if form.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StoreError::PasswordTooShort { min: MIN_PASSWORD_LEN });
        }

        let users = self.store.read(User::table_name())?;
        if users.iter().any(|r| field_str(r, "email") == Some(form.email.as_str())) {
            return Err(StoreError::EmailTaken(form.email.clone()));
        }

        let fields = json!({
            "firstName": form.first_name,
            "lastName": form.last_name,
            "email": form.email,
            "password": form.password,
            "wishlist": [],
            "orders": [],
        });
        let record = self.store.create(User::table_name(), into_fields(fields))?;
        let user: User = record.decode()?;

        self.remember(&user)?;
        info!(id = %user.id, "Registered user");
        Ok(user)
    }

    /// Sign in the user whose email and password both match
    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        // Only the matching record has to fit the User schema
        let record = self
            .store
            .read(User::table_name())?
            .into_iter()
            .find(|r| field_str(r, "email") == Some(email) && field_str(r, "password") == Some(password))
            .ok_or(StoreError::InvalidCredentials)?;
        let user: User = record.decode()?;

        self.remember(&user)?;
        info!(id = %user.id, "User logged in");
        Ok(user)
    }

    /// Forget the current user. Returns false if nobody was signed in.
    pub fn logout(&mut self) -> Result<bool> {
        let removed = self.store.backend_mut().remove(&self.key)?;
        debug!(removed, "Logged out");
        Ok(removed)
    }

    /// Cached copy of the signed-in user
    pub fn current_user(&self) -> Result<Option<User>> {
        match self.store.backend().get(&self.key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Write `user` back to the users table and refresh the cached copy
    pub fn save_user(&mut self, user: &User) -> Result<User> {
        let mut fields = into_fields(serde_json::to_value(user)?);
        // Cleared optional fields must overwrite the stored values
        for name in CLEARABLE_FIELDS {
            fields.entry(name).or_insert(Value::Null);
        }
        let record = self
            .store
            .update(User::table_name(), &user.id, fields)?
            .ok_or_else(|| StoreError::NotFound {
                table: User::table_name().to_string(),
                id: user.id.clone(),
            })?;

        let saved: User = record.decode()?;
        self.remember(&saved)?;
        Ok(saved)
    }

    fn remember(&mut self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user)?;
        self.store.backend_mut().set(&self.key, json)
    }
}

fn field_str<'r>(record: &'r Record, name: &str) -> Option<&'r str> {
    record.fields.get(name).and_then(Value::as_str)
}

fn into_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}
