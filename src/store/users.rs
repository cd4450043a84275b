//! User records for the users tutorial API.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::metrics;
use crate::validation::{check_email, check_text, FieldError, Validate};

const MAX_NAME_LEN: usize = 100;
const MAX_AGE: u32 = 150;

/// A stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Validate for NewUser {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "name", &self.name, MAX_NAME_LEN);
        check_email(&mut errors, "email", &self.email);
        check_age(&mut errors, self.age);
        errors
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    pub is_active: Option<bool>,
}

impl Validate for UserUpdate {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_text(&mut errors, "name", name, MAX_NAME_LEN);
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, "email", email);
        }
        if let Some(age) = self.age {
            check_age(&mut errors, age);
        }
        errors
    }
}

fn check_age(errors: &mut Vec<FieldError>, age: u32) {
    if age > MAX_AGE {
        errors.push(FieldError::body("age", format!("must be between 0 and {}", MAX_AGE)));
    }
}

/// Listing parameters, applied as filter → skip → limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFilter {
    pub skip: usize,
    pub limit: usize,
    pub active_only: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("User with id {0} not found")]
    NotFound(u64),

    #[error("Email {0} is already registered")]
    DuplicateEmail(String),
}

#[derive(Debug)]
struct UserTable {
    users: Vec<User>,
    next_id: u64,
}

/// Insertion-ordered user table shared by the users handlers.
#[derive(Debug, Clone)]
pub struct UserStore {
    inner: Arc<RwLock<UserTable>>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(UserTable {
                users: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Create a store holding two demo users; the second is inactive.
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        let now = Utc::now();
        let demo = [
            ("John Doe", "john@example.com", 30, true, now - Duration::days(42)),
            ("Jane Smith", "jane@example.com", 25, false, now - Duration::days(7)),
        ];

        {
            let mut table = store.write();
            for (name, email, age, is_active, created_at) in demo {
                let id = table.next_id;
                table.next_id += 1;
                table.users.push(User {
                    id,
                    name: name.to_string(),
                    email: email.to_string(),
                    age,
                    is_active,
                    created_at,
                });
            }
        }
        store
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, UserTable> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, UserTable> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a new user unless its email is already registered.
    ///
    /// The duplicate check and the append happen under one write lock.
    pub fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let mut table = self.write();
        let email = new.email.trim().to_string();

        if table.users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
            return Err(StoreError::DuplicateEmail(email));
        }

        let user = User {
            id: table.next_id,
            name: new.name.trim().to_string(),
            email,
            age: new.age,
            is_active: new.is_active,
            created_at: Utc::now(),
        };
        table.next_id += 1;
        table.users.push(user.clone());
        metrics::record_created("users");

        Ok(user)
    }

    pub fn get(&self, id: u64) -> Result<User, StoreError> {
        self.read()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub fn list(&self, filter: ListFilter) -> Vec<User> {
        self.read()
            .users
            .iter()
            .filter(|u| !filter.active_only || u.is_active)
            .skip(filter.skip)
            .take(filter.limit)
            .cloned()
            .collect()
    }

    /// Merge the present fields of `update` onto the user with `id`.
    pub fn update(&self, id: u64, update: UserUpdate) -> Result<User, StoreError> {
        let mut table = self.write();
        let user = table
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(name) = update.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            user.email = email.trim().to_string();
        }
        if let Some(age) = update.age {
            user.age = age;
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }

        Ok(user.clone())
    }

    /// Remove the user with `id` and return it.
    pub fn delete(&self, id: u64) -> Result<User, StoreError> {
        let mut table = self.write();
        let index = table
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(table.users.remove(index))
    }

    pub fn len(&self) -> usize {
        self.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
