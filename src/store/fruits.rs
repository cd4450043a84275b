//! Fruit records and their append-only list.

use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::observability::metrics;
use crate::validation::{check_text, FieldError, Validate};

const MAX_NAME_LEN: usize = 100;
const MAX_COLOR_LEN: usize = 50;

/// A record the fruits API can store.
pub trait FruitRecord:
    Validate + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Label used in logs and metrics.
    const VARIANT: &'static str;
}

/// Fruit with only a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicFruit {
    pub name: String,
}

impl Validate for BasicFruit {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "name", &self.name, MAX_NAME_LEN);
        errors
    }
}

impl FruitRecord for BasicFruit {
    const VARIANT: &'static str = "basic";
}

/// Fruit with color and weight (grams).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub name: String,
    pub color: String,
    pub weight: f64,
}

impl Validate for Fruit {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "name", &self.name, MAX_NAME_LEN);
        check_text(&mut errors, "color", &self.color, MAX_COLOR_LEN);
        if !self.weight.is_finite() || self.weight <= 0.0 {
            errors.push(FieldError::body("weight", "must be greater than 0"));
        }
        errors
    }
}

impl FruitRecord for Fruit {
    const VARIANT: &'static str = "detailed";
}

/// Insertion-ordered fruit list shared by the fruits handlers.
#[derive(Debug)]
pub struct FruitStore<F> {
    fruits: Arc<RwLock<Vec<F>>>,
}

impl<F> Clone for FruitStore<F> {
    fn clone(&self) -> Self {
        Self {
            fruits: Arc::clone(&self.fruits),
        }
    }
}

impl<F> Default for FruitStore<F> {
    fn default() -> Self {
        Self {
            fruits: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<F: FruitRecord> FruitStore<F> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fruit and return the whole collection after the append.
    ///
    /// Callers validate first; the store does not re-check.
    pub fn add(&self, fruit: F) -> Vec<F> {
        let mut fruits = self.fruits.write().unwrap_or_else(PoisonError::into_inner);
        fruits.push(fruit);
        metrics::record_created("fruits");
        tracing::debug!(variant = F::VARIANT, count = fruits.len(), "Fruit added");
        fruits.clone()
    }

    /// All fruits in insertion order.
    pub fn list(&self) -> Vec<F> {
        self.fruits
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.fruits.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit(name: &str, color: &str, weight: f64) -> Fruit {
        Fruit {
            name: name.to_string(),
            color: color.to_string(),
            weight,
        }
    }

    #[test]
    fn test_add_returns_full_collection_in_order() {
        let store = FruitStore::new();
        store.add(fruit("apple", "red", 150.0));
        let all = store.add(fruit("banana", "yellow", 120.0));

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "apple");
        assert_eq!(all[1].name, "banana");
        assert_eq!(store.list(), all);
    }

    #[test]
    fn test_clones_share_the_same_list() {
        let store = FruitStore::<BasicFruit>::new();
        let other = store.clone();
        other.add(BasicFruit {
            name: "kiwi".into(),
        });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_detailed_validation() {
        assert!(fruit("apple", "green", 64.0).validate().is_empty());

        let errors = fruit("", "", -1.0).validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.loc[1].as_str()).collect();
        assert_eq!(fields, vec!["name", "color", "weight"]);

        assert_eq!(fruit("apple", "red", f64::NAN).validate().len(), 1);
    }

    #[test]
    fn test_basic_validation() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(BasicFruit { name: long }.validate().len(), 1);
        assert!(BasicFruit { name: "pear".into() }.validate().is_empty());
    }
}
