use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A decoded JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Map<String, Value>);

impl Entity {
    pub fn new(raw: Map<String, Value>) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_raw(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn f64(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    pub fn i64(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(Value::as_i64)
    }

    pub fn bool(&self, field: &str) -> Option<bool> {
        self.0.get(field).and_then(Value::as_bool)
    }

    /// Interpret `field` as milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self, field: &str) -> Option<DateTime<Utc>> {
        self.i64(field).and_then(DateTime::from_timestamp_millis)
    }

    /// Rename short field codes to full names.
    ///
    /// `map` values are either the full name itself or an object carrying
    /// it under `name`. Fields without a mapping keep their key.
    pub fn remapped(&self, map: &Map<String, Value>) -> Entity {
        let raw = self
            .0
            .iter()
            .map(|(key, value)| {
                let name = match map.get(key) {
                    Some(Value::String(name)) => name.clone(),
                    Some(Value::Object(field)) => field
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or(key)
                        .to_string(),
                    _ => key.clone(),
                };
                (name, value.clone())
            })
            .collect();
        Entity(raw)
    }
}

impl From<Map<String, Value>> for Entity {
    fn from(raw: Map<String, Value>) -> Self {
        Self(raw)
    }
}

/// Declare a model that wraps one `Entity`.
macro_rules! entity_model {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name($crate::models::Entity);

        impl From<$crate::models::Entity> for $name {
            fn from(entity: $crate::models::Entity) -> Self {
                Self(entity)
            }
        }

        impl std::ops::Deref for $name {
            type Target = $crate::models::Entity;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

/// Declare a model that is a list of another model.
macro_rules! list_model {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(Vec<$item>);

        impl $name {
            pub fn into_vec(self) -> Vec<$item> {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = [$item];

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}
