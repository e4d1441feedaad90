//! # Domain Models
//!
//! These structs represent the records Foodify keeps in its document store.
//! The store is schemaless, so every record carries the fields the service
//! relies on as typed members and keeps everything else in a flattened
//! `details` map that round-trips untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::id::RecordId;

/// Open-ended document fields the service does not interpret.
pub type Fields = Map<String, Value>;

/// Keys the service owns and never takes from a client body.
const RESERVED_KEYS: [&str; 2] = ["_id", "createdAt"];

/// The two physical locations a [`Food`] can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shelf {
    /// Curated by the storefront admins.
    Admin,
    /// Added by users through `POST /api/foods`.
    User,
}

/// A featured food shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopFood {
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// Ranking key; records without one sort last.
    #[serde(rename = "purchaseCount", default, skip_serializing_if = "Option::is_none")]
    pub purchase_count: Option<serde_json::Number>,
    #[serde(flatten)]
    pub details: Fields,
}

impl TopFood {
    pub fn rank(&self) -> f64 {
        self.purchase_count
            .as_ref()
            .and_then(serde_json::Number::as_f64)
            .unwrap_or(f64::NEG_INFINITY)
    }
}

/// The user who listed a food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub email: String,
    #[serde(flatten)]
    pub extra: Fields,
}

/// A purchasable item, from either shelf.
///
/// Only the service-owned keys are typed. `name`, `addedBy` and the rest are
/// kept as stored, so a listing never fails on a document it did not write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Name, owner, price, image, category and whatever else the storefront sends.
    #[serde(flatten)]
    pub details: Fields,
}

impl Food {
    pub fn name(&self) -> Option<&str> {
        self.details.get("name").and_then(Value::as_str)
    }

    /// `addedBy.email`, when the record has one.
    pub fn owner_email(&self) -> Option<&str> {
        self.details.get("addedBy")?.get("email")?.as_str()
    }

    /// Ownership is plain equality on the recorded email. A missing email on
    /// either side never matches.
    pub fn is_owned_by(&self, email: Option<&str>) -> bool {
        match (self.owner_email(), email) {
            (Some(owner), Some(email)) => owner == email,
            _ => false,
        }
    }
}

/// A validated insert request for the user shelf.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub name: String,
    pub added_by: Owner,
    pub details: Fields,
}

impl NewFood {
    /// Checks a raw request body for the fields every listing needs.
    ///
    /// `name` and `addedBy.email` must be non-empty strings. Client-supplied
    /// `_id` and `createdAt` are dropped.
    pub fn from_payload(payload: Value) -> Result<Self, AppError> {
        let missing = missing_food_data;

        let Value::Object(mut fields) = payload else {
            return Err(missing());
        };
        strip_reserved(&mut fields);

        let name = match fields.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => return Err(missing()),
        };
        let added_by: Owner = match fields.remove("addedBy") {
            Some(value) => serde_json::from_value(value).map_err(|_| missing())?,
            None => return Err(missing()),
        };
        if added_by.email.is_empty() {
            return Err(missing());
        }

        Ok(Self { name, added_by, details: fields })
    }

    /// Produces the record to persist, stamped with its creation time.
    pub fn into_food(self, created_at: DateTime<Utc>) -> Food {
        let mut details = self.details;
        details.insert("name".into(), Value::String(self.name));
        details.insert("addedBy".into(), owner_value(self.added_by));
        Food {
            id: None,
            created_at: Some(created_at),
            details,
        }
    }
}

/// Field-level changes for an existing user food (`$set` semantics).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodPatch(Fields);

impl FoodPatch {
    /// Keys may be dotted (`"addedBy.name"`) to reach nested fields.
    /// `_id` and `createdAt` cannot be changed and are dropped.
    ///
    /// A listing must keep a non-empty `name` and `addedBy.email` after the
    /// update, the same as on insert.
    pub fn from_fields(mut fields: Fields) -> Result<Self, AppError> {
        strip_reserved(&mut fields);

        for (key, value) in &fields {
            let keeps_shape = match key.as_str() {
                "name" | "addedBy.email" => is_filled_string(value),
                "addedBy" => value.get("email").is_some_and(is_filled_string),
                key => !key.starts_with("name.") && !key.starts_with("addedBy.email."),
            };
            if !keeps_shape {
                return Err(missing_food_data());
            }
        }
        Ok(Self(fields))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    pub fn into_fields(self) -> Fields {
        self.0
    }
}

/// A purchase, stored exactly as the client sent it. No field is required
/// or interpreted on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order(pub Fields);

impl Order {
    /// The stored `_id`, whatever its type.
    pub fn id(&self) -> Option<&Value> {
        self.0.get("_id")
    }

    pub fn buyer_email(&self) -> Option<&str> {
        self.0.get("buyerEmail").and_then(Value::as_str)
    }
}

/// Result of a single-document insert, shaped like the driver's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    /// A generated id, or the client's own `_id` when it sent one.
    pub inserted_id: Value,
}

/// Result of a single-document delete. Deleting a missing record is not an
/// error; it reports zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Result of a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

fn missing_food_data() -> AppError {
    AppError::ValidationError("Missing required food data".into())
}

fn is_filled_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.is_empty())
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.iter().any(|reserved| {
        key == *reserved || key.strip_prefix(reserved).is_some_and(|rest| rest.starts_with('.'))
    })
}

fn strip_reserved(fields: &mut Fields) {
    fields.retain(|key, _| !is_reserved(key));
}

fn owner_value(owner: Owner) -> Value {
    let mut fields = owner.extra;
    fields.insert("email".into(), Value::String(owner.email));
    Value::Object(fields)
}
