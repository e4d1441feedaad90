//! Mapping between BSON documents and the `foodify-core` models.
//!
//! Outbound JSON uses hex strings for ObjectIds and RFC 3339 strings for
//! dates, which is what the storefront already consumes.

use chrono::{DateTime, SecondsFormat, Utc};
use foodify_core::id::RecordId;
use foodify_core::models::{FoodPatch, Food, Order};
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) fn object_id(id: RecordId) -> ObjectId {
    ObjectId::from_bytes(id.bytes())
}

pub(crate) fn id_filter(id: RecordId) -> Document {
    doc! { "_id": object_id(id) }
}

pub(crate) fn record_id(value: &Bson) -> anyhow::Result<RecordId> {
    match value {
        Bson::ObjectId(oid) => Ok(RecordId::from_bytes(oid.bytes())),
        other => anyhow::bail!("expected an ObjectId, store returned {other}"),
    }
}

/// Relaxed extended JSON, except ObjectIds and dates are flattened to strings.
pub(crate) fn to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()) {
            Some(ts) => Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => Value::String(dt.to_string()),
        },
        Bson::Document(doc) => Value::Object(doc.into_iter().map(|(k, v)| (k, to_json(v))).collect()),
        Bson::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(doc: Document) -> anyhow::Result<T> {
    Ok(serde_json::from_value(to_json(Bson::Document(doc)))?)
}

fn date(ts: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(ts.timestamp_millis())
}

pub(crate) fn encode_food(food: &Food) -> anyhow::Result<Document> {
    let mut doc = bson::to_document(food)?;
    if let Some(id) = food.id {
        doc.insert("_id", object_id(id));
    }
    if let Some(created_at) = food.created_at {
        doc.insert("createdAt", date(created_at));
    }
    Ok(doc)
}

/// Orders go in as sent; a client `_id` keeps its own type.
pub(crate) fn encode_order(order: &Order) -> anyhow::Result<Document> {
    Ok(bson::to_document(order)?)
}

pub(crate) fn set_update(patch: &FoodPatch) -> anyhow::Result<Document> {
    Ok(doc! { "$set": bson::to_document(patch.fields())? })
}
