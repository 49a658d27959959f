//! Wire representations of the REST backend payloads.
//!
//! Decoding is lenient where the backend is known to be sloppy: occupant
//! slots may be absent, `null`, bare IDs or populated objects, and blank
//! texts are treated as missing.

use common::Money;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{
    self, allocation, hostel,
    room::{self, Slot},
    user,
};

/// [`domain::Hostel`] as the backend sends it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hostel {
    #[serde(alias = "_id")]
    id: hostel::Id,
    name: hostel::Name,
    #[serde(default)]
    campus: Option<String>,
    gender: hostel::Gender,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    facilities: Vec<String>,
}

impl From<Hostel> for domain::Hostel {
    fn from(dto: Hostel) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            campus: dto.campus.as_deref().and_then(text),
            gender: dto.gender,
            address: dto.address.as_deref().and_then(text),
            facilities: dto
                .facilities
                .iter()
                .filter_map(|f| text(f))
                .collect(),
        }
    }
}

/// [`domain::Room`] as the backend sends it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(alias = "_id")]
    id: room::Id,
    #[serde(default)]
    hostel: Option<Value>,
    #[serde(default)]
    block: Option<String>,
    #[serde(default)]
    floor: Option<room::Floor>,
    #[serde(alias = "roomNumber")]
    number: room::Number,
    capacity: room::Capacity,
    #[serde(default)]
    price: Option<Money>,
    #[serde(default, alias = "occupants")]
    slots: Option<Value>,
}

impl From<Room> for domain::Room {
    fn from(dto: Room) -> Self {
        Self {
            id: dto.id,
            hostel: dto.hostel.as_ref().and_then(hostel_ref),
            block: dto.block.as_deref().and_then(text),
            floor: dto.floor,
            number: dto.number,
            capacity: dto.capacity,
            price: dto.price,
            slots: match dto.slots {
                Some(Value::Array(slots)) => slots.iter().map(slot).collect(),
                _ => Vec::new(),
            },
        }
    }
}

/// [`domain::AllocationRequest`] as the backend sends it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(alias = "_id")]
    id: allocation::Id,
    #[serde(alias = "student")]
    student_id: user::Id,
    #[serde(alias = "room")]
    room_id: room::Id,
    bed_index: room::BedIndex,
    status: allocation::Status,
    #[serde(default = "pending_payment")]
    payment_status: allocation::PaymentStatus,
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: allocation::CreationDateTime,
}

/// Default [`allocation::PaymentStatus`] of a [`Request`].
fn pending_payment() -> allocation::PaymentStatus {
    allocation::PaymentStatus::Pending
}

impl From<Request> for domain::AllocationRequest {
    fn from(dto: Request) -> Self {
        Self {
            id: dto.id,
            student_id: dto.student_id,
            room_id: dto.room_id,
            bed: dto.bed_index,
            status: dto.status,
            payment: dto.payment_status,
            created_at: dto.created_at,
        }
    }
}

/// [`domain::User`] as the backend sends it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    id: user::Id,
    name: user::Name,
    #[serde(default)]
    email: Option<String>,
    role: user::Role,
    #[serde(default, alias = "isOnboarded")]
    onboarded: bool,
}

impl From<User> for domain::User {
    fn from(dto: User) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            email: dto.email.and_then(user::Email::new),
            role: dto.role,
            onboarded: dto.onboarded,
        }
    }
}

/// Error body the backend responds with.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description of the error.
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

/// Parses a trimmed non-blank text value.
fn text<T: std::str::FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

/// Parses an ID either bare or nested into an object as `id` or `_id`.
fn id<T: std::str::FromStr>(value: &Value) -> Option<T> {
    match value {
        Value::String(id) => id.parse().ok(),
        Value::Object(obj) => obj
            .get("id")
            .or_else(|| obj.get("_id"))
            .and_then(Value::as_str)
            .and_then(|id| id.parse().ok()),
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::Array(_) => None,
    }
}

/// Parses an occupant [`Slot`], treating anything unrecognized as empty.
fn slot(value: &Value) -> Slot {
    id(value)
}

/// Parses a populated [`hostel::Ref`].
fn hostel_ref(value: &Value) -> Option<hostel::Ref> {
    Some(hostel::Ref {
        id: id(value)?,
        name: value.get("name").and_then(Value::as_str).and_then(text)?,
    })
}

#[cfg(test)]
mod spec {
    use crate::domain::{self, allocation, user};

    use super::{Request, Room};

    #[test]
    fn decodes_sloppy_room() {
        let student = user::Id::new();
        let json = format!(
            r#"{{
                "_id": "6f1c0e4e-3a51-4a7e-9a33-1d2a6a2b7c10",
                "hostel": {{
                    "_id": "0b7f5a43-5f8e-4d4e-8d0a-3c2b1a0f9e88",
                    "name": "Queens"
                }},
                "block": "  ",
                "floor": 2,
                "roomNumber": "A201",
                "capacity": 4,
                "price": "150000NGN",
                "slots": [
                    "{student}",
                    null,
                    {{ "_id": "{student}", "name": "Ada" }},
                    42
                ]
            }}"#,
        );

        let room: domain::Room =
            serde_json::from_str::<Room>(&json).unwrap().into();

        assert_eq!(room.hostel.unwrap().name.to_string(), "Queens");
        assert!(room.block.is_none());
        assert_eq!(room.floor, Some(2));
        assert_eq!(room.slots, [Some(student), None, Some(student), None]);
        assert_eq!(room.price.unwrap().to_string(), "150000NGN");
    }

    #[test]
    fn missing_slots_mean_no_occupants() {
        let json = r#"{
            "id": "6f1c0e4e-3a51-4a7e-9a33-1d2a6a2b7c10",
            "number": "7",
            "capacity": 2,
            "slots": "garbage"
        }"#;

        let room: domain::Room =
            serde_json::from_str::<Room>(json).unwrap().into();

        assert!(room.slots.is_empty());
        assert!(room.hostel.is_none());
    }

    #[test]
    fn rejects_zero_capacity() {
        let json = r#"{
            "id": "6f1c0e4e-3a51-4a7e-9a33-1d2a6a2b7c10",
            "number": "7",
            "capacity": 0
        }"#;

        assert!(serde_json::from_str::<Room>(json).is_err());
    }

    #[test]
    fn decodes_request() {
        let json = r#"{
            "_id": "9d7a0b1e-0d43-4a0c-9a8e-2b1f7e4c5d60",
            "studentId": "2c7e1d55-8f3b-4c8a-b1f0-6e9d2a4c3b71",
            "room": "6f1c0e4e-3a51-4a7e-9a33-1d2a6a2b7c10",
            "bedIndex": 3,
            "status": "approved",
            "createdAt": "2024-09-01T10:00:00+01:00"
        }"#;

        let request: domain::AllocationRequest =
            serde_json::from_str::<Request>(json).unwrap().into();

        assert_eq!(request.bed, 3);
        assert_eq!(request.status, allocation::Status::Approved);
        assert_eq!(request.payment, allocation::PaymentStatus::Pending);
        assert_eq!(
            request.created_at.to_rfc3339(),
            "2024-09-01T09:00:00Z",
        );
    }
}
