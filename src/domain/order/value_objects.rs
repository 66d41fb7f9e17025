use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Order Value Objects
// ============================================================================
//
// Customer and Product are produced entirely by the collaborator services
// and are never persisted by this service.
//
// ============================================================================

/// Lifecycle status of an order.
///
/// Stored as its ordinal, rendered as its lowercase name. No transition
/// rules are enforced: any status may overwrite any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Booked,
    Taken,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Booked,
        OrderStatus::Taken,
        OrderStatus::Cancelled,
        OrderStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Booked => "booked",
            OrderStatus::Taken => "taken",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
        }
    }

    /// Storage representation
    pub fn ordinal(self) -> i16 {
        self as i16
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OrderStatusVisitor)
    }
}

struct OrderStatusVisitor;

impl<'de> Visitor<'de> for OrderStatusVisitor {
    type Value = OrderStatus;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an order status ordinal (0-4) or lowercase status name")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        OrderStatus::from_ordinal(v)
            .ok_or_else(|| E::custom(format!("order status ordinal out of range: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let ordinal = i64::try_from(v)
            .map_err(|_| E::custom(format!("order status ordinal out of range: {v}")))?;
        self.visit_i64(ordinal)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

/// Customer record as returned by the directory service
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Customer {
    pub name: String,
    pub age: u16,
    pub tel: String,
    pub email: String,
    pub country: String,
    pub city: String,
    pub address: String,
}

/// Cart line as returned by the shopping-cart service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub cost: f64,
    pub quantity: u8,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
}

// ============================================================================
// Unit Tests
// ============================================================================
