//! Order lifecycle status.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Wire form is SCREAMING_SNAKE_CASE, matching the marketplace backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed by the customer, not yet accepted.
    #[default]
    Placed,
    /// Cancelled by the customer.
    Cancelled,
    /// Accepted by the restaurant.
    Accepted,
    /// Rejected by the restaurant.
    Rejected,
    /// Being prepared by the restaurant.
    Preparing,
    /// Assigned to a delivery partner.
    Assigned,
    /// Delivery partner is en route; position polling is active.
    OutForDelivery,
    /// Handed over to the customer.
    Delivered,
}

impl OrderStatus {
    /// The wire name, as the backend's status query parameter expects it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "PLACED",
            Self::Cancelled => "CANCELLED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Preparing => "PREPARING",
            Self::Assigned => "ASSIGNED",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
        }
    }

    /// Whether this status means a rider is on the road for the order.
    #[must_use]
    pub const fn is_out_for_delivery(&self) -> bool {
        matches!(self, Self::OutForDelivery)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLACED" => Ok(Self::Placed),
            "CANCELLED" => Ok(Self::Cancelled),
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            "PREPARING" => Ok(Self::Preparing),
            "ASSIGNED" => Ok(Self::Assigned),
            "OUT_FOR_DELIVERY" => Ok(Self::OutForDelivery),
            "DELIVERED" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(OrderStatus::OutForDelivery.to_string(), "OUT_FOR_DELIVERY");
        assert_eq!(OrderStatus::Placed.to_string(), "PLACED");
    }

    #[test]
    fn round_trips_through_from_str() {
        for status in [
            OrderStatus::Placed,
            OrderStatus::Cancelled,
            OrderStatus::Accepted,
            OrderStatus::Rejected,
            OrderStatus::Preparing,
            OrderStatus::Assigned,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }
}
