use serde::{Deserialize, Serialize};
use std::fmt;

/// Статус доставки заказа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeliveryStatus {
    #[serde(rename = "Advance shipping")]
    AdvanceShipping,
    #[serde(rename = "Late delivery")]
    LateDelivery,
    #[serde(rename = "Shipping canceled")]
    ShippingCanceled,
    #[serde(rename = "Shipping on time")]
    ShippingOnTime,
}

impl DeliveryStatus {
    /// Label as it appears in the dataset
    pub fn code(&self) -> &'static str {
        match self {
            DeliveryStatus::AdvanceShipping => "Advance shipping",
            DeliveryStatus::LateDelivery => "Late delivery",
            DeliveryStatus::ShippingCanceled => "Shipping canceled",
            DeliveryStatus::ShippingOnTime => "Shipping on time",
        }
    }

    /// Цвет статуса на графиках
    pub fn color(&self) -> &'static str {
        match self {
            DeliveryStatus::AdvanceShipping => "#13957b",
            DeliveryStatus::LateDelivery => "#d62728",
            DeliveryStatus::ShippingCanceled => "#7f7f7f",
            DeliveryStatus::ShippingOnTime => "#2ca02c",
        }
    }

    pub fn all() -> Vec<DeliveryStatus> {
        vec![
            DeliveryStatus::AdvanceShipping,
            DeliveryStatus::LateDelivery,
            DeliveryStatus::ShippingCanceled,
            DeliveryStatus::ShippingOnTime,
        ]
    }

    /// Парсинг из строки (exact dataset label, surrounding whitespace ignored)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "Advance shipping" => Some(DeliveryStatus::AdvanceShipping),
            "Late delivery" => Some(DeliveryStatus::LateDelivery),
            "Shipping canceled" => Some(DeliveryStatus::ShippingCanceled),
            "Shipping on time" => Some(DeliveryStatus::ShippingOnTime),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for status in DeliveryStatus::all() {
            assert_eq!(DeliveryStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(DeliveryStatus::from_code("On time"), None);
    }

    #[test]
    fn test_serde_uses_dataset_labels() {
        let json = serde_json::to_string(&DeliveryStatus::LateDelivery).unwrap();
        assert_eq!(json, "\"Late delivery\"");
    }
}
