use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::delivery_status::DeliveryStatus;

/// One order line of the e-commerce dataset.
///
/// Records are immutable after loading; filtering only ever selects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub sales_per_order: f64,
    pub profit_per_order: f64,
    pub order_quantity: i64,
    pub order_item_discount: f64,
    pub delivery_status: DeliveryStatus,
    pub shipping_type: String,
    pub customer_segment: String,
    pub customer_region: String,
    pub customer_state: String,
    pub customer_city: String,
    pub category_name: String,
    pub product_name: String,
    /// Фактический срок доставки в днях
    pub days_for_shipment_real: f64,
}

impl OrderRecord {
    pub fn is_on_time(&self) -> bool {
        self.delivery_status == DeliveryStatus::ShippingOnTime
    }

    pub fn is_late(&self) -> bool {
        self.delivery_status == DeliveryStatus::LateDelivery
    }

    pub fn is_canceled(&self) -> bool {
        self.delivery_status == DeliveryStatus::ShippingCanceled
    }

    /// Profit margin of this single line in percent, `None` for zero sales
    pub fn profit_margin(&self) -> Option<f64> {
        if self.sales_per_order == 0.0 {
            None
        } else {
            Some(self.profit_per_order / self.sales_per_order * 100.0)
        }
    }
}
