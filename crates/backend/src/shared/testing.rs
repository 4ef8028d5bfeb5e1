//! Order fixtures shared by unit tests.

use chrono::NaiveDate;
use contracts::domain::order_record::OrderRecord;
use contracts::enums::delivery_status::DeliveryStatus;
use std::sync::Arc;

use crate::shared::data::dataset::Dataset;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Order with sensible defaults; tests override what they assert on
pub fn order(id: &str, order_date: NaiveDate, sales: f64, profit: f64) -> OrderRecord {
    OrderRecord {
        order_id: id.to_string(),
        order_date,
        sales_per_order: sales,
        profit_per_order: profit,
        order_quantity: 1,
        order_item_discount: 0.0,
        delivery_status: DeliveryStatus::ShippingOnTime,
        shipping_type: "Standard Class".to_string(),
        customer_segment: "Consumer".to_string(),
        customer_region: "West".to_string(),
        customer_state: "California".to_string(),
        customer_city: "Los Angeles".to_string(),
        category_name: "Office Supplies".to_string(),
        product_name: "Stapler".to_string(),
        days_for_shipment_real: 4.0,
    }
}

/// Small mixed dataset: three regions, three categories, every status
pub fn sample_orders() -> Vec<OrderRecord> {
    let rows = [
        ("1", date(2022, 1, 3), 100.0, 20.0, DeliveryStatus::ShippingOnTime, "West", "Office Supplies", "Consumer", "Standard Class", "California", "Los Angeles", "Stapler", 2, 0.1, 3.0),
        ("2", date(2022, 1, 10), 250.0, -30.0, DeliveryStatus::LateDelivery, "East", "Technology", "Corporate", "First Class", "New York", "New York City", "Phone", 1, 0.2, 6.0),
        ("3", date(2022, 1, 18), 80.0, 8.0, DeliveryStatus::AdvanceShipping, "Central", "Furniture", "Home Office", "Second Class", "Texas", "Austin", "Chair", 3, 0.0, 2.0),
        ("4", date(2022, 2, 2), 400.0, 60.0, DeliveryStatus::ShippingOnTime, "West", "Technology", "Consumer", "Standard Class", "Washington", "Seattle", "Laptop", 1, 0.05, 4.0),
        ("5", date(2022, 2, 14), 60.0, 6.0, DeliveryStatus::ShippingCanceled, "East", "Office Supplies", "Consumer", "Same Day", "New York", "Buffalo", "Paper", 5, 0.0, 0.0),
        ("6", date(2022, 3, 7), 320.0, 40.0, DeliveryStatus::LateDelivery, "Central", "Furniture", "Corporate", "First Class", "Illinois", "Chicago", "Desk", 2, 0.15, 5.0),
        ("7", date(2022, 3, 21), 150.0, 15.0, DeliveryStatus::ShippingOnTime, "West", "Office Supplies", "Home Office", "Second Class", "California", "San Diego", "Stapler", 4, 0.0, 3.0),
        ("8", date(2022, 4, 4), 90.0, -5.0, DeliveryStatus::ShippingOnTime, "East", "Technology", "Consumer", "Standard Class", "Florida", "Miami", "Phone", 1, 0.3, 4.0),
    ];

    rows.into_iter()
        .map(
            |(id, d, sales, profit, status, region, category, segment, shipping, state, city, product, qty, discount, days)| {
                let mut o = order(id, d, sales, profit);
                o.delivery_status = status;
                o.customer_region = region.to_string();
                o.category_name = category.to_string();
                o.customer_segment = segment.to_string();
                o.shipping_type = shipping.to_string();
                o.customer_state = state.to_string();
                o.customer_city = city.to_string();
                o.product_name = product.to_string();
                o.order_quantity = qty;
                o.order_item_discount = discount;
                o.days_for_shipment_real = days;
                o
            },
        )
        .collect()
}

pub fn sample_dataset() -> Arc<Dataset> {
    Arc::new(Dataset::from_records("sample", sample_orders()))
}
