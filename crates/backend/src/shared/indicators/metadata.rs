use contracts::shared::indicators::*;

/// Well-known indicator IDs (constants to avoid typos).
pub mod ids {
    use super::*;

    pub fn total_revenue() -> IndicatorId {
        IndicatorId::new("total_revenue")
    }
    pub fn total_profit() -> IndicatorId {
        IndicatorId::new("total_profit")
    }
    pub fn total_orders() -> IndicatorId {
        IndicatorId::new("total_orders")
    }
    pub fn profit_margin() -> IndicatorId {
        IndicatorId::new("profit_margin")
    }
    pub fn avg_order_value() -> IndicatorId {
        IndicatorId::new("avg_order_value")
    }
    pub fn on_time_rate() -> IndicatorId {
        IndicatorId::new("on_time_rate")
    }
    pub fn late_deliveries() -> IndicatorId {
        IndicatorId::new("late_deliveries")
    }
}

fn money() -> ValueFormat {
    ValueFormat::Money {
        currency: "$".into(),
    }
}

/// Build the full catalogue of indicators + sets.
pub fn build_catalog() -> IndicatorCatalogResponse {
    let indicators = vec![
        IndicatorMeta {
            id: ids::total_revenue(),
            label: "Total Revenue".into(),
            short_label: Some("Revenue".into()),
            icon: "dollar-sign".into(),
            format: money(),
            description: Some("Total sales across all orders".into()),
        },
        IndicatorMeta {
            id: ids::total_profit(),
            label: "Total Profit".into(),
            short_label: Some("Profit".into()),
            icon: "trending-up".into(),
            format: money(),
            description: Some("Net profit after costs".into()),
        },
        IndicatorMeta {
            id: ids::total_orders(),
            label: "Total Orders".into(),
            short_label: Some("Orders".into()),
            icon: "orders".into(),
            format: ValueFormat::Integer,
            description: Some("Number of orders placed".into()),
        },
        IndicatorMeta {
            id: ids::profit_margin(),
            label: "Profit Margin".into(),
            short_label: Some("Margin".into()),
            icon: "percent".into(),
            format: ValueFormat::Percent { decimals: 1 },
            description: Some("Profit / Revenue".into()),
        },
        IndicatorMeta {
            id: ids::avg_order_value(),
            label: "Average Order Value".into(),
            short_label: Some("AOV".into()),
            icon: "invoices".into(),
            format: money(),
            description: Some("Revenue / Orders".into()),
        },
        IndicatorMeta {
            id: ids::on_time_rate(),
            label: "On-Time Delivery".into(),
            short_label: Some("On-time".into()),
            icon: "truck".into(),
            format: ValueFormat::Percent { decimals: 1 },
            description: Some("Orders delivered on schedule".into()),
        },
        IndicatorMeta {
            id: ids::late_deliveries(),
            label: "Late Deliveries".into(),
            short_label: Some("Late".into()),
            icon: "clock".into(),
            format: ValueFormat::Integer,
            description: Some("Orders with status \"Late delivery\"".into()),
        },
    ];

    let sets = vec![IndicatorSetMeta {
        id: IndicatorSetId::new("sales_overview"),
        label: "Key Performance Indicators".into(),
        indicators: vec![
            ids::total_revenue(),
            ids::total_profit(),
            ids::total_orders(),
            ids::on_time_rate(),
        ],
        columns: 4,
    }];

    IndicatorCatalogResponse { indicators, sets }
}
