use chrono::NaiveDate;
use contracts::domain::order_record::OrderRecord;
use contracts::enums::delivery_status::DeliveryStatus;
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shared::config::DatasetConfig;

/// Columns the loader requires; any other column is ignored
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "order_id",
    "order_date",
    "sales_per_order",
    "profit_per_order",
    "order_quantity",
    "order_item_discount",
    "delivery_status",
    "shipping_type",
    "customer_segment",
    "customer_region",
    "customer_state",
    "customer_city",
    "category_name",
    "product_name",
    "days_for_shipment_real",
];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown text encoding `{0}`")]
    UnknownEncoding(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column `{0}`")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid {column} value `{value}`")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: order_date `{value}` does not match `{format}`")]
    InvalidDate {
        row: usize,
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// How the raw file is decoded and parsed
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub encoding: &'static Encoding,
    pub date_format: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::WINDOWS_1252,
            date_format: "%d-%m-%Y".to_string(),
        }
    }
}

impl LoadOptions {
    pub fn from_config(config: &DatasetConfig) -> Result<Self, ParseError> {
        let encoding = Encoding::for_label(config.encoding.as_bytes())
            .ok_or_else(|| ParseError::UnknownEncoding(config.encoding.clone()))?;
        Ok(Self {
            encoding,
            date_format: config.date_format.clone(),
        })
    }
}

/// Raw content of the order file at `path`
pub fn read_file(path: &Path) -> Result<Vec<u8>, ParseError> {
    std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode raw file content and parse it
pub fn parse_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Vec<OrderRecord>, ParseError> {
    // BOM, если есть, имеет приоритет над настроенной кодировкой
    let (text, used_encoding, had_errors) = options.encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            "Dataset: input is not valid {}, undecodable bytes were replaced",
            used_encoding.name()
        );
    }
    parse_orders(&text, options)
}

/// Parse CSV text with a header row into order records
pub fn parse_orders(text: &str, options: &LoadOptions) -> Result<Vec<OrderRecord>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();

    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column))
            .ok_or(ParseError::MissingColumn(column))?;
    }
    let field = |record: &csv::StringRecord, column: usize| -> String {
        record.get(positions[column]).unwrap_or_default().to_string()
    };

    let mut orders = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let row = index + 1;

        let raw_date = field(&record, 1);
        let order_date = NaiveDate::parse_from_str(&raw_date, &options.date_format).map_err(|source| {
            ParseError::InvalidDate {
                row,
                value: raw_date.clone(),
                format: options.date_format.clone(),
                source,
            }
        })?;

        let raw_status = field(&record, 6);
        let delivery_status =
            DeliveryStatus::from_code(&raw_status).ok_or(ParseError::InvalidValue {
                row,
                column: "delivery_status",
                value: raw_status.clone(),
            })?;

        orders.push(OrderRecord {
            order_id: field(&record, 0),
            order_date,
            sales_per_order: parse_number(&field(&record, 2), row, REQUIRED_COLUMNS[2])?,
            profit_per_order: parse_number(&field(&record, 3), row, REQUIRED_COLUMNS[3])?,
            order_quantity: parse_quantity(&field(&record, 4), row)?,
            order_item_discount: parse_number(&field(&record, 5), row, REQUIRED_COLUMNS[5])?,
            delivery_status,
            shipping_type: field(&record, 7),
            customer_segment: field(&record, 8),
            customer_region: field(&record, 9),
            customer_state: field(&record, 10),
            customer_city: field(&record, 11),
            category_name: field(&record, 12),
            product_name: field(&record, 13),
            days_for_shipment_real: parse_number(&field(&record, 14), row, REQUIRED_COLUMNS[14])?,
        });
    }

    Ok(orders)
}

fn parse_number(value: &str, row: usize, column: &'static str) -> Result<f64, ParseError> {
    value.parse::<f64>().map_err(|_| ParseError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    })
}

/// Quantities are integral but may be exported as "2.0"
fn parse_quantity(value: &str, row: usize) -> Result<i64, ParseError> {
    if let Ok(q) = value.parse::<i64>() {
        return Ok(q);
    }
    match value.parse::<f64>() {
        Ok(q) if q.fract() == 0.0 => Ok(q as i64),
        _ => Err(ParseError::InvalidValue {
            row,
            column: "order_quantity",
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "order_id,order_date,customer_city,customer_state,customer_region,customer_segment,category_name,product_name,order_quantity,sales_per_order,profit_per_order,order_item_discount,delivery_status,shipping_type,days_for_shipment_real,days_for_shipment_scheduled";

    fn csv_text(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_parse_orders() {
        let text = csv_text(&[
            "1,15-01-2022,Denver,Colorado,West,Consumer,Office Supplies,Stapler,2,120.5,30.25,0.1,Shipping on time,Standard Class,4,4",
            "2,03-02-2022,Austin,Texas,Central,Corporate,Technology,Phone,1.0,800,-20,0,Late delivery,First Class,5,2",
        ]);

        let orders = parse_orders(&text, &LoadOptions::default()).unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_date, NaiveDate::from_ymd_opt(2022, 1, 15).unwrap());
        assert_eq!(orders[0].customer_region, "West");
        assert_eq!(orders[0].sales_per_order, 120.5);
        assert_eq!(orders[1].order_quantity, 1);
        assert_eq!(orders[1].delivery_status, DeliveryStatus::LateDelivery);
        assert_eq!(orders[1].profit_per_order, -20.0);
    }

    #[test]
    fn test_wrong_date_format_is_rejected() {
        let text = csv_text(&[
            "1,2022-01-15,Denver,Colorado,West,Consumer,Office Supplies,Stapler,2,120.5,30.25,0.1,Shipping on time,Standard Class,4,4",
        ]);

        let err = parse_orders(&text, &LoadOptions::default()).unwrap_err();
        match err {
            ParseError::InvalidDate { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "2022-01-15");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let text = "order_id,order_date\n1,15-01-2022";
        let err = parse_orders(text, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn("sales_per_order")));
    }

    #[test]
    fn test_unknown_delivery_status_is_rejected() {
        let text = csv_text(&[
            "1,15-01-2022,Denver,Colorado,West,Consumer,Office Supplies,Stapler,2,120.5,30.25,0.1,Lost in transit,Standard Class,4,4",
        ]);
        let err = parse_orders(&text, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { column: "delivery_status", .. }));
    }

    #[test]
    fn test_cp1252_bytes_are_decoded() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"\n1,15-01-2022,Denver,Colorado,West,Consumer,Office Supplies,Caf\xe9 Chair,2,120.5,30.25,0.1,Shipping on time,Standard Class,4,4");

        let orders = parse_bytes(&bytes, &LoadOptions::default()).unwrap();
        assert_eq!(orders[0].product_name, "Café Chair");
    }

    #[test]
    fn test_unreadable_file() {
        let err = read_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            csv_text(&[
                "1,15-01-2022,Denver,Colorado,West,Consumer,Office Supplies,Stapler,2,120.5,30.25,0.1,Advance shipping,Standard Class,4,4",
            ])
        )
        .unwrap();

        let bytes = read_file(file.path()).unwrap();
        let orders = parse_bytes(&bytes, &LoadOptions::default()).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].delivery_status, DeliveryStatus::AdvanceShipping);
    }

    #[test]
    fn test_options_from_config() {
        let config = DatasetConfig {
            path: "orders.csv".into(),
            encoding: "utf-8".into(),
            date_format: "%Y-%m-%d".into(),
        };
        let options = LoadOptions::from_config(&config).unwrap();
        assert_eq!(options.encoding, encoding_rs::UTF_8);

        let bad = DatasetConfig {
            encoding: "klingon".into(),
            ..config
        };
        assert!(matches!(
            LoadOptions::from_config(&bad),
            Err(ParseError::UnknownEncoding(_))
        ));
    }
}
