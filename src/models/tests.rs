//! Unit tests for data models module
//!
//! Validates column metadata, sort key ordering, and the serialized shape of
//! credential records.

use super::*;
use serde_json::json;

#[test]
fn test_columns_in_display_order() {
    let keys: Vec<&str> = Column::ALL.iter().map(|c| c.key()).collect();
    assert_eq!(
        keys,
        vec!["name", "ip", "active", "networkName", "port", "activity", "trafficDown", "trafficUp", "uptime"]
    );
    for (i, column) in Column::ALL.iter().enumerate() {
        assert_eq!(column.index(), i);
    }
}

#[test]
fn test_column_parses_key_and_header() {
    assert_eq!("uptime".parse::<Column>().unwrap(), Column::Uptime);
    assert_eq!("UPTIME".parse::<Column>().unwrap(), Column::Uptime);
    assert_eq!("trafficdown".parse::<Column>().unwrap(), Column::Download);
    assert_eq!("ip address".parse::<Column>().unwrap(), Column::Ip);
    assert_eq!("SSID/NETWORK".parse::<Column>().unwrap(), Column::Network);

    let err = "bogus".parse::<Column>().unwrap_err();
    assert!(err.contains("unknown column 'bogus'"));
}

#[test]
fn test_column_total_width() {
    let total: usize = Column::ALL.iter().map(|c| c.width()).sum();
    assert_eq!(total, 128);
    for column in Column::ALL {
        assert!(column.header().len() < column.width());
    }
}

#[test]
fn test_ip_keys_order_numerically() {
    let low = SortKey::Ip([10, 0, 0, 9]);
    let high = SortKey::Ip([10, 0, 0, 10]);
    let invalid = SortKey::Ip(SortKey::INVALID_IP);
    assert!(low < high);
    assert!(invalid < low);
}

#[test]
fn test_number_keys_put_missing_first() {
    let mut keys = vec![
        SortKey::Number(Some(1500.0)),
        SortKey::Number(None),
        SortKey::Number(Some(-2.0)),
        SortKey::Number(Some(0.0)),
    ];
    keys.sort();
    assert_eq!(
        keys,
        vec![
            SortKey::Number(None),
            SortKey::Number(Some(-2.0)),
            SortKey::Number(Some(0.0)),
            SortKey::Number(Some(1500.0)),
        ]
    );
}

#[test]
fn test_text_keys_order_lexically() {
    assert!(SortKey::Text("alpha".into()) < SortKey::Text("beta".into()));
    assert!(SortKey::Text("--".into()) < SortKey::Text("CONNECTED".into()));
}

#[test]
fn test_formatted_cell_text_uses_display_as_key() {
    let cell = FormattedCell::text("laptop");
    assert_eq!(cell.sort, SortKey::Text("laptop".into()));
    assert_eq!(FormattedCell::sentinel().display, "--");
}

#[test]
fn test_credential_record_missing_verify_defaults_false() {
    let record: CredentialRecord = serde_json::from_value(json!({
        "username": "admin",
        "password": "pw",
        "baseurl": "https://controller:8043",
        "site": "Default"
    }))
    .unwrap();
    assert!(!record.verify);
    assert!(record.is_complete());
}

#[test]
fn test_credential_record_wire_names() {
    let record = CredentialRecord::new("admin", "pw", "https://c", "Default", true);
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["baseurl"], "https://c");
    assert_eq!(value["verify"], true);
}

#[test]
fn test_credential_record_completeness() {
    assert!(CredentialRecord::default().is_empty());
    assert!(!CredentialRecord::default().is_complete());

    let mut record = CredentialRecord::new("admin", "pw", "https://c", "", false);
    assert!(record.is_complete(), "empty site is still usable");

    record.password = Some(String::new());
    assert!(!record.is_complete());
}

#[test]
fn test_credential_record_debug_redacts_password() {
    let record = CredentialRecord::new("admin", "hunter2", "https://c", "Default", false);
    let debug = format!("{:?}", record);
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_client_record_accessors() {
    let record: ClientRecord = serde_json::from_value(json!({
        "name": "phone",
        "port": 7,
        "ssid": null,
        "connectDevType": "ap"
    }))
    .unwrap();
    assert_eq!(record.text("name").as_deref(), Some("phone"));
    assert_eq!(record.text("port").as_deref(), Some("7"));
    assert_eq!(record.text("ssid"), None);
    assert_eq!(record.text("missing"), None);
    assert!(record.is_ap());
}

#[test]
fn test_formatted_row_serializes_by_column_key() {
    let cells = std::array::from_fn(|i| FormattedCell::text(format!("c{}", i)));
    let row = FormattedRow { cells };
    let value = serde_json::to_value(&row).unwrap();
    assert_eq!(value["name"]["display"], "c0");
    assert_eq!(value["uptime"]["sort"], "c8");
}
