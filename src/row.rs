//! Configuration rows
//!
//! [`NewConfiguration`] is a projected row waiting to be inserted.
//! [`Configuration`] is a row read back from the `configurations` table.

use serde::Serialize;
use serde_json::Value;
use crate::document::display_value;
use crate::extract::InterfaceRecord;
use crate::{Error, Result};

/// Record field appended to the interface key to build the row name
pub const NAME_FIELD: &str = "name";
pub const DESCRIPTION_FIELD: &str = "description";
/// Source field of the `max_frame_size` column
pub const MTU_FIELD: &str = "mtu";

/// Projected row, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewConfiguration {
    pub name: String,
    pub description: Option<String>,
    pub config: Value,
    pub max_frame_size: Option<i64>,
}

impl NewConfiguration {
    /// Project one record into a row.
    ///
    /// The record must carry a `name`; `description` and `mtu` are optional.
    pub fn project(item: InterfaceRecord<'_>) -> Result<Self> {
        let record = item.record;

        let record_name = record.get(NAME_FIELD).ok_or_else(|| Error::MissingField {
            interface: item.interface.to_string(),
            field: NAME_FIELD.to_string(),
        })?;

        let description = match record.get(DESCRIPTION_FIELD) {
            None | Some(Value::Null) => None,
            Some(value) => Some(display_value(value)),
        };

        let max_frame_size = match record.get(MTU_FIELD) {
            None | Some(Value::Null) => None,
            Some(value) => Some(frame_size(item.interface, value)?),
        };

        Ok(Self {
            name: format!("{}{}", item.interface, display_value(record_name)),
            description,
            config: record.clone(),
            max_frame_size,
        })
    }
}

fn frame_size(interface: &str, value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| Error::InvalidField {
        interface: interface.to_string(),
        field: MTU_FIELD.to_string(),
        value: value.to_string(),
    })
}

/// Project every extracted record, stopping at the first failure
pub fn project_all<'a, I>(records: I) -> Result<Vec<NewConfiguration>>
where
    I: IntoIterator<Item = Result<InterfaceRecord<'a>>>,
{
    records
        .into_iter()
        .map(|item| item.and_then(NewConfiguration::project))
        .collect()
}

/// Persisted row of the `configurations` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub id: i64,
    pub connection: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub config: Value,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub infra_type: Option<String>,
    pub port_channel_id: Option<i64>,
    pub max_frame_size: Option<i64>,
}

impl Configuration {
    /// `name` field of the stored record, in string form
    pub fn config_name(&self) -> Option<String> {
        self.config.get(NAME_FIELD).map(display_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(interface: &str, record: &Value) -> Result<NewConfiguration> {
        NewConfiguration::project(InterfaceRecord { interface, record })
    }

    #[test]
    fn test_name_concatenates_interface_and_record_name() {
        let row = project("GigabitEthernet", &json!({"name": "1/0/1"})).unwrap();
        assert_eq!(row.name, "GigabitEthernet1/0/1");

        let row = project("Port-channel", &json!({"name": 12})).unwrap();
        assert_eq!(row.name, "Port-channel12");
    }

    #[test]
    fn test_optional_fields() {
        let record = json!({"name": 1, "description": "uplink", "mtu": 9216});
        let row = project("Port-channel", &record).unwrap();
        assert_eq!(row.description.as_deref(), Some("uplink"));
        assert_eq!(row.max_frame_size, Some(9216));
        assert_eq!(row.config, record);

        let row = project("Port-channel", &json!({"name": 2})).unwrap();
        assert_eq!(row.description, None);
        assert_eq!(row.max_frame_size, None);
    }

    #[test]
    fn test_config_keeps_projected_fields() {
        let record = json!({
            "name": "0/0",
            "mtu": 1500,
            "description": "core",
            "Cisco-IOS-XE-ethernet:channel-group": {"number": 3, "mode": "active"}
        });
        let row = project("TenGigabitEthernet", &record).unwrap();
        assert_eq!(row.config, record);
    }

    #[test]
    fn test_missing_name_fails() {
        let err = project("Vlan", &json!({"mtu": 1500})).unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_mtu_as_numeric_string() {
        let row = project("Vlan", &json!({"name": 10, "mtu": "1500"})).unwrap();
        assert_eq!(row.max_frame_size, Some(1500));
    }

    #[test]
    fn test_invalid_mtu_fails() {
        let err = project("Vlan", &json!({"name": 10, "mtu": "jumbo"})).unwrap_err();
        assert!(matches!(err, Error::InvalidField { .. }));
    }

    #[test]
    fn test_project_all_stops_on_error() {
        let good = json!({"name": 1});
        let bad = json!({"description": "no name"});
        let items = vec![
            Ok(InterfaceRecord { interface: "Loopback", record: &good }),
            Ok(InterfaceRecord { interface: "Loopback", record: &bad }),
        ];
        assert!(project_all(items).is_err());
    }
}
