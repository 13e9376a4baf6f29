//! District-level MGNREGA observations as returned by the data portal.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One monthly observation for a district.
///
/// The portal is loose about types: numeric columns come back as numbers,
/// numeric strings, empty strings or `null`. All of those read as a number
/// here, with anything unusable counted as `0`. Columns this type does not
/// model are kept in `extra` so a saved snapshot holds the full payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(
        default,
        alias = "District_Name",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub district_name: Option<String>,

    #[serde(
        default,
        alias = "Month",
        alias = "month_name",
        alias = "month_name_en",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub month: Option<String>,

    #[serde(
        default,
        alias = "Fin_Year",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub fin_year: Option<String>,

    #[serde(
        rename = "Total_Exp",
        alias = "total_exp",
        default,
        deserialize_with = "lenient_number"
    )]
    pub total_exp: f64,

    #[serde(
        rename = "Total_Households_Worked",
        alias = "total_households_worked",
        default,
        deserialize_with = "lenient_number"
    )]
    pub total_households_worked: f64,

    #[serde(
        rename = "Average_Wage_rate_per_day_per_person",
        alias = "average_wage_rate_per_day_per_person",
        default,
        deserialize_with = "lenient_number"
    )]
    pub average_wage_rate: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Exact, case-insensitive district comparison.
    ///
    /// Substring matches are rejected so that a district whose name is a
    /// prefix of another never picks up the other's rows.
    pub fn is_in_district(&self, district: &str) -> bool {
        self.district_name
            .as_deref()
            .map(|name| name.to_lowercase() == district.to_lowercase())
            .unwrap_or(false)
    }

    /// Month label with surrounding whitespace removed, empty when absent.
    pub fn month_label(&self) -> &str {
        self.month.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Keep only the records that belong to `district`.
pub fn filter_by_district(records: &[Record], district: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|r| r.is_in_district(district))
        .cloned()
        .collect()
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number, a numeric string or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(if v.is_finite() { v } else { 0.0 })
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            let parsed = v.trim().replace(',', "").parse::<f64>().unwrap_or(0.0);
            Ok(if parsed.is_finite() { parsed } else { 0.0 })
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<f64, D::Error> {
            d.deserialize_any(NumberVisitor)
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringVisitor;

    impl<'de> Visitor<'de> for StringVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, a number or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(StringVisitor)
        }
    }

    deserializer.deserialize_any(StringVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_portal_record() {
        let json = r#"{
            "fin_year": "2024-2025",
            "month": "Dec",
            "state_name": "BIHAR",
            "district_name": "PATNA",
            "Total_Exp": "1523.75",
            "Total_Households_Worked": 4210,
            "Average_Wage_rate_per_day_per_person": "245.5"
        }"#;

        let record: Record = serde_json::from_str(json).expect("record should parse");
        assert_eq!(record.district_name.as_deref(), Some("PATNA"));
        assert_eq!(record.month.as_deref(), Some("Dec"));
        assert_eq!(record.fin_year.as_deref(), Some("2024-2025"));
        assert_eq!(record.total_exp, 1523.75);
        assert_eq!(record.total_households_worked, 4210.0);
        assert_eq!(record.average_wage_rate, 245.5);
        assert_eq!(record.extra.get("state_name"), Some(&Value::from("BIHAR")));
    }

    #[test]
    fn test_missing_and_null_numbers_read_as_zero() {
        let json = r#"{"district_name": "Gaya", "Total_Exp": null, "Total_Households_Worked": "", "Average_Wage_rate_per_day_per_person": "NA"}"#;
        let record: Record = serde_json::from_str(json).expect("record should parse");
        assert_eq!(record.total_exp, 0.0);
        assert_eq!(record.total_households_worked, 0.0);
        assert_eq!(record.average_wage_rate, 0.0);

        let bare: Record = serde_json::from_str("{}").expect("empty record should parse");
        assert_eq!(bare.total_exp, 0.0);
        assert!(bare.district_name.is_none());
    }

    #[test]
    fn test_lowercase_column_aliases() {
        let json = r#"{"district_name": "Gaya", "Month": "April", "total_exp": 10, "total_households_worked": "3"}"#;
        let record: Record = serde_json::from_str(json).expect("record should parse");
        assert_eq!(record.month_label(), "April");
        assert_eq!(record.total_exp, 10.0);
        assert_eq!(record.total_households_worked, 3.0);
    }

    #[test]
    fn test_saved_record_reads_back_identically() {
        let json = r#"{"district_name": "Nalanda", "month": "Jan", "Total_Exp": "12.5", "state_code": "05"}"#;
        let record: Record = serde_json::from_str(json).expect("record should parse");
        let saved = serde_json::to_string(&record).expect("record should serialize");
        let reread: Record = serde_json::from_str(&saved).expect("saved record should parse");
        assert_eq!(record, reread);
    }

    #[test]
    fn test_district_match_is_exact_and_case_insensitive() {
        let record = Record {
            district_name: Some("Patna".to_string()),
            ..Default::default()
        };
        assert!(record.is_in_district("patna"));
        assert!(record.is_in_district("PATNA"));
        assert!(!record.is_in_district("pat"));
        assert!(!record.is_in_district("patna "));

        let unnamed = Record::default();
        assert!(!unnamed.is_in_district(""));
    }

    #[test]
    fn test_filter_by_district() {
        let records = vec![
            Record { district_name: Some("Purnia".into()), ..Default::default() },
            Record { district_name: Some("PURNIA".into()), ..Default::default() },
            Record { district_name: Some("Purnia East".into()), ..Default::default() },
        ];
        assert_eq!(filter_by_district(&records, "purnia").len(), 2);
    }
}
