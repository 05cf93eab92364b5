use serde::{Deserialize, Serialize};

pub const DEFAULT_SIP_ACTIVITY_WINDOW_DAYS: i64 = 60;
pub const DEFAULT_DATA_SOURCE: &str = "MF Central";

/// Key under which MF Central nests the rows of its statement exports.
pub const MF_CENTRAL_RECORDS_KEY: &str = "dtTrxnResult";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sip_activity_window_days: i64,
    pub include_inactive_sips: bool,
    pub data_source: String,
    pub field_maps: FieldMaps,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sip_activity_window_days: DEFAULT_SIP_ACTIVITY_WINDOW_DAYS,
            include_inactive_sips: false,
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            field_maps: FieldMaps::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMaps {
    pub holdings: HoldingFieldMap,
    pub transactions: TransactionFieldMap,
    pub xirr_report: XirrFieldMap,
}

/// Column names of the consolidated portfolio statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldingFieldMap {
    pub records_key: Option<String>,
    pub amc_name: String,
    pub scheme_name: String,
    pub scheme_code: String,
    pub fund_type: String,
    pub folio_number: String,
    pub investor_name: String,
    pub pan: String,
    pub units: String,
    pub nav_date: String,
    pub current_value: String,
    pub cost_value: String,
}

impl Default for HoldingFieldMap {
    fn default() -> Self {
        Self {
            records_key: Some(MF_CENTRAL_RECORDS_KEY.to_string()),
            amc_name: "AMC Name".to_string(),
            scheme_name: "Scheme".to_string(),
            scheme_code: "SCHEMECODE".to_string(),
            fund_type: "Type".to_string(),
            folio_number: "Folio".to_string(),
            investor_name: "Investor Name".to_string(),
            pan: "PAN".to_string(),
            units: "Unit Balance".to_string(),
            nav_date: "NAV Date".to_string(),
            current_value: "Current Value(Rs.)".to_string(),
            cost_value: "Cost Value(Rs.)".to_string(),
        }
    }
}

/// Column names of the transaction details statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionFieldMap {
    pub records_key: Option<String>,
    pub scheme_name: String,
    pub folio_number: String,
    pub fund_type: String,
    pub investor_name: String,
    pub pan: String,
    pub trade_date: String,
    pub transaction_type: String,
    pub amount: String,
    pub units: String,
    pub price: String,
    pub broker: String,
}

impl Default for TransactionFieldMap {
    fn default() -> Self {
        Self {
            records_key: Some(MF_CENTRAL_RECORDS_KEY.to_string()),
            scheme_name: "SCHEME_NAME".to_string(),
            folio_number: "FOLIO_NUMBER".to_string(),
            fund_type: "Type".to_string(),
            investor_name: "INVESTOR_NAME".to_string(),
            pan: "PAN".to_string(),
            trade_date: "TRADE_DATE".to_string(),
            transaction_type: "TRANSACTION_TYPE".to_string(),
            amount: "AMOUNT".to_string(),
            units: "UNITS".to_string(),
            price: "PRICE".to_string(),
            broker: "BROKER".to_string(),
        }
    }
}

/// Column names of the detailed (XIRR) report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XirrFieldMap {
    pub records_key: Option<String>,
    pub scheme_name: String,
    pub folio_number: String,
    pub amc_name: String,
    pub fund_type: String,
    pub xirr: String,
    pub current_value: String,
    pub cost_value: String,
    pub appreciation: String,
}

impl Default for XirrFieldMap {
    fn default() -> Self {
        Self {
            records_key: None,
            scheme_name: "Scheme".to_string(),
            folio_number: "Folio".to_string(),
            amc_name: "AMCName".to_string(),
            fund_type: "Type".to_string(),
            xirr: "Annualised XIRR".to_string(),
            current_value: "CurrentValue".to_string(),
            cost_value: "CostValue".to_string(),
            appreciation: "Appreciation".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}
