use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration. Every table is optional; defaults match the Shopify
/// orders and payment transactions exports.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub orders: OrdersConfig,
    #[serde(default)]
    pub transactions: TransactionsConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrdersConfig {
    #[serde(default)]
    pub columns: OrderColumns,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderColumns {
    pub paid_at: String,
    pub fulfilled_at: String,
    pub fulfillment_status: String,
    pub financial_status: String,
    pub quantity: String,
    pub price: String,
    pub discount: String,
    pub shipping: String,
    pub taxes: String,
}

impl Default for OrderColumns {
    fn default() -> Self {
        Self {
            paid_at: "Paid at".into(),
            fulfilled_at: "Fulfilled at".into(),
            fulfillment_status: "Fulfillment Status".into(),
            financial_status: "Financial Status".into(),
            quantity: "Lineitem quantity".into(),
            price: "Lineitem price".into(),
            discount: "Discount Amount".into(),
            shipping: "Shipping".into(),
            taxes: "Taxes".into(),
        }
    }
}

impl OrderColumns {
    /// (field, column) pairs in declaration order.
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("paid_at", self.paid_at.as_str()),
            ("fulfilled_at", self.fulfilled_at.as_str()),
            ("fulfillment_status", self.fulfillment_status.as_str()),
            ("financial_status", self.financial_status.as_str()),
            ("quantity", self.quantity.as_str()),
            ("price", self.price.as_str()),
            ("discount", self.discount.as_str()),
            ("shipping", self.shipping.as_str()),
            ("taxes", self.taxes.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionsConfig {
    #[serde(default)]
    pub columns: TransactionColumns,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransactionColumns {
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub fee: String,
    pub net: String,
}

impl Default for TransactionColumns {
    fn default() -> Self {
        Self {
            date: "Transaction Date".into(),
            kind: "Type".into(),
            amount: "Amount".into(),
            fee: "Fee".into(),
            net: "Net".into(),
        }
    }
}

impl TransactionColumns {
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("date", self.date.as_str()),
            ("kind", self.kind.as_str()),
            ("amount", self.amount.as_str()),
            ("fee", self.fee.as_str()),
            ("net", self.net.as_str()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Classification rules
// ---------------------------------------------------------------------------

pub const RECOGNIZED_STATUS: &str = "fulfilled";
pub const PAID_STATUS: &str = "paid";
pub const CHARGE_TYPE: &str = "charge";

/// Status values that drive classification. Compared case-insensitively.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// `Fulfillment Status` that marks an order line as recognized revenue.
    pub recognized_status: String,
    /// `Financial Status` that marks an order line as paid.
    pub paid_status: String,
    /// Transaction `Type` counted as cash received from customers.
    pub charge_type: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            recognized_status: RECOGNIZED_STATUS.into(),
            paid_status: PAID_STATUS.into(),
            charge_type: CHARGE_TYPE.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

pub const DEFAULT_OUTPUT_FILE: &str = "monthly_reconciliation.csv";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { file: DEFAULT_OUTPUT_FILE.into() }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        check_columns("orders", &self.orders.columns.fields())?;
        check_columns("transactions", &self.transactions.columns.fields())?;

        let rules = [
            ("recognized_status", &self.rules.recognized_status),
            ("paid_status", &self.rules.paid_status),
            ("charge_type", &self.rules.charge_type),
        ];
        for (name, value) in rules {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "rules.{name} must not be empty"
                )));
            }
        }

        if self.output.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation("output.file must not be empty".into()));
        }

        Ok(())
    }
}

/// Column names must be non-empty and distinct within a table.
fn check_columns(table: &str, fields: &[(&'static str, &str)]) -> Result<(), ReconError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for &(field, column) in fields {
        if column.trim().is_empty() {
            return Err(ReconError::ConfigValidation(format!(
                "{table}.columns.{field} must not be empty"
            )));
        }
        if let Some(prev) = seen.insert(column, field) {
            return Err(ReconError::ConfigValidation(format!(
                "{table}.columns: '{column}' is mapped to both {prev} and {field}"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
