//! Pricing configuration types and loaders
//!
//! A `PricingConfig` is authored once per form in the admin UI and
//! stored with the form definition. The engine treats it as read-only
//! for the duration of a calculation. Stored configs older than the
//! item-list shape go through [`crate::migrate::migrate_config`]
//! before reaching the engine.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Declarative description of how to price a form submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Master switch; when false the engine returns the zero breakdown.
    #[serde(default)]
    pub enabled: bool,

    /// Flat charge always included while pricing is enabled.
    #[serde(default)]
    pub base_price: Decimal,

    /// Priced lines; order matters for display only.
    #[serde(default)]
    pub items: Vec<PriceItem>,

    /// Deposit/installment policy, at most one per configuration.
    #[serde(default)]
    pub partial_payment: Option<PartialPayment>,
}

/// One priced line within a configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceItem {
    pub id: String,

    #[serde(default)]
    pub label: String,

    /// Pricing strategy; a missing type degrades to a zero-priced
    /// fixed line rather than a parse failure.
    #[serde(rename = "type", default)]
    pub kind: PriceItemKind,

    /// Referenced field, required in spirit for `field_price` and
    /// `field_quantity`; absence yields a zero contribution.
    #[serde(default)]
    pub field_id: Option<String>,

    /// Unit price source for `fixed` and `field_quantity`.
    #[serde(default)]
    pub fixed_price: Option<Decimal>,

    /// Option-value to price, used only for `field_price` over a
    /// select field.
    #[serde(default)]
    pub price_mapping: Option<HashMap<String, Decimal>>,

    /// Together with `is_multiplied`, overrides the quantity with the
    /// value of another field regardless of `kind`.
    #[serde(default)]
    pub quantity_field_id: Option<String>,

    #[serde(default)]
    pub is_multiplied: bool,
}

/// Pricing strategy for a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceItemKind {
    /// Flat unit price from `fixed_price`.
    #[default]
    Fixed,
    /// Unit price read from the referenced field (select mapping or
    /// number value).
    FieldPrice,
    /// Quantity read from the referenced field, priced at `fixed_price`.
    FieldQuantity,
}

/// Deposit policy allowing the charge today to be less than the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialPayment {
    #[serde(default)]
    pub enabled: bool,

    #[serde(rename = "type")]
    pub kind: PartialPaymentKind,

    /// Absolute amount for `fixed`, 0-100 for `percentage`; for
    /// `user_selected`, the declared value once the end user opts in.
    #[serde(default)]
    pub value: Decimal,

    /// How `value` is read after opt-in, for `user_selected` policies.
    /// Defaults to `percentage` when unset.
    #[serde(default)]
    pub user_selected_type: Option<DepositKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialPaymentKind {
    Fixed,
    Percentage,
    UserSelected,
}

/// Interpretation of a deposit value: absolute amount or percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositKind {
    Fixed,
    Percentage,
}

/// Load a pricing configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<PricingConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: PricingConfig = serde_yaml::from_str(&content)?;

    tracing::info!(
        "Loaded pricing config ({} items) from {:?}",
        config.items.len(),
        path
    );

    Ok(config)
}

/// Load a pricing configuration from a YAML string (for testing).
pub fn config_from_str(yaml: &str) -> Result<PricingConfig, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Typed view over a stored JSON configuration value.
pub fn config_from_value(value: serde_json::Value) -> Result<PricingConfig, ConfigError> {
    Ok(serde_json::from_value(value)?)
}
