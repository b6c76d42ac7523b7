//! Pricing utilities for member portal forms
//!
//! This crate provides:
//! - Declarative pricing configuration for form-driven checkout
//! - Price breakdown and partial-payment (deposit) calculation
//! - One-time migration of legacy stored configurations
//!
//! The breakdown engine is pure and infallible: it recomputes the full
//! breakdown from scratch on every call, holds no state between calls,
//! and degrades unresolvable inputs to zero contributions instead of
//! erroring. Checkout reads `amount_due` from the latest breakdown;
//! `balance_remaining` is invoiced later.

pub mod config;
pub mod engine;
pub mod error;
pub mod fields;
pub mod migrate;

pub use config::{
    config_from_str, config_from_value, load_config, DepositKind, PartialPayment,
    PartialPaymentKind, PriceItem, PriceItemKind, PricingConfig,
};
pub use engine::{
    BreakdownLine, PartialPaymentStatus, PriceBreakdown, PriceBreakdownEngine, DEPOSIT_ROUNDING,
};
pub use error::ConfigError;
pub use fields::{
    mapping_key, numeric_value, resolve, FieldDescriptor, FieldKind, FieldOption, FormValues,
    ResolvedField,
};
pub use migrate::migrate_config;
