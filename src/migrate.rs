//! One-time upgrade of stored pricing configurations
//!
//! Configurations written before the item-list shape carried a single
//! field-driven rule (`price_field_id`, `price_mapping`,
//! `quantity_field_id`, `quantity_multiplier`). The authoring
//! collaborator runs [`migrate_config`] once when loading a stored
//! configuration, before handing it to the engine.

use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::config::{PriceItem, PriceItemKind, PricingConfig};
use crate::fields::numeric_value;

/// Upgrade an arbitrary stored configuration value to the current
/// shape.
///
/// Total over any input: an absent, null, or malformed value degrades
/// to the disabled zero-price default. Brand-new forms hit this with
/// no stored config at all, so absence is the normal case, not an
/// error.
pub fn migrate_config(raw: Option<&Value>) -> PricingConfig {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return PricingConfig::default();
    };

    // Already the current shape. The typed view wins; any stale legacy
    // keys still present are dropped.
    if obj.get("items").is_some_and(Value::is_array) {
        return serde_json::from_value(Value::Object(obj.clone())).unwrap_or_default();
    }

    let enabled = obj.get("enabled").and_then(Value::as_bool).unwrap_or(false);
    let base_price = obj
        .get("base_price")
        .and_then(numeric_value)
        .unwrap_or(Decimal::ZERO);

    let mut items = Vec::new();
    if let Some(price_field_id) = obj.get("price_field_id").and_then(Value::as_str) {
        tracing::debug!(
            "Migrating legacy pricing rule for field {} to item list",
            price_field_id
        );

        let price_mapping = obj.get("price_mapping").and_then(Value::as_object).map(|m| {
            m.iter()
                .filter_map(|(option, price)| numeric_value(price).map(|p| (option.clone(), p)))
                .collect()
        });

        items.push(PriceItem {
            id: format!("item-{}", Uuid::now_v7()),
            label: "Variable Price".to_string(),
            kind: PriceItemKind::FieldPrice,
            field_id: Some(price_field_id.to_string()),
            fixed_price: None,
            price_mapping,
            quantity_field_id: obj
                .get("quantity_field_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            is_multiplied: obj
                .get("quantity_multiplier")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        });
    }

    // A deposit policy stored on a legacy config keeps working after
    // the upgrade; an unparseable one is dropped.
    let partial_payment = obj
        .get("partial_payment")
        .and_then(|v| serde_json::from_value(v.clone()).ok());

    PricingConfig {
        enabled,
        base_price,
        items,
        partial_payment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartialPaymentKind;
    use serde_json::json;

    #[test]
    fn test_absent_config_yields_default() {
        let config = migrate_config(None);
        assert!(!config.enabled);
        assert_eq!(config.base_price, Decimal::ZERO);
        assert!(config.items.is_empty());
    }

    #[test]
    fn test_null_and_scalar_inputs_yield_default() {
        assert!(migrate_config(Some(&Value::Null)).items.is_empty());
        assert!(migrate_config(Some(&json!("not a config"))).items.is_empty());
        assert!(migrate_config(Some(&json!(42))).items.is_empty());
    }

    #[test]
    fn test_current_shape_passes_through() {
        let raw = json!({
            "enabled": true,
            "base_price": 10,
            "items": [
                {"id": "item-1", "type": "fixed", "fixed_price": 25}
            ]
        });

        let config = migrate_config(Some(&raw));
        assert!(config.enabled);
        assert_eq!(config.base_price, Decimal::from(10));
        assert_eq!(config.items.len(), 1);
        assert_eq!(config.items[0].id, "item-1");
    }

    #[test]
    fn test_current_shape_drops_legacy_keys() {
        let raw = json!({
            "enabled": true,
            "price_field_id": "f-old",
            "items": []
        });

        let config = migrate_config(Some(&raw));
        assert!(config.enabled);
        assert!(config.items.is_empty());
    }

    #[test]
    fn test_legacy_shape_synthesizes_one_item() {
        let raw = json!({
            "enabled": true,
            "base_price": 5,
            "price_field_id": "f-course",
            "price_mapping": {"A": 50, "B": 80},
            "quantity_field_id": "f-qty",
            "quantity_multiplier": true
        });

        let config = migrate_config(Some(&raw));
        assert!(config.enabled);
        assert_eq!(config.base_price, Decimal::from(5));
        assert_eq!(config.items.len(), 1);

        let item = &config.items[0];
        assert_eq!(item.kind, PriceItemKind::FieldPrice);
        assert_eq!(item.label, "Variable Price");
        assert_eq!(item.field_id.as_deref(), Some("f-course"));
        assert_eq!(item.quantity_field_id.as_deref(), Some("f-qty"));
        assert!(item.is_multiplied);
        assert_eq!(
            item.price_mapping.as_ref().unwrap().get("B").copied(),
            Some(Decimal::from(80))
        );
    }

    #[test]
    fn test_synthesized_ids_are_unique() {
        let raw = json!({"enabled": true, "price_field_id": "f-1"});
        let a = migrate_config(Some(&raw));
        let b = migrate_config(Some(&raw));
        assert_ne!(a.items[0].id, b.items[0].id);
        assert!(a.items[0].id.starts_with("item-"));
    }

    #[test]
    fn test_legacy_shape_without_price_field_has_no_items() {
        let raw = json!({"enabled": true, "base_price": 15});
        let config = migrate_config(Some(&raw));
        assert!(config.enabled);
        assert_eq!(config.base_price, Decimal::from(15));
        assert!(config.items.is_empty());
    }

    #[test]
    fn test_legacy_partial_payment_is_carried() {
        let raw = json!({
            "enabled": true,
            "price_field_id": "f-course",
            "partial_payment": {"enabled": true, "type": "percentage", "value": 25}
        });

        let config = migrate_config(Some(&raw));
        let partial = config.partial_payment.unwrap();
        assert!(partial.enabled);
        assert_eq!(partial.kind, PartialPaymentKind::Percentage);
    }

    #[test]
    fn test_unparseable_pieces_degrade_silently() {
        // Mapping entries that are not numbers are dropped; a garbage
        // partial payment is dropped; nothing panics.
        let raw = json!({
            "enabled": true,
            "price_field_id": "f-course",
            "price_mapping": {"A": 50, "B": "not a price", "C": null},
            "partial_payment": "garbage"
        });

        let config = migrate_config(Some(&raw));
        let mapping = config.items[0].price_mapping.as_ref().unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("A").copied(), Some(Decimal::from(50)));
        assert!(config.partial_payment.is_none());
    }
}
