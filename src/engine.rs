//! Price breakdown calculation
//!
//! The engine recomputes the full breakdown from scratch on every
//! call. It runs on every input event of a live form, so there are no
//! error paths: anything unresolvable contributes zero and the
//! calculation continues.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::{
    DepositKind, PartialPayment, PartialPaymentKind, PriceItem, PriceItemKind, PricingConfig,
};
use crate::fields::{mapping_key, numeric_value, resolve, FieldDescriptor, FieldKind, FormValues};

/// Rounding rule for percentage deposits: cents, midpoint away from
/// zero.
pub const DEPOSIT_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

const CENT_SCALE: u32 = 2;

fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENT_SCALE, DEPOSIT_ROUNDING)
}

/// Computed, display-ready result of applying a configuration to a
/// set of form values. Fresh per call, never persisted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: Decimal,
    pub items: Vec<BreakdownLine>,
    pub total: Decimal,
    /// Charge amount for checkout.
    pub amount_due: Decimal,
    /// Amount invoiced later; zero unless a deposit policy applied.
    pub balance_remaining: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_payment: Option<PartialPaymentStatus>,
}

/// One displayed line of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub id: String,
    pub label: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
    pub subtotal: Decimal,
}

/// Deposit policy echo attached to a breakdown whenever the policy
/// was consulted, applied or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialPaymentStatus {
    #[serde(flatten)]
    pub policy: PartialPayment,
    /// Set only for `user_selected` policies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_opted_in: Option<bool>,
}

/// Pure breakdown calculator. Holds no state; safe to share and to
/// call concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceBreakdownEngine;

impl PriceBreakdownEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute a full breakdown for the current form values.
    ///
    /// `user_opted_for_partial` carries the checkout checkbox for
    /// `user_selected` deposit policies; only `Some(true)` opts in.
    pub fn calculate(
        &self,
        config: &PricingConfig,
        values: &FormValues,
        fields: &[FieldDescriptor],
        user_opted_for_partial: Option<bool>,
    ) -> PriceBreakdown {
        if !config.enabled {
            return PriceBreakdown::default();
        }

        let base_price = config.base_price;
        let mut total = base_price;

        if config.items.is_empty() {
            // A bare base price is charged in full; deposit policies
            // only apply once the config carries price items.
            return PriceBreakdown {
                base_price,
                items: Vec::new(),
                total,
                amount_due: total,
                balance_remaining: Decimal::ZERO,
                partial_payment: None,
            };
        }

        let mut lines = Vec::new();
        for item in &config.items {
            let (unit_price, quantity) = self.price_item(item, values, fields);
            let subtotal = unit_price * quantity;
            total += subtotal;

            // A line at 0 x 0 is a no-op and stays out of the display.
            if unit_price > Decimal::ZERO || quantity > Decimal::ZERO {
                lines.push(BreakdownLine {
                    id: item.id.clone(),
                    label: item.label.clone(),
                    unit_price,
                    quantity,
                    subtotal,
                });
            }
        }

        let (amount_due, balance_remaining, partial_payment) = self.apply_partial_payment(
            config.partial_payment.as_ref(),
            total,
            user_opted_for_partial,
        );

        PriceBreakdown {
            base_price,
            items: lines,
            total,
            amount_due,
            balance_remaining,
            partial_payment,
        }
    }

    /// Resolve `(unit_price, quantity)` for one item by its strategy.
    fn price_item(
        &self,
        item: &PriceItem,
        values: &FormValues,
        fields: &[FieldDescriptor],
    ) -> (Decimal, Decimal) {
        let (unit_price, mut quantity) = match item.kind {
            PriceItemKind::Fixed => (item.fixed_price.unwrap_or(Decimal::ZERO), Decimal::ONE),
            PriceItemKind::FieldPrice => {
                (self.field_unit_price(item, values, fields), Decimal::ONE)
            }
            PriceItemKind::FieldQuantity => {
                let qty = item
                    .field_id
                    .as_deref()
                    .and_then(|id| resolve(fields, values, id))
                    .and_then(|r| r.value)
                    .and_then(numeric_value)
                    .unwrap_or(Decimal::ZERO);
                (item.fixed_price.unwrap_or(Decimal::ZERO), qty)
            }
        };

        // Quantity-field override beats the strategy default, for
        // every kind; an unresolvable override field counts as 1.
        if item.is_multiplied {
            if let Some(quantity_field_id) = item.quantity_field_id.as_deref() {
                quantity = resolve(fields, values, quantity_field_id)
                    .and_then(|r| r.value)
                    .and_then(numeric_value)
                    .unwrap_or(Decimal::ONE);
            }
        }

        (unit_price, quantity)
    }

    fn field_unit_price(
        &self,
        item: &PriceItem,
        values: &FormValues,
        fields: &[FieldDescriptor],
    ) -> Decimal {
        let Some(field_id) = item.field_id.as_deref() else {
            return Decimal::ZERO;
        };
        let Some(resolved) = resolve(fields, values, field_id) else {
            return Decimal::ZERO;
        };

        match (resolved.field.kind, &item.price_mapping) {
            (FieldKind::Select, Some(mapping)) => resolved
                .value
                .and_then(mapping_key)
                .and_then(|key| mapping.get(&key).copied())
                .unwrap_or(Decimal::ZERO),
            (FieldKind::Number, _) => resolved
                .value
                .and_then(numeric_value)
                .unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }

    fn apply_partial_payment(
        &self,
        partial: Option<&PartialPayment>,
        total: Decimal,
        user_opted_for_partial: Option<bool>,
    ) -> (Decimal, Decimal, Option<PartialPaymentStatus>) {
        let Some(partial) = partial else {
            return (total, Decimal::ZERO, None);
        };
        if !partial.enabled || total <= Decimal::ZERO {
            return (total, Decimal::ZERO, None);
        }

        let opted = user_opted_for_partial == Some(true);
        let applicable = match partial.kind {
            PartialPaymentKind::UserSelected => opted,
            PartialPaymentKind::Fixed | PartialPaymentKind::Percentage => true,
        };

        let (amount_due, balance_remaining) = if applicable {
            let effective = match partial.kind {
                PartialPaymentKind::Fixed => DepositKind::Fixed,
                PartialPaymentKind::Percentage => DepositKind::Percentage,
                PartialPaymentKind::UserSelected => {
                    partial.user_selected_type.unwrap_or(DepositKind::Percentage)
                }
            };
            let amount_due = match effective {
                DepositKind::Fixed => partial.value.clamp(Decimal::ZERO, total),
                DepositKind::Percentage => {
                    round_to_cents(total * partial.value / Decimal::ONE_HUNDRED)
                        .clamp(Decimal::ZERO, total)
                }
            };
            (amount_due, total - amount_due)
        } else {
            (total, Decimal::ZERO)
        };

        let user_opted_in = match partial.kind {
            PartialPaymentKind::UserSelected => Some(opted),
            _ => None,
        };

        let status = PartialPaymentStatus {
            policy: partial.clone(),
            user_opted_in,
        };
        (amount_due, balance_remaining, Some(status))
    }
}
