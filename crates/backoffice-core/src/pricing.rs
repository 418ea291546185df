//! # Catalyst Pricing
//!
//! Values a catalytic converter from its metal content and the current
//! metal rates.
//!
//! ```text
//! value = Σ (content_mg / 1000) × rate_per_gram     (per metal present)
//! offer = value − margin                            (basis points)
//! ```
//!
//! Integer math only; each metal line is rounded half-up to the minor unit.

use crate::error::{CoreError, CoreResult};
use crate::money::{CurrencyCode, Money};
use crate::types::{MetalContent, MetalRate};
use crate::validation::validate_margin_bps;

/// Estimates what the shop offers for a catalyst.
///
/// Only rates quoted in `currency` are considered. A metal that is present
/// in `content` but has no rate in that currency is an error rather than
/// being priced at zero.
pub fn estimate_catalyst_value(
    content: &MetalContent,
    rates: &[MetalRate],
    currency: &CurrencyCode,
    margin_bps: u32,
) -> CoreResult<Money> {
    validate_margin_bps(margin_bps)?;

    let mut value = Money::zero();
    for (metal, milligrams) in content.entries() {
        let rate = rates
            .iter()
            .find(|r| r.metal == metal && &r.currency_code == currency)
            .ok_or_else(|| CoreError::MissingMetalRate {
                metal: metal.to_string(),
            })?;

        let line = (rate.price_per_gram.minor_units() as i128 * milligrams as i128 + 500) / 1000;
        value += Money::from_minor(line as i64);
    }

    Ok(value.apply_percentage_discount(margin_bps))
}
