//! Pricing
//!
//! Effective prices, purchase totals and the snowflake bonus earned on rouble purchases.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::currency::Currency;

/// Share of a rouble purchase credited back as snowflakes when the product sets no explicit bonus.
pub const DEFAULT_EVENT_BONUS_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Most units a single purchase may ask for.
pub const MAX_QUANTITY: u32 = 100;

/// Errors raised while pricing a purchase
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Discount percentage outside `0..=100`
    #[error("discount percent must be between 0 and 100, got {0}")]
    InvalidPercent(u8),

    /// Quantity outside `1..=MAX_QUANTITY`
    #[error("quantity must be between 1 and {MAX_QUANTITY}")]
    InvalidQuantity,

    /// Total does not fit in a decimal
    #[error("purchase total overflowed")]
    Overflow,
}

/// A percentage discount, optionally expiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    /// Whole percent taken off the base price
    pub percent: u8,

    /// Moment the discount stops applying; `None` never expires
    #[serde(default)]
    pub ends_at: Option<Timestamp>,
}

impl Discount {
    /// Create a discount, validating the percentage
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidPercent`] if `percent` is above 100.
    pub fn new(percent: u8, ends_at: Option<Timestamp>) -> Result<Self, PricingError> {
        if percent > 100 {
            return Err(PricingError::InvalidPercent(percent));
        }

        Ok(Self { percent, ends_at })
    }

    /// Whether the discount applies at `now`
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.ends_at.is_none_or(|ends_at| ends_at > now)
    }

    /// Apply the discount to `price`, rounding down to a whole unit
    pub fn apply(&self, price: Decimal) -> Decimal {
        let keep = Decimal::from(100_u8.saturating_sub(self.percent));

        (price * keep / Decimal::ONE_HUNDRED).floor()
    }
}

/// Everything needed to price a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTag {
    /// Base unit price
    pub price: Decimal,

    /// Currency the price is charged in
    pub currency: Currency,

    /// Optional discount
    pub discount: Option<Discount>,

    /// Fixed snowflakes credited per unit on rouble purchases
    pub event_bonus: Option<Decimal>,
}

impl PriceTag {
    /// Unit price after any discount active at `now`
    pub fn unit_price_at(&self, now: Timestamp) -> Decimal {
        match self.discount {
            Some(discount) if discount.is_active_at(now) => discount.apply(self.price),
            _ => self.price,
        }
    }

    /// Price `quantity` units at `now`
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidQuantity`] for a quantity outside `1..=MAX_QUANTITY` and
    /// [`PricingError::Overflow`] if the total cannot be represented.
    pub fn quote(&self, quantity: u32, now: Timestamp) -> Result<Quote, PricingError> {
        if !(1..=MAX_QUANTITY).contains(&quantity) {
            return Err(PricingError::InvalidQuantity);
        }

        let unit_price = self.unit_price_at(now);
        let units = Decimal::from(quantity);

        let total_cost = unit_price
            .checked_mul(units)
            .ok_or(PricingError::Overflow)?;

        let event_bonus = match self.currency {
            Currency::Event => Decimal::ZERO,
            Currency::Rub => match self.event_bonus {
                Some(per_unit) => per_unit.checked_mul(units).ok_or(PricingError::Overflow)?,
                None => total_cost * DEFAULT_EVENT_BONUS_RATE,
            },
        };

        Ok(Quote {
            currency: self.currency,
            unit_price,
            total_cost,
            event_bonus,
        })
    }
}

/// The priced outcome of a purchase request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Currency debited
    pub currency: Currency,

    /// Unit price after discount
    pub unit_price: Decimal,

    /// `unit_price * quantity`
    pub total_cost: Decimal,

    /// Snowflakes credited if the purchase is paid for
    pub event_bonus: Decimal,
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use super::*;

    fn rub(price: i64) -> PriceTag {
        PriceTag {
            price: Decimal::from(price),
            currency: Currency::Rub,
            discount: None,
            event_bonus: None,
        }
    }

    #[test]
    fn discount_above_one_hundred_percent_is_rejected() {
        assert_eq!(
            Discount::new(101, None),
            Err(PricingError::InvalidPercent(101))
        );
    }

    #[test]
    fn discounted_price_rounds_down() -> TestResult {
        let discount = Discount::new(15, None)?;

        assert_eq!(discount.apply(Decimal::from(150)), Decimal::from(127));

        Ok(())
    }

    #[test]
    fn active_discount_reduces_total() -> TestResult {
        let tag = PriceTag {
            discount: Some(Discount::new(30, None)?),
            ..rub(100)
        };

        let quote = tag.quote(2, Timestamp::now())?;

        assert_eq!(quote.unit_price, Decimal::from(70));
        assert_eq!(quote.total_cost, Decimal::from(140));

        Ok(())
    }

    #[test]
    fn expired_discount_is_ignored() -> TestResult {
        let now = Timestamp::now();
        let tag = PriceTag {
            discount: Some(Discount::new(50, Some(now - SignedDuration::from_hours(1)))?),
            ..rub(100)
        };

        assert_eq!(tag.unit_price_at(now), Decimal::from(100));

        Ok(())
    }

    #[test]
    fn discount_ending_in_the_future_applies() -> TestResult {
        let now = Timestamp::now();
        let tag = PriceTag {
            discount: Some(Discount::new(50, Some(now + SignedDuration::from_hours(1)))?),
            ..rub(100)
        };

        assert_eq!(tag.unit_price_at(now), Decimal::from(50));

        Ok(())
    }

    #[test]
    fn rouble_purchase_earns_one_percent_by_default() -> TestResult {
        let quote = rub(50).quote(1, Timestamp::now())?;

        assert_eq!(quote.total_cost, Decimal::from(50));
        assert_eq!(quote.event_bonus, Decimal::new(5, 1));

        Ok(())
    }

    #[test]
    fn explicit_event_bonus_is_per_unit() -> TestResult {
        let tag = PriceTag {
            event_bonus: Some(Decimal::from(3)),
            ..rub(50)
        };

        let quote = tag.quote(4, Timestamp::now())?;

        assert_eq!(quote.event_bonus, Decimal::from(12));

        Ok(())
    }

    #[test]
    fn event_purchase_earns_no_bonus() -> TestResult {
        let tag = PriceTag {
            currency: Currency::Event,
            event_bonus: Some(Decimal::from(3)),
            ..rub(500)
        };

        let quote = tag.quote(1, Timestamp::now())?;

        assert_eq!(quote.event_bonus, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let result = rub(10).quote(0, Timestamp::now());

        assert_eq!(result, Err(PricingError::InvalidQuantity));
    }

    #[test]
    fn quantity_above_cap_is_rejected() -> TestResult {
        let now = Timestamp::now();

        assert_eq!(rub(10).quote(MAX_QUANTITY + 1, now), Err(PricingError::InvalidQuantity));
        assert_eq!(rub(0).quote(u32::MAX, now), Err(PricingError::InvalidQuantity));

        let quote = rub(10).quote(MAX_QUANTITY, now)?;

        assert_eq!(quote.total_cost, Decimal::from(10 * MAX_QUANTITY));

        Ok(())
    }
}
