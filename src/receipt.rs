//! Receipt

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    currency::{Balances, Currency},
    rewards::GrantedItem,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Output could not be written
    #[error("failed to write receipt")]
    IO,
}

/// What a player received for a purchase, and what it cost them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    items: Vec<GrantedItem>,
    currency: Currency,
    charged: Decimal,
    event_bonus: Decimal,
    balances: Balances,
}

impl Receipt {
    /// Create a receipt
    pub fn new(
        items: Vec<GrantedItem>,
        currency: Currency,
        charged: Decimal,
        event_bonus: Decimal,
        balances: Balances,
    ) -> Self {
        Self {
            items,
            currency,
            charged,
            event_bonus,
            balances,
        }
    }

    /// Granted items
    pub fn items(&self) -> &[GrantedItem] {
        &self.items
    }

    /// Amount debited
    pub fn charged(&self) -> Decimal {
        self.charged
    }

    /// Balances after the purchase
    pub fn balances(&self) -> Balances {
        self.balances
    }

    /// Total quantity across all granted items
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Code", "Quantity"]);

        for (idx, item) in self.items.iter().enumerate() {
            builder.push_record([
                format!("#{}", idx + 1),
                item.name.clone(),
                item.item_code.clone(),
                item.quantity.to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..4), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        let symbol = self.currency.symbol();

        writeln!(out, " Charged:      {} {symbol}", self.charged).map_err(|_err| ReceiptError::IO)?;
        writeln!(
            out,
            " Snowflakes:   +{} {}",
            self.event_bonus,
            Currency::Event.symbol()
        )
        .map_err(|_err| ReceiptError::IO)?;
        writeln!(
            out,
            " Balance:      {} {} / {} {}",
            self.balances.balance,
            Currency::Rub.symbol(),
            self.balances.event_balance,
            Currency::Event.symbol()
        )
        .map_err(|_err| ReceiptError::IO)?;

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn receipt() -> Receipt {
        Receipt::new(
            vec![
                GrantedItem {
                    item_code: "rifle.ak".to_string(),
                    name: "Assault Rifle".to_string(),
                    icon_url: "https://rustlabs.com/img/items180/rifle.ak.png".to_string(),
                    quantity: 1,
                },
                GrantedItem {
                    item_code: "ammo.rifle".to_string(),
                    name: "5.56 Rifle Ammo".to_string(),
                    icon_url: "https://rustlabs.com/img/items180/ammo.rifle.png".to_string(),
                    quantity: 128,
                },
            ],
            Currency::Rub,
            Decimal::from(150),
            Decimal::new(15, 1),
            Balances::new(Decimal::from(850), Decimal::new(15, 1)),
        )
    }

    #[test]
    fn write_to_renders_items_and_summary() -> TestResult {
        let mut out = Vec::new();

        receipt().write_to(&mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Assault Rifle"));
        assert!(rendered.contains("ammo.rifle"));
        assert!(rendered.contains("128"));
        assert!(rendered.contains("Charged:      150 ₽"));
        assert!(rendered.contains("+1.5 ❄"));
        assert!(rendered.contains("850 ₽ / 1.5 ❄"));

        Ok(())
    }

    #[test]
    fn total_quantity_sums_items() {
        assert_eq!(receipt().total_quantity(), 129);
    }

    #[test]
    fn empty_receipt_still_renders_header() -> TestResult {
        let empty = Receipt::new(
            Vec::new(),
            Currency::Event,
            Decimal::ZERO,
            Decimal::ZERO,
            Balances::default(),
        );
        let mut out = Vec::new();

        empty.write_to(&mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Quantity"));
        assert!(rendered.contains("Charged:      0 ❄"));

        Ok(())
    }
}
