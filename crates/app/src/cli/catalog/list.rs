use clap::Args;
use jiff::Timestamp;
use ostrum_app::domain::catalog::records::ProductRecord;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    database: DatabaseArgs,
}

pub(crate) async fn run(args: ListArgs) -> Result<(), String> {
    let ctx = args.database.context().await?;

    let products = ctx
        .catalog
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    println!("{}", render(&products, Timestamp::now()));

    Ok(())
}

fn render(products: &[ProductRecord], now: Timestamp) -> String {
    let mut builder = Builder::default();

    builder.push_record(["UUID", "Name", "Kind", "Price", "Sale price", "Servers"]);

    for product in products {
        let sale_price = product
            .price_tag()
            .quote(1, now)
            .map_or_else(|_| "-".to_string(), |quote| quote.unit_price.to_string());

        builder.push_record([
            product.uuid.to_string(),
            product.name.clone(),
            kind(product).to_string(),
            format!("{} {}", product.price, product.currency.symbol()),
            sale_price,
            if product.servers.is_empty() {
                "all".to_string()
            } else {
                product.servers.join(", ")
            },
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());

    table.to_string()
}

fn kind(product: &ProductRecord) -> &'static str {
    match (product.is_crate, product.is_free) {
        (true, true) => "free crate",
        (true, false) => "crate",
        (false, true) => "free",
        (false, false) => "kit",
    }
}
