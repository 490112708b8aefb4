//! `shopcart products` and `shopcart categories`.

use shopcart_client::models::ProductQuery;
use shopcart_core::ProductId;

use super::CommandError;
use crate::console;
use crate::context::Context;

#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context, query: &ProductQuery) -> Result<(), CommandError> {
    let page = ctx.api.products(query).await?;
    if page.products.is_empty() {
        println!("No products found");
        return Ok(());
    }

    for product in &page.products {
        println!("{}", console::product_summary(product));
    }
    println!("Page {} ({} per page)", page.page, page.limit);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn show(ctx: &Context, product_id: ProductId) -> Result<(), CommandError> {
    let product = ctx.api.product(product_id).await?;

    println!("{}", console::product_summary(&product));
    if let Some(category) = &product.category_name {
        println!("Category: {category}");
    }
    match product.stock_quantity {
        Some(stock) if stock > 0 => println!("In stock: {stock}"),
        Some(_) => println!("Out of stock"),
        None => {}
    }
    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }
    if let Some(in_cart) = ctx.cart.line(product_id) {
        println!();
        println!("In your cart: {}", in_cart.quantity);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn featured(ctx: &Context, limit: Option<u32>) -> Result<(), CommandError> {
    for product in ctx.api.featured_products(limit).await? {
        println!("{}", console::product_summary(&product));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn categories(ctx: &Context) -> Result<(), CommandError> {
    for category in ctx.api.categories().await? {
        match &category.description {
            Some(description) => println!("#{:<5} {}  {description}", category.id, category.name),
            None => println!("#{:<5} {}", category.id, category.name),
        }
    }
    Ok(())
}
