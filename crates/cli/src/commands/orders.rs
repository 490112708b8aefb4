//! `shopcart orders`.
//!
//! Orders are placed from the server-side cart, which `cart add` keeps up
//! to date while logged in. A successful checkout empties both carts.

use shopcart_client::models::NewOrder;
use shopcart_core::{OrderId, Price};

use super::CommandError;
use crate::console;
use crate::context::Context;

#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context) -> Result<(), CommandError> {
    ctx.require_login()?;

    let orders = ctx.api.orders().await?;
    if orders.is_empty() {
        println!("No orders yet");
    }
    for order in &orders {
        println!("{}", console::order_summary(order));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn show(ctx: &Context, order_id: OrderId) -> Result<(), CommandError> {
    ctx.require_login()?;

    let order = ctx.api.order(order_id).await?;
    println!("{}", console::order_summary(&order));
    if let Some(address) = &order.shipping_address {
        println!("Ship to: {address}");
    }
    for item in &order.items {
        println!(
            "  #{:<5} {} x{}  {}",
            item.product_id,
            item.name.as_deref().unwrap_or("(unnamed)"),
            item.quantity,
            Price::from_amount(item.price)
        );
    }
    Ok(())
}

/// Place a cash-on-delivery order and empty the local cart.
#[allow(clippy::print_stdout)]
pub async fn checkout(ctx: &mut Context, address: Option<String>) -> Result<(), CommandError> {
    ctx.require_login()?;

    let shipping_address = address
        .or_else(|| ctx.auth().user().and_then(|user| user.address))
        .filter(|address| !address.trim().is_empty())
        .ok_or(CommandError::MissingAddress)?;

    let created = ctx
        .api
        .create_order(&NewOrder::cash_on_delivery(shipping_address))
        .await?;
    ctx.cart.clear()?;

    tracing::info!(order_id = %created.order_id, "Order placed");
    println!(
        "Order #{} placed, total {}",
        created.order_id,
        Price::from_amount(created.total)
    );
    Ok(())
}
