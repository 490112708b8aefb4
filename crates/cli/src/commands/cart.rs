//! `shopcart cart` - the local cart.
//!
//! The cart lives in the storage file and works without a session. When
//! logged in, `add` pushes the whole cart to the backend afterwards and
//! waits for that push before exiting.

use shopcart_client::SyncReport;
use shopcart_core::{Price, ProductId};

use super::CommandError;
use crate::console;
use crate::context::Context;

#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) {
    let cart = &ctx.cart;
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for line in cart.lines() {
        println!("{}", console::cart_line(line));
    }
    println!(
        "{} item(s), total {}",
        cart.item_count(),
        Price::from_amount(cart.total())
    );
}

/// Fetch the product and add `quantity` of it.
pub async fn add(ctx: &mut Context, product_id: ProductId, quantity: u32) -> Result<(), CommandError> {
    let product = ctx.api.product(product_id).await?;

    if let Some(handle) = ctx.cart.add_item(&product, quantity)? {
        match handle.await {
            Ok(report) => log_report(report),
            Err(e) => tracing::warn!(error = %e, "Cart sync task failed"),
        }
    }
    Ok(())
}

pub fn remove(ctx: &mut Context, product_id: ProductId) -> Result<(), CommandError> {
    ctx.cart.remove_item(product_id)?;
    Ok(())
}

pub fn set_quantity(
    ctx: &mut Context,
    product_id: ProductId,
    quantity: u32,
) -> Result<(), CommandError> {
    ctx.cart.update_quantity(product_id, quantity)?;
    Ok(())
}

pub fn clear(ctx: &mut Context) -> Result<(), CommandError> {
    ctx.cart.clear()?;
    Ok(())
}

/// Push the cart to the backend now.
pub async fn sync(ctx: &Context) -> Result<(), CommandError> {
    ctx.require_login()?;
    log_report(ctx.cart.sync_with_backend().await);
    Ok(())
}

fn log_report(report: SyncReport) {
    match report {
        SyncReport::Skipped => tracing::debug!("Cart sync skipped"),
        SyncReport::Completed { synced } => tracing::info!(synced, "Cart pushed to backend"),
        // Already logged by the sync itself
        SyncReport::Aborted { .. } => {}
    }
}
