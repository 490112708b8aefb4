//! Terminal output.

use shopcart_client::models::{CartLine, Order, Product};
use shopcart_client::{
    CartBadge, NavLink, Notification, NotificationKind, Presenter, TracingPresenter,
};
use shopcart_core::Price;

/// Presenter that writes notifications to the terminal. Badge updates and
/// navigation have no terminal form and are only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    #[allow(clippy::print_stdout, clippy::print_stderr)]
    fn notify(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Error => eprintln!("error: {}", notification.message),
            NotificationKind::Success | NotificationKind::Info => {
                println!("{}", notification.message);
            }
        }
    }

    fn cart_badge(&self, badge: CartBadge) {
        TracingPresenter.cart_badge(badge);
    }

    fn navigate(&self, target: &str) {
        TracingPresenter.navigate(target);
    }
}

/// One-line product summary: id, name, brand, price and any saving.
pub fn product_summary(product: &Product) -> String {
    let mut summary = format!("#{:<5} {}", product.id, product.name);
    if let Some(brand) = &product.brand {
        summary.push_str(&format!(" ({brand})"));
    }
    summary.push_str(&format!("  {}", product.display_price()));

    let saving = product.discount_percent();
    if saving > 0 {
        summary.push_str(&format!(
            "  was {}  -{saving}%",
            Price::from_amount(product.price)
        ));
    }
    summary
}

pub fn cart_line(line: &CartLine) -> String {
    format!(
        "#{:<5} {} x{}  {}",
        line.product_id(),
        line.product.name,
        line.quantity,
        Price::from_amount(line.line_total())
    )
}

pub fn order_summary(order: &Order) -> String {
    format!(
        "Order #{}  {}  {}  {}",
        order.id,
        Price::from_amount(order.total_amount),
        order.status.as_deref().unwrap_or("pending"),
        order.created_at.as_deref().unwrap_or("")
    )
}

/// Navigation links as `Label (page)`, separated by ` | `.
pub fn nav_links(links: &[NavLink]) -> String {
    links
        .iter()
        .map(|link| match link.href() {
            Some(href) => format!("{} ({href})", link.label()),
            None => link.label(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
