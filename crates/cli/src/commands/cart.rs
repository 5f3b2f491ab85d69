use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::{ApplicationError, Cart, CartItem, DomainError, ProductId};

use crate::commands::{load_config, load_snapshot, CommandResult, EXIT_BAD_INPUT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Add { id: String, quantity: u32 },
    Set { id: String, quantity: u32 },
    Remove { id: String },
    Show,
}

#[derive(Debug, Serialize)]
struct CartSummary<'a> {
    lines: usize,
    item_count: u32,
    subtotal: Decimal,
    items: &'a [CartItem],
}

impl<'a> CartSummary<'a> {
    fn of(cart: &'a Cart) -> Self {
        Self {
            lines: cart.items().len(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
            items: cart.items(),
        }
    }
}

pub fn run(path: &Path, action: CartAction) -> CommandResult {
    let mut cart = match Cart::load(path) {
        Ok(cart) => cart,
        Err(error) => return persistence_failure(error.to_string()),
    };

    let message = match action {
        CartAction::Show => {
            let summary = CartSummary::of(&cart);
            let message = format!("{} item(s) in cart", summary.item_count);
            return CommandResult::success_with_data("cart", message, &summary);
        }
        CartAction::Add { id, quantity } => {
            let config = match load_config("cart") {
                Ok(config) => config,
                Err(result) => return result,
            };
            let snapshot = match load_snapshot("cart", &config) {
                Ok(snapshot) => snapshot,
                Err(result) => return result,
            };
            let product_id = ProductId::new(&id);
            let Some(product) = snapshot.find(&product_id) else {
                return domain_failure(DomainError::UnknownProduct(product_id));
            };
            cart.add(product, quantity);
            format!("added {quantity} x `{}`", product.name)
        }
        CartAction::Set { id, quantity } => {
            let product_id = ProductId::new(&id);
            if !cart.set_quantity(&product_id, quantity) {
                return domain_failure(DomainError::NotInCart(product_id));
            }
            format!("set `{product_id}` quantity to {quantity}")
        }
        CartAction::Remove { id } => {
            let product_id = ProductId::new(&id);
            if !cart.remove(&product_id) {
                return domain_failure(DomainError::NotInCart(product_id));
            }
            format!("removed `{product_id}`")
        }
    };

    if let Err(error) = cart.save(path) {
        return persistence_failure(error.to_string());
    }

    CommandResult::success_with_data("cart", message, &CartSummary::of(&cart))
}

fn domain_failure(error: DomainError) -> CommandResult {
    CommandResult::from_application_error(
        "cart",
        "bad_input",
        ApplicationError::from(error),
        EXIT_BAD_INPUT,
    )
}

fn persistence_failure(message: String) -> CommandResult {
    CommandResult::from_application_error(
        "cart",
        "cart_persistence",
        ApplicationError::Persistence(message),
        EXIT_BAD_INPUT,
    )
}
