use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use shopfront_core::{ApplicationError, Cart, DomainError, ProductId, UpsellOffer};

use crate::commands::{load_config, load_snapshot, CommandResult, EXIT_BAD_INPUT};

#[derive(Debug, Clone, Default)]
pub struct RecommendArgs {
    pub product: Option<String>,
    pub category: Option<String>,
    pub exclude: Vec<String>,
    pub cart: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RecommendOutput {
    mode: &'static str,
    anchor: Option<String>,
    offers: Vec<UpsellOffer>,
}

pub fn run(args: RecommendArgs) -> CommandResult {
    let config = match load_config("recommend") {
        Ok(config) => config,
        Err(result) => return result,
    };

    // Read the cart before touching the catalog so a bad file fails fast.
    let cart = match args.cart.as_deref().map(Cart::load).transpose() {
        Ok(cart) => cart,
        Err(error) => {
            return CommandResult::from_application_error(
                "recommend",
                "bad_input",
                ApplicationError::Persistence(error.to_string()),
                EXIT_BAD_INPUT,
            );
        }
    };

    let snapshot = match load_snapshot("recommend", &config) {
        Ok(snapshot) => snapshot,
        Err(result) => return result,
    };
    let engine = config.recommend.engine();

    let output = if let Some(raw_id) = args.product {
        let product_id = ProductId::new(&raw_id);
        let Some(product) = snapshot.find(&product_id) else {
            return CommandResult::from_application_error(
                "recommend",
                "bad_input",
                ApplicationError::from(DomainError::UnknownProduct(product_id)),
                EXIT_BAD_INPUT,
            );
        };
        RecommendOutput {
            mode: "product",
            anchor: Some(product.category.clone()),
            offers: engine.for_viewed_product(product, snapshot.products()),
        }
    } else if let Some(cart) = cart {
        RecommendOutput {
            mode: "cart",
            anchor: None,
            offers: engine.for_cart(cart.items(), snapshot.products()),
        }
    } else {
        let exclude: HashSet<ProductId> = args.exclude.iter().map(ProductId::new).collect();
        RecommendOutput {
            mode: "category",
            offers: engine.for_product(args.category.as_deref(), &exclude, snapshot.products()),
            anchor: args.category,
        }
    };

    let message = format!("{} offer(s) for {} recommendation", output.offers.len(), output.mode);
    CommandResult::success_with_data("recommend", message, &output)
}
