//! Scripted walk through every storefront flow.

use freshco_core::{Email, EmailError, PaymentMethod, ProductId};
use freshco_storefront::config::StorefrontConfig;
use freshco_storefront::error::AppError;
use freshco_storefront::models::{CartSnapshot, ShippingDetails};
use freshco_storefront::services::{
    AuthError, AuthErrorKind, ProductQuery, RecordingNotifier, SortBy,
};
use freshco_storefront::state::Storefront;

use super::{CommandError, open_storefront};

const NAME: &str = "Jane Doe";
const EMAIL: &str = "jane@example.com";
const MOBILE: &str = "9123456780";
const PASSWORD: &str = "secret1";
const NEW_PASSWORD: &str = "fresher2";

/// Run the demo. Codes are captured in memory instead of being sent.
#[allow(clippy::print_stdout)]
pub async fn run(config: StorefrontConfig, payment: PaymentMethod) -> Result<(), CommandError> {
    let storefront = open_storefront(config, RecordingNotifier::new()).await?;
    let email = Email::parse(EMAIL).map_err(auth_error)?;

    println!("== Registration");
    register_and_verify(&storefront, &email).await?;

    println!("\n== Shopping");
    let mut cart_updates = storefront.cart().await.subscribe();
    let spices = storefront
        .catalog()
        .browse(&ProductQuery {
            category: Some("spices".to_string()),
            sort: SortBy::PriceLowToHigh,
            ..ProductQuery::default()
        })
        .await
        .map_err(AppError::from)?;
    let rice = storefront
        .catalog()
        .product(&ProductId::new("1"))
        .await
        .map_err(AppError::from)?;

    {
        let mut cart = storefront.cart().await;
        cart.add_item(&rice, 1).map_err(AppError::from)?;
        for product in spices.iter().take(2) {
            cart.add_item(product, 2).map_err(AppError::from)?;
        }
        cart.update_quantity(&rice.id, 2);
    }
    if cart_updates.has_changed().unwrap_or(false) {
        print_cart(&cart_updates.borrow_and_update());
    }

    println!("\n== Checkout");
    let order = storefront
        .place_order(
            ShippingDetails {
                full_name: NAME.to_string(),
                email: EMAIL.to_string(),
                phone: "9876543210".to_string(),
                address: "12 MG Road".to_string(),
                city: "Bengaluru".to_string(),
                pincode: "560001".to_string(),
            },
            payment,
        )
        .await?;
    println!(
        "Order {} confirmed: {} item(s), total {} ({})",
        order.id,
        order.lines.iter().map(|l| l.quantity).sum::<u32>(),
        order.total,
        order.payment_method
    );
    println!("Cart is now empty: {}", storefront.cart().await.is_empty());

    println!("\n== Password reset");
    storefront.session().logout().await;
    let session = storefront.session();
    session.forgot_password(EMAIL).await.map_err(AppError::from)?;
    let code = last_code(&storefront, &email)?;
    session
        .reset_password(EMAIL, &code, NEW_PASSWORD)
        .await
        .map_err(AppError::from)?;
    match session.login(EMAIL, PASSWORD).await {
        Err(e) if e.kind() == AuthErrorKind::InvalidCredentials => {
            println!("Old password rejected.");
        }
        other => {
            other.map_err(AppError::from)?;
        }
    }
    let identity = session
        .login(EMAIL, NEW_PASSWORD)
        .await
        .map_err(AppError::from)?;
    println!("Signed in again as {} with the new password.", identity.name);

    let history = storefront
        .checkout()
        .orders_for(&identity.id)
        .await
        .map_err(AppError::from)?;
    println!("{} order(s) on record.", history.len());

    Ok(())
}

#[allow(clippy::print_stdout)]
async fn register_and_verify(
    storefront: &Storefront<RecordingNotifier>,
    email: &Email,
) -> Result<(), CommandError> {
    let session = storefront.session();
    let mut updates = session.subscribe();

    let issued = session
        .register(NAME, EMAIL, Some(MOBILE), PASSWORD)
        .await
        .map_err(AppError::from)?;
    println!("Registered {}, code expires at {}", issued.email, issued.expires_at);
    let first = last_code(storefront, email)?;

    session.resend_otp(EMAIL).await.map_err(AppError::from)?;
    let second = last_code(storefront, email)?;

    match session.verify_otp(EMAIL, &first).await {
        Err(e) => println!("Old code rejected: {}", AppError::from(e).user_message()),
        Ok(_) => println!("Old code unexpectedly accepted"),
    }

    session
        .verify_otp(EMAIL, &second)
        .await
        .map_err(AppError::from)?;
    if updates.has_changed().unwrap_or(false)
        && let Some(identity) = updates.borrow_and_update().as_ref()
    {
        println!("Signed in as {} <{}>", identity.name, identity.email);
    }
    Ok(())
}

fn last_code(
    storefront: &Storefront<RecordingNotifier>,
    email: &Email,
) -> Result<String, CommandError> {
    storefront
        .session()
        .auth()
        .notifier()
        .last_code_for(email)
        .ok_or(CommandError::MissingInput("delivered code"))
}

#[allow(clippy::print_stdout)]
fn print_cart(snapshot: &CartSnapshot) {
    for line in &snapshot.lines {
        println!(
            "  {:<32} x{:<3} {}",
            line.name,
            line.quantity,
            line.total()
        );
    }
    println!("  {} item(s)", snapshot.count);
    println!("  Subtotal: {}", snapshot.subtotal);
    println!("  Delivery: {}", snapshot.delivery_charge);
    println!("  Total:    {}", snapshot.grand_total);
}

fn auth_error(e: EmailError) -> AppError {
    AppError::from(AuthError::from(e))
}
