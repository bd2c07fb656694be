//! Account and session commands.

use tokio::io::{AsyncBufReadExt, BufReader};

use freshco_storefront::config::StorefrontConfig;
use freshco_storefront::error::AppError;
use freshco_storefront::services::{AuthErrorKind, ConsoleNotifier};

use super::{CommandError, open_storefront};

/// Register, then read the delivered code from stdin and verify it.
///
/// An empty line asks for a new code.
#[allow(clippy::print_stdout)]
pub async fn signup(
    config: StorefrontConfig,
    name: &str,
    email: &str,
    mobile: Option<&str>,
    password: &str,
) -> Result<(), CommandError> {
    let storefront = open_storefront(config, ConsoleNotifier::new()).await?;
    let session = storefront.session();

    let issued = session
        .register(name, email, mobile, password)
        .await
        .map_err(AppError::from)?;
    println!(
        "Code sent to {}. It expires at {}.",
        issued.email,
        issued.expires_at.format("%H:%M:%S")
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("Enter the 6-digit code (blank line to resend):");
        let Some(line) = lines.next_line().await? else {
            return Err(CommandError::MissingInput("verification code"));
        };

        if line.trim().is_empty() {
            match session.resend_available_in(email).await.map_err(AppError::from)? {
                Some(wait) => println!("You can resend in {}s.", wait.as_secs().max(1)),
                None => {
                    session.resend_otp(email).await.map_err(AppError::from)?;
                    println!("A new code is on its way.");
                }
            }
            continue;
        }

        match session.verify_otp(email, &line).await {
            Ok(identity) => {
                println!("Welcome, {}! Your email is verified.", identity.name);
                return Ok(());
            }
            Err(e) if e.kind() == AuthErrorKind::InvalidCode => {
                println!("{}", AppError::from(e).user_message());
            }
            Err(e) => return Err(AppError::from(e).into()),
        }
    }
}

/// Sign in and persist the session.
#[allow(clippy::print_stdout)]
pub async fn login(
    config: StorefrontConfig,
    email: &str,
    password: &str,
) -> Result<(), CommandError> {
    let storefront = open_storefront(config, ConsoleNotifier::new()).await?;
    let identity = storefront
        .session()
        .login(email, password)
        .await
        .map_err(AppError::from)?;

    println!("Signed in as {} <{}>", identity.name, identity.email);
    if storefront.config().session_dir.is_none() {
        tracing::warn!("FRESHCO_SESSION_DIR is not set; the session ends with this command");
    }
    Ok(())
}

/// Clear the persisted session.
#[allow(clippy::print_stdout)]
pub async fn logout(config: StorefrontConfig) -> Result<(), CommandError> {
    let storefront = open_storefront(config, ConsoleNotifier::new()).await?;
    storefront.session().logout().await;
    println!("Signed out.");
    Ok(())
}

/// Print the persisted session, if any.
#[allow(clippy::print_stdout)]
pub async fn whoami(config: StorefrontConfig) -> Result<(), CommandError> {
    let storefront = open_storefront(config, ConsoleNotifier::new()).await?;
    match storefront.session().current() {
        Some(identity) => match &identity.mobile {
            Some(mobile) => println!("{} <{}> {}", identity.name, identity.email, mobile),
            None => println!("{} <{}>", identity.name, identity.email),
        },
        None => println!("Not signed in."),
    }
    Ok(())
}
