//! Session and diagnostics commands.
//!
//! # Usage
//!
//! ```bash
//! MYSHOP_PASSWORD=secret myshop login --email shopper@example.com
//! myshop logout
//! myshop health
//! ```

use secrecy::SecretString;

use super::{CommandError, PageHost, print_line};
use crate::GlobalArgs;

/// Sign in and store the session credential.
///
/// # Errors
///
/// Returns an error for an invalid email or when the credential cannot be
/// stored. A refused sign-in is printed as a notice.
pub async fn login(
    global: &GlobalArgs,
    email: &str,
    password: &SecretString,
) -> Result<(), CommandError> {
    let mut host = PageHost::from_args(global).await?;
    let result = host.shop().sign_in(email, password).await;
    host.finish(result)
}

/// Forget the stored session credential.
///
/// # Errors
///
/// Returns an error if storage cannot be written.
pub async fn logout(global: &GlobalArgs) -> Result<(), CommandError> {
    let mut host = PageHost::from_args(global).await?;
    let result = host.shop().sign_out().await;
    host.finish(result)
}

/// Probe the backend and print the diagnostics line.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or the page cannot be
/// written.
pub async fn health(global: &GlobalArgs) -> Result<(), CommandError> {
    let mut host = PageHost::from_args(global).await?;
    let shop = host.shop();
    shop.health().await;
    if let Some(status) = shop.diagnostics() {
        print_line(status);
    }
    host.finish(Ok(()))
}
