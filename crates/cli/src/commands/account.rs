//! `shopcart login`, `signup`, `logout` and `whoami`.

use secrecy::{ExposeSecret, SecretString};
use shopcart_client::models::SignupRequest;

use super::CommandError;
use crate::console;
use crate::context::Context;

/// Signup details as collected from the command line.
pub struct SignupForm {
    pub email: String,
    pub full_name: String,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[allow(clippy::print_stdout)]
pub async fn login(
    ctx: &Context,
    email: &str,
    password: Option<String>,
) -> Result<(), CommandError> {
    let password = resolve_password(password)?;
    let session = ctx.api.login(email, &password).await?.into_session();
    ctx.auth().login(&session)?;

    println!("Welcome back, {}", session.user.full_name);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn signup(ctx: &Context, form: SignupForm) -> Result<(), CommandError> {
    let password = resolve_password(form.password)?;
    let request = SignupRequest {
        email: form.email,
        password: password.expose_secret().to_string(),
        full_name: form.full_name,
        phone: form.phone,
        address: form.address,
    };

    let session = ctx.api.signup(&request).await?.into_session();
    ctx.auth().login(&session)?;

    tracing::info!(user_id = %session.user.id, "Account created");
    println!("Welcome, {}", session.user.full_name);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn logout(ctx: &Context) -> Result<(), CommandError> {
    ctx.auth().logout()?;
    println!("Logged out");
    Ok(())
}

/// Print the stored profile, asking the backend when none is stored.
#[allow(clippy::print_stdout)]
pub async fn whoami(ctx: &Context) -> Result<(), CommandError> {
    ctx.require_login()?;

    let user = match ctx.auth().user() {
        Some(stored) => stored,
        None => ctx.api.me().await?,
    };
    println!("{} (#{})", user.full_name, user.id);
    if let Some(email) = &user.email {
        println!("Email: {email}");
    }
    if let Some(address) = &user.address {
        println!("Address: {address}");
    }
    println!("Links: {}", console::nav_links(&ctx.auth().nav_links()));
    Ok(())
}

/// Use the password given on the command line, or read one line from stdin.
fn resolve_password(password: Option<String>) -> Result<SecretString, CommandError> {
    let password = match password {
        Some(password) => password,
        None => {
            let mut line = String::new();
            std::io::stdin()
                .read_line(&mut line)
                .map_err(CommandError::PasswordInput)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        return Err(CommandError::EmptyPassword);
    }
    Ok(SecretString::from(password))
}
