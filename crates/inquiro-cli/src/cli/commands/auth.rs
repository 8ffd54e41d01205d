//! Token management commands.

use anyhow::{Context, Result, bail};
use inquiro_core::credentials::{
    CredentialStore, StaticToken, StoredCredentials, TOKEN_ENV, TokenFile, mask_token,
};

pub fn set_token(token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        bail!("Token is empty");
    }

    let store = TokenFile::default_location();
    store
        .save(&StoredCredentials {
            token: token.to_string(),
            user: None,
        })
        .context("save credentials")?;
    println!(
        "Saved token {} to {}",
        mask_token(token),
        store.path().display()
    );
    Ok(())
}

pub fn status() -> Result<()> {
    if let Some(env_token) = StaticToken::from_env().and_then(|store| store.token()) {
        println!("Using {TOKEN_ENV}: {}", mask_token(&env_token));
        return Ok(());
    }

    let store = TokenFile::default_location();
    match store.load().context("load credentials")? {
        Some(stored) if !stored.token.trim().is_empty() => {
            println!(
                "Signed in with token {} ({})",
                mask_token(stored.token.trim()),
                store.path().display()
            );
        }
        _ => println!("Not signed in. Run `inquiro auth set-token <TOKEN>`."),
    }
    Ok(())
}

pub fn logout() -> Result<()> {
    let store = TokenFile::default_location();
    let had_token = store.token().is_some();
    store.clear().context("clear credentials")?;
    if had_token {
        println!("Removed stored token");
    } else {
        println!("No stored token");
    }
    Ok(())
}
