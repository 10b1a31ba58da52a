use anyhow::{Context, Result};
use iptv_db::Store;

use crate::auth::hash_password;

/// Sets the password (and role) of an account, creating the account if needed.
pub async fn set_password(
    store: &Store,
    user_id: &str,
    password: &str,
    role: &str,
    bcrypt_cost: u32,
) -> Result<()> {
    let hash = hash_password(password, bcrypt_cost)
        .await
        .context("Failed to hash password")?;

    let created = store
        .users
        .upsert_credentials(user_id, role, &hash)
        .await
        .context("Failed to store credentials")?;

    if created {
        println!("New user '{}' created with role '{}'.", user_id, role);
    } else {
        println!("Password for user '{}' has been reset (role '{}').", user_id, role);
    }
    Ok(())
}

pub async fn create_reseller(store: &Store, reseller_id: &str, credit: f64) -> Result<()> {
    let reseller = store
        .resellers
        .create(reseller_id, credit)
        .await
        .with_context(|| format!("Failed to create reseller '{reseller_id}'"))?;
    println!(
        "Reseller '{}' created with credit {}.",
        reseller.reseller_id, reseller.credit
    );
    Ok(())
}
