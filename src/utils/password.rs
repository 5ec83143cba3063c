use anyhow::Result;
use rpassword::prompt_password;
use tracing::warn;

use super::SecureString;

/// Prompt for a passphrase on the terminal
pub fn prompt_for_passphrase(prompt_message: &str) -> Result<SecureString> {
    let passphrase = SecureString::new(prompt_password(prompt_message)?);

    if passphrase.is_empty() {
        return Err(anyhow::anyhow!("Passphrase cannot be empty"));
    }
    if passphrase.len() < 8 {
        warn!("⚠️  Short passphrase detected. Consider using a longer, more secure passphrase.");
    }

    Ok(passphrase)
}

/// Prompt twice and require both entries to match (keystore creation)
pub fn prompt_for_new_passphrase(prompt_message: &str) -> Result<SecureString> {
    let passphrase = prompt_for_passphrase(prompt_message)?;
    let confirmation = SecureString::new(prompt_password("Confirm passphrase: ")?);

    if !passphrase.secure_eq(&confirmation) {
        return Err(anyhow::anyhow!("Passphrases do not match"));
    }
    Ok(passphrase)
}

/// Use the passphrase from CLI/env when given, otherwise prompt
pub fn passphrase_or_prompt(
    cli_passphrase: Option<String>,
    prompt_message: &str,
    confirm: bool,
) -> Result<SecureString> {
    match cli_passphrase {
        Some(passphrase) => {
            warn!("⚠️  SECURITY WARNING: Passphrase provided via CLI argument or environment variable");
            warn!("⚠️  It may be visible in process lists or shell history");

            let passphrase = SecureString::new(passphrase);
            if passphrase.is_empty() {
                return Err(anyhow::anyhow!("Provided passphrase cannot be empty"));
            }
            Ok(passphrase)
        }
        None if confirm => prompt_for_new_passphrase(prompt_message),
        None => prompt_for_passphrase(prompt_message),
    }
}
