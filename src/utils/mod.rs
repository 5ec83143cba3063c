pub mod password;
pub mod secure_string;

pub use password::{passphrase_or_prompt, prompt_for_new_passphrase, prompt_for_passphrase};
pub use secure_string::SecureString;
