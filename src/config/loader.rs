use std::fs;

use super::types::*;
use crate::cli::SignerArgs;
use crate::errors::SignerError;
use crate::signer::PrivyConfig;

impl Config {
    /// Config file (if any) overlaid with explicit CLI/env values
    pub fn load(args: &SignerArgs) -> Result<Self, SignerError> {
        let config = match &args.config {
            Some(config_path) => Self::load_from_file(config_path)?,
            None => Self::default(),
        };

        config.merge_cli(args)
    }

    pub fn load_from_file(config_path: &str) -> Result<Self, SignerError> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            SignerError::Config(format!("Failed to read config file {config_path}: {e}"))
        })?;

        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SignerError> {
        toml::from_str(content)
            .map_err(|e| SignerError::Config(format!("Failed to parse config file: {e}")))
    }

    /// Explicit CLI values win over the file
    pub fn merge_cli(mut self, args: &SignerArgs) -> Result<Self, SignerError> {
        if let Some(backend) = &args.signer_backend {
            self.signer.backend = backend.clone();
        }
        if let Some(label) = &args.label {
            self.signer.label = Some(label.clone());
        }

        if let Some(backend) = &args.keystore_backend {
            self.keystore.backend = backend.clone();
        }
        if let Some(path) = &args.keystore_path {
            self.keystore.path = Some(path.clone());
        }
        if let Some(env_var) = &args.env_var {
            self.keystore.env_var = Some(env_var.clone());
        }
        if let Some(passphrase) = &args.passphrase {
            self.keystore.passphrase = Some(passphrase.as_str().into());
        }

        self.privy = self.merge_privy(args)?;

        if let Some(chain_id) = &args.chain_id {
            self.network.chain_id = chain_id.clone();
        }
        if let Some(log_path) = &args.audit_log {
            self.audit.enabled = true;
            self.audit.log_path = log_path.clone();
        }
        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
        }

        Ok(self)
    }

    fn merge_privy(&self, args: &SignerArgs) -> Result<Option<PrivyConfig>, SignerError> {
        let mut privy = match (&self.privy, &args.privy_api_key, &args.privy_wallet_id) {
            (Some(privy), _, _) => privy.clone(),
            (None, Some(api_key), Some(wallet_id)) => {
                PrivyConfig::new(api_key.as_str(), wallet_id.as_str())
            }
            (None, None, None)
                if args.privy_api_url.is_none()
                    && args.privy_session_token.is_none()
                    && args.privy_timeout_secs.is_none() =>
            {
                return Ok(None)
            }
            (None, _, _) => {
                return Err(SignerError::Config(
                    "Privy requires both an API key and a wallet id".to_string(),
                ))
            }
        };

        if let Some(api_key) = &args.privy_api_key {
            privy.api_key = api_key.as_str().into();
        }
        if let Some(wallet_id) = &args.privy_wallet_id {
            privy.wallet_id = wallet_id.clone();
        }
        if let Some(api_url) = &args.privy_api_url {
            privy.api_url = api_url.clone();
        }
        if let Some(session_token) = &args.privy_session_token {
            privy.session_token = Some(session_token.as_str().into());
        }
        if let Some(timeout_secs) = args.privy_timeout_secs {
            privy.timeout_secs = timeout_secs;
        }

        Ok(Some(privy))
    }
}
