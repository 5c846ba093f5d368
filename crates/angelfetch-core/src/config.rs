//! Environment-driven configuration.
//!
//! | Variable | Default | Used for |
//! |----------|---------|----------|
//! | `SMARTAPI_BASE_URL` | `https://apiconnect.angelone.in` | API host |
//! | `SMARTAPI_API_KEY` | required | `X-PrivateKey` header |
//! | `SMARTAPI_TIMEOUT_MS` | `7000` | per-request transport timeout |
//! | `SMARTAPI_ERROR_CATALOG` | embedded table | error description file |
//! | `SMARTAPI_CLIENT_LOCAL_IP` | `127.0.0.1` | `X-ClientLocalIP` header |
//! | `SMARTAPI_CLIENT_PUBLIC_IP` | `127.0.0.1` | `X-ClientPublicIP` header |
//! | `SMARTAPI_MAC_ADDRESS` | `00:00:00:00:00:00` | `X-MACAddress` header |
//! | `ANGELONE_USERNAME` | required | login client code |
//! | `ANGELONE_PASSWORD` | required | login MPIN |
//! | `SMARTAPI_TOTP_SECRET` | one of these two | base32 TOTP seed, code derived at login |
//! | `SMARTAPI_TOTP` | one of these two | current one-time password |
//!
//! Secrets are never printed: the `Debug` impls redact them.

use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

use time::OffsetDateTime;
use totp_rs::{Algorithm, Secret, TOTP};

use crate::ValidationError;

pub const DEFAULT_BASE_URL: &str = "https://apiconnect.angelone.in";
pub const DEFAULT_TIMEOUT_MS: u64 = 7_000;

const REDACTED: &str = "<redacted>";

/// Connection settings for the SmartAPI adapter.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub error_catalog: Option<PathBuf>,
    pub client_local_ip: String,
    pub client_public_ip: String,
    pub mac_address: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_key: api_key.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            error_catalog: None,
            client_local_ip: String::from("127.0.0.1"),
            client_public_ip: String::from("127.0.0.1"),
            mac_address: String::from("00:00:00:00:00:00"),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get("SMARTAPI_API_KEY").ok_or(ValidationError::MissingSetting {
            name: "SMARTAPI_API_KEY",
        })?;
        let mut config = Self::new(api_key);

        if let Some(base_url) = get("SMARTAPI_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(raw) = get("SMARTAPI_TIMEOUT_MS") {
            config.timeout_ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|timeout| *timeout > 0)
                .ok_or(ValidationError::InvalidSetting {
                    name: "SMARTAPI_TIMEOUT_MS",
                    value: raw.clone(),
                })?;
        }
        config.error_catalog = get("SMARTAPI_ERROR_CATALOG").map(PathBuf::from);
        if let Some(ip) = get("SMARTAPI_CLIENT_LOCAL_IP") {
            config.client_local_ip = ip;
        }
        if let Some(ip) = get("SMARTAPI_CLIENT_PUBLIC_IP") {
            config.client_public_ip = ip;
        }
        if let Some(mac) = get("SMARTAPI_MAC_ADDRESS") {
            config.mac_address = mac;
        }

        Ok(config)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &REDACTED)
            .field("timeout_ms", &self.timeout_ms)
            .field("error_catalog", &self.error_catalog)
            .field("client_local_ip", &self.client_local_ip)
            .field("client_public_ip", &self.client_public_ip)
            .field("mac_address", &self.mac_address)
            .finish()
    }
}

/// Decoded TOTP seed. Codes are six digits over 30-second steps (SHA-1).
#[derive(Clone, PartialEq, Eq)]
pub struct TotpSecret {
    bytes: Vec<u8>,
}

impl TotpSecret {
    const DIGITS: usize = 6;
    const STEP_SECONDS: u64 = 30;

    /// Decode a base32 seed as shown by the broker's "Enable TOTP" page.
    /// Spaces, padding and letter case are ignored.
    pub fn from_base32(encoded: &str) -> Result<Self, ValidationError> {
        let normalized: String = encoded
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '=')
            .map(|ch| ch.to_ascii_uppercase())
            .collect();
        let invalid = || ValidationError::InvalidSetting {
            name: "SMARTAPI_TOTP_SECRET",
            value: String::from(REDACTED),
        };

        let bytes = Secret::Encoded(normalized)
            .to_bytes()
            .map_err(|_| invalid())?;
        if bytes.is_empty() {
            return Err(invalid());
        }

        Ok(Self { bytes })
    }

    /// Code for the step containing `unix_seconds`.
    pub fn code_at(&self, unix_seconds: u64) -> String {
        TOTP::new_unchecked(
            Algorithm::SHA1,
            Self::DIGITS,
            1,
            Self::STEP_SECONDS,
            self.bytes.clone(),
        )
        .generate(unix_seconds)
    }
}

impl Debug for TotpSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Where the login one-time password comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum OneTimePassword {
    /// A code the caller already read off an authenticator.
    Code(String),
    /// A seed; the code is derived when the login request is built.
    Secret(TotpSecret),
}

impl OneTimePassword {
    pub fn current(&self) -> String {
        let now = u64::try_from(OffsetDateTime::now_utc().unix_timestamp()).unwrap_or_default();
        self.at(now)
    }

    pub fn at(&self, unix_seconds: u64) -> String {
        match self {
            Self::Code(code) => code.clone(),
            Self::Secret(secret) => secret.code_at(unix_seconds),
        }
    }
}

/// Login credentials for a trading account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_code: String,
    pub pin: String,
    pub totp: OneTimePassword,
}

impl Credentials {
    pub fn new(
        client_code: impl Into<String>,
        pin: impl Into<String>,
        totp: impl Into<String>,
    ) -> Self {
        Self {
            client_code: client_code.into(),
            pin: pin.into(),
            totp: OneTimePassword::Code(totp.into()),
        }
    }

    pub fn with_totp_secret(
        client_code: impl Into<String>,
        pin: impl Into<String>,
        secret: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            client_code: client_code.into(),
            pin: pin.into(),
            totp: OneTimePassword::Secret(TotpSecret::from_base32(secret)?),
        })
    }

    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `SMARTAPI_TOTP_SECRET` wins over `SMARTAPI_TOTP` when both are set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| get(name).ok_or(ValidationError::MissingSetting { name });

        let client_code = required("ANGELONE_USERNAME")?;
        let pin = required("ANGELONE_PASSWORD")?;

        if let Some(secret) = get("SMARTAPI_TOTP_SECRET") {
            return Self::with_totp_secret(client_code, pin, &secret);
        }
        let code = get("SMARTAPI_TOTP").ok_or(ValidationError::MissingSetting {
            name: "SMARTAPI_TOTP_SECRET",
        })?;

        Ok(Self::new(client_code, pin, code))
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_code", &self.client_code)
            .field("pin", &REDACTED)
            .field("totp", &REDACTED)
            .finish()
    }
}
