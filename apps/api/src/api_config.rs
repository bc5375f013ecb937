use std::env;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use eventcert_core::AppError;
use tracing_subscriber::EnvFilter;

/// How certificate procedures answer when the underlying operation fails.
///
/// `Typed` is the default and changes the wire contract older clients saw:
/// a missing record or storage failure is answered with 404 or 500 instead of
/// `200 null`. Deployments serving those clients set
/// `CERTIFICATE_FAILURE_MODE=absent`. Input rejections are 400 in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CertificateFailureMode {
    /// Errors map to distinct HTTP statuses with a message payload.
    #[default]
    Typed,
    /// Errors are logged and answered with a `null` body, as older clients expect.
    Absent,
}

impl CertificateFailureMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Typed => "typed",
            Self::Absent => "absent",
        }
    }
}

impl Display for CertificateFailureMode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for CertificateFailureMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "typed" => Ok(Self::Typed),
            "absent" => Ok(Self::Absent),
            other => Err(AppError::Validation(format!(
                "CERTIFICATE_FAILURE_MODE must be either 'typed' or 'absent', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub _session_secret: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub failure_mode: CertificateFailureMode,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let bootstrap_token = required_env("AUTH_BOOTSTRAP_TOKEN")?;
        let session_secret = required_env("SESSION_SECRET")?;
        if session_secret.len() < 32 {
            return Err(AppError::Validation(
                "SESSION_SECRET must be at least 32 characters".to_owned(),
            ));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let failure_mode = env::var("CERTIFICATE_FAILURE_MODE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.parse::<CertificateFailureMode>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            bootstrap_token,
            _session_secret: session_secret,
            api_host,
            api_port,
            cookie_secure,
            failure_mode,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
