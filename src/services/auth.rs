use reqwest::{Client, Proxy, RequestBuilder};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::ControllerConfig;
use crate::error::{ExportError, ExportResult};

const CSRF_COOKIE: &str = "X-CSRF-TOKEN";
const CSRF_HEADER: &str = "X-CSRF-TOKEN";

/// Credential material resolved once at startup. The API secret wins when
/// both forms are configured.
#[derive(Debug, Clone)]
pub enum Credential {
    OAuthSecret { secret: String },
    BasicPassword { password: String },
}

impl Credential {
    pub fn from_config(config: &ControllerConfig) -> ExportResult<Self> {
        if let Some(secret) = &config.secret {
            return Ok(Self::OAuthSecret {
                secret: secret.clone(),
            });
        }
        if let Some(password) = &config.password {
            return Ok(Self::BasicPassword {
                password: password.clone(),
            });
        }
        Err(ExportError::Config(
            "neither an API secret nor an API password is configured".into(),
        ))
    }
}

/// Opaque authentication context for one run. The session cookie itself
/// lives in the shared client's cookie store; this carries the rest of
/// the signing material.
#[derive(Debug)]
pub struct AuthSession {
    scheme: AuthScheme,
}

#[derive(Debug)]
enum AuthScheme {
    Bearer {
        token: String,
    },
    Session {
        api_user: String,
        password: String,
        csrf_token: Option<String>,
    },
}

impl AuthSession {
    /// Sign a request with the credential form chosen at startup.
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.scheme {
            AuthScheme::Bearer { token } => req.bearer_auth(token),
            AuthScheme::Session {
                api_user,
                password,
                csrf_token,
            } => {
                let req = req.basic_auth(api_user, Some(password));
                match csrf_token {
                    Some(token) => req.header(CSRF_HEADER, token),
                    None => req,
                }
            }
        }
    }
}

/// One shared client for the whole run: cookie store for the session
/// credential form, configured timeout, optional proxy.
pub fn build_client(config: &ControllerConfig) -> ExportResult<Client> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .cookie_store(true);

    if let Some(proxy) = &config.proxy {
        let proxy = Proxy::all(proxy)
            .map_err(|e| ExportError::Config(format!("invalid proxy URL '{proxy}': {e}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ExportError::Config(format!("failed to build HTTP client: {e}")))
}

/// One-shot handshake against the controller. OAuth client credentials
/// when a secret is configured, otherwise a session login that leaves the
/// cookie in the client's store and captures the anti-forgery token.
pub async fn authenticate(client: &Client, config: &ControllerConfig) -> ExportResult<AuthSession> {
    let credential = Credential::from_config(config)?;
    let base = config.base_url.trim_end_matches('/');
    let api_user = format!("{}@{}", config.username, config.account);

    match credential {
        Credential::OAuthSecret { secret } => {
            let url = format!("{base}/controller/api/oauth/access_token");
            let params = [
                ("grant_type", "client_credentials"),
                ("client_id", api_user.as_str()),
                ("client_secret", secret.as_str()),
            ];

            let res = client
                .post(&url)
                .form(&params)
                .send()
                .await
                .map_err(|e| ExportError::Auth(format!("token request failed: {e}")))?;

            let status = res.status();
            if !status.is_success() {
                return Err(ExportError::Auth(format!(
                    "token endpoint returned {status}"
                )));
            }

            let body: serde_json::Value = res
                .json()
                .await
                .map_err(|e| ExportError::Auth(format!("malformed token response: {e}")))?;

            let token = body
                .get("access_token")
                .and_then(|v| v.as_str())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ExportError::Auth("token response carries no access_token".into()))?;

            info!("Authenticated as {} via OAuth client credentials", api_user);
            Ok(AuthSession {
                scheme: AuthScheme::Bearer { token },
            })
        }
        Credential::BasicPassword { password } => {
            let url = format!("{base}/controller/auth?action=login");

            let res = client
                .get(&url)
                .basic_auth(&api_user, Some(&password))
                .send()
                .await
                .map_err(|e| ExportError::Auth(format!("login request failed: {e}")))?;

            let status = res.status();
            if !status.is_success() {
                return Err(ExportError::Auth(format!("login returned {status}")));
            }

            let csrf_token = res
                .cookies()
                .find(|c| c.name() == CSRF_COOKIE)
                .map(|c| c.value().to_string());
            if csrf_token.is_none() {
                // Some deployments do not issue one; requests then go out
                // without the header.
                warn!("Login response set no {CSRF_COOKIE} cookie");
            }

            info!("Authenticated as {} via session login", api_user);
            Ok(AuthSession {
                scheme: AuthScheme::Session {
                    api_user,
                    password,
                    csrf_token,
                },
            })
        }
    }
}
