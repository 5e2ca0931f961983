// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Google service-account auth: read the key file, sign an RS256 JWT, exchange it for an access token
// role: sheets/auth
// inputs: Credentials JSON path (client_email, private_key, token_uri)
// outputs: Bearer access token for the Sheets API
// side_effects: One POST to the token endpoint
// invariants: The signed assertion is valid for one hour and scoped to spreadsheets only
// errors: AuthError; any failure here is fatal for the run
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
  #[error("cannot read credentials file {path}: {source}")]
  Read { path: PathBuf, source: std::io::Error },
  #[error("credentials file {path} is not a service-account key: {source}")]
  Parse { path: PathBuf, source: serde_json::Error },
  #[error("service-account private key is unusable: {0}")]
  Key(String),
  #[error("token exchange failed: {0}")]
  Token(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
  pub client_email: String,
  pub private_key: String,
  #[serde(default = "default_token_uri")]
  pub token_uri: String,
}

fn default_token_uri() -> String {
  DEFAULT_TOKEN_URI.to_string()
}

pub fn read_service_account(path: &Path) -> Result<ServiceAccountKey, AuthError> {
  let raw = std::fs::read_to_string(path).map_err(|source| AuthError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  serde_json::from_str(&raw).map_err(|source| AuthError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

fn b64(bytes: &[u8]) -> String {
  URL_SAFE_NO_PAD.encode(bytes)
}

/// `header.claims` part of the assertion, base64url encoded.
pub fn signing_input(key: &ServiceAccountKey, issued_at: i64) -> String {
  let header = json!({ "alg": "RS256", "typ": "JWT" });
  let claims = json!({
    "iss": key.client_email,
    "scope": SHEETS_SCOPE,
    "aud": key.token_uri,
    "iat": issued_at,
    "exp": issued_at + ASSERTION_LIFETIME_SECS,
  });

  format!("{}.{}", b64(header.to_string().as_bytes()), b64(claims.to_string().as_bytes()))
}

pub fn build_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String, AuthError> {
  let private_key = RsaPrivateKey::from_pkcs8_pem(&key.private_key).map_err(|e| AuthError::Key(e.to_string()))?;
  let signer = SigningKey::<Sha256>::new(private_key);

  let input = signing_input(key, issued_at);
  let signature = signer.sign(input.as_bytes()).to_bytes();

  Ok(format!("{}.{}", input, b64(&signature)))
}

/// Exchange a signed assertion for an access token.
pub fn fetch_access_token(agent: &ureq::Agent, key: &ServiceAccountKey) -> Result<String, AuthError> {
  let assertion = build_assertion(key, chrono::Utc::now().timestamp())?;
  debug!(token_uri = %key.token_uri, client = %key.client_email, "requesting access token");

  let mut resp = agent
    .post(&key.token_uri)
    .send_form([("grant_type", JWT_GRANT_TYPE), ("assertion", assertion.as_str())])
    .map_err(|e| AuthError::Token(e.to_string()))?;

  let body: Value = resp
    .body_mut()
    .read_json()
    .map_err(|e| AuthError::Token(e.to_string()))?;

  body
    .get("access_token")
    .and_then(Value::as_str)
    .map(str::to_string)
    .ok_or_else(|| AuthError::Token("response carries no access_token".into()))
}
