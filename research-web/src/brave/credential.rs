//! Where the Brave subscription token comes from.

/// Environment variable read for the subscription token by default.
pub const API_KEY_ENV: &str = "BRAVE_API_KEY";

/// Source of the `X-Subscription-Token` value.
///
/// `Env` is resolved on every call, so rotating the variable takes effect
/// without rebuilding the client. An unset variable resolves to `""`.
///
/// ```
/// use research_web::Credential;
///
/// let fixed = Credential::Static("abc".into());
/// assert_eq!(fixed.resolve(), "abc");
///
/// let missing = Credential::Env("RESEARCH_DOCTEST_NEVER_SET".into());
/// assert_eq!(missing.resolve(), "");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Env(String),
    Static(String),
}

impl Default for Credential {
    fn default() -> Self {
        Credential::Env(API_KEY_ENV.to_string())
    }
}

impl Credential {
    pub fn resolve(&self) -> String {
        match self {
            Credential::Env(var) => std::env::var(var).unwrap_or_default(),
            Credential::Static(key) => key.clone(),
        }
    }
}

// never print the key itself
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Env(var) => f.debug_tuple("Env").field(var).finish(),
            Credential::Static(_) => f.debug_tuple("Static").field(&"<redacted>").finish(),
        }
    }
}
