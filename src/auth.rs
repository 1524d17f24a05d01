use std::fmt;

/// An opaque API token. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// How requests to the DCI control server are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic authentication with a user login.
    Basic { login: String, password: String },
    /// Bearer token, e.g. from an SSO session.
    Bearer(Token),
}

impl Credentials {
    /// Picks credentials from the configured values.
    ///
    /// A token wins over a login; a login without a password is ignored.
    pub fn resolve(
        login: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> Option<Self> {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            return Some(Self::Bearer(Token::from(token)));
        }

        match (login, password) {
            (Some(login), Some(password)) if !login.is_empty() => Some(Self::Basic {
                login: login.to_owned(),
                password: password.to_owned(),
            }),
            _ => None,
        }
    }

    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Basic { login, password } => request.basic_auth(login, Some(password)),
            Self::Bearer(token) => request.bearer_auth(token.as_str()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { login, .. } => f
                .debug_struct("Basic")
                .field("login", login)
                .field("password", &"***")
                .finish(),
            Self::Bearer(token) => f.debug_tuple("Bearer").field(token).finish(),
        }
    }
}
