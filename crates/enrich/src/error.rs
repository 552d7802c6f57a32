/// Why a single company lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure
    Network(String),
    /// Non-success HTTP status with response body
    Http(u16, String),
    /// Response or model reply was not the expected JSON
    Parse(String),
    /// Response carried no assistant message
    MissingContent,
}

impl FetchError {
    /// Authentication failures will fail the same way for every company.
    pub fn is_auth(&self) -> bool {
        matches!(self, FetchError::Http(401, _) | FetchError::Http(403, _))
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Http(code, body) => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "HTTP {}", code)
                } else {
                    write!(f, "HTTP {}: {}", code, &body[..floor_char_boundary(body, 200)])
                }
            }
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
            FetchError::MissingContent => write!(f, "Response contained no assistant message"),
        }
    }
}

impl std::error::Error for FetchError {}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}
