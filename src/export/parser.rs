use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// `Call-<TYPE> to <remote> - <display name>`. The remote portion is
/// matched lazily, so a display name keeps any ` - ` of its own.
static CALL_GRAMMAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Call-(\S+) to .*? - (.*)$").expect("backend call grammar"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBackend {
    pub backend_type: String,
    pub name: String,
}

/// Total over any input. A name that does not follow the call grammar is
/// kept verbatim as the backend name with an empty type.
pub fn parse(raw: &str) -> ParsedBackend {
    match CALL_GRAMMAR.captures(raw) {
        Some(caps) => ParsedBackend {
            backend_type: caps[1].to_string(),
            name: caps[2].to_string(),
        },
        None => {
            warn!("Backend name {raw:?} does not follow the call grammar; keeping raw text");
            ParsedBackend {
                backend_type: String::new(),
                name: raw.to_string(),
            }
        }
    }
}
