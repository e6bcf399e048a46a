use super::parser::{Sequence, parse};
use crate::application::ports::link_encoder::{LinkEncoder, LinkRequest};
use crate::domain::entities::LinkError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub const ALG_CUBING_NET_URL: &str = "https://alg.cubing.net/";

/// Same escaped set as JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Builds alg.cubing.net playback links.
#[derive(Debug, Clone)]
pub struct AlgCubingNetEncoder {
    base_url: String,
}

impl AlgCubingNetEncoder {
    pub fn new() -> Self {
        Self::with_base_url(ALG_CUBING_NET_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for AlgCubingNetEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkEncoder for AlgCubingNetEncoder {
    fn encode(&self, request: &LinkRequest<'_>) -> Result<String, LinkError> {
        let setup = parse(request.setup)?;
        let alg = parse(request.alg)?;

        let mut params: Vec<(&str, String)> = Vec::new();
        if !alg.is_empty() {
            params.push(("alg", escape_sequence(&alg)));
        }
        if !setup.is_empty() {
            params.push(("setup", escape_sequence(&setup)));
        }
        if let Some(title) = request.title {
            params.push(("title", title.to_string()));
        }

        let mut url = self.base_url.clone();
        for (index, (key, value)) in params.iter().enumerate() {
            url.push(if index == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&percent_encode(value));
        }
        Ok(url)
    }
}

/// alg.cubing.net's compact notation: spaces become `_` and primes become `-`.
fn escape_sequence(sequence: &Sequence) -> String {
    sequence
        .to_string()
        .replace('_', "&#95;")
        .replace(' ', "_")
        .replace('+', "&#2b;")
        .replace('#', "&#23;")
        .replace('\'', "-")
}

fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}
