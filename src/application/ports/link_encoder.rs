use crate::domain::entities::LinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRequest<'a> {
    pub setup: &'a str,
    pub alg: &'a str,
    pub title: Option<&'a str>,
}

impl<'a> LinkRequest<'a> {
    pub fn setup_only(setup: &'a str) -> Self {
        Self {
            setup,
            alg: "",
            title: None,
        }
    }
}

/// Turns move sequences into a shareable playback URI.
pub trait LinkEncoder: Send + Sync {
    fn encode(&self, request: &LinkRequest<'_>) -> Result<String, LinkError>;
}
