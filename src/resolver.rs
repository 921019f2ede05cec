//! Turns user input into a channel reference or a search phrase.

use crate::error::{NicheError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Domains that identify a video platform URL
const PLATFORM_DOMAINS: [&str; 3] = ["youtube.com", "youtu.be", "youtube-nocookie.com"];

/// A channel as named by the user, before it is resolved to a stable id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ChannelRef {
    /// Stable channel id (`UC...`)
    Id(String),
    /// Legacy custom URL name (`/c/<name>`)
    CustomName(String),
    /// Legacy username (`/user/<name>`)
    Username(String),
    /// Handle without the leading `@`
    Handle(String),
    /// A platform URL whose shape is not recognized
    NeedsResolution(String),
}

/// What the user asked to analyze
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ChannelQuery {
    Channel(ChannelRef),
    Search(String),
}

#[derive(Clone, Copy)]
enum UrlShape {
    Channel,
    Custom,
    User,
    Handle,
}

// Order matters: the first matching shape wins.
static URL_PATTERNS: Lazy<Vec<(Regex, UrlShape)>> = Lazy::new(|| {
    [
        (r"/channel/([A-Za-z0-9_-]+)", UrlShape::Channel),
        (r"/c/([^/?#\s]+)", UrlShape::Custom),
        (r"/user/([^/?#\s]+)", UrlShape::User),
        (r"/@([^/?#\s]+)", UrlShape::Handle),
    ]
    .into_iter()
    .map(|(pattern, shape)| (Regex::new(pattern).expect("static URL pattern"), shape))
    .collect()
});

static CHANNEL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^UC[A-Za-z0-9_-]{22}$").expect("static channel id pattern"));

static BARE_HANDLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([A-Za-z0-9._-]{3,30})$").expect("static handle pattern"));

/// Extract a channel reference from a URL.
///
/// Known shapes are tried in order: `/channel/<id>`, `/c/<name>`,
/// `/user/<name>`, `/@<handle>`. A platform URL matching none of them yields
/// [`ChannelRef::NeedsResolution`]; anything else is `InvalidInput`.
pub fn resolve_channel_url(input: &str) -> Result<ChannelRef> {
    let input = input.trim();

    for (regex, shape) in URL_PATTERNS.iter() {
        if let Some(captures) = regex.captures(input) {
            let value = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            return Ok(match shape {
                UrlShape::Channel => ChannelRef::Id(value),
                UrlShape::Custom => ChannelRef::CustomName(value),
                UrlShape::User => ChannelRef::Username(value),
                UrlShape::Handle => ChannelRef::Handle(value),
            });
        }
    }

    if is_platform_url(input) {
        return Ok(ChannelRef::NeedsResolution(input.to_string()));
    }

    Err(NicheError::InvalidInput(format!(
        "not a recognized channel URL: {}",
        input
    )))
}

fn is_platform_url(input: &str) -> bool {
    let lowered = input.to_ascii_lowercase();
    PLATFORM_DOMAINS.iter().any(|domain| lowered.contains(domain))
}

fn looks_like_url(input: &str) -> bool {
    input.contains("://") || input.starts_with("www.") || is_platform_url(input)
}

impl ChannelQuery {
    /// Classify free-form user input.
    ///
    /// URLs go through [`resolve_channel_url`], a bare `UC...` id or `@handle`
    /// names a channel, and any other non-blank text is a search phrase.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(NicheError::InvalidInput(
                "enter a channel URL, channel id or search phrase".to_string(),
            ));
        }

        if looks_like_url(input) {
            return resolve_channel_url(input).map(ChannelQuery::Channel);
        }

        if CHANNEL_ID.is_match(input) {
            return Ok(ChannelQuery::Channel(ChannelRef::Id(input.to_string())));
        }

        if let Some(captures) = BARE_HANDLE.captures(input) {
            let handle = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            return Ok(ChannelQuery::Channel(ChannelRef::Handle(handle.to_string())));
        }

        let phrase = input.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(ChannelQuery::Search(phrase))
    }
}
