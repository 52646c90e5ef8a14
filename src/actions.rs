// SPDX-License-Identifier: GPL-3.0-only

//! Actions on decoded payloads
//!
//! Scanned text is classified into web links, email addresses and plain
//! text. Links go to the default browser and addresses to the default mail
//! client, both through the desktop's URI scheme handlers.

use crate::constants::{email, schemes};
use crate::errors::ActionError;
use regex::Regex;
use std::process::Command;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Email address pattern, anchored to match the whole payload
static EMAIL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("email pattern is valid")
});

/// Classified scan payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanContent {
    /// Starts with `http://` or `https://`
    Url(String),
    /// A single, complete email address
    Email(String),
    /// Anything else
    Text(String),
}

impl ScanContent {
    /// Classify decoded text
    ///
    /// The URL check is a plain prefix match and wins over the email check.
    pub fn classify(text: &str) -> Self {
        if is_url(text) {
            Self::Url(text.to_string())
        } else if is_email(text) {
            Self::Email(text.to_string())
        } else {
            Self::Text(text.to_string())
        }
    }

    /// The raw payload
    pub fn text(&self) -> &str {
        match self {
            Self::Url(s) | Self::Email(s) | Self::Text(s) => s,
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, Self::Url(_))
    }

    pub fn is_email(&self) -> bool {
        matches!(self, Self::Email(_))
    }
}

/// Whether `text` is a web link
pub fn is_url(text: &str) -> bool {
    text.starts_with(schemes::HTTP_PREFIX) || text.starts_with(schemes::HTTPS_PREFIX)
}

/// Whether the whole of `text` is an email address
pub fn is_email(text: &str) -> bool {
    EMAIL_ADDRESS.is_match(text)
}

/// Subject and body prefilled in composed emails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
}

impl Default for EmailTemplate {
    fn default() -> Self {
        Self {
            subject: email::DEFAULT_SUBJECT.to_string(),
            body: email::DEFAULT_BODY.to_string(),
        }
    }
}

impl From<&crate::config::Config> for EmailTemplate {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            subject: config.email_subject.clone(),
            body: config.email_body.clone(),
        }
    }
}

/// Hands URIs to other applications
pub trait UriLauncher: Send + Sync {
    /// Whether some application is registered for `scheme`
    fn has_handler(&self, scheme: &str) -> bool;

    /// Open `uri` with its default handler, without waiting for it to exit
    fn open(&self, uri: &str) -> Result<(), ActionError>;
}

/// Launcher backed by the desktop's MIME associations
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl UriLauncher for SystemLauncher {
    fn has_handler(&self, scheme: &str) -> bool {
        // Inside Flatpak the OpenURI portal picks (or offers) the handler
        if std::path::Path::new("/.flatpak-info").exists() {
            return true;
        }

        let mime = format!("x-scheme-handler/{}", scheme);
        match Command::new("xdg-mime")
            .args(["query", "default", &mime])
            .output()
        {
            Ok(output) if output.status.success() => {
                let handler = String::from_utf8_lossy(&output.stdout).trim().to_string();
                debug!(scheme, handler = %handler, "Queried scheme handler");
                !handler.is_empty()
            }
            Ok(output) => {
                debug!(scheme, status = ?output.status, "xdg-mime query failed");
                false
            }
            Err(e) => {
                // Without xdg-utils there's nothing to ask; let the open attempt decide
                warn!(error = %e, "xdg-mime unavailable, assuming a handler exists");
                true
            }
        }
    }

    fn open(&self, uri: &str) -> Result<(), ActionError> {
        open::that_detached(uri).map_err(|e| ActionError::LaunchFailed {
            uri: uri.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Open a web link in the default browser
pub fn open_url(launcher: &dyn UriLauncher, url: &str) -> Result<(), ActionError> {
    info!(url = %url, "Opening URL");
    launcher.open(url)
}

/// Open the mail composer addressed to `address`
///
/// Fails with [`ActionError::NoEmailClient`] when nothing handles `mailto:`.
pub fn compose_email(
    launcher: &dyn UriLauncher,
    address: &str,
    template: &EmailTemplate,
) -> Result<(), ActionError> {
    if !launcher.has_handler(schemes::MAILTO) {
        warn!(address = %address, "No mailto handler installed");
        return Err(ActionError::NoEmailClient);
    }

    let uri = mailto_uri(address, &template.subject, &template.body);
    info!(address = %address, "Composing email");
    launcher.open(&uri)
}

/// Run the default action for a payload: open links, compose to addresses
///
/// Returns `Ok(false)` for plain text, which has no default action.
pub fn perform_default_action(
    launcher: &dyn UriLauncher,
    content: &ScanContent,
    template: &EmailTemplate,
) -> Result<bool, ActionError> {
    match content {
        ScanContent::Url(url) => open_url(launcher, url).map(|()| true),
        ScanContent::Email(address) => compose_email(launcher, address, template).map(|()| true),
        ScanContent::Text(_) => Ok(false),
    }
}

/// Build a `mailto:` URI with subject and body
pub fn mailto_uri(address: &str, subject: &str, body: &str) -> String {
    format!(
        "{}:{}?subject={}&body={}",
        schemes::MAILTO,
        percent_encode(address, &['@', '+']),
        percent_encode(subject, &[]),
        percent_encode(body, &[]),
    )
}

/// Percent-encode everything but unreserved characters and `keep`
fn percent_encode(s: &str, keep: &[char]) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for c in s.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            c if keep.contains(&c) => result.push(c),
            _ => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).as_bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_url_prefix() {
        assert_eq!(
            ScanContent::classify("https://example.com/path?q=1"),
            ScanContent::Url("https://example.com/path?q=1".to_string())
        );
        assert!(ScanContent::classify("http://x").is_url());
        // Prefix match only, case sensitive
        assert!(!ScanContent::classify("HTTP://EXAMPLE.COM").is_url());
        assert!(!ScanContent::classify("see https://example.com").is_url());
    }

    #[test]
    fn test_classify_email() {
        for address in [
            "user@example.com",
            "first.last+tag@mail.example.org",
            "a_b%c@d-e.io",
        ] {
            assert!(ScanContent::classify(address).is_email(), "{address}");
        }
        for text in [
            "user@",
            "@host.com",
            "a@b",
            "user@example.com and more",
            "user@-example.com",
            "mailto:user@example.com",
        ] {
            assert_eq!(
                ScanContent::classify(text),
                ScanContent::Text(text.to_string()),
                "{text}"
            );
        }
    }

    #[test]
    fn test_mailto_uri() {
        assert_eq!(
            mailto_uri("user@example.com", "Subject", "Body"),
            "mailto:user@example.com?subject=Subject&body=Body"
        );
        assert_eq!(
            mailto_uri("a+b@example.com", "Hi there", "Line 1\nä&="),
            "mailto:a+b@example.com?subject=Hi%20there&body=Line%201%0A%C3%A4%26%3D"
        );
    }

    #[test]
    fn test_text_accessor() {
        assert_eq!(ScanContent::classify("plain").text(), "plain");
        assert_eq!(ScanContent::classify("u@e.com").text(), "u@e.com");
    }
}
