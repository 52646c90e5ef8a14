// SPDX-License-Identifier: MPL-2.0

//! Integration tests for payload actions

use qr_scanner::actions::{
    EmailTemplate, ScanContent, UriLauncher, compose_email, open_url, perform_default_action,
};
use qr_scanner::errors::ActionError;
use std::sync::Mutex;

/// Records opened URIs instead of launching anything
struct RecordingLauncher {
    handlers: Vec<&'static str>,
    opened: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    fn new(handlers: &[&'static str]) -> Self {
        Self {
            handlers: handlers.to_vec(),
            opened: Mutex::new(Vec::new()),
        }
    }

    fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl UriLauncher for RecordingLauncher {
    fn has_handler(&self, scheme: &str) -> bool {
        self.handlers.contains(&scheme)
    }

    fn open(&self, uri: &str) -> Result<(), ActionError> {
        self.opened.lock().unwrap().push(uri.to_string());
        Ok(())
    }
}

#[test]
fn test_open_url_hands_over_unchanged() {
    let launcher = RecordingLauncher::new(&["http", "https"]);
    open_url(&launcher, "https://example.com/a?b=c").unwrap();
    assert_eq!(launcher.opened(), vec!["https://example.com/a?b=c"]);
}

#[test]
fn test_compose_email_builds_mailto() {
    let launcher = RecordingLauncher::new(&["mailto"]);
    compose_email(&launcher, "user@example.com", &EmailTemplate::default()).unwrap();
    assert_eq!(
        launcher.opened(),
        vec!["mailto:user@example.com?subject=Subject&body=Body"]
    );
}

#[test]
fn test_compose_email_without_client() {
    let launcher = RecordingLauncher::new(&["https"]);
    let result = compose_email(&launcher, "user@example.com", &EmailTemplate::default());

    assert_eq!(result, Err(ActionError::NoEmailClient));
    assert_eq!(
        ActionError::NoEmailClient.to_string(),
        "No email client installed."
    );
    assert!(
        launcher.opened().is_empty(),
        "Nothing should be opened without a mail client"
    );
}

#[test]
fn test_default_action_per_content() {
    let launcher = RecordingLauncher::new(&["mailto"]);
    let template = EmailTemplate {
        subject: "Hello".to_string(),
        body: "Hi there".to_string(),
    };

    let ran = perform_default_action(&launcher, &ScanContent::classify("plain text"), &template);
    assert_eq!(ran, Ok(false));

    let ran = perform_default_action(&launcher, &ScanContent::classify("http://x.org"), &template);
    assert_eq!(ran, Ok(true));

    let ran = perform_default_action(&launcher, &ScanContent::classify("me@x.org"), &template);
    assert_eq!(ran, Ok(true));

    assert_eq!(
        launcher.opened(),
        vec![
            "http://x.org".to_string(),
            "mailto:me@x.org?subject=Hello&body=Hi%20there".to_string(),
        ]
    );
}
