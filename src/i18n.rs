// SPDX-License-Identifier: GPL-3.0-only

//! Localization support
//!
//! Translations live in `i18n/<lang>/qr_scanner.ftl` and are embedded into the
//! binary. Use the [`fl!`](crate::fl) macro to look up a message.

use i18n_embed::{
    DefaultLocalizer, LanguageLoader, Localizer,
    fluent::{FluentLanguageLoader, fluent_language_loader},
    unic_langid::LanguageIdentifier,
};
use rust_embed::RustEmbed;
use std::sync::LazyLock;
use tracing::error;

/// Applies the requested language(s) to requested translations from the `fl!()` macro.
pub fn init(requested_languages: &[LanguageIdentifier]) {
    if let Err(why) = localizer().select(requested_languages) {
        error!(error = %why, "Failed to load fluent localizations");
    }
}

/// Get the `Localizer` to be used for localizing this library.
#[must_use]
pub fn localizer() -> Box<dyn Localizer> {
    Box::from(DefaultLocalizer::new(&*LANGUAGE_LOADER, &Localizations))
}

#[derive(RustEmbed)]
#[folder = "i18n/"]
struct Localizations;

pub static LANGUAGE_LOADER: LazyLock<FluentLanguageLoader> = LazyLock::new(|| {
    let loader: FluentLanguageLoader = fluent_language_loader!();

    // The fallback language is embedded at compile time, so this only fails on a broken build
    loader
        .load_fallback_language(&Localizations)
        .expect("Error while loading fallback language");
    // Every string is LTR; isolation marks would end up in copied toasts
    loader.set_use_isolating(false);

    loader
});

/// Request a localized string by ID from the i18n/ directory.
#[macro_export]
macro_rules! fl {
    ($message_id:literal) => {{
        i18n_embed_fl::fl!($crate::i18n::LANGUAGE_LOADER, $message_id)
    }};

    ($message_id:literal, $($args:expr),*) => {{
        i18n_embed_fl::fl!($crate::i18n::LANGUAGE_LOADER, $message_id, $($args), *)
    }};
}

#[cfg(test)]
mod tests {
    use crate::fl;

    #[test]
    fn test_arguments_are_inserted_verbatim() {
        assert_eq!(
            fl!("copied-to-clipboard", text = "https://example.com"),
            "Copied to clipboard: https://example.com"
        );
        assert_eq!(
            fl!("no-code-in-image", file = "code.png"),
            "No QR code found in code.png"
        );
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(fl!("permission-denied"), "Permission Denied to Access Camera");
        assert_eq!(fl!("no-email-client"), "No email client installed.");
    }
}
