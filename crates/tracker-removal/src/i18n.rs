//! User-facing message catalog
//!
//! Every message the removal flow shows to a caller exists in English and
//! French with the same interpolation points.

use tracker_org::Locale;

/// A user-facing message, with its interpolated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<'a> {
    /// The organization id does not resolve to an organization
    UnknownOrganization,

    /// An admin tried to remove a verified organization
    ContactSuperAdmin,

    /// The caller has no admin-level affiliation
    ContactOrganizationAdmin,

    /// Any database, cursor, transaction or commit failure
    RemovalFailed,

    /// The organization was removed
    RemovalSucceeded {
        /// Locale-specific organization slug
        slug: &'a str,
    },
}

impl Message<'_> {
    /// Values interpolated into the message, in order.
    pub fn arguments(&self) -> Vec<&str> {
        match self {
            Self::RemovalSucceeded { slug } => vec![*slug],
            _ => Vec::new(),
        }
    }
}

/// Trait for formatting user-facing messages.
pub trait Localizer: Send + Sync {
    /// Format a message for a locale.
    fn translate(&self, locale: Locale, message: &Message<'_>) -> String;
}

/// The built-in English/French catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Localizer for Catalog {
    fn translate(&self, locale: Locale, message: &Message<'_>) -> String {
        match (locale, message) {
            (Locale::En, Message::UnknownOrganization) => {
                "Unable to remove unknown organization.".to_string()
            }
            (Locale::Fr, Message::UnknownOrganization) => {
                "Impossible de supprimer une organisation inconnue.".to_string()
            }
            (Locale::En, Message::ContactSuperAdmin) => {
                "Permission Denied: Please contact super admin for help with removing organization."
                    .to_string()
            }
            (Locale::Fr, Message::ContactSuperAdmin) => {
                "Permission refusée : Veuillez contacter le super administrateur pour obtenir de l'aide afin de supprimer l'organisation."
                    .to_string()
            }
            (Locale::En, Message::ContactOrganizationAdmin) => {
                "Permission Denied: Please contact organization admin for help with removing organization."
                    .to_string()
            }
            (Locale::Fr, Message::ContactOrganizationAdmin) => {
                "Permission refusée : Veuillez contacter l'administrateur de l'organisation pour obtenir de l'aide afin de supprimer l'organisation."
                    .to_string()
            }
            (Locale::En, Message::RemovalFailed) => {
                "Unable to remove organization. Please try again.".to_string()
            }
            (Locale::Fr, Message::RemovalFailed) => {
                "Impossible de supprimer l'organisation. Veuillez réessayer.".to_string()
            }
            (Locale::En, Message::RemovalSucceeded { slug }) => {
                format!("Successfully removed organization: {slug}.")
            }
            (Locale::Fr, Message::RemovalSucceeded { slug }) => {
                format!("A réussi à supprimer l'organisation : {slug}.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_message() -> Vec<Message<'static>> {
        vec![
            Message::UnknownOrganization,
            Message::ContactSuperAdmin,
            Message::ContactOrganizationAdmin,
            Message::RemovalFailed,
            Message::RemovalSucceeded {
                slug: "treasury-board-secretariat",
            },
        ]
    }

    #[test]
    fn test_catalogs_are_complete_and_distinct() {
        for message in every_message() {
            let en = Catalog.translate(Locale::En, &message);
            let fr = Catalog.translate(Locale::Fr, &message);
            assert!(!en.is_empty());
            assert!(!fr.is_empty());
            assert_ne!(en, fr, "{message:?}");
        }
    }

    #[test]
    fn test_interpolated_values_appear_in_every_locale() {
        for message in every_message() {
            for locale in Locale::ALL {
                let text = Catalog.translate(locale, &message);
                for argument in message.arguments() {
                    assert!(text.contains(argument), "{locale}: {text}");
                }
            }
        }
    }

    #[test]
    fn test_success_message() {
        let message = Message::RemovalSucceeded {
            slug: "treasury-board-secretariat",
        };
        assert_eq!(
            Catalog.translate(Locale::En, &message),
            "Successfully removed organization: treasury-board-secretariat."
        );
    }
}
