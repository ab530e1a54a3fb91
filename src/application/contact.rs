//! Contact form validation.
//!
//! Only the field checks are implemented; messages are meant to be shown
//! inline next to each field.

use std::sync::OnceLock;

use regex::Regex;

/// Contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Message,
}

impl ContactField {
    pub const ALL: [Self; 4] = [Self::FirstName, Self::LastName, Self::Email, Self::Message];
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstName => write!(f, "nombre"),
            Self::LastName => write!(f, "apellido"),
            Self::Email => write!(f, "email"),
            Self::Message => write!(f, "mensaje"),
        }
    }
}

/// Submitted form values.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub message: String,
    /// Hidden field that real visitors leave empty.
    pub honeypot: String,
}

impl ContactForm {
    #[must_use]
    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Email => &self.email,
            ContactField::Message => &self.message,
        }
    }
}

/// Outcome of validating the whole form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidation {
    Valid,
    /// Per-field messages, in form order.
    Invalid(Vec<(ContactField, &'static str)>),
    /// The honeypot was filled in.
    Rejected(&'static str),
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// Checks a single field. Returns the message to display, if any.
#[must_use]
pub fn validate_field(field: ContactField, value: &str) -> Option<&'static str> {
    let value = value.trim();
    match field {
        ContactField::FirstName if value.is_empty() => Some("Ingresá tu nombre."),
        ContactField::LastName if value.is_empty() => Some("Ingresá tu apellido."),
        ContactField::Email if value.is_empty() => Some("Ingresá tu email."),
        ContactField::Email if !email_regex().is_some_and(|re| re.is_match(value)) => {
            Some("Email inválido.")
        }
        _ => None,
    }
}

/// Checks every field; a filled honeypot rejects the form outright.
#[must_use]
pub fn validate_all(form: &ContactForm) -> ContactValidation {
    if !form.honeypot.trim().is_empty() {
        tracing::warn!("Contact form honeypot filled");
        return ContactValidation::Rejected("Se detectó un error en el envío.");
    }

    let errors: Vec<_> = ContactField::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, form.value(field)).map(|msg| (field, msg)))
        .collect();

    if errors.is_empty() {
        ContactValidation::Valid
    } else {
        ContactValidation::Invalid(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            first_name: "Ana".into(),
            last_name: "Pérez".into(),
            email: "ana@example.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form_without_message() {
        assert_eq!(validate_all(&filled()), ContactValidation::Valid);
    }

    #[test]
    fn test_required_fields() {
        let form = ContactForm {
            first_name: "   ".into(),
            ..Default::default()
        };
        let ContactValidation::Invalid(errors) = validate_all(&form) else {
            panic!("expected errors");
        };
        let fields: Vec<_> = errors.iter().map(|(f, _)| *f).collect();
        assert_eq!(
            fields,
            vec![ContactField::FirstName, ContactField::LastName, ContactField::Email]
        );
        assert_eq!(errors[0].1, "Ingresá tu nombre.");
        assert_eq!(errors[2].1, "Ingresá tu email.");
    }

    #[test]
    fn test_email_shape() {
        assert_eq!(validate_field(ContactField::Email, " a@b.co "), None);
        assert_eq!(
            validate_field(ContactField::Email, "a@b"),
            Some("Email inválido.")
        );
        assert_eq!(
            validate_field(ContactField::Email, "a b@c.d"),
            Some("Email inválido.")
        );
        assert!(validate_field(ContactField::Email, "a@@b.c").is_some());
    }

    #[test]
    fn test_honeypot_rejects() {
        let form = ContactForm {
            honeypot: "ACME".into(),
            ..filled()
        };
        assert_eq!(
            validate_all(&form),
            ContactValidation::Rejected("Se detectó un error en el envío.")
        );
    }
}
