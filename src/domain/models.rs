//! Domain models for the site content document.
//!
//! The JSON shape (camelCase field names) is the stored and exported format,
//! so renaming a field here breaks documents already saved by users.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Hero section: fixed title fragment followed by rotating words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    /// Fixed part of the title shown before the rotating word.
    #[serde(default)]
    pub title_base: String,
    /// Words cycled after the title base.
    #[serde(default)]
    pub flip_words: Vec<String>,
    /// Subtitle below the title.
    #[serde(default)]
    pub subtitle: String,
    /// Short selling points.
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// "About us" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    /// Section title.
    #[serde(default)]
    pub title: String,
    /// Body text; paragraphs are separated by a blank line.
    #[serde(default)]
    pub paragraph: String,
    /// Bullet list shown next to the text.
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Team picture (URL or data URL).
    #[serde(default)]
    pub image_url: Option<String>,
}

impl AboutContent {
    /// Paragraphs split on blank lines, trimmed, empty ones dropped.
    #[must_use]
    pub fn paragraphs(&self) -> Vec<&str> {
        split_paragraphs(&self.paragraph)
    }
}

/// Splits text on runs of two or more newlines, trimming each piece and
/// dropping empty ones.
#[must_use]
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    // Extra newlines in a run end up as leading whitespace of the next piece
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// A service card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServiceItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
}

impl ServiceItem {
    #[must_use]
    pub fn new(title: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            desc: desc.into(),
        }
    }
}

/// A client testimonial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    /// Client logo or picture (URL or data URL).
    #[serde(default)]
    pub image_url: Option<String>,
    /// Quote text.
    #[serde(default)]
    pub quote: String,
    /// Author name.
    #[serde(default)]
    pub name: String,
    /// Author role or company, optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// The single content document rendered by the public pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDocument {
    /// Site logo (URL or data URL).
    #[serde(default)]
    pub logo_url: Option<String>,
    pub hero: HeroContent,
    pub about: AboutContent,
    pub services: Vec<ServiceItem>,
    pub testimonials: Vec<Testimonial>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for SiteDocument {
    /// The built-in content used on first run and whenever stored content is unusable.
    fn default() -> Self {
        Self {
            logo_url: Some("/images/logo-tus-contas-online.jpg".into()),
            hero: HeroContent {
                title_base: "Tu contaduría online,".into(),
                flip_words: strings(&["sin vueltas", "sin demoras"]),
                subtitle: "Acompañamos a emprendedoras y pymes con servicios contables claros, 100% digitales y a medida.".into(),
                bullets: strings(&[
                    "Atención ágil y cercana",
                    "Gestión impositiva al día",
                    "100% online",
                ]),
            },
            about: AboutContent {
                title: "Quiénes somos".into(),
                paragraph: "Somos dos contadoras que aman simplificar la gestión para emprendedoras y pymes.\n\nTrabajamos 100% online, con procesos claros, recordatorios de vencimientos y reportes que te ayudan a decidir mejor.".into(),
                bullets: strings(&[
                    "Atención personalizada",
                    "Onboarding en 48 hs",
                    "Sin letra chica",
                ]),
                image_url: Some("/images/imagen-equipo.jpg".into()),
            },
            services: vec![
                ServiceItem::new(
                    "Monotributo y Autónomos",
                    "Alta, recategorización, vencimientos y presentación.",
                ),
                ServiceItem::new(
                    "Gestión de impuestos",
                    "IVA, Ingresos Brutos, Ganancias. Nos ocupamos de todo.",
                ),
                ServiceItem::new(
                    "Contabilidad para pymes",
                    "Estados, conciliaciones y reportes para decidir mejor.",
                ),
                ServiceItem::new(
                    "Asesoramiento online",
                    "Espacios para despejar dudas y planificar.",
                ),
            ],
            testimonials: vec![
                Testimonial {
                    image_url: Some("/images/clients/hf-logo.png".into()),
                    quote: "Ordenamos impuestos y flujo de caja en 30 días. Ahora proyectamos con claridad.".into(),
                    name: "H&F Distribuidora".into(),
                    role: None,
                },
                Testimonial {
                    image_url: Some("/images/clients/tecwork-logo.png".into()),
                    quote: "Pasé de no entender mis vencimientos a tener todo calendarizado y automatizado.".into(),
                    name: "Agustin".into(),
                    role: Some("Tecwork".into()),
                },
            ],
        }
    }
}

/// Time-bounded editor authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSession {
    /// Expiry as milliseconds since the Unix epoch.
    pub expires_at: i64,
}

impl EditorSession {
    /// Session expiring at the given instant.
    #[must_use]
    pub fn expiring_at(at: DateTime<Utc>) -> Self {
        Self {
            expires_at: at.timestamp_millis(),
        }
    }

    /// Whether the session is past its expiry at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now.timestamp_millis()
    }

    /// Expiry as a `DateTime`, if representable.
    #[must_use]
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.expires_at).single()
    }
}

/// Light/dark theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("Unknown theme: {s}. Use: light, dark")),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_default_document_shape() {
        let doc = SiteDocument::default();
        assert_eq!(doc.services.len(), 4);
        assert_eq!(doc.testimonials.len(), 2);
        assert_eq!(doc.about.title, "Quiénes somos");
        assert_eq!(doc.about.paragraphs().len(), 2);
    }

    #[test]
    fn test_document_uses_camel_case_keys() {
        let json = serde_json::to_value(SiteDocument::default()).unwrap();
        assert!(json.get("logoUrl").is_some());
        assert!(json["hero"].get("titleBase").is_some());
        assert!(json["hero"].get("flipWords").is_some());
        assert!(json["about"].get("imageUrl").is_some());
        assert!(json["services"][0].get("desc").is_some());
        // Missing role is omitted rather than written as null
        assert!(json["testimonials"][0].get("role").is_none());
        assert_eq!(json["testimonials"][1]["role"], "Tecwork");
    }

    #[test]
    fn test_split_paragraphs_collapses_blank_runs() {
        assert_eq!(split_paragraphs("p1\n\n p2"), vec!["p1", "p2"]);
        assert_eq!(split_paragraphs("a\n\n\n\nb\n\n\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_paragraphs("one\nline"), vec!["one\nline"]);
        assert!(split_paragraphs("  \n\n  ").is_empty());
    }

    #[test]
    fn test_session_expiry_boundary() {
        let now = Utc::now();
        let session = EditorSession::expiring_at(now);
        assert!(!session.is_expired_at(now));
        assert!(session.is_expired_at(now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("blue".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::default(), Theme::Dark);
    }
}
