//! Content editor: draft editing, import/export and panel visibility.
//!
//! The editor works on a private copy of the stored document. Edits only
//! touch the draft; [`ContentEditor::commit`] writes it back through the
//! content store.

use serde_json::Value;

use crate::application::content_store::ContentStore;
use crate::application::session::SessionManager;
use crate::application::validation::{validate_about, AboutReport};
use crate::domain::{AppError, Result, ServiceItem, SiteDocument, Testimonial};
use crate::infrastructure::KeyValueStore;

/// Fixed name of the exported file.
pub const EXPORT_FILENAME: &str = "tco-content.json";

/// Top-level sections an imported file must contain.
pub const REQUIRED_SECTIONS: [&str; 4] = ["hero", "services", "testimonials", "about"];

/// Direction for reordering a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// A single field-level change to the draft.
///
/// Image variants carry an already-encoded reference (URL or data URL);
/// `None` clears the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    SetLogo(Option<String>),
    SetHeroTitle(String),
    /// Comma-separated list; whitespace is normalized and empty entries dropped.
    SetFlipWords(String),
    SetHeroSubtitle(String),
    /// One bullet per line; lines are trimmed and empty ones dropped.
    SetHeroBullets(String),
    SetAboutTitle(String),
    SetAboutParagraph(String),
    SetAboutImage(Option<String>),
    AddAboutBullet,
    UpdateAboutBullet { index: usize, text: String },
    RemoveAboutBullet(usize),
    MoveAboutBullet { index: usize, direction: MoveDirection },
    AddService,
    UpdateService {
        index: usize,
        title: Option<String>,
        desc: Option<String>,
    },
    RemoveService(usize),
    AddTestimonial,
    UpdateTestimonial {
        index: usize,
        quote: Option<String>,
        name: Option<String>,
        role: Option<String>,
    },
    SetTestimonialImage { index: usize, image: Option<String> },
    RemoveTestimonial(usize),
}

/// Serialized draft ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: &'static str,
    pub contents: String,
}

/// A parsed import waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImport {
    document: SiteDocument,
}

impl PendingImport {
    /// The document that would replace the draft.
    #[must_use]
    pub const fn document(&self) -> &SiteDocument {
        &self.document
    }
}

/// Splits a comma-separated list of rotating words.
#[must_use]
pub fn parse_flip_words(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|word| word.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|word| !word.is_empty())
        .collect()
}

/// Splits a one-per-line bullet list.
#[must_use]
pub fn parse_lines(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn item_mut<'a, T>(items: &'a mut [T], index: usize, what: &str) -> Result<&'a mut T> {
    let len = items.len();
    items.get_mut(index).ok_or_else(|| AppError::InvalidData {
        message: format!("No {what} at index {index} ({len} present)"),
    })
}

fn remove_at<T>(items: &mut Vec<T>, index: usize, what: &str) -> Result<()> {
    item_mut(items, index, what)?;
    items.remove(index);
    Ok(())
}

/// JavaScript-style truthiness, used to decide whether a section is present.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Working copy of the site document.
#[derive(Debug, Clone)]
pub struct ContentEditor {
    draft: SiteDocument,
    base_revision: u64,
}

impl ContentEditor {
    /// Starts a draft from the store's current document.
    #[must_use]
    pub fn new<S: KeyValueStore>(store: &ContentStore<S>) -> Self {
        Self {
            draft: store.current().clone(),
            base_revision: store.revision(),
        }
    }

    /// The current draft.
    #[must_use]
    pub const fn draft(&self) -> &SiteDocument {
        &self.draft
    }

    /// Whether the draft differs from the stored document.
    #[must_use]
    pub fn is_dirty<S: KeyValueStore>(&self, store: &ContentStore<S>) -> bool {
        &self.draft != store.current()
    }

    /// Resets the draft if the store was saved since the draft was taken.
    /// Returns `true` when the draft was replaced.
    pub fn sync<S: KeyValueStore>(&mut self, store: &ContentStore<S>) -> bool {
        if store.revision() == self.base_revision {
            return false;
        }

        tracing::debug!(
            from = self.base_revision,
            to = store.revision(),
            "Stored content changed, resetting draft"
        );
        self.draft = store.current().clone();
        self.base_revision = store.revision();
        true
    }

    /// Applies one field-level edit.
    ///
    /// # Errors
    /// Returns `AppError::InvalidData` for an out-of-range index; the draft
    /// is unchanged in that case.
    pub fn apply(&mut self, edit: DraftEdit) -> Result<()> {
        let draft = &mut self.draft;

        match edit {
            DraftEdit::SetLogo(image) => draft.logo_url = image,
            DraftEdit::SetHeroTitle(text) => draft.hero.title_base = text,
            DraftEdit::SetFlipWords(raw) => draft.hero.flip_words = parse_flip_words(&raw),
            DraftEdit::SetHeroSubtitle(text) => draft.hero.subtitle = text,
            DraftEdit::SetHeroBullets(raw) => draft.hero.bullets = parse_lines(&raw),
            DraftEdit::SetAboutTitle(text) => draft.about.title = text,
            DraftEdit::SetAboutParagraph(text) => draft.about.paragraph = text,
            DraftEdit::SetAboutImage(image) => draft.about.image_url = image,
            DraftEdit::AddAboutBullet => draft.about.bullets.push("Nuevo punto".into()),
            DraftEdit::UpdateAboutBullet { index, text } => {
                *item_mut(&mut draft.about.bullets, index, "bullet")? = text;
            }
            DraftEdit::RemoveAboutBullet(index) => {
                remove_at(&mut draft.about.bullets, index, "bullet")?;
            }
            DraftEdit::MoveAboutBullet { index, direction } => {
                let bullets = &mut draft.about.bullets;
                item_mut(bullets, index, "bullet")?;
                // Moving past either end is a no-op
                match direction {
                    MoveDirection::Up if index > 0 => bullets.swap(index - 1, index),
                    MoveDirection::Down if index + 1 < bullets.len() => {
                        bullets.swap(index, index + 1);
                    }
                    _ => {}
                }
            }
            DraftEdit::AddService => draft
                .services
                .push(ServiceItem::new("Nuevo servicio", "Descripción")),
            DraftEdit::UpdateService { index, title, desc } => {
                let service = item_mut(&mut draft.services, index, "service")?;
                if let Some(title) = title {
                    service.title = title;
                }
                if let Some(desc) = desc {
                    service.desc = desc;
                }
            }
            DraftEdit::RemoveService(index) => {
                remove_at(&mut draft.services, index, "service")?;
            }
            DraftEdit::AddTestimonial => draft.testimonials.push(Testimonial {
                image_url: None,
                quote: "Nuevo testimonio".into(),
                name: "Nombre".into(),
                role: Some("Rol".into()),
            }),
            DraftEdit::UpdateTestimonial {
                index,
                quote,
                name,
                role,
            } => {
                let testimonial = item_mut(&mut draft.testimonials, index, "testimonial")?;
                if let Some(quote) = quote {
                    testimonial.quote = quote;
                }
                if let Some(name) = name {
                    testimonial.name = name;
                }
                if role.is_some() {
                    testimonial.role = role;
                }
            }
            DraftEdit::SetTestimonialImage { index, image } => {
                item_mut(&mut draft.testimonials, index, "testimonial")?.image_url = image;
            }
            DraftEdit::RemoveTestimonial(index) => {
                remove_at(&mut draft.testimonials, index, "testimonial")?;
            }
        }

        Ok(())
    }

    /// Soft validation of the draft's about section.
    #[must_use]
    pub fn validate_about(&self) -> AboutReport {
        validate_about(&self.draft.about)
    }

    /// Writes the draft to the store. Validation results never block this.
    ///
    /// # Errors
    /// Returns error if the store write fails.
    pub fn commit<S: KeyValueStore>(&mut self, store: &mut ContentStore<S>) -> Result<()> {
        store.save(self.draft.clone())?;
        self.base_revision = store.revision();
        Ok(())
    }

    /// Serializes the draft as 2-space indented JSON under the fixed filename.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn export_document(&self) -> Result<ExportFile> {
        let contents = serde_json::to_string_pretty(&self.draft).map_err(AppError::json_parse)?;
        Ok(ExportFile {
            filename: EXPORT_FILENAME,
            contents,
        })
    }

    /// Parses an import file without touching the draft.
    ///
    /// The value must be a JSON object with all four sections present;
    /// no merge or field-level validation is applied.
    ///
    /// # Errors
    /// Returns `AppError::Import` if the text is not JSON, lacks a required
    /// section, or does not fit the document types.
    pub fn prepare_import(text: &str) -> Result<PendingImport> {
        let parsed: Value = serde_json::from_str(text)
            .map_err(|e| AppError::import(format!("invalid JSON ({e})")))?;

        let Value::Object(sections) = &parsed else {
            return Err(AppError::import("expected a JSON object"));
        };

        let missing: Vec<&str> = REQUIRED_SECTIONS
            .into_iter()
            .filter(|key| !sections.get(*key).is_some_and(is_truthy))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::import(format!(
                "missing required section(s): {}",
                missing.join(", ")
            )));
        }

        let document = serde_json::from_value(parsed)
            .map_err(|e| AppError::import(format!("unexpected content ({e})")))?;

        Ok(PendingImport { document })
    }

    /// Replaces the draft with a confirmed import.
    pub fn apply_import(&mut self, pending: PendingImport) {
        tracing::info!("Draft replaced by imported document");
        self.draft = pending.document;
    }
}

/// Visibility of the editor panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    LoginPrompt {
        error: Option<String>,
    },
    Open,
}

/// Editor panel state machine: `Closed -> LoginPrompt -> Open | Closed`.
#[derive(Debug, Default)]
pub struct EditorPanel {
    state: PanelState,
}

impl EditorPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &PanelState {
        &self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open)
    }

    /// Opens the panel directly when a session is active, otherwise asks
    /// for credentials.
    ///
    /// # Errors
    /// Returns error if the session store cannot be read.
    pub fn request_open<S: KeyValueStore>(&mut self, sessions: &SessionManager<S>) -> Result<()> {
        self.state = if sessions.get_session()?.is_some() {
            PanelState::Open
        } else {
            PanelState::LoginPrompt { error: None }
        };
        Ok(())
    }

    /// Submits credentials from the login prompt. Returns `true` when the
    /// panel opened; a mismatch keeps the prompt with an error message.
    ///
    /// # Errors
    /// Returns `AppError::InvalidData` outside the login prompt, or any
    /// non-authentication error from the session manager.
    pub fn submit_login<S: KeyValueStore>(
        &mut self,
        sessions: &SessionManager<S>,
        username: &str,
        password: &str,
    ) -> Result<bool> {
        if !matches!(self.state, PanelState::LoginPrompt { .. }) {
            return Err(AppError::InvalidData {
                message: "Login is only possible from the login prompt".into(),
            });
        }

        match sessions.authenticate(username, password) {
            Ok(_) => {
                self.state = PanelState::Open;
                Ok(true)
            }
            Err(AppError::Auth) => {
                self.state = PanelState::LoginPrompt {
                    error: Some(AppError::Auth.to_string()),
                };
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Dismisses the login prompt or closes the panel.
    pub fn close(&mut self) {
        self.state = PanelState::Closed;
    }

    /// Ends the session and closes the panel.
    ///
    /// # Errors
    /// Returns error if the session cannot be cleared.
    pub fn logout<S: KeyValueStore>(&mut self, sessions: &SessionManager<S>) -> Result<()> {
        sessions.clear_session()?;
        self.state = PanelState::Closed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::domain::AdminConfig;
    use crate::infrastructure::MemoryStorage;

    fn store() -> ContentStore<Rc<MemoryStorage>> {
        ContentStore::open(Rc::new(MemoryStorage::new())).unwrap()
    }

    #[test]
    fn test_edits_touch_only_draft() {
        let mut store = store();
        let mut editor = ContentEditor::new(&store);

        editor
            .apply(DraftEdit::SetAboutTitle("Nosotras".into()))
            .unwrap();

        assert_eq!(editor.draft().about.title, "Nosotras");
        assert_eq!(store.current().about.title, "Quiénes somos");
        assert!(editor.is_dirty(&store));

        editor.commit(&mut store).unwrap();
        assert_eq!(store.load().about.title, "Nosotras");
        assert!(!editor.is_dirty(&store));
    }

    #[test]
    fn test_flip_words_and_lines_parsing() {
        assert_eq!(
            parse_flip_words(" sin   vueltas ,, sin demoras,"),
            vec!["sin vueltas", "sin demoras"]
        );
        assert_eq!(parse_lines("uno\n\n  dos  \n"), vec!["uno", "dos"]);

        let mut editor = ContentEditor::new(&store());
        editor
            .apply(DraftEdit::SetFlipWords("rápido, claro".into()))
            .unwrap();
        assert_eq!(editor.draft().hero.flip_words, vec!["rápido", "claro"]);
    }

    #[test]
    fn test_bullet_reordering() {
        let mut editor = ContentEditor::new(&store());
        let original = editor.draft().about.bullets.clone();

        editor
            .apply(DraftEdit::MoveAboutBullet {
                index: 0,
                direction: MoveDirection::Up,
            })
            .unwrap();
        assert_eq!(editor.draft().about.bullets, original);

        editor
            .apply(DraftEdit::MoveAboutBullet {
                index: 0,
                direction: MoveDirection::Down,
            })
            .unwrap();
        assert_eq!(editor.draft().about.bullets[1], original[0]);

        let last = original.len() - 1;
        editor
            .apply(DraftEdit::MoveAboutBullet {
                index: last,
                direction: MoveDirection::Down,
            })
            .unwrap();
        assert_eq!(editor.draft().about.bullets[last], original[last]);
    }

    #[test]
    fn test_list_add_update_remove() {
        let mut editor = ContentEditor::new(&store());

        editor.apply(DraftEdit::AddService).unwrap();
        assert_eq!(editor.draft().services.len(), 5);
        assert_eq!(editor.draft().services[4].title, "Nuevo servicio");

        editor
            .apply(DraftEdit::UpdateService {
                index: 4,
                title: None,
                desc: Some("Detalle".into()),
            })
            .unwrap();
        assert_eq!(editor.draft().services[4].title, "Nuevo servicio");
        assert_eq!(editor.draft().services[4].desc, "Detalle");

        editor.apply(DraftEdit::RemoveService(0)).unwrap();
        assert_eq!(editor.draft().services.len(), 4);

        editor.apply(DraftEdit::AddTestimonial).unwrap();
        editor
            .apply(DraftEdit::SetTestimonialImage {
                index: 2,
                image: Some("data:image/png;base64,AA==".into()),
            })
            .unwrap();
        let added = &editor.draft().testimonials[2];
        assert_eq!(added.role.as_deref(), Some("Rol"));
        assert_eq!(added.image_url.as_deref(), Some("data:image/png;base64,AA=="));

        editor.apply(DraftEdit::AddAboutBullet).unwrap();
        assert_eq!(editor.draft().about.bullets.last().unwrap(), "Nuevo punto");
    }

    #[test]
    fn test_out_of_range_index_leaves_draft_unchanged() {
        let mut editor = ContentEditor::new(&store());
        let before = editor.draft().clone();

        let err = editor.apply(DraftEdit::RemoveTestimonial(9)).unwrap_err();
        assert!(matches!(err, AppError::InvalidData { .. }));

        assert!(editor
            .apply(DraftEdit::MoveAboutBullet {
                index: 3,
                direction: MoveDirection::Up,
            })
            .is_err());
        assert_eq!(editor.draft(), &before);
    }

    #[test]
    fn test_sync_resets_draft_after_external_save() {
        let mut store = store();
        let mut editor = ContentEditor::new(&store);
        editor.apply(DraftEdit::SetHeroSubtitle("Local".into())).unwrap();

        assert!(!editor.sync(&store));
        assert_eq!(editor.draft().hero.subtitle, "Local");

        let mut external = SiteDocument::default();
        external.hero.subtitle = "Remoto".into();
        store.save(external).unwrap();

        assert!(editor.sync(&store));
        assert_eq!(editor.draft().hero.subtitle, "Remoto");
    }

    #[test]
    fn test_export_is_pretty_json_with_fixed_name() {
        let editor = ContentEditor::new(&store());
        let file = editor.export_document().unwrap();

        assert_eq!(file.filename, "tco-content.json");
        assert!(file.contents.starts_with("{\n  \"logoUrl\""));
        let back: SiteDocument = serde_json::from_str(&file.contents).unwrap();
        assert_eq!(&back, editor.draft());
    }

    #[test]
    fn test_import_missing_section_is_rejected() {
        let mut editor = ContentEditor::new(&store());
        editor.apply(DraftEdit::SetAboutTitle("Borrador en curso".into())).unwrap();
        let before = serde_json::to_string(editor.draft()).unwrap();

        let text = json!({ "hero": {}, "about": {}, "services": [] }).to_string();
        let err = ContentEditor::prepare_import(&text).unwrap_err();

        assert!(matches!(err, AppError::Import { ref message } if message.contains("testimonials")));
        assert_eq!(serde_json::to_string(editor.draft()).unwrap(), before);
    }

    #[test]
    fn test_import_rejects_falsy_and_non_json() {
        let falsy = json!({ "hero": null, "about": {}, "services": [], "testimonials": [] });
        assert!(ContentEditor::prepare_import(&falsy.to_string()).is_err());
        assert!(ContentEditor::prepare_import("not json").is_err());
        assert!(ContentEditor::prepare_import("[]").is_err());

        let wrong_type =
            json!({ "hero": {}, "about": {}, "services": "many", "testimonials": [] });
        assert!(ContentEditor::prepare_import(&wrong_type.to_string()).is_err());
    }

    #[test]
    fn test_import_replaces_draft_verbatim() {
        let mut editor = ContentEditor::new(&store());
        let text = json!({
            "hero": { "titleBase": "Hola" },
            "about": {},
            "services": [],
            "testimonials": [{ "quote": "Genial", "name": "Ana" }]
        })
        .to_string();

        let pending = ContentEditor::prepare_import(&text).unwrap();
        assert_eq!(pending.document().hero.title_base, "Hola");
        editor.apply_import(pending);

        // No merge with defaults at import time
        let draft = editor.draft();
        assert!(draft.logo_url.is_none());
        assert!(draft.services.is_empty());
        assert_eq!(draft.about.title, "");
        assert_eq!(draft.testimonials[0].name, "Ana");
    }

    #[test]
    fn test_edit_validate_export_scenario() {
        let kv = Rc::new(MemoryStorage::new());
        let store = ContentStore::open(Rc::clone(&kv)).unwrap();
        assert_eq!(store.load(), SiteDocument::default());

        let mut editor = ContentEditor::new(&store);
        editor.apply(DraftEdit::SetAboutTitle("Hola!".into())).unwrap();
        assert!(!editor.validate_about().title_ok);

        editor
            .apply(DraftEdit::SetAboutTitle("Quiénes somos".into()))
            .unwrap();
        assert!(editor.validate_about().title_ok);

        let exported = editor.export_document().unwrap();
        kv.set_item(crate::application::content_store::CONTENT_KEY, &exported.contents)
            .unwrap();
        assert_eq!(store.load().about.title, "Quiénes somos");
    }

    #[test]
    fn test_panel_state_machine() {
        let admin = AdminConfig {
            username: Some("editora".into()),
            password: Some("clave".into()),
            session_ttl_hours: 12,
        };
        let sessions = SessionManager::new(MemoryStorage::new(), admin);
        let mut panel = EditorPanel::new();
        assert_eq!(panel.state(), &PanelState::Closed);

        assert!(panel.submit_login(&sessions, "editora", "clave").is_err());

        panel.request_open(&sessions).unwrap();
        assert_eq!(panel.state(), &PanelState::LoginPrompt { error: None });

        assert!(!panel.submit_login(&sessions, "editora", "mal").unwrap());
        assert!(matches!(
            panel.state(),
            PanelState::LoginPrompt { error: Some(_) }
        ));

        assert!(panel.submit_login(&sessions, "editora", "clave").unwrap());
        assert!(panel.is_open());

        panel.close();
        panel.request_open(&sessions).unwrap();
        assert!(panel.is_open());

        panel.logout(&sessions).unwrap();
        assert_eq!(panel.state(), &PanelState::Closed);
        assert!(sessions.get_session().unwrap().is_none());

        panel.request_open(&sessions).unwrap();
        panel.close();
        assert_eq!(panel.state(), &PanelState::Closed);
    }
}
