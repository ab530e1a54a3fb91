//! Application layer - use cases and orchestration.
//!
//! This layer contains the content store, editor session handling, the
//! draft editor and the formatting of documents for display.

pub mod contact;
pub mod content_store;
pub mod editor;
pub mod formatter;
pub mod preferences;
pub mod session;
pub mod validation;

pub use contact::{validate_all, ContactField, ContactForm, ContactValidation};
pub use content_store::{ContentStore, SubscriptionId, CONTENT_KEY};
pub use editor::{
    ContentEditor, DraftEdit, EditorPanel, ExportFile, MoveDirection, PanelState, PendingImport,
    EXPORT_FILENAME,
};
pub use formatter::{
    format_about_report, format_document_json, format_document_markdown, format_document_table,
    OutputFormat,
};
pub use preferences::{ThemeStore, THEME_KEY};
pub use session::{SessionManager, SESSION_KEY};
pub use validation::{validate_about, AboutReport};
