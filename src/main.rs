//! Site Content - manage the editable content of a small marketing site.
//!
//! The site document (hero, about, services, testimonials, logo) lives in a
//! local key-value store. Anyone can read it; editing, importing and
//! exporting need an editor session opened with the configured credentials.
//!
//! QUICK START:
//!   site-content init-config                     # Write ~/.site-content/config.toml
//!   site-content show                            # Print the current document
//!   site-content login -u <user> -p <pass>       # Open a 12h editor session
//!   site-content edit about-title "Quiénes somos"
//!   site-content export -o backup.json           # Save the document as JSON
//!   site-content import backup.json              # Replace it from a file

use std::io::{BufRead, Write};
use std::path::Path;

use clap::Parser;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use site_content::application::{
    format_about_report, format_document_json, format_document_markdown, format_document_table,
    validate_about, validate_all, ContactForm, ContactValidation, ContentEditor, ContentStore,
    DraftEdit, EditorPanel, OutputFormat, SessionManager, ThemeStore, EXPORT_FILENAME,
};
use site_content::cli::{Cli, Commands, EditOp, ThemeArg};
use site_content::domain::{self, AppConfig, AppError, Theme};
use site_content::infrastructure::{
    self, ensure_config_exists, load_config, read_as_data_url, LocalStorage,
};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| AppError::Config { message: e })?;

    if let Commands::InitConfig = cli.command {
        return cmd_init_config(cli.config.as_deref());
    }

    let config = load_config(cli.config.as_deref())?;
    let storage = LocalStorage::open(&config.storage_db_path())?;

    match cli.command {
        Commands::Show => cmd_show(&storage, format)?,
        Commands::Validate => cmd_validate(&storage)?,
        Commands::Login { username, password } => {
            cmd_login(&storage, &config, &username, &password)?;
        }
        Commands::Logout => cmd_logout(&storage, &config)?,
        Commands::Status => cmd_status(&storage, &config)?,
        Commands::Export { output } => cmd_export(&storage, &config, output.as_deref())?,
        Commands::Import { file, yes } => cmd_import(&storage, &config, &file, yes)?,
        Commands::Edit { op } => cmd_edit(&storage, &config, op)?,
        Commands::Theme { mode } => cmd_theme(&storage, mode)?,
        Commands::Contact {
            first_name,
            last_name,
            email,
            message,
            empresa,
        } => {
            let form = ContactForm {
                first_name,
                last_name,
                email,
                message,
                honeypot: empresa,
            };
            cmd_contact(&config, &form)?;
        }
        Commands::Paths => cmd_paths(&storage, &config, cli.config.as_deref())?,
        Commands::InitConfig => {}
    }

    Ok(())
}

fn sessions<'a>(
    storage: &'a LocalStorage,
    config: &AppConfig,
) -> SessionManager<&'a LocalStorage> {
    SessionManager::new(storage, config.admin.clone())
}

/// Show the document command.
fn cmd_show(storage: &LocalStorage, format: OutputFormat) -> domain::Result<()> {
    let store = ContentStore::open(storage)?;

    let output = match format {
        OutputFormat::Markdown => format_document_markdown(store.current()),
        OutputFormat::Json => {
            format_document_json(store.current()).map_err(AppError::json_parse)?
        }
        OutputFormat::Table => format_document_table(store.current()),
    };

    println!("{output}");
    Ok(())
}

/// Validate the stored about section.
fn cmd_validate(storage: &LocalStorage) -> domain::Result<()> {
    let store = ContentStore::open(storage)?;
    print!("{}", format_about_report(&validate_about(&store.current().about)));
    Ok(())
}

/// Login command.
fn cmd_login(
    storage: &LocalStorage,
    config: &AppConfig,
    username: &str,
    password: &str,
) -> domain::Result<()> {
    let sessions = sessions(storage, config);
    let mut panel = EditorPanel::new();

    panel.request_open(&sessions)?;
    let session = if panel.is_open() {
        // Credentials are still checked; success extends the session.
        sessions.authenticate(username, password)?
    } else {
        if !panel.submit_login(&sessions, username, password)? {
            return Err(AppError::Auth);
        }
        sessions.require_session()?
    };

    let expires = session
        .expires_at_utc()
        .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d %H:%M UTC").to_string());

    println!(
        "{} Logged in. Session valid until {}",
        "✓".green().bold(),
        expires.cyan()
    );
    Ok(())
}

/// Logout command.
fn cmd_logout(storage: &LocalStorage, config: &AppConfig) -> domain::Result<()> {
    let mut panel = EditorPanel::new();
    panel.logout(&sessions(storage, config))?;
    println!("{} Logged out", "✓".green());
    Ok(())
}

/// Status command.
fn cmd_status(storage: &LocalStorage, config: &AppConfig) -> domain::Result<()> {
    let session = sessions(storage, config).get_session()?;
    let theme = ThemeStore::new(storage).load()?;

    println!("{}", "📊 Status".bold());
    match session.and_then(|s| s.expires_at_utc()) {
        Some(expires) => println!(
            "  Editor session: {} (until {})",
            "active".green(),
            expires.format("%Y-%m-%d %H:%M UTC")
        ),
        None => println!("  Editor session: {}", "none".yellow()),
    }
    println!("  Theme: {}", theme.to_string().cyan());
    println!(
        "  Credentials configured: {}",
        if config.admin.credentials().is_some() {
            "yes".green()
        } else {
            "no".red()
        }
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Key", "Bytes", "Updated"]);
    for entry in storage.list_keys()? {
        let updated = entry.updated_at.map_or_else(
            || "-".to_string(),
            |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
        );
        table.add_row(vec![&entry.key, &entry.size_bytes.to_string(), &updated]);
    }
    println!("{table}");
    println!("Storage size: {} bytes", storage.get_storage_size()?);

    Ok(())
}

/// Export command.
fn cmd_export(
    storage: &LocalStorage,
    config: &AppConfig,
    output: Option<&Path>,
) -> domain::Result<()> {
    sessions(storage, config).require_session()?;

    let store = ContentStore::open(storage)?;
    let file = ContentEditor::new(&store).export_document()?;
    let path = output.unwrap_or_else(|| Path::new(file.filename));

    std::fs::write(path, &file.contents)
        .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))?;

    println!("{} Exported content to {}", "✓".green().bold(), path.display());
    Ok(())
}

/// Import command.
fn cmd_import(
    storage: &LocalStorage,
    config: &AppConfig,
    file: &Path,
    assume_yes: bool,
) -> domain::Result<()> {
    sessions(storage, config).require_session()?;

    let text = std::fs::read_to_string(file)
        .map_err(|e| AppError::io(format!("Failed to read {}", file.display()), e))?;

    let mut store = ContentStore::open(storage)?;
    let mut editor = ContentEditor::new(&store);
    let pending = ContentEditor::prepare_import(&text)?;

    let incoming = pending.document();
    println!(
        "{} \"{}\": {} services, {} testimonials, {} about bullets",
        "📥".bold(),
        incoming.hero.title_base,
        incoming.services.len(),
        incoming.testimonials.len(),
        incoming.about.bullets.len()
    );

    if !assume_yes && !confirm("Replace the current content?")? {
        println!("Import cancelled");
        return Ok(());
    }

    editor.apply_import(pending);
    print!("{}", format_about_report(&editor.validate_about()));
    editor.commit(&mut store)?;

    println!("{} Imported {}", "✓".green().bold(), file.display());
    Ok(())
}

/// Edit command: apply one change to a draft and save it.
fn cmd_edit(storage: &LocalStorage, config: &AppConfig, op: EditOp) -> domain::Result<()> {
    sessions(storage, config).require_session()?;

    let mut store = ContentStore::open(storage)?;
    let mut editor = ContentEditor::new(&store);

    editor.apply(draft_edit(op)?)?;
    editor.commit(&mut store)?;

    print!("{}", format_about_report(&editor.validate_about()));
    println!("{} Saved", "✓".green().bold());
    Ok(())
}

/// Converts a CLI edit into a draft edit, embedding image files.
fn draft_edit(op: EditOp) -> domain::Result<DraftEdit> {
    let image = |file: Option<&Path>| file.map(read_as_data_url).transpose();

    Ok(match op {
        EditOp::Logo { file, .. } => DraftEdit::SetLogo(image(file.as_deref())?),
        EditOp::HeroTitle { text } => DraftEdit::SetHeroTitle(text),
        EditOp::FlipWords { words } => DraftEdit::SetFlipWords(words),
        EditOp::Subtitle { text } => DraftEdit::SetHeroSubtitle(text),
        EditOp::HeroBullets { lines } => DraftEdit::SetHeroBullets(lines),
        EditOp::AboutTitle { text } => DraftEdit::SetAboutTitle(text),
        EditOp::AboutText { text } => DraftEdit::SetAboutParagraph(text),
        EditOp::AboutImage { file, .. } => DraftEdit::SetAboutImage(image(file.as_deref())?),
        EditOp::AddBullet => DraftEdit::AddAboutBullet,
        EditOp::SetBullet { index, text } => DraftEdit::UpdateAboutBullet { index, text },
        EditOp::RemoveBullet { index } => DraftEdit::RemoveAboutBullet(index),
        EditOp::MoveBullet { index, direction } => DraftEdit::MoveAboutBullet {
            index,
            direction: direction.into(),
        },
        EditOp::AddService => DraftEdit::AddService,
        EditOp::SetService { index, title, desc } => {
            DraftEdit::UpdateService { index, title, desc }
        }
        EditOp::RemoveService { index } => DraftEdit::RemoveService(index),
        EditOp::AddTestimonial => DraftEdit::AddTestimonial,
        EditOp::SetTestimonial {
            index,
            quote,
            name,
            role,
        } => DraftEdit::UpdateTestimonial {
            index,
            quote,
            name,
            role,
        },
        EditOp::TestimonialImage { index, file, .. } => DraftEdit::SetTestimonialImage {
            index,
            image: image(file.as_deref())?,
        },
        EditOp::RemoveTestimonial { index } => DraftEdit::RemoveTestimonial(index),
    })
}

/// Theme command.
fn cmd_theme(storage: &LocalStorage, mode: Option<ThemeArg>) -> domain::Result<()> {
    let themes = ThemeStore::new(storage);

    let theme = match mode {
        None => themes.load()?,
        Some(ThemeArg::Toggle) => themes.toggle()?,
        Some(ThemeArg::Light) => {
            themes.save(Theme::Light)?;
            Theme::Light
        }
        Some(ThemeArg::Dark) => {
            themes.save(Theme::Dark)?;
            Theme::Dark
        }
    };

    println!("Theme: {}", theme.to_string().cyan());
    Ok(())
}

/// Contact command: field validation only.
fn cmd_contact(config: &AppConfig, form: &ContactForm) -> domain::Result<()> {
    match validate_all(form) {
        ContactValidation::Valid => {
            println!("{} Contact details look good", "✓".green().bold());
        }
        ContactValidation::Invalid(errors) => {
            for (field, message) in &errors {
                println!("  {} {}: {}", "✗".red(), field, message);
            }
            return Err(AppError::InvalidData {
                message: "Completá los campos marcados.".into(),
            });
        }
        ContactValidation::Rejected(message) => {
            return Err(AppError::InvalidData {
                message: message.into(),
            });
        }
    }

    println!("💬 {}", config.site.contact_link);
    Ok(())
}

/// Show paths command.
fn cmd_paths(
    storage: &LocalStorage,
    config: &AppConfig,
    config_override: Option<&Path>,
) -> domain::Result<()> {
    let config_path =
        config_override.map_or_else(infrastructure::config_file_path, Path::to_path_buf);

    println!("{}", "📂 Site Content Paths".bold());
    println!();
    println!("  Config:  {}", config_path.display());
    println!("  Storage: {}", config.storage_db_path().display());
    println!("  Export:  ./{EXPORT_FILENAME}");
    println!();
    println!("Storage size: {} bytes", storage.get_storage_size()?);

    Ok(())
}

/// Init config command.
fn cmd_init_config(config_override: Option<&Path>) -> domain::Result<()> {
    let path = config_override.map_or_else(infrastructure::config_file_path, Path::to_path_buf);

    if ensure_config_exists(&path)? {
        println!("{} Created {}", "✓".green().bold(), path.display());
    } else {
        println!("Config already exists: {}", path.display());
    }
    Ok(())
}

/// Asks a yes/no question on stdin.
fn confirm(question: &str) -> domain::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout()
        .flush()
        .map_err(|e| AppError::io("Failed to flush stdout", e))?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| AppError::io("Failed to read answer", e))?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_content::domain::AdminConfig;

    fn config() -> AppConfig {
        AppConfig {
            admin: AdminConfig {
                username: Some("ed".into()),
                password: Some("pw".into()),
                session_ttl_hours: 12,
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_login_rejects_wrong_password_without_session() {
        let storage = LocalStorage::open_in_memory().unwrap();
        let config = config();

        assert!(matches!(
            cmd_login(&storage, &config, "ed", "WRONG"),
            Err(AppError::Auth)
        ));
        assert!(sessions(&storage, &config).get_session().unwrap().is_none());
    }

    #[test]
    fn test_login_rejects_wrong_password_with_active_session() {
        let storage = LocalStorage::open_in_memory().unwrap();
        let config = config();

        cmd_login(&storage, &config, "ed", "pw").unwrap();
        assert!(matches!(
            cmd_login(&storage, &config, "ed", "WRONG"),
            Err(AppError::Auth)
        ));

        // The earlier session is left as it was.
        assert!(sessions(&storage, &config).require_session().is_ok());
    }

    #[test]
    fn test_login_again_extends_session() {
        let storage = LocalStorage::open_in_memory().unwrap();
        let config = config();

        cmd_login(&storage, &config, "ed", "pw").unwrap();
        cmd_login(&storage, &config, "ed", "pw").unwrap();
        assert!(sessions(&storage, &config).require_session().is_ok());
    }

    #[test]
    fn test_contact_trap_field_rejects() {
        let form = ContactForm {
            first_name: "Ana".into(),
            last_name: "Pérez".into(),
            email: "ana@example.com".into(),
            honeypot: "ACME".into(),
            ..ContactForm::default()
        };

        let err = cmd_contact(&config(), &form).unwrap_err();
        assert!(err.to_string().contains("Se detectó un error en el envío."));
    }
}
