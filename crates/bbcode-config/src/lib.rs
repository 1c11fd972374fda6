//! Configuration loading for the BBCode interpreter.
//!
//! Reads tag definitions and substitution rules from XML or TOML documents
//! and builds a ready-to-use [`Interpreter`](bbcode_core::Interpreter).
//!
//! Configuration is resolved in this order:
//!
//! 1. An explicit path (`--config`)
//! 2. `bbcode.toml` or `bbcode.xml` in the current directory or any parent
//! 3. The bundled defaults ([`ConfigDocument::builtin`])

mod document;
mod error;
mod toml_doc;
mod xml;

use std::path::{Path, PathBuf};

pub use document::{ConfigDocument, Replacement, TagEntry};
pub use error::ConfigError;

/// Configuration filenames searched for, in order of preference.
pub const CONFIG_FILENAMES: &[&str] = &["bbcode.toml", "bbcode.xml"];

/// Load a configuration document from a file.
///
/// The format is chosen by extension: `.xml` or `.toml`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file does not exist,
/// [`ConfigError::UnsupportedFormat`] for any other extension, or the
/// underlying parse error.
pub fn load(path: &Path) -> Result<ConfigDocument, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let content = std::fs::read_to_string(path)?;
    let document = match extension.as_deref() {
        Some("xml") => ConfigDocument::from_xml(&content)?,
        Some("toml") => ConfigDocument::from_toml(&content)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    tracing::debug!(
        path = %path.display(),
        tags = document.tags.len(),
        replacements = document.replacements.len(),
        literal_replacements = document.literal_replacements.len(),
        "Loaded configuration"
    );

    Ok(document)
}

/// Search for a configuration file in the current directory and parents.
#[must_use]
pub fn discover() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    discover_from(&cwd)
}

/// Search for a configuration file in `start` and its parents.
#[must_use]
pub fn discover_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILENAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Resolve the configuration to use.
///
/// An explicit path must exist. Without one, a discovered file is used,
/// falling back to the bundled defaults.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be loaded.
pub fn resolve(explicit: Option<&Path>) -> Result<ConfigDocument, ConfigError> {
    if let Some(path) = explicit {
        return load(path);
    }

    if let Some(discovered) = discover() {
        tracing::info!(path = %discovered.display(), "Using discovered configuration");
        return load(&discovered);
    }

    tracing::debug!("No configuration file found, using built-in tags");
    Ok(ConfigDocument::builtin())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const TOML: &str = r#"
[[tags]]
name = "b"
open = "<b>"
close = "</b>"
"#;

    const XML: &str = r#"<bbcode><tags>
  <tag name="i" parameter="false"><open>&lt;i&gt;</open><close>&lt;/i&gt;</close></tag>
</tags></bbcode>"#;

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.toml");
        std::fs::write(&path, TOML).unwrap();

        let interpreter = load(&path).unwrap().build().unwrap();
        assert_eq!(interpreter.interpret("[b]x[/b]"), "<b>x</b>");
    }

    #[test]
    fn test_load_xml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.XML");
        std::fs::write(&path, XML).unwrap();

        let interpreter = load(&path).unwrap().build().unwrap();
        assert_eq!(interpreter.interpret("[i]x[/i]"), "<i>x</i>");
    }

    #[test]
    fn test_load_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(matches!(
            load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_discover_from_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("bbcode.xml"), XML).unwrap();

        assert_eq!(discover_from(&nested), Some(dir.path().join("bbcode.xml")));
    }

    #[test]
    fn test_discover_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bbcode.xml"), XML).unwrap();
        std::fs::write(dir.path().join("bbcode.toml"), TOML).unwrap();

        assert_eq!(
            discover_from(dir.path()),
            Some(dir.path().join("bbcode.toml"))
        );
    }

    #[test]
    fn test_discover_nearest_wins() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("bbcode.toml"), TOML).unwrap();
        std::fs::write(nested.join("bbcode.xml"), XML).unwrap();

        assert_eq!(discover_from(&nested), Some(nested.join("bbcode.xml")));
    }

    #[test]
    fn test_resolve_explicit_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.xml");

        assert!(matches!(
            resolve(Some(&path)),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.toml");
        std::fs::write(&path, TOML).unwrap();

        let document = resolve(Some(&path)).unwrap();
        assert_eq!(document.tags.len(), 1);
        assert_eq!(document.tags[0].name, "b");
    }
}
