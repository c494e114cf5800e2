//! Extension ↔ media-type registry.
//!
//! A plain key/value store used by serving layers to map filename extensions
//! to media types and back. It is an owned value, not process-wide state;
//! callers that share one across threads must serialize mutation themselves.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

/// A registry of media types and their filename extensions.
///
/// Lookups are case-insensitive (keys are folded to lowercase on insert).
/// `extension_for` returns the first extension registered for a type;
/// re-registering a type appends extensions, and re-registering an extension
/// re-points it at the newer type.
///
/// # Examples
/// ```
/// use conneg::MimeRegistry;
///
/// let mut registry = MimeRegistry::new();
/// registry.register("text/html", &["html", "htm"]);
///
/// assert_eq!(registry.lookup("HTM"), Some("text/html"));
/// assert_eq!(registry.extension_for("text/html"), Some("html"));
/// assert_eq!(registry.lookup("png"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MimeRegistry {
    by_extension: HashMap<String, String>,
    by_type: HashMap<String, Vec<String>>,
}

impl MimeRegistry {
    /// Creates an empty registry.
    pub fn new() -> MimeRegistry {
        MimeRegistry::default()
    }

    /// Associates a media type with one or more filename extensions.
    pub fn register(&mut self, media_type: &str, extensions: &[&str]) {
        let media_type = media_type.to_ascii_lowercase();
        let known = self.by_type.entry(media_type.clone()).or_default();

        for extension in extensions {
            let extension = extension.to_ascii_lowercase();

            if !known.contains(&extension) {
                known.push(extension.clone());
            }

            self.by_extension.insert(extension, media_type.clone());
        }
    }

    /// Removes a media type and every extension still pointing at it.
    pub fn remove(&mut self, media_type: &str) {
        let media_type = media_type.to_ascii_lowercase();

        if let Some(extensions) = self.by_type.remove(&media_type) {
            for extension in extensions {
                if self.by_extension.get(&extension) == Some(&media_type) {
                    self.by_extension.remove(&extension);
                }
            }
        }
    }

    /// The media type registered for a filename extension.
    pub fn lookup(&self, extension: &str) -> Option<&str> {
        self.by_extension
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The first extension registered for a media type.
    pub fn extension_for(&self, media_type: &str) -> Option<&str> {
        self.by_type
            .get(&media_type.to_ascii_lowercase())
            .and_then(|extensions| extensions.first())
            .map(String::as_str)
    }

    /// Number of registered media types.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Whether no media types are registered.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Drops all registrations.
    pub fn clear(&mut self) {
        self.by_extension.clear();
        self.by_type.clear();
    }

    /// Loads Apache-style `mime.types` lines: `media/type ext1 ext2 …`, with
    /// `#` comments and blank lines skipped, and type-only lines ignored.
    ///
    /// Returns the number of lines that registered at least one extension.
    pub fn load_apache<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        let mut loaded = 0;

        for line in reader.lines() {
            let line = line?;
            let line = line.split('#').next().unwrap_or("").trim();

            if line.is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();

            if let Some(media_type) = fields.next() {
                let extensions: Vec<&str> = fields.collect();

                if !extensions.is_empty() {
                    self.register(media_type, &extensions);
                    loaded += 1;
                }
            }
        }

        tracing::debug!("loaded {} media type mappings", loaded);

        Ok(loaded)
    }

    /// Builds a registry from an Apache-style `mime.types` file on disk.
    pub fn load_path(path: impl AsRef<Path>) -> io::Result<MimeRegistry> {
        let mut registry = MimeRegistry::new();
        registry.load_apache(BufReader::new(File::open(path)?))?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut registry = MimeRegistry::new();
        registry.register("text/html", &["html", "htm"]);
        registry.register("image/png", &["png"]);

        assert_eq!(registry.lookup("html"), Some("text/html"));
        assert_eq!(registry.lookup("htm"), Some("text/html"));
        assert_eq!(registry.lookup("png"), Some("image/png"));
        assert_eq!(registry.lookup("gif"), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn case_insensitive_keys() {
        let mut registry = MimeRegistry::new();
        registry.register("Text/HTML", &["HTML"]);

        assert_eq!(registry.lookup("html"), Some("text/html"));
        assert_eq!(registry.extension_for("TEXT/html"), Some("html"));
    }

    #[test]
    fn first_extension_wins_extension_for() {
        let mut registry = MimeRegistry::new();
        registry.register("text/html", &["html", "htm"]);
        registry.register("text/html", &["xhtml"]);

        assert_eq!(registry.extension_for("text/html"), Some("html"));
        assert_eq!(registry.lookup("xhtml"), Some("text/html"));
    }

    #[test]
    fn later_type_takes_over_extension() {
        let mut registry = MimeRegistry::new();
        registry.register("text/plain", &["md"]);
        registry.register("text/markdown", &["md"]);

        assert_eq!(registry.lookup("md"), Some("text/markdown"));

        // removing the old type must not drop the re-pointed extension
        registry.remove("text/plain");
        assert_eq!(registry.lookup("md"), Some("text/markdown"));
    }

    #[test]
    fn remove_and_clear() {
        let mut registry = MimeRegistry::new();
        registry.register("text/html", &["html"]);
        registry.register("image/png", &["png"]);

        registry.remove("text/html");
        assert_eq!(registry.lookup("html"), None);
        assert_eq!(registry.lookup("png"), Some("image/png"));

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.lookup("png"), None);
    }

    #[test]
    fn apache_file_format() {
        let file = b"\
# comment line
text/html\thtml htm   # trailing comment
image/png png

application/octet-stream
video/mp4 mp4
";

        let mut registry = MimeRegistry::new();
        let loaded = registry.load_apache(&file[..]).unwrap();

        assert_eq!(loaded, 3);
        assert_eq!(registry.lookup("htm"), Some("text/html"));
        assert_eq!(registry.lookup("png"), Some("image/png"));
        assert_eq!(registry.lookup("mp4"), Some("video/mp4"));
        // type-only line registers nothing
        assert_eq!(registry.extension_for("application/octet-stream"), None);
    }
}
