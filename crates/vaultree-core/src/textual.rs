//! Classifier for file extensions that are probably textual.

use std::collections::HashSet;

use compact_str::CompactString;

/// Extension of the store's own ignore file.
pub const STORE_IGNORE_EXTENSION: &str = "vaultignore";

const BUILTIN_TEXTUAL: &[&str] = &[
    "adoc", "applescript", "as", "asc", "asciidoc", "asm", "asp", "aspx", "atom", "awk", "bash",
    "bat", "bib", "c", "cc", "cfg", "cjs", "clj", "cljs", "cls", "cmake", "coffee", "conf",
    "config", "cpp", "cs", "csh", "css", "csv", "cxx", "d", "dart", "diff", "dockerfile", "dtd",
    "editorconfig", "ejs", "el", "elm", "env", "erb", "erl", "ex", "exs", "f", "f90", "fish",
    "fs", "gemspec", "gitattributes", "gitignore", "gitmodules", "go", "gradle", "graphql",
    "groovy", "h", "haml", "handlebars", "hbs", "hcl", "hh", "hpp", "hrl", "hs", "htm", "html",
    "hxx", "ics", "ini", "ipynb", "jade", "java", "jl", "js", "json", "json5", "jsonld", "jsx",
    "kt", "kts", "less", "lhs", "liquid", "lisp", "lock", "log", "lua", "m", "make", "markdown",
    "md", "mdx", "mjs", "mk", "ml", "mli", "mm", "mustache", "nim", "nix", "njk", "opml", "org",
    "patch", "php", "pl", "plist", "pm", "po", "pod", "properties", "proto", "ps1", "psm1", "pug",
    "purs", "py", "pyi", "r", "rb", "rdoc", "rkt", "rs", "rss", "rst", "s", "sass", "scala",
    "scm", "scss", "sh", "sql", "srt", "styl", "sty", "svg", "swift", "tcl", "tex", "text",
    "textile", "tf", "toml", "ts", "tsv", "tsx", "twig", "txt", "vb", "vcf", "vim", "vtt", "vue",
    "wiki", "xhtml", "xml", "xsd", "xsl", "xslt", "yaml", "yml", "zig", "zsh",
];

/// Set of extensions whose files are worth previewing as text.
#[derive(Debug, Clone)]
pub struct TextualExtensions {
    extensions: HashSet<CompactString>,
}

impl Default for TextualExtensions {
    fn default() -> Self {
        let mut extensions: HashSet<CompactString> =
            BUILTIN_TEXTUAL.iter().map(|e| CompactString::from(*e)).collect();
        extensions.insert(CompactString::from(STORE_IGNORE_EXTENSION));
        Self { extensions }
    }
}

impl TextualExtensions {
    /// Create the built-in set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the built-in set plus extra extensions.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for ext in extra {
            set.insert(ext.as_ref());
        }
        set
    }

    /// Add an extension (case-insensitive, leading dot optional).
    pub fn insert(&mut self, extension: &str) {
        let ext = extension.trim_start_matches('.');
        if !ext.is_empty() {
            self.extensions.insert(CompactString::from(ext.to_ascii_lowercase()));
        }
    }

    /// Check if an extension is probably textual.
    pub fn is_probably_textual(&self, extension: &str) -> bool {
        self.extensions
            .contains(extension.to_ascii_lowercase().as_str())
    }

    /// Check if a file name should get a text preview.
    ///
    /// Names without an extension are assumed textual.
    pub fn should_preview(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => self.is_probably_textual(ext),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_and_ignore_file() {
        let set = TextualExtensions::new();
        assert!(set.is_probably_textual("md"));
        assert!(set.is_probably_textual("RS"));
        assert!(set.is_probably_textual(STORE_IGNORE_EXTENSION));
        assert!(!set.is_probably_textual("png"));
    }

    #[test]
    fn test_should_preview() {
        let set = TextualExtensions::new();
        assert!(set.should_preview("README"));
        assert!(set.should_preview("notes.txt"));
        assert!(set.should_preview("trailing."));
        assert!(!set.should_preview("image.png"));
        assert!(!set.should_preview("archive.tar.gz"));
    }

    #[test]
    fn test_with_extra() {
        let set = TextualExtensions::with_extra([".Foo", "bar"]);
        assert!(set.is_probably_textual("foo"));
        assert!(set.is_probably_textual("bar"));
    }
}
