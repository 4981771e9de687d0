//! Ignore list resolution.
//!
//! The packaged tree must not carry development artifacts: VCS directories,
//! CI configuration, package-manager manifests, test directories, and a
//! curated set of dev-only vendored sub-paths. The default list lives in
//! `files-to-ignore.txt` (one relative path or name per line) and is embedded
//! at compile time; projects append their own entries via the settings file.
//!
//! Entries are plain relative paths or directory names. Matching is exact or
//! "entry plus path separator" prefix, never glob.

/// Built-in ignore entries, one per line.
const DEFAULT_IGNORE: &str = include_str!("files-to-ignore.txt");

/// Resolved, deduplicated set of paths to exclude from a package.
///
/// Append-only: the default entries are always present, extras are merged in
/// after them. Order is stable so tests and logs are deterministic.
#[derive(Debug, Clone)]
pub struct IgnoreList {
  entries: Vec<String>,
}

impl IgnoreList {
  /// The built-in default list with no project additions.
  pub fn defaults() -> Self {
    Self::resolve::<&str>(&[])
  }

  /// Merge the default list with project-supplied extra entries.
  ///
  /// Duplicates collapse to their first occurrence. Trailing slashes are
  /// stripped so `".github/"` and `".github"` are the same entry.
  pub fn resolve<S: AsRef<str>>(extra: &[S]) -> Self {
    let mut entries: Vec<String> = Vec::new();

    let defaults = DEFAULT_IGNORE.lines().map(str::trim);
    let extras = extra.iter().map(|s| s.as_ref().trim());

    for entry in defaults.chain(extras) {
      let entry = entry.trim_end_matches('/');
      if entry.is_empty() {
        continue;
      }
      if !entries.iter().any(|e| e == entry) {
        entries.push(entry.to_string());
      }
    }

    Self { entries }
  }

  /// The resolved entries, defaults first, in insertion order.
  pub fn entries(&self) -> &[String] {
    &self.entries
  }

  /// Whether a path relative to the staged root is covered by the list.
  ///
  /// A path matches when it equals an entry or lies underneath one
  /// (`"tests"` covers `"tests/unit/FooTest.php"`).
  pub fn matches(&self, relative_path: &str) -> bool {
    let path = relative_path.trim_end_matches('/');
    self
      .entries
      .iter()
      .any(|entry| path == entry || path.strip_prefix(entry.as_str()).is_some_and(|rest| rest.starts_with('/')))
  }
}
