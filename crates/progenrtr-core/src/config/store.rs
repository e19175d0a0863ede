//! INI-style key/value store with `${...}` interpolation
//!
//! The dialect follows the common "extended interpolation" INI flavour:
//! - `[section]` headers, `key = value` or `key: value` options
//! - full-line comments starting with `#` or `;`
//! - option names are case-folded, section names are not
//! - lines indented deeper than their option continue its value
//! - a `[DEFAULT]` section whose options are visible from every section
//! - `${key}` (same section) and `${section:key}` references, `$$` for a literal `$`
//!
//! All values are interpolated when the file is loaded. Inherited `DEFAULT`
//! options are interpolated in each section that inherits them, so
//! `${key}` inside a default resolves against the inheriting section first.

use super::error::{ConfigError, Result};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Section whose options are inherited by every other section
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Longest chain of nested references allowed while interpolating one value
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Ordered `key -> value` pairs of a single section
pub type Entries = Vec<(String, String)>;

/// A parsed INI file: ordered sections of ordered `key -> value` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStore {
    defaults: Entries,
    sections: Vec<(String, Entries)>,
}

impl RawStore {
    /// Read and parse the file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "parsing config file");
        Self::parse(&content, path)
    }

    /// Parse INI source text; `origin` is only used in error messages
    pub fn parse(source: &str, origin: &Path) -> Result<Self> {
        let raw = Parser::new(origin).run(source)?;
        raw.interpolated()
    }

    /// Whether a section called `name` exists (`DEFAULT` is not a listed section)
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|(section, _)| section == name)
    }

    /// Section names in file order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    /// All options visible in `name`: its own, followed by inherited defaults
    pub fn section(&self, name: &str) -> Option<Vec<(&str, &str)>> {
        let own = self.own_entries(name)?;
        let mut visible: Vec<(&str, &str)> = pairs(own).collect();
        for (key, value) in pairs(&self.defaults) {
            if !own.iter().any(|(k, _)| k == key) {
                visible.push((key, value));
            }
        }
        Some(visible)
    }

    /// Look up a single option, falling back to `DEFAULT`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = fold_key(key);
        let own = if section == DEFAULT_SECTION {
            None
        } else {
            Some(self.own_entries(section)?)
        };

        own.and_then(|entries| find(entries, &key))
            .or_else(|| find(&self.defaults, &key))
    }

    fn own_entries(&self, name: &str) -> Option<&Entries> {
        self.sections
            .iter()
            .find(|(section, _)| section == name)
            .map(|(_, entries)| entries)
    }

    /// Produce a copy of this store with every value interpolated
    ///
    /// Each section of the copy holds its inherited defaults as its own
    /// options, interpolated in that section; the copy has no `DEFAULT` entries.
    fn interpolated(&self) -> Result<Self> {
        let interpolator = Interpolator { raw: self };

        let sections = self
            .sections
            .iter()
            .map(|(name, _)| {
                let visible: Entries = self
                    .section(name)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect();
                Ok((name.clone(), interpolator.section(name, &visible)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            defaults: Entries::new(),
            sections,
        })
    }
}

fn fold_key(key: &str) -> String {
    key.trim_end().to_lowercase()
}

fn find<'a>(entries: &'a Entries, key: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn pairs(entries: &Entries) -> impl Iterator<Item = (&str, &str)> {
    entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

/// Where parsed options are currently being written
#[derive(Debug, Clone, Copy)]
enum Target {
    Defaults,
    Section(usize),
}

/// Line-oriented parser producing an uninterpolated store
struct Parser<'a> {
    origin: &'a Path,
    defaults: Vec<(String, Vec<String>)>,
    sections: Vec<(String, Vec<(String, Vec<String>)>)>,
    errors: Vec<(usize, String)>,
}

impl<'a> Parser<'a> {
    fn new(origin: &'a Path) -> Self {
        Self {
            origin,
            defaults: Vec::new(),
            sections: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(mut self, source: &str) -> Result<RawStore> {
        let mut target: Option<Target> = None;
        // Index of the option whose value continuation lines extend
        let mut option: Option<usize> = None;
        let mut indent_level = 0usize;

        for (index, line) in source.lines().enumerate() {
            let lineno = index + 1;
            let value = line.trim();

            if value.starts_with('#') || value.starts_with(';') {
                continue;
            }

            if value.is_empty() {
                // Blank lines are kept inside multi-line values and trimmed on join
                if let (Some(t), Some(o)) = (target, option) {
                    self.lines_mut(t, o).push(String::new());
                }
                continue;
            }

            let cur_indent = line.len() - line.trim_start().len();

            if let (Some(t), Some(o)) = (target, option) {
                if cur_indent > indent_level {
                    self.lines_mut(t, o).push(value.to_string());
                    continue;
                }
            }

            indent_level = cur_indent;

            if let Some(header) = section_header(value) {
                target = Some(self.open_section(header));
                option = None;
                continue;
            }

            let Some(current) = target else {
                return Err(ConfigError::MissingSectionHeader {
                    path: self.origin.to_path_buf(),
                    line: lineno,
                    content: line.to_string(),
                });
            };

            match split_option(value) {
                Some((key, val)) if !key.is_empty() => {
                    option = Some(self.set_option(current, fold_key(key), val.to_string()));
                }
                _ => {
                    self.errors.push((lineno, line.to_string()));
                    option = None;
                }
            }
        }

        if !self.errors.is_empty() {
            return Err(ConfigError::Parse {
                path: self.origin.to_path_buf(),
                lines: self.errors,
            });
        }

        Ok(RawStore {
            defaults: join_values(self.defaults),
            sections: self
                .sections
                .into_iter()
                .map(|(name, entries)| (name, join_values(entries)))
                .collect(),
        })
    }

    fn entries_mut(&mut self, target: Target) -> &mut Vec<(String, Vec<String>)> {
        match target {
            Target::Defaults => &mut self.defaults,
            Target::Section(index) => &mut self.sections[index].1,
        }
    }

    fn lines_mut(&mut self, target: Target, option: usize) -> &mut Vec<String> {
        &mut self.entries_mut(target)[option].1
    }

    /// Open (or re-open) a section and return where its options go
    fn open_section(&mut self, name: &str) -> Target {
        if name == DEFAULT_SECTION {
            return Target::Defaults;
        }
        if let Some(index) = self.sections.iter().position(|(s, _)| s == name) {
            return Target::Section(index);
        }
        self.sections.push((name.to_string(), Vec::new()));
        Target::Section(self.sections.len() - 1)
    }

    /// Insert or overwrite an option, returning its index in the section
    fn set_option(&mut self, target: Target, key: String, value: String) -> usize {
        let entries = self.entries_mut(target);
        match entries.iter().position(|(k, _)| *k == key) {
            Some(index) => {
                entries[index].1 = vec![value];
                index
            }
            None => {
                entries.push((key, vec![value]));
                entries.len() - 1
            }
        }
    }
}

/// `[name]` with everything up to the last closing bracket as the name
fn section_header(value: &str) -> Option<&str> {
    let rest = value.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    let name = &rest[..end];
    (!name.is_empty()).then_some(name)
}

/// Split at the first `=` or `:` delimiter
fn split_option(value: &str) -> Option<(&str, &str)> {
    let at = value.find(|c: char| c == '=' || c == ':')?;
    Some((value[..at].trim_end(), value[at + 1..].trim()))
}

fn join_values(entries: Vec<(String, Vec<String>)>) -> Entries {
    entries
        .into_iter()
        .map(|(key, lines)| (key, lines.join("\n").trim_end().to_string()))
        .collect()
}

/// Resolves `${...}` references against the raw store
struct Interpolator<'a> {
    raw: &'a RawStore,
}

impl Interpolator<'_> {
    fn section(&self, name: &str, entries: &Entries) -> Result<Entries> {
        entries
            .iter()
            .map(|(key, value)| {
                let mut stack = vec![(name.to_string(), key.clone())];
                Ok((key.clone(), self.expand(name, key, value, &mut stack)?))
            })
            .collect()
    }

    /// Expand `value` of `section`/`option`; `stack` holds the references being resolved
    fn expand(
        &self,
        section: &str,
        option: &str,
        value: &str,
        stack: &mut Vec<(String, String)>,
    ) -> Result<String> {
        if stack.len() > MAX_INTERPOLATION_DEPTH {
            return Err(ConfigError::InterpolationDepth {
                section: section.to_string(),
                option: option.to_string(),
                max_depth: MAX_INTERPOLATION_DEPTH,
            });
        }

        let syntax_error = |message: String| ConfigError::InterpolationSyntax {
            section: section.to_string(),
            option: option.to_string(),
            message,
        };

        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(at) = rest.find('$') {
            out.push_str(&rest[..at]);
            rest = &rest[at..];

            match rest[1..].chars().next() {
                Some('$') => {
                    out.push('$');
                    rest = &rest[2..];
                }
                Some('{') => {
                    let end = rest
                        .find('}')
                        .filter(|end| *end > 2)
                        .ok_or_else(|| syntax_error(format!("bad variable reference {:?}", rest)))?;
                    let reference = &rest[2..end];
                    rest = &rest[end + 1..];

                    let parts: Vec<&str> = reference.split(':').collect();
                    let (target_section, target_option) = match parts.as_slice() {
                        [key] => (section.to_string(), fold_key(key)),
                        [sect, key] => (sect.to_string(), fold_key(key)),
                        _ => {
                            return Err(syntax_error(format!(
                                "more than one ':' found in {:?}",
                                reference
                            )))
                        }
                    };

                    let target = self
                        .raw
                        .get(&target_section, &target_option)
                        .ok_or_else(|| ConfigError::MissingReference {
                            section: section.to_string(),
                            option: option.to_string(),
                            reference: reference.to_string(),
                        })?;

                    if !target.contains('$') {
                        out.push_str(target);
                        continue;
                    }

                    let link = (target_section, target_option);
                    if stack.contains(&link) {
                        let mut chain: Vec<String> =
                            stack.iter().map(|(s, k)| format!("{}:{}", s, k)).collect();
                        chain.push(format!("{}:{}", link.0, link.1));
                        return Err(ConfigError::ReferenceCycle {
                            section: section.to_string(),
                            option: option.to_string(),
                            chain,
                        });
                    }

                    stack.push(link.clone());
                    let expanded = self.expand(&link.0, &link.1, target, stack)?;
                    stack.pop();
                    out.push_str(&expanded);
                }
                _ => {
                    return Err(syntax_error(format!(
                        "'$' must be followed by '$' or '{{', found: {:?}",
                        rest
                    )))
                }
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}

impl FromStr for RawStore {
    type Err = ConfigError;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source, Path::new("<string>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn parse(source: &str) -> Result<RawStore> {
        source.parse()
    }

    #[test]
    fn test_sections_and_delimiters() {
        let store = parse(
            "[ProGenrtr]\nlanguages = c, rust\n\n[project.c]\nlib: https://example.com/c-lib.git\n",
        )
        .unwrap();

        assert_eq!(store.section_names().collect::<Vec<_>>(), vec!["ProGenrtr", "project.c"]);
        assert_eq!(store.get("ProGenrtr", "languages"), Some("c, rust"));
        assert_eq!(store.get("project.c", "lib"), Some("https://example.com/c-lib.git"));
    }

    #[test]
    fn test_indented_file_is_parsed() {
        let store = parse(
            "
    [ProGenrtr]
    languages = test_language

    [project.test_language]
    test_project: testProject
",
        )
        .unwrap();

        assert_eq!(store.get("ProGenrtr", "languages"), Some("test_language"));
        assert_eq!(store.get("project.test_language", "test_project"), Some("testProject"));
    }

    #[test]
    fn test_continuation_lines_join_with_newline() {
        let store = parse("[META]\ncfgpaths = ~/.a,\n    ~/.b,\n\n    /etc/c\nnext = 1\n").unwrap();

        assert_eq!(store.get("META", "cfgpaths"), Some("~/.a,\n~/.b,\n\n/etc/c"));
        assert_eq!(store.get("META", "next"), Some("1"));
    }

    #[test]
    fn test_trailing_blank_lines_are_trimmed() {
        let store = parse("[a]\nkey = value\n\n\n[b]\n").unwrap();
        assert_eq!(store.get("a", "key"), Some("value"));
    }

    #[test]
    fn test_comments_are_ignored() {
        let store = parse("# leading\n[a]\n; note\nkey = value\n  # indented comment\n").unwrap();
        assert_eq!(store.section("a").unwrap(), vec![("key", "value")]);
    }

    #[test]
    fn test_keys_are_case_folded_sections_are_not() {
        let store = parse("[Section]\nMyKey = v\n").unwrap();

        assert_eq!(store.get("Section", "mykey"), Some("v"));
        assert_eq!(store.get("Section", "MYKEY"), Some("v"));
        assert_eq!(store.get("section", "mykey"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let store = parse("[a]\nkey = first\nother = x\nkey = second\n[b]\n[a]\nmore = y\n").unwrap();

        assert_eq!(
            store.section("a").unwrap(),
            vec![("key", "second"), ("other", "x"), ("more", "y")]
        );
        assert_eq!(store.section_names().count(), 2);
    }

    #[test]
    fn test_value_may_contain_delimiters() {
        let store = parse("[a]\nurl = https://host:8080/x?y=z\n").unwrap();
        assert_eq!(store.get("a", "url"), Some("https://host:8080/x?y=z"));
    }

    #[test]
    fn test_empty_value() {
        let store = parse("[a]\nkey =\n").unwrap();
        assert_eq!(store.get("a", "key"), Some(""));
    }

    #[test]
    fn test_defaults_are_inherited() {
        let store = parse("[DEFAULT]\nbase = /srv\nshared = d\n[a]\nshared = own\n").unwrap();

        assert!(!store.has_section(DEFAULT_SECTION));
        assert_eq!(store.get("a", "base"), Some("/srv"));
        assert_eq!(
            store.section("a").unwrap(),
            vec![("shared", "own"), ("base", "/srv")]
        );
        assert_eq!(store.get("missing", "base"), None);
    }

    #[test]
    fn test_interpolation_same_section() {
        let store = parse("[a]\nroot = /srv\npath = ${root}/templates\n").unwrap();
        assert_eq!(store.get("a", "path"), Some("/srv/templates"));
    }

    #[test]
    fn test_interpolation_cross_section_and_nested() {
        let store = parse(
            "[META]\nhost = https://git.example.com\norg = ${host}/team\n[project.rust]\ncli = ${META:org}/rust-cli.git\n",
        )
        .unwrap();

        assert_eq!(
            store.get("project.rust", "cli"),
            Some("https://git.example.com/team/rust-cli.git")
        );
    }

    #[test]
    fn test_interpolation_from_defaults() {
        let store = parse("[DEFAULT]\nbase = ~/templates\n[project.c]\nlib = ${base}/c-lib\n").unwrap();
        assert_eq!(store.get("project.c", "lib"), Some("~/templates/c-lib"));
    }

    #[test]
    fn test_defaults_resolve_references_in_inheriting_section() {
        let store = parse("[DEFAULT]\nurl = ${base}/x\n[project.c]\nbase = /srv\n").unwrap();

        assert_eq!(store.get("project.c", "url"), Some("/srv/x"));
        assert_eq!(store.get(DEFAULT_SECTION, "url"), None);
    }

    #[test]
    fn test_overridden_key_is_used_by_inherited_default() {
        let store = parse("[DEFAULT]\nbase = /d\nurl = ${base}/x\n[a]\nbase = /a\n[b]\n").unwrap();

        assert_eq!(store.get("a", "url"), Some("/a/x"));
        assert_eq!(store.get("b", "url"), Some("/d/x"));
    }

    #[test]
    fn test_inherited_default_with_missing_reference_fails_in_section() {
        let err = parse("[DEFAULT]\nurl = ${base}/x\n[a]\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingReference { ref section, ref option, .. } if section == "a" && option == "url"
        ));
    }

    #[test]
    fn test_unused_default_reference_without_sections_is_accepted() {
        assert!(parse("[DEFAULT]\nurl = ${base}/x\n").is_ok());
    }

    #[test]
    fn test_dollar_escape() {
        let store = parse("[a]\nprice = $$5\n").unwrap();
        assert_eq!(store.get("a", "price"), Some("$5"));
    }

    #[test]
    fn test_missing_reference_fails() {
        let err = parse("[a]\nfoo = ${bar}\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingReference { ref reference, .. } if reference == "bar"
        ));
    }

    #[test]
    fn test_missing_section_reference_fails() {
        let err = parse("[a]\nfoo = ${nowhere:bar}\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingReference { .. }));
    }

    #[test]
    fn test_reference_cycle_fails() {
        let err = parse("[a]\nx = ${y}\ny = ${b:z}\n[b]\nz = ${a:x}\n").unwrap_err();
        match err {
            ConfigError::ReferenceCycle { chain, .. } => {
                assert_eq!(chain, vec!["a:x", "a:y", "b:z", "a:x"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_reference_fails() {
        let err = parse("[a]\nx = ${x}\n").unwrap_err();
        assert!(matches!(err, ConfigError::ReferenceCycle { .. }));
    }

    #[test]
    fn test_depth_limit() {
        let mut source = String::from("[a]\nk0 = end\n");
        for i in 1..=12 {
            source.push_str(&format!("k{} = ${{k{}}}$$\n", i, i - 1));
        }
        let err = parse(&source).unwrap_err();
        assert!(matches!(err, ConfigError::InterpolationDepth { .. }));
    }

    #[test]
    fn test_bad_syntax() {
        for source in ["[a]\nx = $oops\n", "[a]\nx = ${unclosed\n", "[a]\nx = ${a:b:c}\n", "[a]\nx = ${}\n", "[a]\nx = end$\n"] {
            let err = parse(source).unwrap_err();
            assert!(
                matches!(err, ConfigError::InterpolationSyntax { .. }),
                "{source:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_missing_section_header() {
        let err = parse("key = value\n[a]\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingSectionHeader { line: 1, .. }));
    }

    #[test]
    fn test_parse_errors_are_collected() {
        let err = parse("[a]\nnot an option\nok = 1\n= novalue\n").unwrap_err();
        match err {
            ConfigError::Parse { lines, .. } => {
                assert_eq!(lines.iter().map(|(n, _)| *n).collect::<Vec<_>>(), vec![2, 4]);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = RawStore::load("/definitely/not/here.ini").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = RawStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ProGenrtr]\nlanguages = c").unwrap();

        let store = RawStore::load(file.path()).unwrap();
        assert_eq!(store.get("ProGenrtr", "languages"), Some("c"));
    }
}
