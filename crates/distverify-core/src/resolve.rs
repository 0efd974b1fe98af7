//! `${name}` placeholder substitution for whitelist paths.
//!
//! Whitelists are usually shared between releases, so paths such as
//! `/lib/app-${project.version}.jar` are resolved against a set of variables
//! before reconciliation.

use crate::config::Variables;

const OPEN: &str = "${";
const CLOSE: char = '}';

/// A template after placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// The template with every known placeholder replaced.
    pub path: String,

    /// Names of placeholders that had no variable, in order of appearance.
    ///
    /// These placeholders are left literally in `path`.
    pub unresolved: Vec<String>,
}

impl ResolvedPath {
    /// Returns `true` if every placeholder was substituted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Substitutes `${name}` placeholders in `template`.
///
/// The template is scanned once from left to right. Each placeholder runs up
/// to the first following `}` and is resolved on its own; replacement values
/// are inserted literally and never scanned again. A placeholder without a
/// matching variable stays in the output unchanged and its name is recorded
/// in [`ResolvedPath::unresolved`]. An unterminated `${` is plain text.
///
/// # Examples
///
/// ```
/// use distverify_core::Variables;
/// use distverify_core::resolve;
///
/// let mut vars = Variables::new();
/// vars.insert("v".to_string(), "release".to_string());
///
/// let resolved = resolve("/${v}.txt", &vars);
/// assert_eq!(resolved.path, "/release.txt");
///
/// let resolved = resolve("/${other}.txt", &vars);
/// assert_eq!(resolved.path, "/${other}.txt");
/// assert_eq!(resolved.unresolved, vec!["other".to_string()]);
/// ```
#[must_use]
pub fn resolve(template: &str, variables: &Variables) -> ResolvedPath {
    let mut path = String::with_capacity(template.len());
    let mut unresolved = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(name_len) = after_open.find(CLOSE) else {
            break;
        };
        let name = &after_open[..name_len];
        let placeholder_end = start + OPEN.len() + name_len + CLOSE.len_utf8();

        path.push_str(&rest[..start]);
        match variables.get(name) {
            Some(value) => path.push_str(value),
            None => {
                path.push_str(&rest[start..placeholder_end]);
                unresolved.push(name.to_string());
            }
        }
        rest = &rest[placeholder_end..];
    }
    path.push_str(rest);

    ResolvedPath { path, unresolved }
}
