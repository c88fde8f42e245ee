//! Hook scoping: rewrite a subtree's hook so it runs correctly from the
//! workspace root.
//!
//! Scoping anchors `files`/`exclude` to the subtree directory, makes local
//! hook ids unique by prefixing the subtree path, labels every hook with the
//! subtree in its `name`, and re-roots `script` entries. It is a pure
//! function of the hook and the subtree path.
//!
//! A hook whose `name` already carries the `[<subtree>] ` label was written
//! by this scoper and is returned unchanged, so scoping twice under the same
//! subtree is a fixed point. Any other hook gets every rule applied, even
//! when a field happens to start with the subtree prefix.

use super::types::Hook;

/// Inline flag that switches a regex to verbose mode.
pub const VERBOSE_MARKER: &str = "(?x)";

/// Where a hook comes from, which decides how its identity is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOrigin {
    /// Defined in a `repo: local` block. The id is author-chosen and gets
    /// the subtree prefix; `script` entries are re-rooted.
    Local,
    /// Provided by a remote (or meta) repo. The id must match the remote
    /// manifest, so only `alias` carries the subtree prefix.
    Remote,
}

/// Scope `hook` to the subtree at `subtree`.
pub fn scope_hook(hook: &Hook, subtree: &str, origin: HookOrigin) -> Hook {
    let mut scoped = hook.clone();
    if is_scoped(hook, subtree) {
        return scoped;
    }

    scoped.files = Some(scope_files(hook.files.as_deref(), subtree));
    scoped.exclude = hook.exclude.as_deref().map(|e| scope_exclude(e, subtree));

    match origin {
        HookOrigin::Local => {
            scoped.id = prefix_id(&hook.id, subtree);
            scoped.alias = hook.alias.as_deref().map(|a| prefix_id(a, subtree));
            if hook.language.as_deref() == Some("script") {
                scoped.entry = hook.entry.as_deref().map(|e| prefix_entry(e, subtree));
            }
        }
        HookOrigin::Remote => {
            scoped.alias = Some(prefix_id(&hook.id, subtree));
        }
    }

    let label = hook.name.as_deref().unwrap_or(&hook.id);
    scoped.name = Some(label_name(label, subtree));

    scoped
}

/// Whether `hook` carries the label [`scope_hook`] writes for `subtree`.
pub fn is_scoped(hook: &Hook, subtree: &str) -> bool {
    hook.name
        .as_deref()
        .is_some_and(|name| name.starts_with(&subtree_label(subtree)))
}

fn subtree_label(subtree: &str) -> String {
    format!("[{subtree}] ")
}

/// `^<subtree>/`, with regex metacharacters in the path escaped.
fn dir_anchor(subtree: &str) -> String {
    format!("^{}/", escape_path(subtree))
}

/// Anchor a `files` pattern to the subtree directory.
///
/// An unset or empty pattern becomes the bare directory anchor, so a hook
/// without `files` still never runs outside its subtree.
pub fn scope_files(files: Option<&str>, subtree: &str) -> String {
    let anchor = dir_anchor(subtree);
    match files {
        None | Some("") => anchor,
        Some(pattern) => format!("{anchor}({pattern})"),
    }
}

/// Anchor an `exclude` pattern to the subtree directory.
///
/// Verbose patterns are flattened first. A leading `^` is replaced by the
/// directory anchor; anything else is wrapped in a group behind it. An
/// empty pattern becomes `^<subtree>/()`, which excludes the whole subtree.
pub fn scope_exclude(exclude: &str, subtree: &str) -> String {
    let anchor = dir_anchor(subtree);
    let pattern = if exclude.contains(VERBOSE_MARKER) {
        flatten_verbose_regex(exclude)
    } else {
        exclude.to_string()
    };

    if let Some(rest) = pattern.strip_prefix('^') {
        format!("{anchor}{rest}")
    } else {
        format!("{anchor}({pattern})")
    }
}

fn prefix_id(id: &str, subtree: &str) -> String {
    format!("{subtree}-{id}")
}

fn prefix_entry(entry: &str, subtree: &str) -> String {
    format!("{subtree}/{entry}")
}

fn label_name(name: &str, subtree: &str) -> String {
    format!("{}{name}", subtree_label(subtree))
}

/// Escape the characters of a path that have meaning in a regex.
pub fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(
            c,
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Turn a verbose-mode regex into the equivalent single-line regex.
///
/// Removes every `(?x)` marker, then drops whitespace and `#` comments that
/// sit outside character classes. Escaped characters (`\ `, `\#`) and the
/// contents of `[...]` are kept as written, since they are literal in both
/// modes.
pub fn flatten_verbose_regex(pattern: &str) -> String {
    let stripped = pattern.replace(VERBOSE_MARKER, "");
    let mut out = String::with_capacity(stripped.len());
    let mut chars = stripped.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
                if chars.peek() == Some(&'^') {
                    out.push('^');
                    chars.next();
                }
                // `]` right after the opening bracket is a literal.
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '#' if !in_class => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() && !in_class => {}
            c => out.push(c),
        }
    }

    out
}
