//! Textual merging of aggregation files.
//!
//! Three aggregation shapes exist in a scaffolded domain:
//!
//! ```text
//! actions/index.ts        export * from './invoice.commands';      (ReExport)
//! handlers/index.ts       export const INVOICE_HANDLERS = [ ... ]; (HandlerList)
//! <parent module file>    imports: [ ... ],                        (ModuleImports)
//! ```
//!
//! Merging is line based. Existing lines are never rewritten except to add a
//! missing trailing comma in front of an inserted entry, or to expand an
//! inline list (`= [];`) onto separate lines. Entries are deduplicated by
//! exact identifier match.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One identifier contributed to an aggregation file, with the module it is
/// imported from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarrelEntry {
    pub identifier: String,
    pub module: String,
}

impl BarrelEntry {
    pub fn new(identifier: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            module: module.into(),
        }
    }

    /// The import statement for list styles.
    pub fn import_line(&self) -> String {
        format!("import {{ {} }} from '{}';", self.identifier, self.module)
    }

    /// The re-export statement for [`BarrelStyle::ReExport`].
    pub fn export_line(&self) -> String {
        format!("export * from '{}';", self.module)
    }
}

/// Shape of an aggregation file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "style")]
pub enum BarrelStyle {
    /// `export * from '...'` lines, keyed by module.
    ReExport,
    /// `export const {constant} = [ ... ];`, keyed by identifier.
    HandlerList { constant: String },
    /// `imports: [ ... ]`, keyed by identifier, appended in arrival order.
    ModuleImports,
}

impl BarrelStyle {
    /// Registration key of an entry under this style.
    pub fn key<'a>(&self, entry: &'a BarrelEntry) -> &'a str {
        match self {
            Self::ReExport => &entry.module,
            _ => &entry.identifier,
        }
    }

    /// Sort rank of a key. Lower ranks are listed first.
    ///
    /// Handler lists order sagas before commands before queries before
    /// events, so a saga is subscribed before any command can raise the
    /// event it listens for.
    pub fn rank(&self, key: &str) -> u8 {
        match self {
            Self::HandlerList { .. } => {
                if key.ends_with("Saga") {
                    0
                } else if key.ends_with("CommandHandler") {
                    1
                } else if key.ends_with("QueryHandler") {
                    2
                } else {
                    3
                }
            }
            Self::ReExport => {
                if key.ends_with(".commands") {
                    0
                } else if key.ends_with(".queries") {
                    1
                } else if key.ends_with(".events") {
                    2
                } else {
                    3
                }
            }
            Self::ModuleImports => 0,
        }
    }

    /// Human-readable anchor, for error messages.
    pub fn anchor(&self) -> String {
        match self {
            Self::ReExport => "export * from".into(),
            Self::HandlerList { constant } => format!("export const {constant} = ["),
            Self::ModuleImports => "imports: [".into(),
        }
    }

    fn anchor_matches(&self, line: &str) -> bool {
        let t = line.trim_start();
        match self {
            Self::ReExport => false,
            Self::HandlerList { constant } => t
                .strip_prefix("export const ")
                .and_then(|rest| rest.strip_prefix(constant.as_str()))
                .is_some_and(|rest| {
                    !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') && rest.contains('[')
                }),
            Self::ModuleImports => t.starts_with("imports:") && t.contains('['),
        }
    }

    /// Stable sort of entries into rank order.
    pub fn sorted(&self, entries: &[BarrelEntry]) -> Vec<BarrelEntry> {
        let mut sorted = entries.to_vec();
        sorted.sort_by_key(|e| self.rank(self.key(e)));
        sorted
    }
}

/// The list anchor could not be located, or its closing bracket is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorNotFound {
    pub anchor: String,
}

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub content: String,
    /// Keys that were actually added, in insertion order.
    pub added: Vec<String>,
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Keys already registered in `content`.
///
/// A list-style file whose anchor is missing registers nothing; the emitter
/// reports the missing anchor when it tries to merge.
pub fn registered_identifiers(content: &str, style: &BarrelStyle) -> BTreeSet<String> {
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    match style {
        BarrelStyle::ReExport => reexport_records(&lines)
            .into_iter()
            .map(|(_, module)| module)
            .collect(),
        _ => match parse_list(&lines, style) {
            Ok(shape) => shape.items.into_iter().map(|item| item.ident).collect(),
            Err(_) => BTreeSet::new(),
        },
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Import lines for a fresh list-style file, in rank order.
pub fn render_imports(style: &BarrelStyle, entries: &[BarrelEntry]) -> String {
    style
        .sorted(entries)
        .iter()
        .map(|e| match style {
            BarrelStyle::ReExport => e.export_line(),
            _ => e.import_line(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// List items for a fresh list-style file: one `{indent}{ident},` line each,
/// every line newline-terminated.
pub fn render_items(style: &BarrelStyle, entries: &[BarrelEntry], indent: &str) -> String {
    style
        .sorted(entries)
        .iter()
        .map(|e| format!("{indent}{},\n", e.identifier))
        .collect()
}

// ── Merging ───────────────────────────────────────────────────────────────────

/// Insert every entry whose key is not yet registered in `content`.
pub fn merge(
    content: &str,
    style: &BarrelStyle,
    entries: &[BarrelEntry],
) -> Result<Merged, AnchorNotFound> {
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    let registered = registered_identifiers(content, style);

    let mut seen = BTreeSet::new();
    let pending: Vec<BarrelEntry> = style
        .sorted(entries)
        .into_iter()
        .filter(|e| !registered.contains(style.key(e)))
        .filter(|e| seen.insert(style.key(e).to_string()))
        .collect();

    if pending.is_empty() {
        return Ok(Merged {
            content: content.to_string(),
            added: Vec::new(),
        });
    }

    match style {
        BarrelStyle::ReExport => {
            for entry in &pending {
                insert_reexport(&mut lines, style, entry);
            }
        }
        _ => {
            expand_inline_list(&mut lines, style)?;
            for entry in &pending {
                insert_list_item(&mut lines, style, entry)?;
            }
            for entry in &pending {
                insert_import(&mut lines, entry);
            }
        }
    }

    let mut merged = lines.join("\n");
    merged.push('\n');

    Ok(Merged {
        content: merged,
        added: pending.iter().map(|e| style.key(e).to_string()).collect(),
    })
}

// ── Internals ─────────────────────────────────────────────────────────────────

struct ListShape {
    anchor_idx: usize,
    close_idx: usize,
    /// Column of the closing `]` on `close_idx`.
    close_col: usize,
    items: Vec<ListItem>,
}

/// One top-level list item, possibly spanning several lines.
struct ListItem {
    first: usize,
    last: usize,
    ident: String,
}

fn parse_list(lines: &[String], style: &BarrelStyle) -> Result<ListShape, AnchorNotFound> {
    let not_found = || AnchorNotFound {
        anchor: style.anchor(),
    };

    let anchor_idx = lines
        .iter()
        .position(|l| style.anchor_matches(l))
        .ok_or_else(not_found)?;
    let open = lines[anchor_idx].find('[').ok_or_else(not_found)?;

    let mut scanner = ListScanner::default();
    for (idx, line) in lines.iter().enumerate().skip(anchor_idx) {
        let from = if idx == anchor_idx { open + 1 } else { 0 };
        if let Some(close_col) = scanner.feed(idx, line, from) {
            return Ok(ListShape {
                anchor_idx,
                close_idx: idx,
                close_col,
                items: scanner.items,
            });
        }
    }

    Err(not_found())
}

/// Splits a bracketed list into top-level items.
///
/// Brackets, parentheses and braces nest; `//` and `/* */` comments and
/// string literals are opaque.
#[derive(Default)]
struct ListScanner {
    depth: usize,
    quote: Option<char>,
    block_comment: bool,
    current: String,
    first: Option<usize>,
    last: usize,
    items: Vec<ListItem>,
}

impl ListScanner {
    /// Scan `line[from..]`; returns the column of the list's closing `]`.
    fn feed(&mut self, idx: usize, line: &str, from: usize) -> Option<usize> {
        let mut chars = line[from..].char_indices().peekable();
        while let Some((offset, c)) = chars.next() {
            let next = chars.peek().map(|&(_, n)| n);
            if self.block_comment {
                if c == '*' && next == Some('/') {
                    chars.next();
                    self.block_comment = false;
                }
                continue;
            }
            if let Some(quote) = self.quote {
                self.push(idx, c);
                if c == '\\' {
                    if let Some((_, escaped)) = chars.next() {
                        self.push(idx, escaped);
                    }
                } else if c == quote {
                    self.quote = None;
                }
                continue;
            }
            match c {
                '/' if next == Some('/') => break,
                '/' if next == Some('*') => {
                    chars.next();
                    self.block_comment = true;
                }
                '\'' | '"' | '`' => {
                    self.quote = Some(c);
                    self.push(idx, c);
                }
                '[' | '(' | '{' => {
                    self.depth += 1;
                    self.push(idx, c);
                }
                ']' | ')' | '}' if self.depth > 0 => {
                    self.depth -= 1;
                    self.push(idx, c);
                }
                ']' => {
                    self.finish();
                    return Some(from + offset);
                }
                ',' if self.depth == 0 => self.finish(),
                c if c.is_whitespace() && self.current.is_empty() => {}
                c => self.push(idx, c),
            }
        }
        None
    }

    fn push(&mut self, idx: usize, c: char) {
        self.first.get_or_insert(idx);
        self.last = idx;
        self.current.push(c);
    }

    fn finish(&mut self) {
        let ident = self.current.trim().trim_start_matches("...").trim();
        if let Some(first) = self.first.take() {
            if !ident.is_empty() {
                self.items.push(ListItem {
                    first,
                    last: self.last,
                    ident: ident.to_string(),
                });
            }
        }
        self.current.clear();
    }
}

fn leading_ws(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Rewrite `= [A, B];` onto separate lines so items can be inserted.
fn expand_inline_list(lines: &mut Vec<String>, style: &BarrelStyle) -> Result<(), AnchorNotFound> {
    let shape = parse_list(lines, style)?;
    if shape.close_idx != shape.anchor_idx {
        return Ok(());
    }

    let line = lines[shape.anchor_idx].clone();
    let indent = leading_ws(&line).to_string();
    let open = line.find('[').unwrap_or(0);

    let mut replacement = vec![line[..=open].to_string()];
    for item in &shape.items {
        replacement.push(format!("{indent}  {},", item.ident));
    }
    replacement.push(format!("{indent}{}", &line[shape.close_col..]));

    lines.splice(shape.anchor_idx..=shape.anchor_idx, replacement);
    Ok(())
}

fn insert_list_item(
    lines: &mut Vec<String>,
    style: &BarrelStyle,
    entry: &BarrelEntry,
) -> Result<(), AnchorNotFound> {
    let shape = parse_list(lines, style)?;
    let rank = style.rank(&entry.identifier);

    let indent = shape
        .items
        .iter()
        .find(|item| item.first != shape.anchor_idx)
        .map(|item| leading_ws(&lines[item.first]).to_string())
        .unwrap_or_else(|| format!("{}  ", leading_ws(&lines[shape.anchor_idx])));

    let after_same_or_lower = shape
        .items
        .iter()
        .rev()
        .find(|item| style.rank(&item.ident) <= rank)
        .map(|item| item.last);

    let insert_at = match after_same_or_lower {
        Some(last) => {
            ensure_trailing_comma(&mut lines[last]);
            last + 1
        }
        None => match shape.items.first() {
            Some(item) if item.first != shape.anchor_idx => item.first,
            _ => shape.anchor_idx + 1,
        },
    };

    // Never insert past the closing bracket line.
    let insert_at = insert_at.min(shape.close_idx);
    lines.insert(insert_at, format!("{indent}{},", entry.identifier));
    Ok(())
}

fn ensure_trailing_comma(line: &mut String) {
    let code_end = line.find("//").unwrap_or(line.len());
    let code = line[..code_end].trim_end();
    if code.is_empty() || code.ends_with(',') || code.ends_with('[') {
        return;
    }
    let insert_pos = code.len();
    line.insert(insert_pos, ',');
}

fn insert_import(lines: &mut Vec<String>, entry: &BarrelEntry) {
    let already_imported = lines.iter().any(|l| {
        let t = l.trim_start();
        t.starts_with("import ")
            && t.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                .any(|tok| tok == entry.identifier)
    });
    if already_imported {
        return;
    }

    match lines
        .iter()
        .rposition(|l| l.trim_start().starts_with("import "))
    {
        Some(idx) => lines.insert(idx + 1, entry.import_line()),
        None => {
            lines.insert(0, entry.import_line());
            lines.insert(1, String::new());
        }
    }
}

fn reexport_records(lines: &[String]) -> Vec<(usize, String)> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let rest = line.trim().strip_prefix("export * from ")?;
            let module = rest
                .trim_end_matches(';')
                .trim()
                .trim_matches(|c| c == '\'' || c == '"');
            Some((idx, module.to_string()))
        })
        .collect()
}

fn insert_reexport(lines: &mut Vec<String>, style: &BarrelStyle, entry: &BarrelEntry) {
    let records = reexport_records(lines);
    let rank = style.rank(&entry.module);

    let insert_at = match records.iter().rev().find(|(_, m)| style.rank(m) <= rank) {
        Some((idx, _)) => idx + 1,
        None => match records.first() {
            Some((idx, _)) => *idx,
            None => {
                // Drop trailing blank lines so the export lands at the end.
                while lines.last().is_some_and(|l| l.trim().is_empty()) {
                    lines.pop();
                }
                lines.len()
            }
        },
    };

    lines.insert(insert_at, entry.export_line());
}
