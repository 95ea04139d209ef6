//! Naming conventions shared by the walker, the assembler and the atom renderers.
//!
//! Three concerns live here because they all decide what ends up on disk:
//!
//! - **Ordinal prefixes**: every concept page starts with its position in the
//!   lesson, zero-padded to two digits (`00. `, `09. `, then `10. `, `11. `)
//!   so a plain directory listing shows pages in authored order.
//! - **Hierarchy tags**: Nanodegree archives nest lessons under `Part N` and
//!   `Module N` directories. The matched tag (`Part 01`, `Module 3`) becomes
//!   part of the flattened lesson directory name.
//! - **Safe file names**: concept and lesson titles are free text and have to
//!   pass through [`filenamify`] before touching the filesystem.
//!
//! ## Natural Order
//!
//! Directory listings are sorted with [`natural_key`]: digit runs compare by
//! value, everything else case-insensitively. `Part 2` sorts before `Part 10`
//! and `Lesson 01` before `Lesson 1a`, on every platform.

use regex::Regex;
use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PART_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)part \d+").expect("part pattern is valid"));
static MODULE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)module \d+").expect("module pattern is valid"));

/// Longest file name stem we produce, in bytes. Leaves room for the ordinal
/// prefix and extension inside the common 255-byte limit.
const MAX_NAME_LEN: usize = 200;

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// A container level in the archive hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Part,
    Module,
}

impl TagKind {
    fn pattern(self) -> &'static Regex {
        match self {
            TagKind::Part => &*PART_PATTERN,
            TagKind::Module => &*MODULE_PATTERN,
        }
    }
}

/// Format a concept position as the file-name ordinal prefix.
///
/// - `3` → `"03"`
/// - `10` → `"10"`
/// - `123` → `"123"`
pub fn ordinal_prefix(ordinal: usize) -> String {
    format!("{:02}", ordinal)
}

/// Extract the `Part N` / `Module N` tag from a directory name.
///
/// The match is case-insensitive and may appear anywhere in the name:
/// `"Part 01. Welcome"` → `Some("Part 01")`, `"Extras"` → `None`.
pub fn hierarchy_tag(name: &str, kind: TagKind) -> Option<String> {
    kind.pattern().find(name).map(|m| m.as_str().to_string())
}

/// Turn arbitrary text into a string that is safe as a single path component.
///
/// - Reserved characters (`<>:"/\|?*`) and control characters become `-`
/// - Runs of replacements collapse into one
/// - Leading/trailing whitespace, dots and dashes are stripped
/// - Windows device names (`CON`, `NUL`, ...) get a trailing `_`
/// - The result is truncated to a safe length on a char boundary
/// - Empty input yields `"untitled"`
pub fn filenamify(text: &str) -> String {
    let sanitized = sanitize_path(text);
    let mut name = truncate_at_char_boundary(&sanitized, MAX_NAME_LEN)
        .trim_end()
        .to_string();

    if name.is_empty() {
        return "untitled".to_string();
    }
    if WINDOWS_RESERVED
        .iter()
        .any(|r| r.eq_ignore_ascii_case(&name))
    {
        name.push('_');
    }
    name
}

/// The character rules of [`filenamify`] without its length cap.
///
/// Whole paths compare equal under this only when they differ in separators
/// or reserved characters, never because a long common prefix was cut off.
pub fn sanitize_path(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_replaced = false;
    for c in text.chars() {
        if RESERVED_CHARS.contains(&c) || c.is_control() {
            if !prev_replaced {
                out.push('-');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }
    out.trim_matches(|c: char| c.is_whitespace() || c == '.' || c == '-')
        .to_string()
}

fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Create `parent/<filenamify(name)>` (and any missing parents), returning it.
pub fn make_dir(parent: &Path, name: &str) -> io::Result<PathBuf> {
    let dir = parent.join(filenamify(name));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// One run of a natural sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NaturalChunk {
    /// Digit run: `(significant digit count, digits without leading zeros)`.
    /// Comparing the length first orders arbitrarily long numbers by value.
    Number(usize, String),
    Text(String),
}

/// Sort key that compares digit runs by value.
pub fn natural_key(name: &str) -> Vec<NaturalChunk> {
    let mut chunks = Vec::new();
    let mut chars = name.chars().peekable();
    while let Some(&c) = chars.peek() {
        let is_digit = c.is_ascii_digit();
        let mut run = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() != is_digit {
                break;
            }
            run.push(c);
            chars.next();
        }
        if is_digit {
            let digits = run.trim_start_matches('0').to_string();
            chunks.push(NaturalChunk::Number(digits.len(), digits));
        } else {
            chunks.push(NaturalChunk::Text(run.to_lowercase()));
        }
    }
    chunks
}

/// Natural comparison with the raw name as tie-breaker, so the order is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a)
        .cmp(&natural_key(b))
        .then_with(|| a.cmp(b))
}
