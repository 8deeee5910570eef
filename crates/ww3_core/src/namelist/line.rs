//! Line-level tokenizer for NAMELIST files.
//!
//! Each physical line is tagged once with its [`LineKind`] and keeps its
//! exact text and terminator, so untouched lines are written back
//! byte-for-byte.

/// Line terminator of a physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    /// Last line of a file without a trailing newline.
    None,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::None => "",
        }
    }
}

/// What a line is, per the NAMELIST line grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// First non-blank character is `!`.
    Comment,
    /// Only whitespace.
    Blank,
    /// `&GROUP_NML ...`
    BlockStart { group: String },
    /// A lone `/`, optionally followed by a comment.
    BlockEnd,
    /// `KEY%PART = value`; `value` has any trailing comment stripped.
    Assignment { key: String, value: String },
    /// Anything else.
    Other,
}

/// One immutable, tagged line of a NAMELIST file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamelistLine {
    text: String,
    ending: LineEnding,
    kind: LineKind,
}

impl NamelistLine {
    /// Tag a physical line (without its terminator).
    pub fn parse(text: impl Into<String>, ending: LineEnding) -> Self {
        let text = text.into();
        let kind = classify(&text);
        Self { text, ending, kind }
    }

    /// A freshly formatted `  KEY  =  VALUE` line.
    pub fn assignment(key: &str, value: &str, ending: LineEnding) -> Self {
        Self::parse(format!("  {}  =  {}", key, value), ending)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ending(&self) -> LineEnding {
        self.ending
    }

    pub fn kind(&self) -> &LineKind {
        &self.kind
    }

    pub fn is_comment(&self) -> bool {
        self.kind == LineKind::Comment
    }

    /// Key of an assignment line.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            LineKind::Assignment { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Whether this is a non-comment assignment to `key` (case-insensitive).
    pub fn assigns(&self, key: &str) -> bool {
        self.key().is_some_and(|k| k.eq_ignore_ascii_case(key))
    }

    /// Append the line and its terminator to `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push_str(&self.text);
        out.push_str(self.ending.as_str());
    }
}

/// Split file content into tagged lines, keeping each line's terminator.
pub fn split_lines(content: &str) -> Vec<NamelistLine> {
    content
        .split_inclusive('\n')
        .map(|piece| {
            if let Some(text) = piece.strip_suffix("\r\n") {
                NamelistLine::parse(text, LineEnding::CrLf)
            } else if let Some(text) = piece.strip_suffix('\n') {
                NamelistLine::parse(text, LineEnding::Lf)
            } else {
                NamelistLine::parse(piece, LineEnding::None)
            }
        })
        .collect()
}

fn classify(text: &str) -> LineKind {
    let trimmed = text.trim_start_matches('\u{feff}').trim();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('!') {
        return LineKind::Comment;
    }
    if let Some(rest) = trimmed.strip_prefix('&') {
        let group: String = rest.chars().take_while(|c| is_ident_char(*c)).collect();
        return if group.is_empty() {
            LineKind::Other
        } else {
            LineKind::BlockStart { group }
        };
    }
    if let Some(rest) = trimmed.strip_prefix('/') {
        let rest = rest.trim_start();
        if rest.is_empty() || rest.starts_with('!') {
            return LineKind::BlockEnd;
        }
        return LineKind::Other;
    }
    if let Some((lhs, rhs)) = trimmed.split_once('=') {
        let key = lhs.trim();
        if is_compound_key(key) {
            return LineKind::Assignment {
                key: key.to_string(),
                value: strip_inline_comment(rhs).trim().to_string(),
            };
        }
    }
    LineKind::Other
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_') && chars.all(is_ident_char)
}

/// `IDENT ("%" IDENT)+`
fn is_compound_key(key: &str) -> bool {
    let mut parts = key.split('%');
    let first_ok = parts.next().is_some_and(is_ident);
    let mut rest = parts.peekable();
    first_ok && rest.peek().is_some() && rest.all(is_ident)
}

/// Drop a trailing `! comment` that is not inside a quoted string.
fn strip_inline_comment(rhs: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in rhs.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '!') => return &rhs[..i],
            _ => {}
        }
    }
    rhs
}
