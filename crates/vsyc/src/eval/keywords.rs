//! Keyword names

use std::fmt;

/// Keywords with behavior attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `@c` comment
    Comment,
    /// `@print`
    Print,
    /// `@declare`
    Declare,
    /// `@func`
    Func,
    /// `@return`
    Return,
    /// `@call`
    Call,
    /// `@if`
    If,
    /// `@eq`
    Eq,
    /// `@lt`
    Lt,
    /// `@gt`
    Gt,
    /// `@op` (negated `@eq`)
    Op,
    /// `@insert`
    Insert,
    /// `@remove`
    Remove,
    /// `@read`
    Read,
    /// `@usingfile`
    UsingFile,
    /// `@exportall`
    ExportAll,
    /// `@execjs`
    ExecJs,
}

/// Keywords never reported as unknown, whether or not they do anything.
pub const ALLOW_LIST: &[&str] = &[
    "declare", "func", "if", "else", "return", "for", "elseif", "c", "call", "print",
];

/// Whether `word` is in the informational allow-list.
pub fn is_allow_listed(word: &str) -> bool {
    ALLOW_LIST.contains(&word)
}

impl Keyword {
    /// Parse a keyword node's text.
    pub fn parse(word: &str) -> Option<Self> {
        let keyword = match word {
            "c" => Keyword::Comment,
            "print" => Keyword::Print,
            "declare" => Keyword::Declare,
            "func" => Keyword::Func,
            "return" => Keyword::Return,
            "call" => Keyword::Call,
            "if" => Keyword::If,
            "eq" => Keyword::Eq,
            "lt" => Keyword::Lt,
            "gt" => Keyword::Gt,
            "op" => Keyword::Op,
            "insert" => Keyword::Insert,
            "remove" => Keyword::Remove,
            "read" => Keyword::Read,
            "usingfile" => Keyword::UsingFile,
            "exportall" => Keyword::ExportAll,
            "execjs" => Keyword::ExecJs,
            _ => return None,
        };
        Some(keyword)
    }

    /// Source spelling without the `@`.
    pub fn name(self) -> &'static str {
        match self {
            Keyword::Comment => "c",
            Keyword::Print => "print",
            Keyword::Declare => "declare",
            Keyword::Func => "func",
            Keyword::Return => "return",
            Keyword::Call => "call",
            Keyword::If => "if",
            Keyword::Eq => "eq",
            Keyword::Lt => "lt",
            Keyword::Gt => "gt",
            Keyword::Op => "op",
            Keyword::Insert => "insert",
            Keyword::Remove => "remove",
            Keyword::Read => "read",
            Keyword::UsingFile => "usingfile",
            Keyword::ExportAll => "exportall",
            Keyword::ExecJs => "execjs",
        }
    }

    /// Keywords an `@if` may pick up as its condition.
    pub fn is_condition(self) -> bool {
        matches!(self, Keyword::Eq | Keyword::Lt | Keyword::Gt)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}
