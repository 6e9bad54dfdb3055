//! Token types for the shell lexer

/// Token kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Reserved words
    If,
    Then,
    Elif,
    Else,
    Fi,
    For,
    In,
    While,
    Until,
    Do,
    Done,

    // Operators
    Pipe,  // |
    Not,   // !
    AndIf, // &&
    OrIf,  // ||

    // Redirections
    RedirIn,        // <
    RedirOut,       // > >|
    RedirAppendOut, // >>
    RedirDupIn,     // <&
    RedirDupOut,    // >&
    RedirReadWrite, // <>
    IoNumber,       // digit run directly before < or >

    // Punctuation
    Eof,
    Semi,    // ;
    Newline, // \n
    LParen,  // (
    RParen,  // )
    LBrace,  // {
    RBrace,  // }

    // Data
    Word,
    Expandable,
    AssignmentWord, // NAME=value
    FunctionWord,   // NAME ( )

    /// Not a real token: returned on invalid input, with the diagnostic
    /// message in the token value.
    Error,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Then => "then",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::Fi => "fi",
            Self::For => "for",
            Self::In => "in",
            Self::While => "while",
            Self::Until => "until",
            Self::Do => "do",
            Self::Done => "done",
            Self::Pipe => "|",
            Self::Not => "!",
            Self::AndIf => "&&",
            Self::OrIf => "||",
            Self::RedirIn => "<",
            Self::RedirOut => ">",
            Self::RedirAppendOut => ">>",
            Self::RedirDupIn => "<&",
            Self::RedirDupOut => ">&",
            Self::RedirReadWrite => "<>",
            Self::IoNumber => "IO_NUMBER",
            Self::Eof => "EOF",
            Self::Semi => ";",
            Self::Newline => "NEWLINE",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Word => "WORD",
            Self::Expandable => "EXPANDABLE",
            Self::AssignmentWord => "ASSIGNMENT_WORD",
            Self::FunctionWord => "FUNCTION_WORD",
            Self::Error => "ERROR",
        }
    }

    /// True for the redirection operator kinds (not `IoNumber`).
    pub fn is_redirection_op(&self) -> bool {
        matches!(
            self,
            Self::RedirIn
                | Self::RedirOut
                | Self::RedirAppendOut
                | Self::RedirDupIn
                | Self::RedirDupOut
                | Self::RedirReadWrite
        )
    }

    /// True for the reserved words that terminate a compound list.
    pub fn closes_compound_list(&self) -> bool {
        matches!(
            self,
            Self::Then
                | Self::Elif
                | Self::Else
                | Self::Fi
                | Self::Do
                | Self::Done
                | Self::RBrace
                | Self::RParen
        )
    }
}

/// Which substitution rules apply to a segment of an expandable word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal text, appended verbatim.
    Normal,
    /// Text subject to `$` substitution (double-quoted or bare `$NAME`).
    DoubleQuote,
}

/// One piece of an expandable word.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Normal,
            text: text.into(),
        }
    }

    pub fn double_quote(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::DoubleQuote,
            text: text.into(),
        }
    }
}

/// A token produced by the lexer.
///
/// `segments` is populated for `Expandable` tokens (and for assignment words
/// containing expandable parts); the concatenation of segment texts equals
/// `value` with quotes stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    pub segments: Vec<Segment>,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>) -> Self {
        Self {
            token_type,
            value: value.into(),
            segments: Vec::new(),
        }
    }

    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(TokenType::Error, message)
    }

    pub fn is_expandable(&self) -> bool {
        !self.segments.is_empty()
    }
}
