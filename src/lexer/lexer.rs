//! Lexer for shell source text
//!
//! The lexer turns the character stream into a stream of tokens, honoring
//! quoting and escape rules. It handles:
//! - Operators, separators and redirections (maximal munch)
//! - Words, with single/double quoting and `$` expansion segments
//! - Assignment words, function-declaration heads, IO numbers
//! - Comments and line continuations
//!
//! `peek` caches the next token, so repeated peeks with no intervening `pop`
//! always return the same token.

use std::collections::HashMap;

use crate::io::InputSource;
use crate::lexer::token::{Segment, SegmentKind, Token, TokenType};

lazy_static::lazy_static! {
    /// Reserved words, recognized only for unquoted literal words
    static ref RESERVED_WORDS: HashMap<&'static str, TokenType> = {
        let mut m = HashMap::new();
        m.insert("if", TokenType::If);
        m.insert("then", TokenType::Then);
        m.insert("elif", TokenType::Elif);
        m.insert("else", TokenType::Else);
        m.insert("fi", TokenType::Fi);
        m.insert("for", TokenType::For);
        m.insert("in", TokenType::In);
        m.insert("while", TokenType::While);
        m.insert("until", TokenType::Until);
        m.insert("do", TokenType::Do);
        m.insert("done", TokenType::Done);
        m
    };

    /// NAME= prefix of an assignment word
    static ref ASSIGNMENT_PREFIX: regex_lite::Regex =
        regex_lite::Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*=").unwrap();
}

/// Check whether a word starts with a `NAME=` assignment prefix.
pub fn is_assignment_word(word: &str) -> bool {
    ASSIGNMENT_PREFIX.is_match(word)
}

fn is_name_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn is_special_parameter(c: u8) -> bool {
    matches!(c, b'?' | b'$' | b'#' | b'*' | b'@')
}

fn is_stopping_byte(c: u8) -> bool {
    matches!(
        c,
        b' ' | b'\t'
            | b';'
            | b'\n'
            | b'|'
            | b'&'
            | b'!'
            | b'('
            | b')'
            | b'{'
            | b'}'
            | b'<'
            | b'>'
    )
}

/// Accumulates one word: committed segments plus the current literal run.
#[derive(Default)]
struct WordBuilder {
    segments: Vec<Segment>,
    buf: Vec<u8>,
    expandable: bool,
    quoted: bool,
}

impl WordBuilder {
    fn has_content(&self) -> bool {
        !self.buf.is_empty() || !self.segments.is_empty() || self.quoted
    }

    /// Commit the pending literal run as a `Normal` segment.
    fn flush_normal(&mut self) {
        if !self.buf.is_empty() {
            let text = String::from_utf8_lossy(&self.buf).into_owned();
            self.buf.clear();
            self.segments.push(Segment::normal(text));
        }
    }

    /// Commit a segment subject to `$` substitution.
    fn push_double_quote(&mut self, text: String) {
        self.flush_normal();
        self.segments.push(Segment::double_quote(text));
        self.expandable = true;
    }

    /// The word's raw value: committed segments followed by the pending run.
    fn value(&self) -> String {
        let mut value: String = self.segments.iter().map(|s| s.text.as_str()).collect();
        value.push_str(&String::from_utf8_lossy(&self.buf));
        value
    }
}

/// Stateful tokenizer with single-token lookahead.
pub struct Lexer {
    input: InputSource,
    peeked: Option<Token>,
}

impl Lexer {
    pub fn new(input: InputSource) -> Self {
        Self {
            input,
            peeked: None,
        }
    }

    /// Convenience constructor for in-memory scripts.
    pub fn from_string(input: &str) -> Self {
        Self::new(InputSource::from_string(input))
    }

    /// The next token, without consuming it. Idempotent.
    pub fn peek(&mut self) -> Token {
        if let Some(tok) = &self.peeked {
            return tok.clone();
        }
        let tok = self.scan_token();
        self.peeked = Some(tok.clone());
        tok
    }

    /// The next token, consuming it.
    pub fn pop(&mut self) -> Token {
        match self.peeked.take() {
            Some(tok) => tok,
            None => self.scan_token(),
        }
    }

    fn skip_blanks(&mut self) {
        while let Some(c) = self.input.get() {
            if c != b' ' && c != b'\t' {
                self.input.unread();
                break;
            }
        }
    }

    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_blanks();
            let c = match self.input.get() {
                None => return Token::new(TokenType::Eof, ""),
                Some(c) => c,
            };
            return match c {
                b'\n' => Token::new(TokenType::Newline, "\n"),
                b';' => Token::new(TokenType::Semi, ";"),
                b'(' => Token::new(TokenType::LParen, "("),
                b')' => Token::new(TokenType::RParen, ")"),
                b'{' => Token::new(TokenType::LBrace, "{"),
                b'}' => Token::new(TokenType::RBrace, "}"),
                b'!' => Token::new(TokenType::Not, "!"),
                b'|' => {
                    if self.input.peek() == Some(b'|') {
                        self.input.get();
                        Token::new(TokenType::OrIf, "||")
                    } else {
                        Token::new(TokenType::Pipe, "|")
                    }
                }
                b'&' => {
                    if self.input.peek() == Some(b'&') {
                        self.input.get();
                        Token::new(TokenType::AndIf, "&&")
                    } else {
                        Token::error("syntax error near unexpected token `&'")
                    }
                }
                b'<' | b'>' => self.scan_redirection(c),
                b'#' => self.skip_comment(),
                b'\\' if self.input.peek() == Some(b'\n') => {
                    // line continuation at a token boundary
                    self.input.get();
                    continue;
                }
                b'0'..=b'9' => self.scan_digits(c),
                _ => self.scan_word(WordBuilder::default(), Some(c)),
            };
        }
    }

    /// Consume a comment running to end of line; the newline is the token.
    fn skip_comment(&mut self) -> Token {
        loop {
            match self.input.get() {
                None => return Token::new(TokenType::Eof, ""),
                Some(b'\n') => return Token::new(TokenType::Newline, "\n"),
                Some(_) => {}
            }
        }
    }

    /// Maximal munch over `>>`, `>|`, `<&`, `>&`, `<>`, `>`, `<`.
    fn scan_redirection(&mut self, first: u8) -> Token {
        let next = self.input.peek();
        let (token_type, value) = match (first, next) {
            (b'>', Some(b'>')) => (TokenType::RedirAppendOut, ">>"),
            (b'>', Some(b'|')) => (TokenType::RedirOut, ">|"),
            (b'>', Some(b'&')) => (TokenType::RedirDupOut, ">&"),
            (b'<', Some(b'&')) => (TokenType::RedirDupIn, "<&"),
            (b'<', Some(b'>')) => (TokenType::RedirReadWrite, "<>"),
            (b'>', _) => (TokenType::RedirOut, ">"),
            _ => (TokenType::RedirIn, "<"),
        };
        if value.len() == 2 {
            self.input.get();
        }
        Token::new(token_type, value)
    }

    /// A digit run directly before `<` or `>` is an IO number; otherwise the
    /// digits begin an ordinary word.
    fn scan_digits(&mut self, first: u8) -> Token {
        let mut digits = vec![first];
        while let Some(c) = self.input.peek() {
            if c.is_ascii_digit() {
                self.input.get();
                digits.push(c);
            } else {
                break;
            }
        }
        if matches!(self.input.peek(), Some(b'<') | Some(b'>')) {
            return Token::new(
                TokenType::IoNumber,
                String::from_utf8_lossy(&digits).into_owned(),
            );
        }
        let builder = WordBuilder {
            buf: digits,
            ..Default::default()
        };
        let next = self.input.get();
        self.scan_word(builder, next)
    }

    /// Scan one word starting at `c`, accumulating literal runs and
    /// expansion segments until a stopping character or end of input.
    fn scan_word(&mut self, mut w: WordBuilder, mut c: Option<u8>) -> Token {
        let mut terminator = None;
        while let Some(ch) = c {
            match ch {
                b'\'' => {
                    w.quoted = true;
                    if let Err(tok) = self.scan_single_quote(&mut w) {
                        return tok;
                    }
                }
                b'"' => {
                    w.quoted = true;
                    if let Err(tok) = self.scan_double_quote(&mut w) {
                        return tok;
                    }
                }
                b'$' => {
                    if let Err(tok) = self.scan_expansion(&mut w) {
                        return tok;
                    }
                }
                b'\\' => match self.input.get() {
                    None => w.buf.push(b'\\'),
                    Some(b'\n') => {} // line continuation
                    Some(escaped) => w.buf.push(escaped),
                },
                b'(' if w.has_content() => {
                    // NAME( must complete into a function-declaration head
                    return self.finish_function_head(w);
                }
                _ if is_stopping_byte(ch) => {
                    self.input.unread();
                    terminator = Some(ch);
                    break;
                }
                _ => w.buf.push(ch),
            }
            c = self.input.get();
        }
        self.finish_word(w, terminator)
    }

    /// Copy verbatim up to the closing single quote.
    fn scan_single_quote(&mut self, w: &mut WordBuilder) -> Result<(), Token> {
        loop {
            match self.input.get() {
                None => {
                    return Err(Token::error(
                        "unexpected end of file while looking for matching `''",
                    ))
                }
                Some(b'\'') => return Ok(()),
                Some(c) => w.buf.push(c),
            }
        }
    }

    /// Scan a double-quoted string into a substitution segment. `\` escapes
    /// `"`, `` ` `` and `\`; everything else, `$` included, is kept for the
    /// expansion engine.
    fn scan_double_quote(&mut self, w: &mut WordBuilder) -> Result<(), Token> {
        let mut text = Vec::new();
        loop {
            match self.input.get() {
                None => {
                    return Err(Token::error(
                        "unexpected end of file while looking for matching `\"'",
                    ))
                }
                Some(b'"') => break,
                Some(b'\\') => match self.input.get() {
                    None => {
                        return Err(Token::error(
                            "unexpected end of file while looking for matching `\"'",
                        ))
                    }
                    Some(escaped @ (b'"' | b'`' | b'\\')) => text.push(escaped),
                    Some(other) => {
                        text.push(b'\\');
                        text.push(other);
                    }
                },
                Some(b'$') => {
                    text.push(b'$');
                    if self.input.peek() == Some(b'{') {
                        self.scan_braced_name(&mut text)?;
                    }
                }
                Some(c) => text.push(c),
            }
        }
        w.push_double_quote(String::from_utf8_lossy(&text).into_owned());
        Ok(())
    }

    /// Scan a bare `$` expansion into its own substitution segment.
    fn scan_expansion(&mut self, w: &mut WordBuilder) -> Result<(), Token> {
        match self.input.peek() {
            None => Err(Token::error("unexpected end of file after `$'")),
            Some(b'{') => {
                let mut text = vec![b'$'];
                self.scan_braced_name(&mut text)?;
                w.push_double_quote(String::from_utf8_lossy(&text).into_owned());
                Ok(())
            }
            Some(c) if is_special_parameter(c) => {
                self.input.get();
                w.push_double_quote(format!("${}", c as char));
                Ok(())
            }
            Some(c) if is_name_byte(c) => {
                let mut text = vec![b'$'];
                while let Some(c) = self.input.peek() {
                    if is_name_byte(c) {
                        self.input.get();
                        text.push(c);
                    } else {
                        break;
                    }
                }
                w.push_double_quote(String::from_utf8_lossy(&text).into_owned());
                Ok(())
            }
            // any other character: a literal dollar sign
            Some(_) => {
                w.buf.push(b'$');
                Ok(())
            }
        }
    }

    /// Consume `{ ... }` after a `$`, appending the braces and the name.
    fn scan_braced_name(&mut self, text: &mut Vec<u8>) -> Result<(), Token> {
        self.input.get(); // the '{'
        text.push(b'{');
        loop {
            match self.input.get() {
                None => return Err(Token::error("unexpected end of file, expecting `}'")),
                Some(b'"') => return Err(Token::error("bad substitution: missing `}'")),
                Some(b'}') => {
                    text.push(b'}');
                    return Ok(());
                }
                Some(c) => text.push(c),
            }
        }
    }

    /// Complete `NAME(` into `NAME ( )` or fail.
    fn finish_function_head(&mut self, w: WordBuilder) -> Token {
        loop {
            match self.input.get() {
                Some(b' ') | Some(b'\t') => {}
                Some(b')') => return Token::new(TokenType::FunctionWord, w.value()),
                _ => return Token::error("syntax error near unexpected token `('"),
            }
        }
    }

    /// Peek past blanks for a `( )` pair; fully undone when absent.
    fn lookahead_function_head(&mut self) -> bool {
        self.input.save();
        loop {
            match self.input.get() {
                Some(b' ') | Some(b'\t') => {}
                Some(b'(') => break,
                _ => {
                    self.input.restore();
                    return false;
                }
            }
        }
        loop {
            match self.input.get() {
                Some(b' ') | Some(b'\t') => {}
                Some(b')') => return true,
                _ => {
                    self.input.restore();
                    return false;
                }
            }
        }
    }

    /// Classify a finished word: function head, assignment word, reserved
    /// word, expandable, or plain word.
    fn finish_word(&mut self, mut w: WordBuilder, terminator: Option<u8>) -> Token {
        if !w.has_content() {
            return Token::new(TokenType::Eof, "");
        }

        let ended_at_blank = matches!(terminator, Some(b' ') | Some(b'\t'));
        if ended_at_blank && !w.expandable && self.lookahead_function_head() {
            return Token::new(TokenType::FunctionWord, w.value());
        }

        if w.expandable {
            w.flush_normal();
            let value: String = w.segments.iter().map(|s| s.text.as_str()).collect();
            let is_assignment = w
                .segments
                .first()
                .map(|s| s.kind == SegmentKind::Normal && is_assignment_word(&s.text))
                .unwrap_or(false);
            let token_type = if is_assignment {
                TokenType::AssignmentWord
            } else {
                TokenType::Expandable
            };
            return Token::new(token_type, value).with_segments(w.segments);
        }

        let value = w.value();
        if is_assignment_word(&value) {
            return Token::new(TokenType::AssignmentWord, value);
        }
        if !w.quoted {
            if let Some(reserved) = RESERVED_WORDS.get(value.as_str()) {
                return Token::new(*reserved, value);
            }
        }
        Token::new(TokenType::Word, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::from_string(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.pop();
            let done = tok.token_type == TokenType::Eof || tok.token_type == TokenType::Error;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    fn types(input: &str) -> Vec<TokenType> {
        tokens(input).iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn test_simple_command() {
        let toks = tokens("echo hello");
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[0].token_type, TokenType::Word);
        assert_eq!(toks[0].value, "echo");
        assert_eq!(toks[1].token_type, TokenType::Word);
        assert_eq!(toks[1].value, "hello");
        assert_eq!(toks[2].token_type, TokenType::Eof);
    }

    #[test]
    fn test_peek_is_idempotent() {
        let mut lexer = Lexer::from_string("echo hi");
        let a = lexer.peek();
        let b = lexer.peek();
        assert_eq!(a, b);
        let popped = lexer.pop();
        assert_eq!(a, popped);
        assert_eq!(lexer.pop().value, "hi");
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            types("a && b || c | d ; e"),
            vec![
                TokenType::Word,
                TokenType::AndIf,
                TokenType::Word,
                TokenType::OrIf,
                TokenType::Word,
                TokenType::Pipe,
                TokenType::Word,
                TokenType::Semi,
                TokenType::Word,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_lone_ampersand_is_error() {
        let toks = tokens("a & b");
        assert_eq!(toks[1].token_type, TokenType::Error);
    }

    #[test]
    fn test_negation() {
        assert_eq!(
            types("! true"),
            vec![TokenType::Not, TokenType::Word, TokenType::Eof]
        );
    }

    #[test]
    fn test_redirections() {
        let toks = tokens("< a > b >> c <& d >& e <> f >| g");
        let kinds: Vec<TokenType> = toks.iter().step_by(2).map(|t| t.token_type).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::RedirIn,
                TokenType::RedirOut,
                TokenType::RedirAppendOut,
                TokenType::RedirDupIn,
                TokenType::RedirDupOut,
                TokenType::RedirReadWrite,
                TokenType::RedirOut,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_io_number() {
        let toks = tokens("2> err");
        assert_eq!(toks[0].token_type, TokenType::IoNumber);
        assert_eq!(toks[0].value, "2");
        assert_eq!(toks[1].token_type, TokenType::RedirOut);
        assert_eq!(toks[2].value, "err");
    }

    #[test]
    fn test_digits_not_before_redirection_are_a_word() {
        let toks = tokens("echo 123");
        assert_eq!(toks[1].token_type, TokenType::Word);
        assert_eq!(toks[1].value, "123");
    }

    #[test]
    fn test_digits_prefixing_word() {
        let toks = tokens("42abc");
        assert_eq!(toks[0].token_type, TokenType::Word);
        assert_eq!(toks[0].value, "42abc");
    }

    #[test]
    fn test_reserved_words() {
        assert_eq!(
            types("if then elif else fi for in while until do done"),
            vec![
                TokenType::If,
                TokenType::Then,
                TokenType::Elif,
                TokenType::Else,
                TokenType::Fi,
                TokenType::For,
                TokenType::In,
                TokenType::While,
                TokenType::Until,
                TokenType::Do,
                TokenType::Done,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_word_is_not_reserved() {
        let toks = tokens("'if'");
        assert_eq!(toks[0].token_type, TokenType::Word);
        assert_eq!(toks[0].value, "if");
    }

    #[test]
    fn test_single_quotes_verbatim() {
        let toks = tokens("echo 'a $b | c'");
        assert_eq!(toks[1].token_type, TokenType::Word);
        assert_eq!(toks[1].value, "a $b | c");
    }

    #[test]
    fn test_unterminated_single_quote() {
        let toks = tokens("echo 'oops");
        assert_eq!(toks[1].token_type, TokenType::Error);
    }

    #[test]
    fn test_unterminated_double_quote() {
        let toks = tokens("echo \"oops");
        assert_eq!(toks[1].token_type, TokenType::Error);
    }

    #[test]
    fn test_bare_expansion_segments() {
        let toks = tokens("echo $name");
        let tok = &toks[1];
        assert_eq!(tok.token_type, TokenType::Expandable);
        assert_eq!(tok.segments.len(), 1);
        assert_eq!(tok.segments[0].kind, SegmentKind::DoubleQuote);
        assert_eq!(tok.segments[0].text, "$name");
    }

    #[test]
    fn test_expansion_with_literal_parts() {
        let toks = tokens("echo pre$var.post");
        let tok = &toks[1];
        assert_eq!(tok.token_type, TokenType::Expandable);
        assert_eq!(tok.segments.len(), 3);
        assert_eq!(tok.segments[0], Segment::normal("pre"));
        assert_eq!(tok.segments[1], Segment::double_quote("$var"));
        assert_eq!(tok.segments[2], Segment::normal(".post"));
        assert_eq!(tok.value, "pre$var.post");
    }

    #[test]
    fn test_braced_expansion() {
        let toks = tokens("echo ${var}x");
        let tok = &toks[1];
        assert_eq!(tok.segments[0], Segment::double_quote("${var}"));
        assert_eq!(tok.segments[1], Segment::normal("x"));
    }

    #[test]
    fn test_unterminated_brace() {
        let toks = tokens("echo ${var");
        assert_eq!(toks[1].token_type, TokenType::Error);
    }

    #[test]
    fn test_dollar_at_eof_is_error() {
        let toks = tokens("echo $");
        assert_eq!(toks[1].token_type, TokenType::Error);
    }

    #[test]
    fn test_special_parameters() {
        for special in ["$?", "$#", "$$", "$*", "$@"] {
            let toks = tokens(special);
            assert_eq!(toks[0].token_type, TokenType::Expandable);
            assert_eq!(toks[0].segments[0].text, *special);
        }
    }

    #[test]
    fn test_double_quotes_make_one_segment() {
        let toks = tokens("echo \"x=$i\"");
        let tok = &toks[1];
        assert_eq!(tok.token_type, TokenType::Expandable);
        assert_eq!(tok.segments.len(), 1);
        assert_eq!(tok.segments[0], Segment::double_quote("x=$i"));
    }

    #[test]
    fn test_double_quote_escapes() {
        // \" and \\ collapse, \n is kept for the expansion engine
        let toks = tokens(r#"echo "a\"b\\c\nd""#);
        assert_eq!(toks[1].segments[0].text, "a\"b\\c\\nd");
    }

    #[test]
    fn test_empty_double_quotes() {
        let toks = tokens("echo \"\"");
        let tok = &toks[1];
        assert_eq!(tok.token_type, TokenType::Expandable);
        assert_eq!(tok.segments.len(), 1);
        assert_eq!(tok.segments[0].text, "");
    }

    #[test]
    fn test_assignment_word() {
        let toks = tokens("var=value");
        assert_eq!(toks[0].token_type, TokenType::AssignmentWord);
        assert_eq!(toks[0].value, "var=value");
    }

    #[test]
    fn test_assignment_word_with_expansion() {
        let toks = tokens("var=$other");
        let tok = &toks[0];
        assert_eq!(tok.token_type, TokenType::AssignmentWord);
        assert_eq!(tok.segments[0], Segment::normal("var="));
        assert_eq!(tok.segments[1], Segment::double_quote("$other"));
    }

    #[test]
    fn test_not_an_assignment_word() {
        assert_eq!(tokens("=x")[0].token_type, TokenType::Word);
        assert_eq!(tokens("1x=y")[0].token_type, TokenType::Word);
    }

    #[test]
    fn test_function_word_compact() {
        let toks = tokens("f() echo");
        assert_eq!(toks[0].token_type, TokenType::FunctionWord);
        assert_eq!(toks[0].value, "f");
    }

    #[test]
    fn test_function_word_spaced() {
        let toks = tokens("f ( ) echo");
        assert_eq!(toks[0].token_type, TokenType::FunctionWord);
        assert_eq!(toks[0].value, "f");
    }

    #[test]
    fn test_word_before_subshell_is_not_a_function() {
        let toks = tokens("echo (x)");
        assert_eq!(toks[0].token_type, TokenType::Word);
        assert_eq!(toks[0].value, "echo");
        assert_eq!(toks[1].token_type, TokenType::LParen);
        assert_eq!(toks[2].value, "x");
    }

    #[test]
    fn test_malformed_function_head() {
        let toks = tokens("f(x");
        assert_eq!(toks[0].token_type, TokenType::Error);
    }

    #[test]
    fn test_comment() {
        assert_eq!(
            types("echo hi # trailing comment\nnext"),
            vec![
                TokenType::Word,
                TokenType::Word,
                TokenType::Newline,
                TokenType::Word,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_char_inside_word() {
        let toks = tokens("echo a#b");
        assert_eq!(toks[1].value, "a#b");
    }

    #[test]
    fn test_escape_outside_quotes() {
        let toks = tokens(r"echo a\ b");
        assert_eq!(toks[1].value, "a b");
        assert_eq!(toks[2].token_type, TokenType::Eof);
    }

    #[test]
    fn test_escaped_dollar() {
        let toks = tokens(r"echo \$HOME");
        assert_eq!(toks[1].token_type, TokenType::Word);
        assert_eq!(toks[1].value, "$HOME");
    }

    #[test]
    fn test_line_continuation() {
        let toks = tokens("echo ab\\\ncd");
        assert_eq!(toks[1].value, "abcd");
        assert_eq!(toks[2].token_type, TokenType::Eof);
    }

    #[test]
    fn test_braces_and_parens() {
        assert_eq!(
            types("{ a; }\n(b)"),
            vec![
                TokenType::LBrace,
                TokenType::Word,
                TokenType::Semi,
                TokenType::RBrace,
                TokenType::Newline,
                TokenType::LParen,
                TokenType::Word,
                TokenType::RParen,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_value_concatenation_invariant() {
        // the concatenation of segment texts equals the token value
        for input in ["a$b.c", "\"x $y\"tail", "${v}mid$w"] {
            let toks = tokens(input);
            let tok = &toks[0];
            let joined: String = tok.segments.iter().map(|s| s.text.as_str()).collect();
            assert_eq!(joined, tok.value);
        }
    }
}
