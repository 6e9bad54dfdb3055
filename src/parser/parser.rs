//! Recursive descent parser
//!
//! Consumes tokens from the lexer with one-token lookahead and produces the
//! syntax tree. Grammar (simplified):
//!
//!   input          ::= (list)? (NEWLINE | EOF)
//!   list           ::= and_or (';' and_or)* (';')?
//!   and_or         ::= pipeline ((&& | '||') NEWLINE* pipeline)*
//!   pipeline       ::= [!] command ('|' NEWLINE* command)*
//!   command        ::= funcdec | shell_command (redirection)* | simple_command
//!   simple_command ::= (assignment | redirection)* [WORD (word | redirection)*]
//!   shell_command  ::= '{' compound_list '}' | '(' compound_list ')'
//!                    | if | while | until | for
//!   compound_list  ::= NEWLINE* and_or ((';' | NEWLINE) NEWLINE* and_or)* (';')? NEWLINE*
//!   redirection    ::= [IO_NUMBER] redir_op WORD
//!   funcdec        ::= FUNCTION_WORD NEWLINE* command

use std::rc::Rc;

use crate::ast::{
    AssignmentNode, CommandNode, ConditionalNode, ForNode, FunctionDefNode, LoopNode, Node,
    RedirKind, RedirectedNode, RedirectionNode, Word,
};
use crate::lexer::{Lexer, Token, TokenType};

/// Error thrown when the parser rejects the token stream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error near unexpected token `{0}'")]
    UnexpectedToken(String),
    #[error("syntax error: unexpected end of file")]
    UnexpectedEof,
    /// Invalid input reported by the lexer.
    #[error("{0}")]
    Lexical(String),
}

fn unexpected(tok: &Token) -> ParseError {
    if tok.token_type == TokenType::Eof {
        ParseError::UnexpectedEof
    } else {
        ParseError::UnexpectedToken(tok.value.clone())
    }
}

fn wrap_redirections(node: Node, redirections: Vec<RedirectionNode>) -> Node {
    if redirections.is_empty() {
        node
    } else {
        Node::Redirected(RedirectedNode {
            inner: node.into(),
            redirections,
        })
    }
}

/// Build a `Word` from a data token, keeping expansion segments when present.
fn word_from_token(tok: Token) -> Word {
    if tok.is_expandable() {
        Word::Expandable(tok.segments)
    } else {
        Word::Literal(tok.value)
    }
}

/// Split an assignment word into its name and value expression.
fn parse_assignment(tok: Token) -> AssignmentNode {
    if tok.segments.is_empty() {
        match tok.value.find('=') {
            Some(eq) => AssignmentNode {
                name: tok.value[..eq].to_string(),
                value: Word::Literal(tok.value[eq + 1..].to_string()),
            },
            None => AssignmentNode {
                name: tok.value,
                value: Word::Literal(String::new()),
            },
        }
    } else {
        let mut segments = tok.segments;
        let (name, remainder) = match segments[0].text.find('=') {
            Some(eq) => (
                segments[0].text[..eq].to_string(),
                segments[0].text[eq + 1..].to_string(),
            ),
            None => (segments[0].text.clone(), String::new()),
        };
        if remainder.is_empty() {
            segments.remove(0);
        } else {
            segments[0].text = remainder;
        }
        let value = if segments.is_empty() {
            Word::Literal(String::new())
        } else {
            Word::Expandable(segments)
        };
        AssignmentNode { name, value }
    }
}

/// Recursive-descent parser over the lexer's token stream.
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Self { lexer }
    }

    pub fn from_string(input: &str) -> Self {
        Self::new(Lexer::from_string(input))
    }

    /// True once the token stream is exhausted.
    pub fn at_end(&mut self) -> bool {
        self.lexer.peek().token_type == TokenType::Eof
    }

    /// Parse one top-level input: an optional list terminated by a newline
    /// or end of input. `Ok(None)` is a blank line.
    pub fn parse_input(&mut self) -> Result<Option<Node>, ParseError> {
        let tok = self.peek()?;
        match tok.token_type {
            TokenType::Eof => Ok(None),
            TokenType::Newline => {
                self.lexer.pop();
                Ok(None)
            }
            _ => {
                let list = self.parse_list()?;
                let tok = self.peek()?;
                match tok.token_type {
                    TokenType::Newline => {
                        self.lexer.pop();
                        Ok(Some(list))
                    }
                    TokenType::Eof => Ok(Some(list)),
                    _ => Err(unexpected(&tok)),
                }
            }
        }
    }

    fn peek(&mut self) -> Result<Token, ParseError> {
        let tok = self.lexer.peek();
        if tok.token_type == TokenType::Error {
            return Err(ParseError::Lexical(tok.value));
        }
        Ok(tok)
    }

    fn pop(&mut self) -> Result<Token, ParseError> {
        let tok = self.lexer.pop();
        if tok.token_type == TokenType::Error {
            return Err(ParseError::Lexical(tok.value));
        }
        Ok(tok)
    }

    fn expect(&mut self, token_type: TokenType) -> Result<Token, ParseError> {
        let tok = self.pop()?;
        if tok.token_type != token_type {
            return Err(unexpected(&tok));
        }
        Ok(tok)
    }

    fn skip_newlines(&mut self) -> Result<(), ParseError> {
        while self.peek()?.token_type == TokenType::Newline {
            self.lexer.pop();
        }
        Ok(())
    }

    fn parse_list(&mut self) -> Result<Node, ParseError> {
        let mut nodes = vec![self.parse_and_or()?];
        while self.peek()?.token_type == TokenType::Semi {
            self.lexer.pop();
            match self.peek()?.token_type {
                TokenType::Newline | TokenType::Eof => break,
                _ => nodes.push(self.parse_and_or()?),
            }
        }
        if nodes.len() == 1 {
            Ok(nodes.remove(0))
        } else {
            Ok(Node::CommandList(nodes))
        }
    }

    fn parse_and_or(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_pipeline()?;
        loop {
            let is_and = match self.peek()?.token_type {
                TokenType::AndIf => true,
                TokenType::OrIf => false,
                _ => break,
            };
            self.lexer.pop();
            self.skip_newlines()?;
            let right = self.parse_pipeline()?;
            node = if is_and {
                Node::And(node.into(), right.into())
            } else {
                Node::Or(node.into(), right.into())
            };
        }
        Ok(node)
    }

    fn parse_pipeline(&mut self) -> Result<Node, ParseError> {
        let negated = self.peek()?.token_type == TokenType::Not;
        if negated {
            self.lexer.pop();
        }
        let mut node = self.parse_command()?;
        while self.peek()?.token_type == TokenType::Pipe {
            self.lexer.pop();
            self.skip_newlines()?;
            let right = self.parse_command()?;
            node = Node::Pipe(node.into(), right.into());
        }
        if negated {
            node = Node::Not(node.into());
        }
        Ok(node)
    }

    fn parse_command(&mut self) -> Result<Node, ParseError> {
        let tok = self.peek()?;
        let node = match tok.token_type {
            TokenType::FunctionWord => self.parse_funcdec()?,
            TokenType::LBrace
            | TokenType::LParen
            | TokenType::If
            | TokenType::While
            | TokenType::Until
            | TokenType::For => self.parse_shell_command()?,
            _ => return self.parse_simple_command(),
        };
        let redirections = self.parse_redirection_list()?;
        Ok(wrap_redirections(node, redirections))
    }

    fn parse_funcdec(&mut self) -> Result<Node, ParseError> {
        let tok = self.pop()?;
        self.skip_newlines()?;
        let body = self.parse_command()?;
        Ok(Node::FunctionDef(FunctionDefNode {
            name: tok.value,
            body: Rc::new(body),
        }))
    }

    fn parse_shell_command(&mut self) -> Result<Node, ParseError> {
        let tok = self.peek()?;
        match tok.token_type {
            TokenType::LBrace => {
                self.lexer.pop();
                let list = self.parse_compound_list()?;
                self.expect(TokenType::RBrace)?;
                Ok(list)
            }
            TokenType::LParen => {
                self.lexer.pop();
                let list = self.parse_compound_list()?;
                self.expect(TokenType::RParen)?;
                Ok(Node::Subshell(list.into()))
            }
            TokenType::If => self.parse_if(),
            TokenType::While => self.parse_loop(false),
            TokenType::Until => self.parse_loop(true),
            TokenType::For => self.parse_for(),
            _ => Err(unexpected(&tok)),
        }
    }

    fn parse_if(&mut self) -> Result<Node, ParseError> {
        self.lexer.pop(); // 'if'
        let condition = self.parse_compound_list()?;
        self.expect(TokenType::Then)?;
        let then_body = self.parse_compound_list()?;
        let else_body = self.parse_else()?;
        self.expect(TokenType::Fi)?;
        Ok(Node::Conditional(ConditionalNode {
            condition: condition.into(),
            then_body: then_body.into(),
            else_body,
        }))
    }

    /// The elif/else tail of a conditional; elif chains nest to the right.
    fn parse_else(&mut self) -> Result<Option<Box<Node>>, ParseError> {
        match self.peek()?.token_type {
            TokenType::Elif => {
                self.lexer.pop();
                let condition = self.parse_compound_list()?;
                self.expect(TokenType::Then)?;
                let then_body = self.parse_compound_list()?;
                let else_body = self.parse_else()?;
                Ok(Some(Box::new(Node::Conditional(ConditionalNode {
                    condition: condition.into(),
                    then_body: then_body.into(),
                    else_body,
                }))))
            }
            TokenType::Else => {
                self.lexer.pop();
                Ok(Some(Box::new(self.parse_compound_list()?)))
            }
            _ => Ok(None),
        }
    }

    fn parse_loop(&mut self, until: bool) -> Result<Node, ParseError> {
        self.lexer.pop(); // 'while' or 'until'
        let condition = self.parse_compound_list()?;
        self.expect(TokenType::Do)?;
        let body = self.parse_compound_list()?;
        self.expect(TokenType::Done)?;
        let lp = LoopNode {
            condition: condition.into(),
            body: body.into(),
        };
        Ok(if until { Node::Until(lp) } else { Node::While(lp) })
    }

    fn parse_for(&mut self) -> Result<Node, ParseError> {
        self.lexer.pop(); // 'for'
        let name = self.expect(TokenType::Word)?;
        let mut words = Vec::new();
        if self.peek()?.token_type == TokenType::Semi {
            self.lexer.pop();
        } else {
            self.skip_newlines()?;
            if self.peek()?.token_type == TokenType::In {
                self.lexer.pop();
                loop {
                    let tok = self.peek()?;
                    match tok.token_type {
                        TokenType::Word | TokenType::Expandable => {
                            words.push(word_from_token(self.lexer.pop()));
                        }
                        _ => break,
                    }
                }
                let tok = self.pop()?;
                if tok.token_type != TokenType::Semi && tok.token_type != TokenType::Newline {
                    return Err(unexpected(&tok));
                }
            }
        }
        self.skip_newlines()?;
        self.expect(TokenType::Do)?;
        let body = self.parse_compound_list()?;
        self.expect(TokenType::Done)?;
        Ok(Node::For(ForNode {
            variable: name.value,
            words,
            body: body.into(),
        }))
    }

    /// A sequence of and_or lists separated by `;` or newlines, as found in
    /// control-flow bodies. Always wrapped in a command list.
    fn parse_compound_list(&mut self) -> Result<Node, ParseError> {
        self.skip_newlines()?;
        let mut nodes = vec![self.parse_and_or()?];
        loop {
            match self.peek()?.token_type {
                TokenType::Semi | TokenType::Newline => {
                    self.lexer.pop();
                    self.skip_newlines()?;
                    let tok = self.peek()?;
                    if tok.token_type.closes_compound_list() || tok.token_type == TokenType::Eof {
                        break;
                    }
                    nodes.push(self.parse_and_or()?);
                }
                _ => break,
            }
        }
        Ok(Node::CommandList(nodes))
    }

    fn parse_simple_command(&mut self) -> Result<Node, ParseError> {
        let mut assignments: Vec<Node> = Vec::new();
        let mut redirections = Vec::new();
        let mut command: Option<CommandNode> = None;
        loop {
            let tok = self.peek()?;
            let token_type = tok.token_type;
            if token_type == TokenType::IoNumber || token_type.is_redirection_op() {
                redirections.push(self.parse_redirection()?);
                continue;
            }
            match token_type {
                TokenType::AssignmentWord => {
                    let tok = self.lexer.pop();
                    match &mut command {
                        // after the command name, NAME=value is a plain argument
                        Some(cmd) => cmd.args.push(word_from_token(tok)),
                        None => assignments.push(Node::Assignment(parse_assignment(tok))),
                    }
                }
                TokenType::Word => {
                    let tok = self.lexer.pop();
                    match &mut command {
                        Some(cmd) => cmd.args.push(Word::Literal(tok.value)),
                        None => {
                            command = Some(CommandNode {
                                name: tok.value,
                                args: Vec::new(),
                            })
                        }
                    }
                }
                TokenType::Expandable => match &mut command {
                    Some(cmd) => {
                        let tok = self.lexer.pop();
                        cmd.args.push(Word::Expandable(tok.segments));
                    }
                    None => break,
                },
                _ => break,
            }
        }

        let mut pieces = assignments;
        if let Some(cmd) = command {
            pieces.push(Node::Command(cmd));
        }
        if pieces.is_empty() && redirections.is_empty() {
            let tok = self.peek()?;
            return Err(unexpected(&tok));
        }
        let inner = match pieces.len() {
            0 => Node::CommandList(Vec::new()),
            1 => pieces.remove(0),
            _ => Node::CommandList(pieces),
        };
        Ok(wrap_redirections(inner, redirections))
    }

    fn parse_redirection_list(&mut self) -> Result<Vec<RedirectionNode>, ParseError> {
        let mut redirections = Vec::new();
        loop {
            let token_type = self.peek()?.token_type;
            if token_type == TokenType::IoNumber || token_type.is_redirection_op() {
                redirections.push(self.parse_redirection()?);
            } else {
                break;
            }
        }
        Ok(redirections)
    }

    fn parse_redirection(&mut self) -> Result<RedirectionNode, ParseError> {
        let tok = self.pop()?;
        let (fd, op) = if tok.token_type == TokenType::IoNumber {
            let fd = tok
                .value
                .parse::<i32>()
                .map_err(|_| ParseError::UnexpectedToken(tok.value.clone()))?;
            (Some(fd), self.pop()?)
        } else {
            (None, tok)
        };
        let kind = match op.token_type {
            TokenType::RedirIn => RedirKind::In,
            TokenType::RedirOut => RedirKind::Out,
            TokenType::RedirAppendOut => RedirKind::AppendOut,
            TokenType::RedirDupIn => RedirKind::DupIn,
            TokenType::RedirDupOut => RedirKind::DupOut,
            TokenType::RedirReadWrite => RedirKind::ReadWrite,
            _ => return Err(unexpected(&op)),
        };
        let target = self.pop()?;
        if target.token_type != TokenType::Word {
            return Err(unexpected(&target));
        }
        Ok(RedirectionNode {
            kind,
            fd: fd.unwrap_or_else(|| kind.default_fd()),
            target: target.value,
        })
    }
}

/// Parse an entire script into its sequence of top-level trees.
pub fn parse(input: &str) -> Result<Vec<Node>, ParseError> {
    let mut parser = Parser::from_string(input);
    let mut nodes = Vec::new();
    while !parser.at_end() {
        if let Some(node) = parser.parse_input()? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}
