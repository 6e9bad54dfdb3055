//! Abstract Syntax Tree types
//!
//! Node kinds carry semantic meaning, not syntax: `{ a; b; }` and `a; b`
//! both become a command list, elif chains become nested conditionals, and
//! redirections are folded into a wrapper node around the construct they
//! apply to.

use std::fmt::Write as _;
use std::rc::Rc;

use crate::lexer::token::Segment;

/// A word in argument position: either a literal or a sequence of expansion
/// segments evaluated at execution time.
#[derive(Debug, Clone, PartialEq)]
pub enum Word {
    Literal(String),
    Expandable(Vec<Segment>),
}

impl Word {
    /// The word's raw (unexpanded) text.
    pub fn raw(&self) -> String {
        match self {
            Word::Literal(text) => text.clone(),
            Word::Expandable(segments) => segments.iter().map(|s| s.text.as_str()).collect(),
        }
    }
}

/// Simple command: name plus arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode {
    pub name: String,
    pub args: Vec<Word>,
}

/// if/elif/else. An elif chain is a nested conditional in `else_body`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalNode {
    pub condition: Box<Node>,
    pub then_body: Box<Node>,
    pub else_body: Option<Box<Node>>,
}

/// while/until loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopNode {
    pub condition: Box<Node>,
    pub body: Box<Node>,
}

/// for loop over a static word list.
#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    pub variable: String,
    pub words: Vec<Word>,
    pub body: Box<Node>,
}

/// Function declaration. The body is reference-counted because the function
/// store shares ownership with the tree once the declaration executes.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefNode {
    pub name: String,
    pub body: Rc<Node>,
}

/// Variable assignment: NAME=value.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentNode {
    pub name: String,
    pub value: Word,
}

/// Redirection operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirKind {
    In,        // <
    Out,       // > >|
    AppendOut, // >>
    DupIn,     // <&
    DupOut,    // >&
    ReadWrite, // <>
}

impl RedirKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "<",
            Self::Out => ">",
            Self::AppendOut => ">>",
            Self::DupIn => "<&",
            Self::DupOut => ">&",
            Self::ReadWrite => "<>",
        }
    }

    /// The file descriptor targeted when no IO number is written.
    pub fn default_fd(&self) -> i32 {
        match self {
            Self::In | Self::DupIn => 0,
            _ => 1,
        }
    }
}

/// One redirection: operation, target fd, target path.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectionNode {
    pub kind: RedirKind,
    pub fd: i32,
    pub target: String,
}

/// A construct wrapped by redirections, kept in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectedNode {
    pub inner: Box<Node>,
    pub redirections: Vec<RedirectionNode>,
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Children evaluated in order; value is the last child's status.
    CommandList(Vec<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Not(Box<Node>),
    Pipe(Box<Node>, Box<Node>),
    Subshell(Box<Node>),
    Command(CommandNode),
    Conditional(ConditionalNode),
    While(LoopNode),
    Until(LoopNode),
    For(ForNode),
    FunctionDef(FunctionDefNode),
    Assignment(AssignmentNode),
    Redirected(RedirectedNode),
}

impl Node {
    /// Render the tree for `--pretty-print`: one node per line, two-space
    /// indentation.
    pub fn tree_string(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, level: usize) {
        let indent = "  ".repeat(level);
        match self {
            Node::CommandList(children) => {
                let _ = writeln!(out, "{indent}command_list");
                for child in children {
                    child.write_tree(out, level + 1);
                }
            }
            Node::And(left, right) => {
                let _ = writeln!(out, "{indent}and");
                left.write_tree(out, level + 1);
                right.write_tree(out, level + 1);
            }
            Node::Or(left, right) => {
                let _ = writeln!(out, "{indent}or");
                left.write_tree(out, level + 1);
                right.write_tree(out, level + 1);
            }
            Node::Not(child) => {
                let _ = writeln!(out, "{indent}not");
                child.write_tree(out, level + 1);
            }
            Node::Pipe(left, right) => {
                let _ = writeln!(out, "{indent}pipe");
                left.write_tree(out, level + 1);
                right.write_tree(out, level + 1);
            }
            Node::Subshell(child) => {
                let _ = writeln!(out, "{indent}subshell");
                child.write_tree(out, level + 1);
            }
            Node::Command(cmd) => {
                let _ = writeln!(out, "{indent}command '{}'", cmd.name);
                for arg in &cmd.args {
                    match arg {
                        Word::Literal(text) => {
                            let _ = writeln!(out, "{indent}  argument '{text}'");
                        }
                        Word::Expandable(_) => {
                            let _ = writeln!(out, "{indent}  expansion '{}'", arg.raw());
                        }
                    }
                }
            }
            Node::Conditional(cond) => {
                let _ = writeln!(out, "{indent}conditional");
                cond.condition.write_tree(out, level + 1);
                cond.then_body.write_tree(out, level + 1);
                if let Some(else_body) = &cond.else_body {
                    else_body.write_tree(out, level + 1);
                }
            }
            Node::While(lp) => {
                let _ = writeln!(out, "{indent}while");
                lp.condition.write_tree(out, level + 1);
                lp.body.write_tree(out, level + 1);
            }
            Node::Until(lp) => {
                let _ = writeln!(out, "{indent}until");
                lp.condition.write_tree(out, level + 1);
                lp.body.write_tree(out, level + 1);
            }
            Node::For(f) => {
                let _ = writeln!(out, "{indent}for '{}'", f.variable);
                for word in &f.words {
                    let _ = writeln!(out, "{indent}  word '{}'", word.raw());
                }
                f.body.write_tree(out, level + 1);
            }
            Node::FunctionDef(def) => {
                let _ = writeln!(out, "{indent}funcdec '{}'", def.name);
                def.body.write_tree(out, level + 1);
            }
            Node::Assignment(assign) => {
                let _ = writeln!(
                    out,
                    "{indent}variable '{}' = '{}'",
                    assign.name,
                    assign.value.raw()
                );
            }
            Node::Redirected(red) => {
                let _ = writeln!(out, "{indent}redirections");
                red.inner.write_tree(out, level + 1);
                for r in &red.redirections {
                    let _ = writeln!(
                        out,
                        "{indent}  redir {}{} '{}'",
                        r.fd,
                        r.kind.as_str(),
                        r.target
                    );
                }
            }
        }
    }
}
