//! Syntax tree produced by the parser and walked by the interpreter

pub mod types;

pub use types::{
    AssignmentNode, CommandNode, ConditionalNode, ForNode, FunctionDefNode, LoopNode, Node,
    RedirKind, RedirectedNode, RedirectionNode, Word,
};
