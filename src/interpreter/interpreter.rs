//! Tree-walking interpreter
//!
//! Walks the syntax tree depth-first, left to right, mapping nodes to
//! process operations. Builtins and assignments run in the shell process;
//! external commands, pipeline branches and subshells run in forked
//! children that execute their subtree and exit, never returning into the
//! parent's parse loop.

use std::os::fd::AsRawFd;
use std::rc::Rc;

use nix::unistd::{fork, ForkResult};

use crate::ast::{
    AssignmentNode, CommandNode, ConditionalNode, ForNode, LoopNode, Node, RedirectedNode,
};
use crate::interpreter::builtins;
use crate::interpreter::errors::{ExecResult, InterpreterError};
use crate::interpreter::expansion;
use crate::interpreter::process;
use crate::interpreter::redirections::RedirGuard;
use crate::store::{FunctionStore, VariableStore};

pub struct Interpreter {
    pub variables: VariableStore,
    pub functions: FunctionStore,
    /// Number of loops currently executing their body; `break`/`continue`
    /// outside any loop are no-ops, and a count larger than the nesting
    /// stops at the outermost loop.
    pub loop_depth: u32,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            variables: VariableStore::new(),
            functions: FunctionStore::new(),
            loop_depth: 0,
        }
    }

    /// Execute a tree, returning its shell status.
    pub fn execute(&mut self, node: &Node) -> ExecResult {
        match node {
            Node::CommandList(nodes) => self.exec_list(nodes),
            Node::And(left, right) => {
                let status = self.execute(left)?;
                if status == 0 {
                    self.execute(right)
                } else {
                    Ok(status)
                }
            }
            Node::Or(left, right) => {
                let status = self.execute(left)?;
                if status == 0 {
                    Ok(0)
                } else {
                    self.execute(right)
                }
            }
            Node::Not(child) => {
                let status = self.execute(child)?;
                Ok(if status == 0 { 1 } else { 0 })
            }
            Node::Pipe(left, right) => self.exec_pipe(left, right),
            Node::Subshell(body) => self.exec_subshell(body),
            Node::Command(cmd) => self.exec_command(cmd),
            Node::Conditional(cond) => self.exec_conditional(cond),
            Node::While(lp) => self.exec_loop(lp, false),
            Node::Until(lp) => self.exec_loop(lp, true),
            Node::For(f) => self.exec_for(f),
            Node::FunctionDef(def) => {
                self.functions.define(&def.name, Rc::clone(&def.body));
                Ok(0)
            }
            Node::Assignment(assign) => self.exec_assignment(assign),
            Node::Redirected(red) => self.exec_redirected(red),
        }
    }

    /// Children in order; `?` records each child's status.
    fn exec_list(&mut self, nodes: &[Node]) -> ExecResult {
        let mut status = 0;
        for node in nodes {
            status = self.execute(node)?;
            self.variables.set_status(status);
        }
        Ok(status)
    }

    fn exec_conditional(&mut self, cond: &ConditionalNode) -> ExecResult {
        if self.execute(&cond.condition)? == 0 {
            self.execute(&cond.then_body)
        } else if let Some(else_body) = &cond.else_body {
            self.execute(else_body)
        } else {
            Ok(0)
        }
    }

    /// while (condition succeeds) / until (condition fails).
    fn exec_loop(&mut self, lp: &LoopNode, until: bool) -> ExecResult {
        self.loop_depth += 1;
        let result = self.exec_loop_inner(lp, until);
        self.loop_depth -= 1;
        result
    }

    fn exec_loop_inner(&mut self, lp: &LoopNode, until: bool) -> ExecResult {
        let mut status = 0;
        loop {
            let cond = self.execute(&lp.condition)?;
            let run_body = if until { cond != 0 } else { cond == 0 };
            if !run_body {
                break;
            }
            match self.execute(&lp.body) {
                Ok(s) => status = s,
                Err(InterpreterError::Break(n)) => {
                    if let Some(left) = self.passes_outward(n) {
                        return Err(InterpreterError::Break(left));
                    }
                    break;
                }
                Err(InterpreterError::Continue(n)) => {
                    if let Some(left) = self.passes_outward(n) {
                        return Err(InterpreterError::Continue(left));
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(status)
    }

    /// A loop count above one belongs to an enclosing loop when there is
    /// one; the outermost loop absorbs whatever is left.
    fn passes_outward(&self, count: u32) -> Option<u32> {
        if count > 1 && self.loop_depth > 1 {
            Some(count - 1)
        } else {
            None
        }
    }

    fn exec_for(&mut self, f: &ForNode) -> ExecResult {
        self.loop_depth += 1;
        let result = self.exec_for_inner(f);
        self.loop_depth -= 1;
        result
    }

    fn exec_for_inner(&mut self, f: &ForNode) -> ExecResult {
        // the word list is static: expanded once, before the first iteration
        let words: Vec<String> = f
            .words
            .iter()
            .map(|w| expansion::expand_word(w, &self.variables))
            .collect();
        let mut status = 0;
        for value in words {
            // exported so forked children see the loop variable
            std::env::set_var(&f.variable, &value);
            let result = self.execute(&f.body);
            std::env::remove_var(&f.variable);
            match result {
                Ok(s) => status = s,
                Err(InterpreterError::Break(n)) => {
                    if let Some(left) = self.passes_outward(n) {
                        return Err(InterpreterError::Break(left));
                    }
                    break;
                }
                Err(InterpreterError::Continue(n)) => {
                    if let Some(left) = self.passes_outward(n) {
                        return Err(InterpreterError::Continue(left));
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(status)
    }

    fn exec_assignment(&mut self, assign: &AssignmentNode) -> ExecResult {
        let value = expansion::expand_word(&assign.value, &self.variables);
        self.variables.set(assign.name.clone(), value);
        Ok(0)
    }

    /// User-defined functions shadow builtins; builtins shadow PATH search.
    fn exec_command(&mut self, cmd: &CommandNode) -> ExecResult {
        let mut argv = Vec::with_capacity(cmd.args.len() + 1);
        argv.push(cmd.name.clone());
        for arg in &cmd.args {
            argv.push(expansion::expand_word(arg, &self.variables));
        }

        if let Some(body) = self.functions.get(&cmd.name) {
            return self.execute(&body);
        }
        if let Some(result) = builtins::dispatch(self, &argv) {
            return result;
        }
        process::run_external(&argv)
    }

    /// `left | right`: the right child is forked first so the read end is
    /// in place before the left child starts writing. Both run concurrently;
    /// the pipeline's status is the right child's.
    fn exec_pipe(&mut self, left: &Node, right: &Node) -> ExecResult {
        let (read_end, write_end) = process::make_pipe()?;
        process::flush_stdio();

        // SAFETY: the child branches only execute their subtree via
        // `run_in_child`, which always exits the process.
        let right_pid = match unsafe { fork() } {
            Err(errno) => return Err(InterpreterError::system(format!("fork: {errno}"))),
            Ok(ForkResult::Child) => {
                let dup = process::dup2_retry(read_end.as_raw_fd(), 0);
                drop(read_end);
                drop(write_end);
                if let Err(errno) = dup {
                    eprintln!("oxsh: dup2: {errno}");
                    std::process::exit(1);
                }
                self.run_in_child(right)
            }
            Ok(ForkResult::Parent { child }) => child,
        };

        let left_pid = match unsafe { fork() } {
            Err(errno) => {
                drop(read_end);
                drop(write_end);
                let _ = process::wait_for(right_pid);
                return Err(InterpreterError::system(format!("fork: {errno}")));
            }
            Ok(ForkResult::Child) => {
                let dup = process::dup2_retry(write_end.as_raw_fd(), 1);
                drop(read_end);
                drop(write_end);
                if let Err(errno) = dup {
                    eprintln!("oxsh: dup2: {errno}");
                    std::process::exit(1);
                }
                self.run_in_child(left)
            }
            Ok(ForkResult::Parent { child }) => child,
        };

        // close both ends so the readers see EOF once the writers are done
        drop(read_end);
        drop(write_end);

        let _ = process::wait_for(left_pid)?;
        process::wait_for(right_pid)
    }

    fn exec_subshell(&mut self, body: &Node) -> ExecResult {
        process::flush_stdio();
        // SAFETY: the child executes its subtree and exits.
        match unsafe { fork() } {
            Err(errno) => Err(InterpreterError::system(format!("fork: {errno}"))),
            Ok(ForkResult::Child) => self.run_in_child(body),
            Ok(ForkResult::Parent { child }) => process::wait_for(child),
        }
    }

    /// Execute a subtree in a forked child and exit with its status.
    fn run_in_child(&mut self, node: &Node) -> ! {
        let status = match self.execute(node) {
            Ok(status) => status,
            Err(InterpreterError::Exit(code)) => code,
            Err(InterpreterError::Break(_)) | Err(InterpreterError::Continue(_)) => 0,
            Err(e) => {
                eprintln!("oxsh: {e}");
                1
            }
        };
        process::flush_stdio();
        std::process::exit(status)
    }

    /// Apply the redirection list around the inner construct; the guard
    /// restores the descriptors on every exit path.
    fn exec_redirected(&mut self, red: &RedirectedNode) -> ExecResult {
        let guard = RedirGuard::apply(&red.redirections)?;
        let result = self.execute(&red.inner);
        drop(guard);
        result
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn interp() -> Interpreter {
        Interpreter::new()
    }

    /// Run a script through parser and interpreter, returning the final
    /// status. Scripts under test use only fork-free constructs.
    fn run(interp: &mut Interpreter, script: &str) -> ExecResult {
        let mut status = Ok(0);
        for node in parse(script).expect("parse failed") {
            status = interp.execute(&node);
            if let Ok(s) = &status {
                interp.variables.set_status(*s);
            }
        }
        status
    }

    #[test]
    fn test_true_false_statuses() {
        let mut it = interp();
        assert_eq!(run(&mut it, "true"), Ok(0));
        assert_eq!(run(&mut it, "false"), Ok(1));
    }

    #[test]
    fn test_assignment_and_expansion() {
        let mut it = interp();
        assert_eq!(run(&mut it, "x=hello ; y=$x!"), Ok(0));
        assert_eq!(it.variables.get("x"), Some("hello"));
        assert_eq!(it.variables.get("y"), Some("hello!"));
    }

    #[test]
    fn test_and_or_short_circuit() {
        let mut it = interp();
        // the right side of a short-circuited operator must not run
        assert_eq!(run(&mut it, "false && x=ran"), Ok(1));
        assert_eq!(it.variables.get("x"), None);
        assert_eq!(run(&mut it, "true || y=ran"), Ok(0));
        assert_eq!(it.variables.get("y"), None);
        assert_eq!(run(&mut it, "true && z=ran"), Ok(0));
        assert_eq!(it.variables.get("z"), Some("ran"));
    }

    #[test]
    fn test_not_inverts() {
        let mut it = interp();
        assert_eq!(run(&mut it, "! true"), Ok(1));
        assert_eq!(run(&mut it, "! false"), Ok(0));
    }

    #[test]
    fn test_conditional_branches() {
        let mut it = interp();
        assert_eq!(run(&mut it, "if true ; then a=then ; else a=else ; fi"), Ok(0));
        assert_eq!(it.variables.get("a"), Some("then"));
        assert_eq!(run(&mut it, "if false ; then b=then ; else b=else ; fi"), Ok(0));
        assert_eq!(it.variables.get("b"), Some("else"));
    }

    #[test]
    fn test_conditional_without_else() {
        let mut it = interp();
        assert_eq!(run(&mut it, "if false ; then x=1 ; fi"), Ok(0));
        assert_eq!(it.variables.get("x"), None);
    }

    #[test]
    fn test_elif_chain() {
        let mut it = interp();
        let script = "if false ; then r=a ; elif true ; then r=b ; else r=c ; fi";
        assert_eq!(run(&mut it, script), Ok(0));
        assert_eq!(it.variables.get("r"), Some("b"));
    }

    #[test]
    fn test_status_variable_updates() {
        let mut it = interp();
        assert_eq!(run(&mut it, "false ; s=$?"), Ok(0));
        assert_eq!(it.variables.get("s"), Some("1"));
    }

    #[test]
    fn test_while_loop_breaks() {
        let mut it = interp();
        assert_eq!(run(&mut it, "while true ; do x=ran ; break ; done"), Ok(0));
        assert_eq!(it.variables.get("x"), Some("ran"));
    }

    #[test]
    fn test_while_false_never_runs() {
        let mut it = interp();
        assert_eq!(run(&mut it, "while false ; do x=ran ; done"), Ok(0));
        assert_eq!(it.variables.get("x"), None);
    }

    #[test]
    fn test_until_loop_runs_once() {
        let mut it = interp();
        assert_eq!(run(&mut it, "until false ; do x=ran ; break ; done"), Ok(0));
        assert_eq!(it.variables.get("x"), Some("ran"));
    }

    #[test]
    fn test_break_two_levels() {
        let mut it = interp();
        let script =
            "while true ; do while true ; do inner=ran ; break 2 ; done ; outer=ran ; done";
        assert_eq!(run(&mut it, script), Ok(0));
        assert_eq!(it.variables.get("inner"), Some("ran"));
        assert_eq!(it.variables.get("outer"), None);
    }

    #[test]
    fn test_break_more_levels_than_loops() {
        let mut it = interp();
        // break 5 in two loops exits both; execution continues after
        let script = "while true ; do while true ; do break 5 ; done ; done ; after=1";
        assert_eq!(run(&mut it, script), Ok(0));
        assert_eq!(it.variables.get("after"), Some("1"));
    }

    #[test]
    fn test_continue_skips_rest_of_body() {
        let mut it = interp();
        let script = "for i in 1 2 3 ; do continue ; x=$i ; done";
        assert_eq!(run(&mut it, script), Ok(0));
        assert_eq!(it.variables.get("x"), None);
    }

    #[test]
    fn test_for_loop_iterates_words() {
        let mut it = interp();
        assert_eq!(run(&mut it, "for i in a b c ; do last=$i ; done"), Ok(0));
        assert_eq!(it.variables.get("last"), Some("c"));
        // the loop variable is removed from the environment afterwards
        assert!(std::env::var("i").is_err());
    }

    #[test]
    fn test_for_loop_empty_word_list() {
        let mut it = interp();
        assert_eq!(run(&mut it, "for i ; do x=ran ; done"), Ok(0));
        assert_eq!(it.variables.get("x"), None);
    }

    #[test]
    fn test_function_definition_and_call() {
        let mut it = interp();
        assert_eq!(run(&mut it, "f() { x=called ; } ; f"), Ok(0));
        assert_eq!(it.variables.get("x"), Some("called"));
    }

    #[test]
    fn test_function_shadows_builtin() {
        let mut it = interp();
        assert_eq!(run(&mut it, "false() { true ; } ; false"), Ok(0));
    }

    #[test]
    fn test_function_redefinition() {
        let mut it = interp();
        let script = "f() { r=first ; } ; f ; f() { r=second ; } ; f";
        assert_eq!(run(&mut it, script), Ok(0));
        assert_eq!(it.variables.get("r"), Some("second"));
    }

    #[test]
    fn test_exit_propagates() {
        let mut it = interp();
        assert_eq!(
            run(&mut it, "x=1 ; exit 7 ; y=1"),
            Err(InterpreterError::Exit(7))
        );
        assert_eq!(it.variables.get("x"), Some("1"));
        assert_eq!(it.variables.get("y"), None);
    }

    #[test]
    fn test_exit_uses_last_status() {
        let mut it = interp();
        assert_eq!(
            run(&mut it, "false ; exit"),
            Err(InterpreterError::Exit(1))
        );
    }

    #[test]
    fn test_assignment_prefix_runs_before_command() {
        let mut it = interp();
        assert_eq!(run(&mut it, "a=1 b=$a"), Ok(0));
        assert_eq!(it.variables.get("b"), Some("1"));
    }
}
