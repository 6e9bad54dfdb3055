//! Shell state: variable and function stores

pub mod functions;
pub mod variables;

pub use functions::FunctionStore;
pub use variables::VariableStore;
