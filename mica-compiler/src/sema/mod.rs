pub mod resolve;
pub mod scope;
pub mod typecheck;

pub use resolve::ScopeAnalyzer;
pub use scope::{ScopeError, ScopeErrorKind, ScopeStack, Symbol};
pub use typecheck::{TypeCheckError, TypeCheckErrorKind, TypeChecker};
