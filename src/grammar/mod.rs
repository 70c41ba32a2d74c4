//! Grammar pattern matching over processed tokens.

pub mod analyzer;
pub mod catalog;
pub mod condition;
pub mod rule;

pub use analyzer::{GrammarAnalyzer, GrammarMatch};
pub use catalog::GrammarCatalog;
pub use condition::TokenCondition;
pub use rule::{GrammarRule, RuleKind};
