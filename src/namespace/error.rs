//! Resolution failures.

use smol_str::SmolStr;

use crate::loader::LoadError;

/// Why one candidate module failed to supply a symbol.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AttemptFailure {
    /// The candidate could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The candidate loaded but turned out not to provide the symbol.
    #[error("loaded but does not provide the symbol")]
    Missing,
}

/// The record of one failed candidate during a resolution walk.
#[derive(Debug, Clone)]
pub struct CandidateAttempt {
    /// The candidate module's name.
    pub module: SmolStr,
    /// What went wrong with it.
    pub failure: AttemptFailure,
}

/// A symbol could not be resolved.
///
/// Either no backing module declares the symbol at all (empty attempt
/// list), or every candidate was tried and failed — the attempts record
/// each candidate and its failure reason, in the order they were tried.
/// Never fatal: callers decide how to react.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", render(.symbol, .attempts))]
pub struct SymbolNotFound {
    symbol: SmolStr,
    attempts: Vec<CandidateAttempt>,
}

fn render(symbol: &SmolStr, attempts: &[CandidateAttempt]) -> String {
    if attempts.is_empty() {
        return format!("symbol '{symbol}' not found: no backing module declares it");
    }
    let tried: Vec<_> = attempts
        .iter()
        .map(|a| format!("{} ({})", a.module, a.failure))
        .collect();
    format!(
        "symbol '{}' not found after trying {} candidate(s): {}",
        symbol,
        attempts.len(),
        tried.join(", ")
    )
}

impl SymbolNotFound {
    /// The symbol is not declared by any module in the index.
    pub fn unknown(symbol: impl Into<SmolStr>) -> Self {
        Self {
            symbol: symbol.into(),
            attempts: Vec::new(),
        }
    }

    /// Every candidate was tried and failed.
    pub fn exhausted(symbol: impl Into<SmolStr>, attempts: Vec<CandidateAttempt>) -> Self {
        Self {
            symbol: symbol.into(),
            attempts,
        }
    }

    /// The symbol that was requested.
    pub fn symbol(&self) -> &SmolStr {
        &self.symbol
    }

    /// The candidates that were tried, in resolution order.
    pub fn attempts(&self) -> &[CandidateAttempt] {
        &self.attempts
    }
}
