//! Shared error taxonomy for the index-domain container workspace.
//!
//! Every container crate in this workspace (`ixlist`, `keysets`, `edgegroups`, ...) returns
//! `gerror::Result<T>` from any operation that can fail, and every failure is one of the two error
//! kinds a live container can raise: [`GraphError::ContractViolation`] (a precondition was violated)
//! or [`GraphError::ParseFailure`] (`from_string` was given malformed input). Algorithmic
//! infeasibility (no legal move exists, not that one was attempted incorrectly) is not an error at
//! all: callers see it as an ordinary `bool`/`Option` return from the operation that could not make
//! progress.

use std::backtrace::Backtrace;
use std::fmt::Debug;

use biometrics::Counter;

///////////////////////////////////////////////// Z ////////////////////////////////////////////////

/// The core trait implemented by every error in this workspace. Mirrors the "long form" error
/// pattern: build a short, stable summary up front, then attach debug-formatted context as the
/// call unwinds so a failure can be diagnosed from its `long_form()` alone.
pub trait Z {
    /// The type returned from the `with_*` builder methods (usually `Self`).
    type Error;

    /// Render the full error, including every attached piece of context and a backtrace.
    fn long_form(&self) -> String;
    /// Attach the debug formatting of a named value.
    fn with_info<X: Debug>(self, name: &str, value: X) -> Self::Error;
    /// Attach the debug formatting of a named value, computed lazily.
    fn with_lazy_info<F: FnOnce() -> String>(self, name: &str, value: F) -> Self::Error;
}

impl<T, E: Z<Error = E>> Z for std::result::Result<T, E> {
    type Error = std::result::Result<T, E>;

    fn long_form(&self) -> String {
        match self {
            Ok(_) => panic!("called long_form() on an Ok result"),
            Err(e) => e.long_form(),
        }
    }

    fn with_info<X: Debug>(self, name: &str, value: X) -> Self::Error {
        match self {
            Ok(_) => self,
            Err(e) => Err(e.with_info(name, value)),
        }
    }

    fn with_lazy_info<F: FnOnce() -> String>(self, name: &str, value: F) -> Self::Error {
        match self {
            Ok(_) => self,
            Err(e) => Err(e.with_info(name, value())),
        }
    }
}

///////////////////////////////////////////// ErrorCore ////////////////////////////////////////////

/// A concrete `Z` implementation that every [`GraphError`] variant wraps. Captures a backtrace at
/// construction time, since that is the only point at which the call stack that violated a contract
/// is still available.
#[derive(Clone, Debug)]
pub struct ErrorCore {
    short: String,
    backtrace: String,
    info: Vec<(String, String)>,
}

impl ErrorCore {
    /// Create a new [`ErrorCore`] with the given short summary, clicking `counter` so the
    /// surrounding process's vitals reflect how often this error kind fires.
    pub fn new(short: &str, counter: &'static Counter) -> Self {
        counter.click();
        ErrorCore {
            short: short.to_string(),
            backtrace: format!("{}", Backtrace::force_capture()),
            info: Vec::new(),
        }
    }
}

impl Z for ErrorCore {
    type Error = Self;

    fn long_form(&self) -> String {
        let mut s = self.short.clone();
        for (name, value) in self.info.iter() {
            s += &format!("\n{name} = {value}");
        }
        s += &format!("\n\nbacktrace:\n{}", self.backtrace);
        s
    }

    fn with_info<X: Debug>(mut self, name: &str, value: X) -> Self::Error {
        self.info.push((name.to_string(), format!("{value:?}")));
        self
    }

    fn with_lazy_info<F: FnOnce() -> String>(mut self, name: &str, value: F) -> Self::Error {
        self.info.push((name.to_string(), value()));
        self
    }
}

////////////////////////////////////////////// GraphError //////////////////////////////////////////

static CONTRACT_VIOLATIONS: Counter = Counter::new("gerror.contract_violation");
static PARSE_FAILURES: Counter = Counter::new("gerror.parse_failure");

/// The two error kinds a live container in this workspace can raise. Algorithmic infeasibility
/// is deliberately absent: it is a `bool`/`Option` return, never a `GraphError`.
#[derive(Clone, Debug)]
pub enum GraphError {
    /// An operation was called with inputs that violate its documented preconditions. The
    /// container is left exactly as it was immediately before the call.
    ContractViolation(ErrorCore),
    /// `from_string` was given malformed or inconsistent input. The receiver is left cleared.
    ParseFailure(ErrorCore),
}

impl GraphError {
    /// Build a [`GraphError::ContractViolation`] with the given short summary.
    ///
    /// Contract violations are checked in every build, debug and release alike, per the
    /// assertion-discipline decision recorded in DESIGN.md: the public API always returns a
    /// `Result`, so a violated precondition is never Undefined Behavior, only a propagated `Err`
    /// that leaves the container exactly as it was before the call.
    pub fn contract_violation(short: impl Into<String>) -> Self {
        GraphError::ContractViolation(ErrorCore::new(&short.into(), &CONTRACT_VIOLATIONS))
    }

    /// Build a [`GraphError::ParseFailure`] with the given short summary.
    pub fn parse_failure(short: impl Into<String>) -> Self {
        GraphError::ParseFailure(ErrorCore::new(&short.into(), &PARSE_FAILURES))
    }

    /// True iff this is a [`GraphError::ContractViolation`].
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, GraphError::ContractViolation(_))
    }

    /// True iff this is a [`GraphError::ParseFailure`].
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, GraphError::ParseFailure(_))
    }
}

impl Z for GraphError {
    type Error = Self;

    fn long_form(&self) -> String {
        match self {
            GraphError::ContractViolation(core) => format!("contract violation: {}", core.long_form()),
            GraphError::ParseFailure(core) => format!("parse failure: {}", core.long_form()),
        }
    }

    fn with_info<X: Debug>(self, name: &str, value: X) -> Self::Error {
        match self {
            GraphError::ContractViolation(core) => {
                GraphError::ContractViolation(core.with_info(name, value))
            }
            GraphError::ParseFailure(core) => GraphError::ParseFailure(core.with_info(name, value)),
        }
    }

    fn with_lazy_info<F: FnOnce() -> String>(self, name: &str, value: F) -> Self::Error {
        match self {
            GraphError::ContractViolation(core) => {
                GraphError::ContractViolation(core.with_lazy_info(name, value))
            }
            GraphError::ParseFailure(core) => {
                GraphError::ParseFailure(core.with_lazy_info(name, value))
            }
        }
    }
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::ContractViolation(core) => write!(f, "contract violation: {}", core.short),
            GraphError::ParseFailure(core) => write!(f, "parse failure: {}", core.short),
        }
    }
}

impl std::error::Error for GraphError {}

/// The `Result` type returned by every fallible operation in this workspace.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Require `$cond`, returning a [`GraphError::ContractViolation`] from the enclosing function
/// otherwise. Used at the top of every operation with a documented precondition.
#[macro_export]
macro_rules! require {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::GraphError::contract_violation(format!($($arg)*)));
        }
    };
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_form_includes_info() {
        let core = ErrorCore::new("boom", &CONTRACT_VIOLATIONS);
        let core = core.with_info("x", 5);
        let rendered = core.long_form();
        assert!(rendered.contains("boom"));
        assert!(rendered.contains("x = 5"));
        assert!(rendered.contains("backtrace"));
    }

    #[test]
    fn display_matches_short_summary() {
        let err = GraphError::ParseFailure(ErrorCore::new("bad input", &PARSE_FAILURES));
        assert_eq!("parse failure: bad input", format!("{err}"));
    }

    fn check(x: i32) -> Result<i32> {
        require!(x >= 0, "x must be non-negative, got {x}");
        Ok(x)
    }

    #[test]
    fn require_macro_passes() {
        assert_eq!(5, check(5).unwrap());
    }

    #[test]
    fn require_macro_fails() {
        assert!(check(-1).unwrap_err().is_contract_violation());
    }
}
