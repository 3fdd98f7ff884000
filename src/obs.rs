//! Optional observability helpers for token and Graph operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `aad_graph.op` with the `op` (operation
//!   kind), `stage` (call site), and `outcome` fields.
//! - Enable `metrics` to increment the `aad_graph_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operation kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Password grant that refreshes the cached admin token.
	TokenRefresh,
	/// Password grant used only to check a member's credentials.
	Verification,
	/// Graph read (GET).
	GraphRead,
	/// Graph write (POST/PATCH/DELETE).
	GraphWrite,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::TokenRefresh => "token_refresh",
			OpKind::Verification => "verification",
			OpKind::GraphRead => "graph_read",
			OpKind::GraphWrite => "graph_write",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an [`OpSpan`] and records attempt/success/failure outcomes around it.
pub(crate) async fn observe<T, Fut>(kind: OpKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OpSpan::new(kind, stage);

	record_op_outcome(kind, OpOutcome::Attempt);

	let result = span.instrument(fut).await;
	let outcome = if result.is_ok() { OpOutcome::Success } else { OpOutcome::Failure };

	span.finish(outcome);
	record_op_outcome(kind, outcome);

	result
}
