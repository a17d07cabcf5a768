//! Placeholder values written when a derived field cannot be computed.
//!
//! Downstream consumers distinguish "not computable" from real zeros by these
//! conventions, so they are centralized here instead of being re-typed per
//! field. Three families exist: track-hypothesis kinematics and impact
//! parameters use -1000, per-candidate diagnostics and summary scalars use
//! -999, and boolean selection flags simply stay at 0.

/// Track-hypothesis kinematics (pt/eta/phi) when the fit is absent.
pub const KINEMATICS_UNAVAILABLE: f64 = -1000.0;

/// Integer companion of [`KINEMATICS_UNAVAILABLE`], used for track charge.
pub const KINEMATICS_UNAVAILABLE_INT: i32 = -1000;

/// Floating-point diagnostics (fit quality, timing, MET) without their
/// required sub-measurement.
pub const DIAGNOSTIC_UNAVAILABLE: f64 = -999.0;

/// Integer companion of [`DIAGNOSTIC_UNAVAILABLE`], used for hit counts and
/// timing degrees of freedom.
pub const DIAGNOSTIC_UNAVAILABLE_INT: i32 = -999;

/// Pile-up interaction counts before an in-time bunch crossing is seen.
pub const INTERACTIONS_UNAVAILABLE: f64 = -1.0;

/// Vertex count before the vertex collection has been read.
pub const VERTEX_COUNT_UNAVAILABLE: i32 = -1;

/// Selection flags are 0/1 integers; an unevaluated predicate stays at fail.
pub const FLAG_FAIL: i32 = 0;
pub const FLAG_PASS: i32 = 1;

/// Fixed coefficient subtracting pile-up contamination from the neutral
/// isolation sums in the combined relative isolation. Not configurable.
pub const ISOLATION_PILEUP_CORRECTION: f64 = 0.5;
