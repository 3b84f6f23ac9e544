//! Version-stamped resources.

/// A stored entity guarded by optimistic concurrency control.
///
/// Every successful write bumps `version` by exactly one. A write submitted
/// with a version that no longer matches the stored one must not apply.
pub trait Versioned: Clone + Send + Sync + 'static {
    /// Human-readable resource name used in error messages.
    const RESOURCE: &'static str;

    /// Primary key.
    fn id(&self) -> i64;

    /// Version the caller last read.
    fn version(&self) -> i32;

    /// Records the version assigned by a successful write.
    fn set_version(&mut self, version: i32);
}
