/// The type of run—an outer enum to make sure that dry-runs are handled appropriately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunType<T> {
    /// Signifies that this is a dry run. No requests should be sent—just build them and log what
    /// would have happened.
    DryRun(T),
    /// This is a real run, actually do the thing.
    Real(T),
}

impl<T> RunType<T> {
    #[must_use]
    pub fn new(dry_run: bool, inner: T) -> Self {
        if dry_run {
            RunType::DryRun(inner)
        } else {
            RunType::Real(inner)
        }
    }

    pub fn take(self) -> (RunType<()>, T) {
        match self {
            RunType::DryRun(inner) => (RunType::DryRun(()), inner),
            RunType::Real(inner) => (RunType::Real(()), inner),
        }
    }
}
