/// Errors raised by the lazy-load engine.
///
/// None of them are fatal: callers degrade to "placeholder only" instead of
/// failing the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LazyLoadError {
    /// The viewport observation primitive cannot be constructed here.
    UnsupportedEnvironment { reason: &'static str },
}

impl std::fmt::Display for LazyLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LazyLoadError::UnsupportedEnvironment { reason } => {
                write!(f, "viewport observation unsupported: {reason}")
            }
        }
    }
}

impl std::error::Error for LazyLoadError {}

/// Result of [`ObservationHandle::release`](crate::ObservationHandle::release).
///
/// Releasing is always safe; the variants only tell the caller which exit
/// path got there first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Observation was live and is now cancelled without firing.
    Released,
    /// The watcher already fired and released itself.
    AlreadyFired,
    /// A previous release already cancelled the observation.
    AlreadyReleased,
}

/// What happened to one batch of intersection entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Fired,
    Ignored(IgnoreReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No entry in the batch crossed the threshold.
    BelowThreshold,
    /// The watcher already fired or was released.
    Stale,
}
