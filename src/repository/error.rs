//! Analysis error type
//!
//! Every failure is fatal for the run: the engine reports the first error
//! observed and emits no partial report.

use gix::ObjectId;
use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("failed to open repository")]
    OpenFailed {
        #[source]
        source: Cause,
    },

    #[error("object database iteration failed")]
    IterationFailed {
        #[source]
        source: Cause,
    },

    #[error("failed to read object {oid}")]
    LookupFailed {
        oid: ObjectId,
        #[source]
        source: Cause,
    },

    /// Aggregation referenced an OID that is absent from its category table.
    /// The worker phase inserts every object it sees, so this indicates an
    /// earlier lookup or iteration bug.
    #[error("object {oid} missing from the {table} table")]
    InternalMissing { oid: ObjectId, table: &'static str },

    #[error("failed to list references")]
    ReferenceListFailed {
        #[source]
        source: Cause,
    },
}

impl StatsError {
    pub(crate) fn open(source: impl Into<Cause>) -> Self {
        StatsError::OpenFailed {
            source: source.into(),
        }
    }

    pub(crate) fn iteration(source: impl Into<Cause>) -> Self {
        StatsError::IterationFailed {
            source: source.into(),
        }
    }

    pub(crate) fn lookup(oid: ObjectId, source: impl Into<Cause>) -> Self {
        StatsError::LookupFailed {
            oid,
            source: source.into(),
        }
    }

    pub(crate) fn references(source: impl Into<Cause>) -> Self {
        StatsError::ReferenceListFailed {
            source: source.into(),
        }
    }
}
