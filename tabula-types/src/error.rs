/// Precondition violations raised by reducers.
///
/// These signal a caller bug (bad UI wiring), not a user-facing failure.
/// A dispatch that fails with one of these leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReduceError {
    #[error("cannot go before page 1")]
    PageOutFromBegin,
    #[error("cannot go after last page {max}")]
    PageOutFromEnd { max: u32 },
    #[error("page {page} is outside 1..={max}")]
    PageOutOfBoundaries { page: u32, max: u32 },
    #[error("per-page count must be at least 1")]
    InvalidPerPage,
    #[error("unknown resource '{0}'")]
    UnknownResource(String),
}
