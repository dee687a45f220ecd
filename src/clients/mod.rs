use thiserror::Error;

pub mod deezer;
pub mod openlibrary;
pub mod openmeteo;
pub mod rawg;
pub mod tmdb;
pub mod unsplash;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} API key is not configured")]
    MissingCredential(&'static str),

    #[error("{service} API error: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Providers paginate by 1-based page number; offsets are translated to the
/// page containing the requested offset.
pub(crate) fn page_for_offset(offset: u64, page_size: u64) -> u64 {
    offset / page_size + 1
}

/// Some providers omit the total count on sparse responses; fall back to the
/// number of rows actually returned.
pub(crate) fn total_or_len(total: Option<u64>, returned: usize) -> u64 {
    total.unwrap_or_else(|| u64::try_from(returned).unwrap_or(u64::MAX))
}
