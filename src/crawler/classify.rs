//! Fetch failure classification
//!
//! Maps any error raised on the fetch path onto one of the five
//! [`FetchError`] kinds by walking its source chain.

use crate::FetchError;
use std::error::Error;
use thiserror::Error;

/// A URL whose scheme the fetcher refuses to request
#[derive(Debug, Error)]
#[error("unsupported URL scheme: {0}")]
pub struct UnsupportedScheme(pub String);

/// A redirect without a `Location` header
#[derive(Debug, Error)]
#[error("redirect response has no Location header")]
pub struct MissingLocation;

enum Verdict {
    /// This error decides the kind
    Known(FetchError),
    /// Use this kind unless a source says otherwise
    Hint(FetchError),
    /// Look at the source
    Unknown,
}

/// Classifies a fetch failure
///
/// | Failure | Kind |
/// |---------|------|
/// | URL parse error, missing redirect target | `InvalidUrl` |
/// | Non-HTTP(S) scheme, request that could not be built | `BadType` |
/// | Connect/DNS failure, timeout, socket I/O, body read | `ConnectionFailure` |
/// | Invalid UTF-8, undecodable body or header | `EncodingFailure` |
/// | Anything else | `Generic` |
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::classify;
/// use ripple_crawl::FetchError;
///
/// let err = url::Url::parse("not a url").unwrap_err();
/// assert_eq!(classify(&err), FetchError::InvalidUrl);
/// ```
pub fn classify(failure: &(dyn Error + 'static)) -> FetchError {
    let mut fallback = FetchError::Generic;
    let mut current = Some(failure);

    while let Some(err) = current {
        match classify_single(err) {
            Verdict::Known(kind) => return kind,
            Verdict::Hint(kind) => {
                if fallback == FetchError::Generic {
                    fallback = kind;
                }
            }
            Verdict::Unknown => {}
        }
        current = err.source();
    }

    fallback
}

fn classify_single(err: &(dyn Error + 'static)) -> Verdict {
    if err.is::<url::ParseError>() || err.is::<MissingLocation>() {
        return Verdict::Known(FetchError::InvalidUrl);
    }

    if err.is::<UnsupportedScheme>() {
        return Verdict::Known(FetchError::BadType);
    }

    if let Some(e) = err.downcast_ref::<reqwest::Error>() {
        if e.is_connect() || e.is_timeout() || e.is_body() {
            return Verdict::Known(FetchError::ConnectionFailure);
        }
        if e.is_decode() {
            return Verdict::Known(FetchError::EncodingFailure);
        }
        if e.is_builder() {
            return Verdict::Hint(FetchError::BadType);
        }
        return Verdict::Unknown;
    }

    if err.is::<std::str::Utf8Error>()
        || err.is::<std::string::FromUtf8Error>()
        || err.is::<reqwest::header::ToStrError>()
    {
        return Verdict::Known(FetchError::EncodingFailure);
    }

    if let Some(io) = err.downcast_ref::<std::io::Error>() {
        return match io.kind() {
            std::io::ErrorKind::InvalidData => Verdict::Known(FetchError::EncodingFailure),
            _ => Verdict::Known(FetchError::ConnectionFailure),
        };
    }

    Verdict::Unknown
}
