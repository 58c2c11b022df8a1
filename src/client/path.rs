//! API paths.
//!
//! An [`ApiPath`] is a list of raw segments. Segments are percent-encoded
//! once, when the path is joined onto the base URL, so dataset names
//! containing `/`, spaces or other reserved characters stay one segment.

use std::fmt;

use reqwest::Url;

use crate::error::{Error, Result};
use crate::utils::constants::API_VERSION_SEGMENT;

/// Path of one API resource, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    /// `/1/{resource}`.
    pub fn resource(resource: &str) -> Self {
        Self {
            segments: vec![API_VERSION_SEGMENT.to_string(), resource.to_string()],
        }
    }

    /// Append one raw segment.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// `/1/events/{dataset}`.
    pub fn events(dataset: &str) -> Self {
        Self::resource("events").segment(dataset)
    }

    /// `/1/batch/{dataset}`.
    pub fn batch(dataset: &str) -> Self {
        Self::resource("batch").segment(dataset)
    }

    /// `/1/queries/{dataset}`.
    pub fn queries(dataset: &str) -> Self {
        Self::resource("queries").segment(dataset)
    }

    /// `/1/queries/{dataset}/{id}`.
    pub fn query(dataset: &str, id: &str) -> Self {
        Self::queries(dataset).segment(id)
    }

    /// `/1/query_results/{dataset}`.
    pub fn query_results(dataset: &str) -> Self {
        Self::resource("query_results").segment(dataset)
    }

    /// `/1/query_results/{dataset}/{id}`.
    pub fn query_result(dataset: &str, id: &str) -> Self {
        Self::query_results(dataset).segment(id)
    }

    /// The raw, unencoded segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Join onto `base`, percent-encoding every segment.
    ///
    /// Any path already present on `base` is kept as a prefix. `.` and `..`
    /// segments are rejected since URL normalization would drop them.
    pub fn to_url(&self, base: &Url) -> Result<Url> {
        if let Some(dot) = self.segments.iter().find(|s| is_dot_segment(s)) {
            return Err(Error::InvalidArgument(format!(
                "path segment '{dot}' cannot be sent in {self}"
            )));
        }
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("base URL '{base}' cannot carry a path")))?
            .pop_if_empty()
            .extend(&self.segments);
        Ok(url)
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Reject an empty dataset name or id, or one that is `.` or `..`, before
/// building a request.
pub(crate) fn require(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidArgument(format!("{what} must not be empty")));
    }
    if is_dot_segment(value) {
        return Err(Error::InvalidArgument(format!(
            "{what} '{value}' is not a valid path segment"
        )));
    }
    Ok(())
}
