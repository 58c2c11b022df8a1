//! Wire types for the Honeycomb API.
//!
//! Reference: <https://docs.honeycomb.io/api/>
//!
//! Query specifications, operator enums, query result handles and the event
//! submission payloads. Everything here serializes to the exact JSON the
//! service expects; optional fields and empty lists are omitted.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{Error, Result};

/// Free-form event payload: column name to value.
pub type EventData = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Operator enums
// ============================================================================

/// The operator of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationOp {
    #[serde(rename = "COUNT")]
    Count,
    #[serde(rename = "SUM")]
    Sum,
    #[serde(rename = "AVG")]
    Avg,
    #[serde(rename = "COUNT_DISTINCT")]
    CountDistinct,
    #[serde(rename = "MAX")]
    Max,
    #[serde(rename = "MIN")]
    Min,
    #[serde(rename = "P001")]
    P001,
    #[serde(rename = "P01")]
    P01,
    #[serde(rename = "P05")]
    P05,
    #[serde(rename = "P10")]
    P10,
    #[serde(rename = "P25")]
    P25,
    #[serde(rename = "P50")]
    P50,
    #[serde(rename = "P75")]
    P75,
    #[serde(rename = "P90")]
    P90,
    #[serde(rename = "P95")]
    P95,
    #[serde(rename = "P99")]
    P99,
    #[serde(rename = "P999")]
    P999,
    #[serde(rename = "HEATMAP")]
    Heatmap,
}

impl CalculationOp {
    /// Every calculation operator.
    pub fn all() -> &'static [CalculationOp] {
        use CalculationOp::*;
        &[
            Count,
            Sum,
            Avg,
            CountDistinct,
            Max,
            Min,
            P001,
            P01,
            P05,
            P10,
            P25,
            P50,
            P75,
            P90,
            P95,
            P99,
            P999,
            Heatmap,
        ]
    }

    /// The wire string for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationOp::Count => "COUNT",
            CalculationOp::Sum => "SUM",
            CalculationOp::Avg => "AVG",
            CalculationOp::CountDistinct => "COUNT_DISTINCT",
            CalculationOp::Max => "MAX",
            CalculationOp::Min => "MIN",
            CalculationOp::P001 => "P001",
            CalculationOp::P01 => "P01",
            CalculationOp::P05 => "P05",
            CalculationOp::P10 => "P10",
            CalculationOp::P25 => "P25",
            CalculationOp::P50 => "P50",
            CalculationOp::P75 => "P75",
            CalculationOp::P90 => "P90",
            CalculationOp::P95 => "P95",
            CalculationOp::P99 => "P99",
            CalculationOp::P999 => "P999",
            CalculationOp::Heatmap => "HEATMAP",
        }
    }

    /// COUNT is the only calculation that works without a column.
    pub fn requires_column(&self) -> bool {
        !matches!(self, CalculationOp::Count)
    }
}

impl fmt::Display for CalculationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many values a filter operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArity {
    /// No value (`exists`, `does-not-exist`).
    None,
    /// One value.
    Single,
    /// A list of values (`in`, `not-in`).
    Multiple,
}

/// The operator of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    SmallerThan,
    #[serde(rename = "<=")]
    SmallerThanOrEqual,
    #[serde(rename = "starts-with")]
    StartsWith,
    #[serde(rename = "does-not-start-with")]
    DoesNotStartWith,
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = "does-not-exist")]
    DoesNotExist,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "does-not-contain")]
    DoesNotContain,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not-in")]
    NotIn,
}

impl FilterOp {
    /// Every filter operator.
    pub fn all() -> &'static [FilterOp] {
        use FilterOp::*;
        &[
            Equals,
            NotEquals,
            GreaterThan,
            GreaterThanOrEqual,
            SmallerThan,
            SmallerThanOrEqual,
            StartsWith,
            DoesNotStartWith,
            Exists,
            DoesNotExist,
            Contains,
            DoesNotContain,
            In,
            NotIn,
        ]
    }

    /// The wire string for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Equals => "=",
            FilterOp::NotEquals => "!=",
            FilterOp::GreaterThan => ">",
            FilterOp::GreaterThanOrEqual => ">=",
            FilterOp::SmallerThan => "<",
            FilterOp::SmallerThanOrEqual => "<=",
            FilterOp::StartsWith => "starts-with",
            FilterOp::DoesNotStartWith => "does-not-start-with",
            FilterOp::Exists => "exists",
            FilterOp::DoesNotExist => "does-not-exist",
            FilterOp::Contains => "contains",
            FilterOp::DoesNotContain => "does-not-contain",
            FilterOp::In => "in",
            FilterOp::NotIn => "not-in",
        }
    }

    /// The value shape this operator expects.
    pub fn arity(&self) -> FilterArity {
        match self {
            FilterOp::Exists | FilterOp::DoesNotExist => FilterArity::None,
            FilterOp::In | FilterOp::NotIn => FilterArity::Multiple,
            _ => FilterArity::Single,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How multiple filters are combined. The service defaults to AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterCombination {
    And,
    Or,
}

impl FilterCombination {
    /// Every filter combination.
    pub fn all() -> &'static [FilterCombination] {
        &[FilterCombination::And, FilterCombination::Or]
    }
}

impl fmt::Display for FilterCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterCombination::And => f.write_str("AND"),
            FilterCombination::Or => f.write_str("OR"),
        }
    }
}

/// Sort direction of an order term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Every sort order.
    pub fn all() -> &'static [SortOrder] {
        &[SortOrder::Ascending, SortOrder::Descending]
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("ascending"),
            SortOrder::Descending => f.write_str("descending"),
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// The value of a filter.
///
/// Serialized as absent, a string, or an array of strings. When decoding,
/// numeric and boolean scalars are kept as their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterValue {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl FilterValue {
    pub fn is_none(&self) -> bool {
        matches!(self, FilterValue::None)
    }

    pub fn arity(&self) -> FilterArity {
        match self {
            FilterValue::None => FilterArity::None,
            FilterValue::Single(_) => FilterArity::Single,
            FilterValue::Multiple(_) => FilterArity::Multiple,
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FilterValue::None => serializer.serialize_none(),
            FilterValue::Single(value) => serializer.serialize_str(value),
            FilterValue::Multiple(values) => values.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error as _;
        use serde_json::Value;

        fn scalar<E: serde::de::Error>(value: Value) -> std::result::Result<String, E> {
            match value {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                other => Err(E::custom(format!("unsupported filter value: {other}"))),
            }
        }

        match Value::deserialize(deserializer)? {
            Value::Null => Ok(FilterValue::None),
            Value::Array(items) => items
                .into_iter()
                .map(scalar)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(FilterValue::Multiple),
            Value::Object(_) => Err(D::Error::custom("filter value cannot be an object")),
            other => scalar(other).map(FilterValue::Single),
        }
    }
}

/// A filter within a query.
///
/// Construct with [`FilterSpec::new`] or one of the shorthands, which check
/// that the value matches the operator's arity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    column: String,
    op: FilterOp,
    #[serde(default, skip_serializing_if = "FilterValue::is_none")]
    value: FilterValue,
}

impl FilterSpec {
    /// Create a filter, rejecting a value whose shape doesn't fit `op`.
    pub fn new(column: impl Into<String>, op: FilterOp, value: FilterValue) -> Result<Self> {
        let column = column.into();
        if op.arity() != value.arity() {
            return Err(Error::InvalidFilter(format!(
                "operator '{op}' on column '{column}' expects {:?} value, got {:?}",
                op.arity(),
                value.arity()
            )));
        }
        Ok(Self { column, op, value })
    }

    /// `column exists`.
    pub fn exists(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::Exists,
            value: FilterValue::None,
        }
    }

    /// `column does-not-exist`.
    pub fn does_not_exist(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::DoesNotExist,
            value: FilterValue::None,
        }
    }

    /// A single-value comparison such as `=`, `<` or `contains`.
    pub fn compare(column: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Result<Self> {
        Self::new(column, op, FilterValue::Single(value.into()))
    }

    /// `column in [values]`.
    pub fn one_of<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            op: FilterOp::In,
            value: FilterValue::Multiple(values.into_iter().map(Into::into).collect()),
        }
    }

    /// `column not-in [values]`.
    pub fn none_of<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            op: FilterOp::NotIn,
            value: FilterValue::Multiple(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn op(&self) -> FilterOp {
        self.op
    }

    pub fn value(&self) -> &FilterValue {
        &self.value
    }
}

// ============================================================================
// Query specification
// ============================================================================

/// A calculation within a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationSpec {
    pub op: CalculationOp,
    /// Column to aggregate. Not needed with COUNT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl CalculationSpec {
    /// `COUNT`.
    pub fn count() -> Self {
        Self {
            op: CalculationOp::Count,
            column: None,
        }
    }

    /// An operator applied to a column.
    pub fn of(op: CalculationOp, column: impl Into<String>) -> Self {
        Self {
            op,
            column: Some(column.into()),
        }
    }
}

/// One ordering term. It must reference a breakdown or a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<CalculationOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

/// A query specification.
///
/// API docs: <https://docs.honeycomb.io/api/query-specification/>
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Only set on specifications returned by the service; must be `None`
    /// when creating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Calculations to return. The service applies COUNT if empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calculations: Vec<CalculationSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterSpec>,

    /// The service never echoes AND back, it omits the field instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_combination: Option<FilterCombination>,

    /// Columns to group events by.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdowns: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orders: Vec<OrderSpec>,

    /// Maximum number of result rows (1..=1000).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Time range in seconds. Defaults to two hours on the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<u32>,

    /// Absolute start, unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,

    /// Absolute end, unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,

    /// Graph resolution in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<u32>,
}

// ============================================================================
// Query results
// ============================================================================

/// Tracking handle for an asynchronously computed query.
///
/// API docs: <https://docs.honeycomb.io/api/query-results/>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub id: String,
    #[serde(default)]
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<QueryResultData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<QueryResultLinks>,
}

impl QueryResult {
    /// An incomplete handle with no data.
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            complete: false,
            data: None,
            links: None,
        }
    }
}

/// Raw result payload. The schema of `series` and `results` depends on the
/// query's calculations and breakdowns, so both are kept as plain JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResultData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<serde_json::Value>,
}

impl QueryResultData {
    /// Time series buckets, if `series` is an array.
    pub fn series(&self) -> &[serde_json::Value] {
        as_slice(self.series.as_ref())
    }

    /// Aggregate rows, if `results` is an array.
    pub fn results(&self) -> &[serde_json::Value] {
        as_slice(self.results.as_ref())
    }

    /// Decode `series` into a caller-chosen shape.
    pub fn decode_series<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        decode_list(self.series.as_ref())
    }

    /// Decode `results` into a caller-chosen shape.
    pub fn decode_results<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        decode_list(self.results.as_ref())
    }
}

fn as_slice(value: Option<&serde_json::Value>) -> &[serde_json::Value] {
    match value {
        Some(serde_json::Value::Array(items)) => items,
        _ => &[],
    }
}

fn decode_list<T: DeserializeOwned>(value: Option<&serde_json::Value>) -> Result<Vec<T>> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(v) => Vec::<T>::deserialize(v).map_err(|e| Error::Decode(e.to_string())),
    }
}

/// UI links for a completed result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryResultLinks {
    #[serde(default)]
    pub query_url: String,
    #[serde(default)]
    pub graph_image_url: String,
}

/// Body of `POST /1/query_results/{dataset}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateQueryResultRequest {
    pub query_id: String,
}

// ============================================================================
// Events
// ============================================================================

/// One entry of a batch submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendBatchRequest {
    /// Event timestamp; the service uses receive time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    /// The event represents `samplerate` events.
    #[serde(default, rename = "samplerate", skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    pub data: EventData,
}

impl SendBatchRequest {
    pub fn new(data: EventData) -> Self {
        Self {
            time: None,
            sample_rate: None,
            data,
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = Some(rate);
        self
    }
}

/// Per-event status of a batch submission, aligned with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendBatchResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendBatchResponse {
    /// True if the event was accepted (2xx status).
    pub fn is_accepted(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
