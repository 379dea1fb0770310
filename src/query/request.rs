use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optional bounds on `orders.order_date`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Request body for analytics queries
///
/// Names are plain strings; they are resolved against the catalog at compile
/// time. Filter values are kept as raw JSON so the compiler can decide how to
/// sanitize each recognized key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct QueryRequest {
    /// Metrics to compute, in output order
    #[serde(default)]
    pub metrics: Vec<String>,
    /// Grouping dimensions, in GROUP BY / ORDER BY precedence
    #[serde(default)]
    pub dimensions: Vec<String>,
    /// Filter key to scalar or array value
    #[serde(default)]
    pub filters: Map<String, Value>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    /// Requested row limit; clamped by the compiler
    #[serde(default)]
    pub limit: Option<i64>,
}

impl QueryRequest {
    pub fn new<M, D>(metrics: M, dimensions: D) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            metrics: metrics.into_iter().map(Into::into).collect(),
            dimensions: dimensions.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_date_range(mut self, start_date: Option<&str>, end_date: Option<&str>) -> Self {
        self.date_range = Some(DateRange {
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
        });
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_request() {
        let json = r#"{
            "metrics": ["total_orders", "total_revenue"],
            "dimensions": ["channel"],
            "filters": {"status": ["delivered"], "store_ids": [1, 2]},
            "date_range": {"start_date": "2024-01-01"},
            "limit": 50
        }"#;
        let request: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.metrics, vec!["total_orders", "total_revenue"]);
        assert_eq!(request.dimensions, vec!["channel"]);
        assert_eq!(request.filters.len(), 2);
        assert_eq!(
            request.date_range.as_ref().and_then(|d| d.start_date.as_deref()),
            Some("2024-01-01")
        );
        assert_eq!(request.limit, Some(50));
    }

    #[test]
    fn test_deserialize_minimal_request() {
        let request: QueryRequest = serde_json::from_str(r#"{"metrics": ["avg_rating"]}"#).unwrap();
        assert!(request.dimensions.is_empty());
        assert!(request.filters.is_empty());
        assert!(request.date_range.is_none());
        assert!(request.limit.is_none());
    }

    #[test]
    fn test_builder_preserves_filter_order() {
        let request = QueryRequest::new(["total_orders"], Vec::<String>::new())
            .with_filter("status", serde_json::json!(["delivered"]))
            .with_filter("channels", serde_json::json!(["app"]));
        let keys: Vec<&String> = request.filters.keys().collect();
        assert_eq!(keys, vec!["status", "channels"]);
    }
}
