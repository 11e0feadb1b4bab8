use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use super::aggregate::CountPoint;

/// The visual geometry drawn for each aggregated point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    #[default]
    Line,
    Point,
}

/// How y is derived from the rows sharing an x value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    #[default]
    Count,
}

/// Declarative chart description: x is a quantitative field, y an aggregate
/// over the rows at each x.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub x_field: String,
    pub aggregate: Aggregate,
    pub mark: Mark,
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
}

impl ChartSpec {
    pub fn new(x_field: impl Into<String>, mark: Mark, width: u32, height: u32) -> Self {
        Self {
            x_field: x_field.into(),
            aggregate: Aggregate::Count,
            mark,
            width,
            height,
            title: None,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn x_title(&self) -> &str {
        &self.x_field
    }

    pub fn y_title(&self) -> &str {
        match self.aggregate {
            Aggregate::Count => "Count of Records",
        }
    }

    /// Vega-Lite-style document with the aggregated values inlined.
    pub fn to_document(&self, points: &[CountPoint]) -> JsonValue {
        let values: Vec<JsonValue> = points
            .iter()
            .map(|p| {
                let mut row = Map::new();
                row.insert(self.x_field.clone(), json!(p.x));
                row.insert("count".to_string(), json!(p.count));
                JsonValue::Object(row)
            })
            .collect();

        let mut doc = json!({
            "mark": self.mark,
            "width": self.width,
            "height": self.height,
            "encoding": {
                "x": { "field": self.x_field, "type": "quantitative", "title": self.x_title() },
                "y": { "aggregate": self.aggregate, "type": "quantitative", "title": self.y_title() },
            },
            "data": { "values": values },
        });
        if let Some(title) = &self.title {
            doc["title"] = json!(title);
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_carries_encoding_and_data() {
        let spec = ChartSpec::new("carat", Mark::Line, 800, 600);
        let doc = spec.to_document(&[
            CountPoint { x: 0.23, count: 293 },
            CountPoint { x: 0.24, count: 254 },
        ]);

        assert_eq!(doc["mark"], "line");
        assert_eq!(doc["encoding"]["x"]["field"], "carat");
        assert_eq!(doc["encoding"]["y"]["aggregate"], "count");
        assert_eq!(doc["encoding"]["y"]["title"], "Count of Records");
        assert_eq!(doc["data"]["values"][1]["carat"], 0.24);
        assert_eq!(doc["data"]["values"][1]["count"], 254);
        assert!(doc.get("title").is_none());
    }

    #[test]
    fn title_is_only_emitted_when_set() {
        let spec = ChartSpec::new("carat", Mark::Point, 10, 10)
            .with_title(Some("Smaller diamonds".into()));
        let doc = spec.to_document(&[]);
        assert_eq!(doc["title"], "Smaller diamonds");
        assert_eq!(doc["mark"], "point");
        assert_eq!(doc["data"]["values"], json!([]));
    }

    #[test]
    fn marks_deserialize_from_lowercase() {
        let mark: Mark = serde_json::from_str("\"point\"").unwrap();
        assert_eq!(mark, Mark::Point);
        assert!(serde_json::from_str::<Mark>("\"bar\"").is_err());
    }
}
