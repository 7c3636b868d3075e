use std::sync::{Arc, Mutex};

use tracing::span;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

/// Records the name of every span opened while it is installed
#[derive(Clone, Default)]
struct SpanNames(Arc<Mutex<Vec<&'static str>>>);

impl<S: Subscriber> Layer<S> for SpanNames {
    fn on_new_span(&self, attrs: &span::Attributes<'_>, _id: &span::Id, _ctx: Context<'_, S>) {
        if let Ok(mut names) = self.0.lock() {
            names.push(attrs.metadata().name());
        }
    }
}

fn spans_of(f: impl FnOnce()) -> Vec<&'static str> {
    let names = SpanNames::default();
    let subscriber = Registry::default().with(names.clone());
    tracing::subscriber::with_default(subscriber, f);
    let recorded = names.0.lock().map(|names| names.clone()).unwrap_or_default();
    recorded
}

#[test]
fn test_parse_entry_points_open_spans() {
    let names = spans_of(|| {
        assert!(xmlobj::parse("<a>1</a>").is_ok());
        assert!(xmlobj::parse_raw("<a>1</a>").is_ok());
        assert!(xmlobj::parse_bytes(b"<a>1</a>").is_ok());
        assert!(xmlobj::validate("<a>1</a>").is_some());
    });

    for expected in ["parse_tree", "parse_raw", "parse_bytes", "parse"] {
        assert!(names.contains(&expected), "no {expected} span in {names:?}");
    }
}

#[test]
fn test_conversions_open_spans() {
    let names = spans_of(|| {
        assert!(xmlobj::xml_to_json("<a>1</a>").is_ok());
        assert!(xmlobj::json_to_xml(r#"{"a": 1}"#).is_ok());
        assert!(xmlobj::stringify(&serde_json::json!({"a": 1})).is_ok());
    });

    for expected in ["xml_to_json_with_config", "json_to_xml_with_config", "stringify_with_config"] {
        assert!(names.contains(&expected), "no {expected} span in {names:?}");
    }
}
