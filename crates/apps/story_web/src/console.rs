//! `tracing` events forwarded to the browser console.

use std::fmt::Write as _;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use wasm_bindgen::JsValue;

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

pub(crate) fn format_line(target: &str, message: &str, fields: &str) -> String {
    format!("[{target}] {message}{fields}")
}

struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let meta = event.metadata();
        let line = JsValue::from_str(&format_line(meta.target(), &visitor.message, &visitor.fields));
        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

/// Install the console layer as the global subscriber. Later calls are no-ops.
pub fn install(max_level: Level) {
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer.with_filter(LevelFilter::from_level(max_level)))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::format_line;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_layout() {
        assert_eq!(
            format_line("story::machine", "focus", " index=3"),
            "[story::machine] focus index=3"
        );
    }
}
