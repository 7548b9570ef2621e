//! Tracing → browser console
//!
//! A minimal `tracing-subscriber` layer that formats each event as
//! `[target] message key=value ...` and hands it to `console.log`,
//! `console.warn` or `console.error` by level.

use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use wasm_bindgen::JsValue;

#[derive(Default)]
struct ConsoleVisitor {
    message: String,
    fields: String,
}

impl Visit for ConsoleVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }
}

pub struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = ConsoleVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let line = JsValue::from_str(&format!("[{}] {}{}", meta.target(), visitor.message, visitor.fields));
        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

/// Install the console subscriber; later calls are ignored
pub fn init_logging(max_level: LevelFilter) {
    let installed = tracing_subscriber::registry()
        .with(max_level)
        .with(ConsoleLayer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(level = %max_level, "console logging ready");
    }
}
