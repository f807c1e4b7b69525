//! Editor content output.
//!
//! Converts the host editor's document into the configured output format and
//! routes change notifications through a [`Throttle`], while blur events are
//! reported immediately.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::throttle::Throttle;

/// Format handed to `on_update` / `on_blur` consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(format!("unknown output format `{other}`")),
        }
    }
}

/// Editor content in one of the output formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "lowercase")]
pub enum Content {
    Html(String),
    Json(serde_json::Value),
    Text(String),
}

/// Read and seed access to the host editor's document.
pub trait EditorContent {
    fn html(&self) -> String;
    fn json(&self) -> serde_json::Value;
    fn text(&self) -> String;
    fn is_empty(&self) -> bool;
    fn set_content(&mut self, content: &Content);
}

/// Render the editor's document in `format`.
///
/// HTML output of a document without text is the empty string, so an
/// editor holding only an empty paragraph reads as empty to form consumers.
pub fn get_output(editor: &impl EditorContent, format: OutputFormat) -> Content {
    match format {
        OutputFormat::Json => Content::Json(editor.json()),
        OutputFormat::Html => {
            if editor.text().is_empty() {
                Content::Html(String::new())
            } else {
                Content::Html(editor.html())
            }
        }
        OutputFormat::Text => Content::Text(editor.text()),
    }
}

type BlurHandler = Box<dyn FnMut(Content) + Send>;

/// Wires editor lifecycle events to the consumer callbacks.
pub struct ContentPipeline {
    format: OutputFormat,
    initial: Option<Content>,
    updates: Throttle<Content>,
    on_blur: Option<BlurHandler>,
}

impl std::fmt::Debug for ContentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentPipeline")
            .field("format", &self.format)
            .field("initial", &self.initial)
            .field("updates", &self.updates)
            .finish_non_exhaustive()
    }
}

impl ContentPipeline {
    /// Build a pipeline delivering updates at most once per `throttle_delay`.
    ///
    /// A zero delay forwards every update. Must be created inside a tokio
    /// runtime.
    pub fn new(
        format: OutputFormat,
        throttle_delay: Duration,
        on_update: impl FnMut(Content) + Send + 'static,
    ) -> Self {
        Self {
            format,
            initial: None,
            updates: Throttle::new(throttle_delay, on_update),
            on_blur: None,
        }
    }

    /// Content applied when the editor is created empty.
    pub fn with_initial(mut self, content: Content) -> Self {
        self.initial = Some(content);
        self
    }

    pub fn with_on_blur(mut self, on_blur: impl FnMut(Content) + Send + 'static) -> Self {
        self.on_blur = Some(Box::new(on_blur));
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn on_create(&self, editor: &mut impl EditorContent) {
        let Some(initial) = &self.initial else {
            return;
        };
        if editor.is_empty() {
            tracing::debug!(target: "mintap::content", "seeding empty editor");
            editor.set_content(initial);
        }
    }

    pub fn on_update(&self, editor: &impl EditorContent) {
        self.updates.emit(get_output(editor, self.format));
    }

    pub fn on_blur(&mut self, editor: &impl EditorContent) {
        let format = self.format;
        if let Some(on_blur) = self.on_blur.as_mut() {
            on_blur(get_output(editor, format));
        }
    }

    /// Stop delivering updates and cancel any pending one.
    pub fn shutdown(&self) {
        self.updates.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    struct FakeEditor {
        text: String,
    }

    impl EditorContent for FakeEditor {
        fn html(&self) -> String {
            format!("<p>{}</p>", self.text)
        }

        fn json(&self) -> serde_json::Value {
            serde_json::json!({ "type": "doc", "text": self.text })
        }

        fn text(&self) -> String {
            self.text.clone()
        }

        fn is_empty(&self) -> bool {
            self.text.is_empty()
        }

        fn set_content(&mut self, content: &Content) {
            if let Content::Text(text) | Content::Html(text) = content {
                self.text = text.clone();
            }
        }
    }

    #[test]
    fn test_output_formats() {
        let editor = FakeEditor {
            text: "hi".into(),
        };
        assert_eq!(
            get_output(&editor, OutputFormat::Html),
            Content::Html("<p>hi</p>".into())
        );
        assert_eq!(
            get_output(&editor, OutputFormat::Text),
            Content::Text("hi".into())
        );
        assert_eq!(
            get_output(&editor, OutputFormat::Json),
            Content::Json(serde_json::json!({ "type": "doc", "text": "hi" }))
        );
    }

    #[test]
    fn test_empty_html_is_empty_string() {
        let editor = FakeEditor::default();
        assert_eq!(
            get_output(&editor, OutputFormat::Html),
            Content::Html(String::new())
        );
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("markdown".parse::<OutputFormat>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_content_only_when_empty() {
        let pipeline = ContentPipeline::new(OutputFormat::Text, Duration::ZERO, |_| {})
            .with_initial(Content::Text("seed".into()));

        let mut empty = FakeEditor::default();
        pipeline.on_create(&mut empty);
        assert_eq!(empty.text, "seed");

        let mut filled = FakeEditor {
            text: "kept".into(),
        };
        pipeline.on_create(&mut filled);
        assert_eq!(filled.text, "kept");
    }

    #[tokio::test(start_paused = true)]
    async fn test_updates_throttled_blur_immediate() {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let blurs = Arc::new(Mutex::new(Vec::new()));
        let (u, b) = (Arc::clone(&updates), Arc::clone(&blurs));

        let mut pipeline = ContentPipeline::new(
            OutputFormat::Text,
            Duration::from_millis(100),
            move |c| u.lock().unwrap().push(c),
        )
        .with_on_blur(move |c| b.lock().unwrap().push(c));

        let mut editor = FakeEditor::default();
        for word in ["a", "ab", "abc"] {
            editor.text = word.into();
            pipeline.on_update(&editor);
        }
        pipeline.on_blur(&editor);
        assert_eq!(*blurs.lock().unwrap(), vec![Content::Text("abc".into())]);
        assert_eq!(*updates.lock().unwrap(), vec![Content::Text("a".into())]);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(
            *updates.lock().unwrap(),
            vec![Content::Text("a".into()), Content::Text("abc".into())]
        );
    }
}
