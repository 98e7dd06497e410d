//! Recording fakes for the provider seams.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;

use genpire::ai::{
    CompletionClient, CompletionOptions, GenAiError, GeneratedImage, ImageClient, ImageOptions,
    Message, TaskClient, TaskResult,
};
use genpire::notify::{Notifier, NotifyError};

/// One recorded completion call.
#[derive(Debug, Clone)]
pub struct RecordedCompletion {
    pub text: String,
    pub image_count: usize,
    pub model: String,
    pub temperature: f32,
    pub seed: Option<u64>,
    pub json_response: bool,
}

/// Scripted completion client. Responses are served in order; the last
/// one repeats once the script runs out.
pub struct FakeCompletionClient {
    responses: Mutex<VecDeque<String>>,
    last: Mutex<Option<String>>,
    pub calls: Mutex<Vec<RecordedCompletion>>,
}

impl FakeCompletionClient {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletionClient {
    async fn complete(
        &self,
        messages: &[Message],
        opts: &CompletionOptions,
    ) -> Result<String, GenAiError> {
        let user_text = messages
            .iter()
            .map(|m| m.text.clone())
            .collect::<Vec<_>>()
            .join("\n");
        let image_count = messages.iter().map(|m| m.image_urls.len()).sum();

        self.calls.lock().unwrap().push(RecordedCompletion {
            text: user_text,
            image_count,
            model: opts.model.clone(),
            temperature: opts.temperature,
            seed: opts.seed,
            json_response: opts.json_response,
        });

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(response) => {
                *self.last.lock().unwrap() = Some(response.clone());
                Ok(response)
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .ok_or(GenAiError::EmptyCompletion),
        }
    }
}

/// A tiny but valid PNG for synthesis fakes.
pub fn sample_png() -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(64, 48);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Synthesis fake: answers with a data URL of a fixed PNG. Prompts
/// containing `fail_marker` fail instead.
pub struct FakeImageClient {
    png: Vec<u8>,
    fail_marker: Option<String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeImageClient {
    pub fn new() -> Self {
        Self {
            png: sample_png(),
            fail_marker: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            png: sample_png(),
            fail_marker: Some(marker.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageClient for FakeImageClient {
    async fn generate(
        &self,
        prompt: &str,
        reference_url: &str,
        _opts: &ImageOptions,
    ) -> Result<GeneratedImage, GenAiError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), reference_url.to_string()));

        if let Some(marker) = &self.fail_marker {
            if prompt.contains(marker) {
                return Err(GenAiError::Exhausted {
                    attempts: 2,
                    last: "renderer unavailable".to_string(),
                });
            }
        }

        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.png);
        Ok(GeneratedImage {
            url: format!("data:image/png;base64,{}", encoded),
            data: self.png.clone(),
        })
    }
}

/// Task provider fake returning one fixed result.
pub struct FakeTaskClient {
    result: TaskResult,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTaskClient {
    pub fn new(result: TaskResult) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TaskClient for FakeTaskClient {
    async fn fetch_task(&self, task_id: &str) -> Result<TaskResult, GenAiError> {
        self.calls.lock().unwrap().push(task_id.to_string());
        Ok(self.result.clone())
    }
}

/// Notifier fake recording every delivery.
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, user_id: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push((
            user_id.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}
