//! Text Operations Module
//!
//! Grammar fix, summarize and tone change over the result cache and an
//! injected inference backend.

mod prompts;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::backend::{GenerationParams, InferenceBackend};
use crate::cache::{CacheService, OperationKind, OperationOptions};
use crate::config::{GenerationConfig, Sampling};
use crate::error::{Result, TypifyError};

/// Option name carrying the target tone.
pub const TONE_OPTION: &str = "tone";

/// Outputs shorter than this share of the input are treated as truncated.
const MIN_OUTPUT_RATIO: f64 = 0.3;

// == Tone ==
/// Target tone for a tone change. Only formal rewriting has a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Formal,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
        }
    }
}

impl FromStr for Tone {
    type Err = TypifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "formal" => Ok(Tone::Formal),
            _ => Err(TypifyError::UnsupportedTone(s.to_string())),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Processed Text ==
/// Outcome of a successful text operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedText {
    /// Text to write back
    pub text: String,
    /// Input as received
    pub original: String,
    pub operation: OperationKind,
    /// True when no model call was made
    pub from_cache: bool,
    /// Time spent in the backend, zero for cache hits
    pub processing_time: Duration,
    pub target_tone: Option<Tone>,
}

// == Text Operations ==
/// Façade that memoizes model calls for each text operation.
pub struct TextOperations {
    backend: Arc<dyn InferenceBackend>,
    cache: Arc<CacheService>,
    generation: GenerationConfig,
}

impl TextOperations {
    // == Constructor ==
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        cache: Arc<CacheService>,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            backend,
            cache,
            generation,
        }
    }

    /// Whether the backend can serve cache misses.
    pub fn is_available(&self) -> bool {
        self.backend.is_loaded()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn cache(&self) -> &Arc<CacheService> {
        &self.cache
    }

    // == Grammar ==
    /// Fixes typos, grammar and punctuation.
    pub fn fix_grammar(&self, text: &str) -> Result<ProcessedText> {
        self.run(OperationKind::Grammar, text, None)
    }

    // == Summarize ==
    /// Condenses the text to roughly a third of its length.
    pub fn summarize(&self, text: &str) -> Result<ProcessedText> {
        self.run(OperationKind::Summarize, text, None)
    }

    // == Tone Change ==
    /// Rewrites the text in `tone`.
    pub fn change_tone(&self, text: &str, tone: Tone) -> Result<ProcessedText> {
        self.run(OperationKind::ToneChange, text, Some(tone))
    }

    // == Process ==
    /// Dispatches on `kind`, reading the tone from `options` for tone changes.
    pub fn process(
        &self,
        kind: OperationKind,
        text: &str,
        options: &OperationOptions,
    ) -> Result<ProcessedText> {
        match kind {
            OperationKind::Grammar => self.fix_grammar(text),
            OperationKind::Summarize => self.summarize(text),
            OperationKind::ToneChange => {
                let tone = match options.get(TONE_OPTION) {
                    Some(raw) => raw.parse()?,
                    None => Tone::default(),
                };
                self.change_tone(text, tone)
            }
        }
    }

    fn run(&self, kind: OperationKind, text: &str, tone: Option<Tone>) -> Result<ProcessedText> {
        let input = text.trim();
        if input.is_empty() {
            return Err(TypifyError::InvalidInput("text is empty".to_string()));
        }

        let options = match tone {
            Some(tone) => OperationOptions::new().with(TONE_OPTION, tone.as_str()),
            None => OperationOptions::new(),
        };

        if let Some(cached) = self.cache.lookup(kind, input, &options) {
            return Ok(ProcessedText {
                text: cached,
                original: text.to_string(),
                operation: kind,
                from_cache: true,
                processing_time: Duration::ZERO,
                target_tone: tone,
            });
        }

        if !self.backend.is_loaded() {
            return Err(TypifyError::BackendUnavailable(format!(
                "{} backend is not loaded",
                self.backend.name()
            )));
        }

        let prompt = prompts::render(kind, input);
        let params = self.params_for(kind, input.chars().count());

        // No cache lock is held here; the call may take seconds.
        let started = Instant::now();
        let output = self.backend.generate(&prompt, &params).map_err(|e| {
            warn!(operation = %kind, error = %e, "Backend call failed");
            TypifyError::from(e)
        })?;
        let processing_time = started.elapsed();

        let output = output.trim().to_string();
        validate_output(kind, input, &output)?;

        self.cache.store(kind, input, &options, output.clone());
        info!(
            operation = %kind,
            elapsed_ms = processing_time.as_millis() as u64,
            "Text operation completed"
        );

        Ok(ProcessedText {
            text: output,
            original: text.to_string(),
            operation: kind,
            from_cache: false,
            processing_time,
            target_tone: tone,
        })
    }

    /// Token budget and sampling for `kind` given the input length in chars.
    pub fn params_for(&self, kind: OperationKind, input_chars: usize) -> GenerationParams {
        let g = &self.generation;
        let (max_tokens, sampling) = match kind {
            OperationKind::Grammar => (
                g.grammar_min_tokens.max(input_chars * g.grammar_tokens_per_char),
                g.grammar,
            ),
            OperationKind::Summarize => (
                g.summary_max_tokens.min(g.summary_min_tokens.max(input_chars)),
                g.summary,
            ),
            OperationKind::ToneChange => (
                g.tone_min_tokens.max(input_chars * g.tone_tokens_per_char),
                g.tone,
            ),
        };
        params(max_tokens, sampling, &g.stop_tokens)
    }
}

fn params(max_tokens: usize, sampling: Sampling, stop: &[String]) -> GenerationParams {
    GenerationParams {
        max_tokens,
        temperature: sampling.temperature,
        top_p: sampling.top_p,
        top_k: sampling.top_k,
        repeat_penalty: sampling.repeat_penalty,
        stop: stop.to_vec(),
    }
}

// Rejected outputs never reach the cache.
fn validate_output(kind: OperationKind, input: &str, output: &str) -> Result<()> {
    if output.is_empty() {
        return Err(TypifyError::InvalidResponse(format!("empty {} output", kind)));
    }

    let rewrites = matches!(kind, OperationKind::Grammar | OperationKind::ToneChange);
    let too_short =
        (output.chars().count() as f64) < input.chars().count() as f64 * MIN_OUTPUT_RATIO;
    if rewrites && too_short {
        return Err(TypifyError::InvalidResponse(format!(
            "{} output is much shorter than the input",
            kind
        )));
    }
    Ok(())
}
