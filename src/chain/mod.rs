//! Translation chain
//!
//! Runs a sentence through English → French → Hebrew → English. Each hop is
//! delegated to a [`Translator`]; the chain only sequences the calls.

pub mod interactive;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use interactive::InteractiveTranslator;

/// Languages used by the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    French,
    Hebrew,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
            Self::Hebrew => "he",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::French => "French",
            Self::Hebrew => "Hebrew",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle of the translation agent for a language pair, e.g. `@en-fr`
pub fn agent_handle(source: Language, target: Language) -> String {
    format!("@{}-{}", source.code(), target.code())
}

/// Something that can translate text between two languages
///
/// Implementations may prompt a human or call a translation service.
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String>;
}

/// Outputs of one pass through the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainResult {
    pub original: String,
    pub french: String,
    pub hebrew: String,
    pub final_english: String,
}

/// The hops of the chain, in order
pub const TRANSLATION_CHAIN: [(Language, Language); 3] = [
    (Language::English, Language::French),
    (Language::French, Language::Hebrew),
    (Language::Hebrew, Language::English),
];

/// Sequences the three translation hops
#[derive(Debug, Default, Clone, Copy)]
pub struct TranslationChain;

impl TranslationChain {
    pub fn new() -> Self {
        Self
    }

    /// Run `sentence` through every hop
    pub async fn run(&self, translator: &dyn Translator, sentence: &str) -> Result<ChainResult> {
        tracing::info!(sentence = %sentence, "Starting translation chain");

        let [to_french, to_hebrew, to_english] = TRANSLATION_CHAIN;
        let french = Self::step(translator, sentence, to_french).await?;
        let hebrew = Self::step(translator, &french, to_hebrew).await?;
        let final_english = Self::step(translator, &hebrew, to_english).await?;

        Ok(ChainResult {
            original: sentence.to_string(),
            french,
            hebrew,
            final_english,
        })
    }

    async fn step(
        translator: &dyn Translator,
        text: &str,
        (source, target): (Language, Language),
    ) -> Result<String> {
        let output = translator
            .translate(text, source, target)
            .await
            .with_context(|| format!("{} to {} translation failed", source, target))?;
        tracing::debug!(%source, %target, output = %output, "Translation step complete");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every call and answers with a tagged copy of the input
    #[derive(Default)]
    struct EchoTranslator {
        calls: Mutex<Vec<(String, Language, Language)>>,
    }

    #[async_trait::async_trait]
    impl Translator for EchoTranslator {
        async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), source, target));
            Ok(format!("{}[{}]", text, target.code()))
        }
    }

    struct FailingTranslator;

    #[async_trait::async_trait]
    impl Translator for FailingTranslator {
        async fn translate(&self, _text: &str, source: Language, _target: Language) -> Result<String> {
            if source == Language::French {
                anyhow::bail!("service unavailable");
            }
            Ok("bonjour".to_string())
        }
    }

    #[test]
    fn test_agent_handle() {
        assert_eq!(agent_handle(Language::English, Language::French), "@en-fr");
        assert_eq!(agent_handle(Language::French, Language::Hebrew), "@fr-he");
        assert_eq!(agent_handle(Language::Hebrew, Language::English), "@he-en");
    }

    #[tokio::test]
    async fn test_chain_feeds_each_output_forward() {
        let translator = EchoTranslator::default();
        let result = TranslationChain::new().run(&translator, "Hello").await.unwrap();

        assert_eq!(result.original, "Hello");
        assert_eq!(result.french, "Hello[fr]");
        assert_eq!(result.hebrew, "Hello[fr][he]");
        assert_eq!(result.final_english, "Hello[fr][he][en]");

        let calls = translator.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], ("Hello".to_string(), Language::English, Language::French));
        assert_eq!(calls[1].1, Language::French);
        assert_eq!(calls[2].2, Language::English);
    }

    #[tokio::test]
    async fn test_chain_propagates_failure() {
        let err = TranslationChain::new()
            .run(&FailingTranslator, "Hello")
            .await
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("French to Hebrew"));
        assert!(message.contains("service unavailable"));
    }
}
