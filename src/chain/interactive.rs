//! Interactive translator
//!
//! Prints which agent to call and reads the translation back as one line.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::Mutex;

use super::{agent_handle, Language, Translator, TRANSLATION_CHAIN};
use crate::error::ChainError;

struct Console<R, W> {
    input: R,
    output: W,
}

/// Translator that asks a person (or an agent they drive) for each hop
pub struct InteractiveTranslator<R, W> {
    console: Mutex<Console<R, W>>,
}

impl InteractiveTranslator<BufReader<Stdin>, Stdout> {
    /// Prompt on stdout, read from stdin
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> InteractiveTranslator<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            console: Mutex::new(Console { input, output }),
        }
    }

    /// Give back the underlying reader and writer
    pub fn into_inner(self) -> (R, W) {
        let console = self.console.into_inner();
        (console.input, console.output)
    }
}

fn prompt_text(text: &str, source: Language, target: Language) -> String {
    let step = TRANSLATION_CHAIN
        .iter()
        .position(|hop| *hop == (source, target))
        .map(|index| format!("Step {}: ", index + 1))
        .unwrap_or_default();

    format!(
        "\n{}Call the {} to {} agent\n   {} {}\nEnter {} translation: ",
        step,
        source,
        target,
        agent_handle(source, target),
        text,
        target
    )
}

#[async_trait::async_trait]
impl<R, W> Translator for InteractiveTranslator<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
        let mut console = self.console.lock().await;

        console
            .output
            .write_all(prompt_text(text, source, target).as_bytes())
            .await
            .context("Failed to write prompt")?;
        console.output.flush().await.context("Failed to flush prompt")?;

        let mut line = String::new();
        let read = console
            .input
            .read_line(&mut line)
            .await
            .context("Failed to read translation")?;
        if read == 0 {
            return Err(ChainError::InputClosed {
                language: target.name().to_string(),
            }
            .into());
        }

        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::TranslationChain;

    #[test]
    fn test_prompt_text() {
        let prompt = prompt_text("Hello", Language::English, Language::French);
        assert!(prompt.contains("Step 1: Call the English to French agent"));
        assert!(prompt.contains("   @en-fr Hello"));
        assert!(prompt.ends_with("Enter French translation: "));

        let prompt = prompt_text("Bonjour", Language::French, Language::Hebrew);
        assert!(prompt.contains("Step 2:"));
        assert!(prompt.contains("@fr-he Bonjour"));
    }

    #[tokio::test]
    async fn test_reads_trimmed_lines() {
        let input: &[u8] = b"  Le chat est assis.  \n\xd7\x94\xd7\x97\xd7\xaa\xd7\x95\xd7\x9c\nThe cat is sitting.\r\n";
        let translator = InteractiveTranslator::new(input, Vec::new());

        let result = TranslationChain::new()
            .run(&translator, "The cat sits.")
            .await
            .unwrap();

        assert_eq!(result.french, "Le chat est assis.");
        assert_eq!(result.hebrew, "החתול");
        assert_eq!(result.final_english, "The cat is sitting.");

        let (_, output) = translator.into_inner();
        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("@en-fr The cat sits."));
        assert!(transcript.contains("@fr-he Le chat est assis."));
        assert!(transcript.contains("@he-en החתול"));
        assert!(transcript.contains("Enter English translation: "));
    }

    #[tokio::test]
    async fn test_blank_line_is_empty_translation() {
        let input: &[u8] = b"\n\n\n";
        let translator = InteractiveTranslator::new(input, Vec::new());
        let result = TranslationChain::new().run(&translator, "Hi").await.unwrap();
        assert_eq!(result.final_english, "");
    }

    #[tokio::test]
    async fn test_input_closed() {
        let input: &[u8] = b"Bonjour\n";
        let translator = InteractiveTranslator::new(input, Vec::new());

        let err = TranslationChain::new().run(&translator, "Hello").await.unwrap_err();
        let closed = err.downcast_ref::<ChainError>();
        assert!(matches!(
            closed,
            Some(ChainError::InputClosed { language }) if language == "Hebrew"
        ));
    }
}
