use std::io::Write;

use anyhow::{Context, Result};
use dodle_core::{PlayState, RejectionReason};
use dodle_rendering::{GuessFeedback, Presentation, RenderingBackend, RoundStatus};

/// Backend that renders scenes as plain text.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    out: W,
}

impl<W: Write> TerminalBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, presentation: &Presentation) -> std::io::Result<()> {
        let scene = &presentation.scene;
        writeln!(self.out, "{}", presentation.title)?;
        writeln!(self.out, "Image {}: {}", scene.image.level, scene.image.url)?;

        if let Some(feedback) = scene.feedback {
            writeln!(self.out, "{}", feedback_line(feedback))?;
        }

        for guess in &scene.guesses {
            let marker = if guess.correct { "correct" } else { "wrong" };
            writeln!(self.out, "  {}. {} ({marker})", guess.attempt, guess.text)?;
        }

        match &scene.status {
            RoundStatus::AwaitingGuess { attempts_remaining } => {
                writeln!(self.out, "{attempts_remaining} guesses left.")?;
            }
            RoundStatus::Solved {
                word,
                prompt,
                attempts,
            } => {
                writeln!(self.out, "You got it in {attempts}! The word was \"{word}\".")?;
                if !prompt.is_empty() {
                    writeln!(self.out, "Prompt: {prompt}")?;
                }
            }
            RoundStatus::Failed { word, prompt } => {
                writeln!(self.out, "Out of guesses. The word was \"{word}\".")?;
                if !prompt.is_empty() {
                    writeln!(self.out, "Prompt: {prompt}")?;
                }
            }
        }

        self.out.flush()
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> Result<()> {
        self.write_frame(presentation)
            .context("failed to write scene to terminal")
    }
}

fn feedback_line(feedback: GuessFeedback) -> &'static str {
    match feedback {
        GuessFeedback::Correct => "Correct!",
        GuessFeedback::Incorrect => "Not quite.",
        GuessFeedback::Rejected {
            reason: RejectionReason::SessionNotStarted,
        } => "No round in progress.",
        GuessFeedback::Rejected {
            reason: RejectionReason::RoundOver {
                state: PlayState::Success,
            },
        } => "You already solved today's puzzle. Come back tomorrow.",
        GuessFeedback::Rejected {
            reason: RejectionReason::RoundOver { .. },
        } => "Today's round is over. Come back tomorrow.",
    }
}
