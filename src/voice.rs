/// Voice capability — speech-to-text capture and optional text-to-speech.
///
/// The terminal has no microphone API of its own, so both directions are
/// delegated to profile-configured external commands run via `sh -c` (the
/// same execution shape as every other external command in this client).
/// Capture: every stdout line of `voice_command` is delivered as a recognized
/// utterance. Speech: assistant replies are piped to `speak_command`'s stdin.
///
/// An empty command means the capability is unsupported; the controller
/// surfaces that as a blocking notice instead of failing silently.
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

use crate::diag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    Utterance(String),
    Error(String),
    /// The capture command exited (end of utterance or killed by stop()).
    Ended,
}

pub trait VoiceCapture {
    fn is_supported(&self) -> bool;
    /// Begin capture. No-op while already capturing.
    fn start(&mut self, events: UnboundedSender<VoiceEvent>);
    /// Kill an in-flight capture. `Ended` is still delivered.
    fn stop(&mut self);
}

// ── Command-backed capture ────────────────────────────────────────────────────

pub struct CommandVoice {
    command: String,
    language: String,
    kill: Option<oneshot::Sender<()>>,
}

impl CommandVoice {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self { command: command.into(), language: language.into(), kill: None }
    }
}

impl VoiceCapture for CommandVoice {
    fn is_supported(&self) -> bool {
        !self.command.trim().is_empty()
    }

    fn start(&mut self, events: UnboundedSender<VoiceEvent>) {
        if !self.is_supported() || self.kill.is_some() {
            return;
        }

        let spawned = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .env("MEDIASSIST_LANG", &self.language)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(c) => c,
            Err(e) => {
                let _ = events.send(VoiceEvent::Error(format!("voice command failed: {e}")));
                let _ = events.send(VoiceEvent::Ended);
                return;
            }
        };

        let stdout = match child.stdout.take() {
            Some(s) => s,
            None => {
                let _ = events.send(VoiceEvent::Error("voice command has no stdout".into()));
                let _ = events.send(VoiceEvent::Ended);
                return;
            }
        };

        let (kill_tx, mut kill_rx) = oneshot::channel::<()>();
        self.kill = Some(kill_tx);

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                tokio::select! {
                    _ = &mut kill_rx => {
                        let _ = child.kill().await;
                        break;
                    }
                    line = lines.next_line() => match line {
                        Ok(Some(line)) => {
                            let line = line.trim();
                            if !line.is_empty() {
                                let _ = events.send(VoiceEvent::Utterance(line.to_string()));
                            }
                        }
                        Ok(None) => {
                            let _ = child.wait().await;
                            break;
                        }
                        Err(e) => {
                            let _ = events.send(VoiceEvent::Error(e.to_string()));
                            let _ = child.wait().await;
                            break;
                        }
                    }
                }
            }
            let _ = events.send(VoiceEvent::Ended);
        });
    }

    fn stop(&mut self) {
        if let Some(kill) = self.kill.take() {
            let _ = kill.send(());
        }
    }
}

impl CommandVoice {
    /// Called when the capture task reports Ended, so a new start() works.
    pub fn mark_ended(&mut self) {
        self.kill = None;
    }
}

// ── Text-to-speech ────────────────────────────────────────────────────────────

/// Speak a reply through the configured command, fire-and-forget. Failures
/// are diagnostics only.
pub fn speak(command: &str, language: &str, text: &str) {
    if command.trim().is_empty() {
        return;
    }
    let command = command.to_string();
    let language = language.to_string();
    let text = text.to_string();
    tokio::spawn(async move {
        let spawned = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .env("MEDIASSIST_LANG", &language)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                if let Some(mut stdin) = child.stdin.take() {
                    let _ = stdin.write_all(text.as_bytes()).await;
                    drop(stdin);
                }
                let _ = child.wait().await;
            }
            Err(e) => diag::log(&format!("speak command failed: {e}")),
        }
    });
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_is_unsupported() {
        assert!(!CommandVoice::new("", "es-ES").is_supported());
        assert!(!CommandVoice::new("   ", "es-ES").is_supported());
        assert!(CommandVoice::new("echo hola", "es-ES").is_supported());
    }

    #[tokio::test]
    async fn capture_delivers_stdout_lines_then_ends() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut voice = CommandVoice::new("printf 'me duele\\nla cabeza\\n'", "es-ES");
        voice.start(tx);

        assert_eq!(rx.recv().await, Some(VoiceEvent::Utterance("me duele".into())));
        assert_eq!(rx.recv().await, Some(VoiceEvent::Utterance("la cabeza".into())));
        assert_eq!(rx.recv().await, Some(VoiceEvent::Ended));
    }

    #[tokio::test]
    async fn start_while_capturing_is_a_noop() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut voice = CommandVoice::new("sleep 5", "es-ES");
        voice.start(tx.clone());
        voice.start(tx); // guarded — must not spawn a second process
        voice.stop();

        assert_eq!(rx.recv().await, Some(VoiceEvent::Ended));
        // only one capture task existed, so no further events can arrive
        assert_eq!(rx.recv().await, None);
    }
}
