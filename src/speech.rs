use std::process::{Command, Stdio};
use std::thread;

pub trait Speaker {
    fn speak(&self, text: &str);
}

/// Pipes text to an external TTS program without waiting for it.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    /// `command` is split on whitespace; the text is passed as the last argument.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(mut child) => {
                // reap in the background
                thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(err) => tracing::warn!(program = %self.program, %err, "speech failed"),
        }
    }
}

pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, _text: &str) {}
}

pub fn default_command() -> &'static str {
    if cfg!(target_os = "macos") { "say" } else { "espeak" }
}

pub fn from_settings(enabled: bool, command: &str) -> Box<dyn Speaker> {
    if !enabled {
        return Box::new(SilentSpeaker);
    }
    match CommandSpeaker::from_command_line(command) {
        Some(speaker) => Box::new(speaker),
        None => Box::new(SilentSpeaker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_splits_program_and_args() {
        let speaker = CommandSpeaker::from_command_line("espeak -s 140").unwrap();
        assert_eq!(speaker.program, "espeak");
        assert_eq!(speaker.args, vec!["-s", "140"]);
    }

    #[test]
    fn test_blank_command_is_rejected() {
        assert!(CommandSpeaker::from_command_line("   ").is_none());
    }

    #[test]
    fn test_missing_program_does_not_panic() {
        let speaker = CommandSpeaker::from_command_line("wordfall-no-such-tts-binary").unwrap();
        speaker.speak("hello");
    }
}
