//! Audio server probe

use super::{issue, Probe, ProbeError};
use crate::issue::Issue;
use std::process::Command;

const AUDIO_SERVERS: &[&str] = &["pulseaudio", "pipewire"];

pub struct AudioProbe;

impl AudioProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AudioProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `pidof` finds a running process called `name`
fn is_running(name: &str) -> Result<bool, std::io::Error> {
    let output = Command::new("pidof").arg(name).output()?;
    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
}

impl Probe for AudioProbe {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn scan(&self) -> Result<Vec<Issue>, ProbeError> {
        let mut any_running = false;
        for server in AUDIO_SERVERS {
            match is_running(server) {
                Ok(true) => {
                    any_running = true;
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    return Err(ProbeError::Unavailable {
                        probe: self.name(),
                        reason: format!("pidof: {}", e),
                    })
                }
            }
        }

        if any_running {
            return Ok(Vec::new());
        }
        Ok(vec![issue(
            self.name(),
            "Audio system check failed (PulseAudio may not be running).".to_string(),
        )?])
    }
}
