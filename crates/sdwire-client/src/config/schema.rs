use serde::Deserialize;
use sdwire_core::error::{Result, SdwireError};
use sdwire_core::protocol::DELIMITER;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub dispatch: DispatchSection,

    #[serde(default)]
    pub output: OutputSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            dispatch: DispatchSection::default(),
            output: OutputSection::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SdwireError::BadRequest(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.dispatch.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    /// Room for lines that arrive before any `>room` line.
    #[serde(default = "default_room")]
    pub default_room: String,

    #[serde(default = "default_skip_blank_lines")]
    pub skip_blank_lines: bool,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            default_room: default_room(),
            skip_blank_lines: default_skip_blank_lines(),
        }
    }
}

impl DispatchSection {
    pub fn validate(&self) -> Result<()> {
        if self.default_room.is_empty() {
            return Err(SdwireError::BadRequest(
                "dispatch.default_room must not be empty".into(),
            ));
        }
        if self.default_room.contains([DELIMITER, '\n', '\r']) {
            return Err(SdwireError::BadRequest(
                "dispatch.default_room must not contain '|' or line breaks".into(),
            ));
        }
        Ok(())
    }
}

fn default_room() -> String {
    "lobby".into()
}
fn default_skip_blank_lines() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Echo the raw line next to each decoded message.
    #[serde(default)]
    pub include_raw: bool,

    /// Print only lines that failed to decode.
    #[serde(default)]
    pub errors_only: bool,
}
