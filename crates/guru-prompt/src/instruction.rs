//! The system instruction prepended to every request.

/// Persona used when the configuration does not override it.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are GuruGPT, a high-performance AI created by Ayush Trivedi, \
     a Data Analyst at NielsenIQ. You are here to provide concise, smart, and professional answers.";

/// A fixed instruction string sent as the `system` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInstruction(String);

impl SystemInstruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SystemInstruction {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_INSTRUCTION)
    }
}

impl AsRef<str> for SystemInstruction {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
