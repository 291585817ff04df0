//! Flash messages: one success and one error line shown above page content.

#[cfg(test)]
#[path = "flash_test.rs"]
mod flash_test;

/// Which line a message goes to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlashKind {
    Green,
    #[default]
    Red,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlashState {
    pub green: String,
    pub red: String,
}

impl FlashState {
    /// Replace the message of `kind`; the other line is left alone.
    pub fn send(&mut self, message: impl Into<String>, kind: FlashKind) {
        match kind {
            FlashKind::Green => self.green = message.into(),
            FlashKind::Red => self.red = message.into(),
        }
    }

    pub fn clear(&mut self) {
        self.green.clear();
        self.red.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.green.is_empty() && self.red.is_empty()
    }
}
