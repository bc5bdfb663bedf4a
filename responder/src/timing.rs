use std::time::Duration;

pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Look up and send before `handle` returns.
    Immediate,
    /// Look up and send from a timer task once the delay has passed.
    Delayed(Duration),
}

impl Timing {
    pub fn label(&self) -> &'static str {
        match self {
            Timing::Immediate => "immediate",
            Timing::Delayed(_) => "delayed",
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing::Delayed(DEFAULT_DELAY)
    }
}
