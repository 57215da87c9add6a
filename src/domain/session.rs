//! Trading-session classification from the hour of day.
//!
//! Ranges overlap on purpose and are tested in a fixed priority order,
//! first match wins:
//!
//! 1. Tokyo    `[0, 9)`
//! 2. Overlap  `[13, 17)`
//! 3. London   `[8, 17)`
//! 4. New York `[13, 22)`
//! 5. Quiet    everything else

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Session {
    Tokyo,
    Overlap,
    London,
    #[serde(rename = "NY")]
    NewYork,
    Quiet,
}

impl Session {
    pub fn classify(hour: u32) -> Self {
        const RANGES: [(std::ops::Range<u32>, Session); 4] = [
            (0..9, Session::Tokyo),
            (13..17, Session::Overlap),
            (8..17, Session::London),
            (13..22, Session::NewYork),
        ];

        RANGES
            .iter()
            .find(|(hours, _)| hours.contains(&hour))
            .map(|(_, session)| *session)
            .unwrap_or(Session::Quiet)
    }

    /// Weight applied to the trend and counter-trend scores.
    pub fn multiplier(self) -> f64 {
        match self {
            Session::Overlap => 1.3,
            Session::London => 1.2,
            Session::NewYork => 1.1,
            Session::Tokyo => 1.0,
            Session::Quiet => 0.7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Session::Tokyo => "Tokyo",
            Session::Overlap => "Overlap",
            Session::London => "London",
            Session::NewYork => "NY",
            Session::Quiet => "Quiet",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
