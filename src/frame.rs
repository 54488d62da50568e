/// Driver frame: one stdin line per server cycle.
///
///   <x> <y> <facing> <score> <energy> | <token>,<token>,...
///
/// The `|` part may be absent or empty when nothing was sensed.

use std::str::FromStr;

use crate::agent::Status;
use crate::domain::{Facing, Pose};
use crate::error::FrameError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub status: Status,
    pub tokens: Vec<String>,
}

impl FromStr for Frame {
    type Err = FrameError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (head, tail) = line.split_once('|').unwrap_or((line, ""));
        let mut fields = head.split_whitespace();

        let x = number(fields.next(), "x")?;
        let y = number(fields.next(), "y")?;
        let facing_raw = fields.next().ok_or(FrameError::MissingField("facing"))?;
        let facing = facing_raw
            .parse::<Facing>()
            .map_err(|_| FrameError::InvalidFacing(facing_raw.to_string()))?;
        let score = number(fields.next(), "score")?;
        let energy = number(fields.next(), "energy")?;

        let tokens = tail
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        Ok(Frame {
            status: Status { pose: Pose::new(x, y, facing), score, energy },
            tokens,
        })
    }
}

fn number(raw: Option<&str>, field: &'static str) -> Result<i32, FrameError> {
    let raw = raw.ok_or(FrameError::MissingField(field))?;
    raw.parse().map_err(|_| FrameError::InvalidNumber { field, value: raw.to_string() })
}
