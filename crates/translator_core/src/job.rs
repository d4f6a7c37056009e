use std::fmt;
use std::str::FromStr;

const JOB_ID_PREFIX: &str = "msg_bubble_";

/// Correlation id of one dispatched translation.
///
/// `seq` comes from a counter that is never reset during a page lifetime, and
/// `issued_ms` is the wall clock at dispatch, so ids do not repeat across
/// navigation resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId {
    pub issued_ms: u64,
    pub seq: u64,
}

impl JobId {
    pub fn new(issued_ms: u64, seq: u64) -> Self {
        Self { issued_ms, seq }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{JOB_ID_PREFIX}{}_{}", self.issued_ms, self.seq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed job id: {0:?}")]
pub struct ParseJobIdError(String);

impl FromStr for JobId {
    type Err = ParseJobIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || ParseJobIdError(raw.to_string());
        let rest = raw.strip_prefix(JOB_ID_PREFIX).ok_or_else(err)?;
        let (issued, seq) = rest.split_once('_').ok_or_else(err)?;
        Ok(JobId {
            issued_ms: issued.parse().map_err(|_| err())?,
            seq: seq.parse().map_err(|_| err())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::JobId;

    #[test]
    fn wire_form_parses_back() {
        let id = JobId::new(1_700_000_000_123, 7);
        assert_eq!(id.to_string(), "msg_bubble_1700000000123_7");
        assert_eq!("msg_bubble_1700000000123_7".parse::<JobId>(), Ok(id));
    }

    #[test]
    fn foreign_ids_are_rejected() {
        for raw in ["", "msg_bubble_", "msg_bubble_12", "bubble_1_2", "msg_bubble_x_2"] {
            assert!(raw.parse::<JobId>().is_err(), "{raw}");
        }
    }
}
