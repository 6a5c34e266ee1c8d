//! The fixed result-code taxonomy written to the `RESULT` variable.

use std::fmt;
use std::str::FromStr;

/// Outcome of one operation. Exactly one code is reported per call.
///
/// The numeric values are stable and double as the CLI exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok = 0,
    /// Written at the start of every call; never the final outcome.
    Undecided = 1,
    ArgNeeded = 2,
    ParseError = 3,
    NotFound = 4,
    InvalidType = 5,
    AddFailed = 6,
    SetFailed = 7,
    DeleteFailed = 8,
}

impl Status {
    pub const ALL: [Status; 9] = [
        Status::Ok,
        Status::Undecided,
        Status::ArgNeeded,
        Status::ParseError,
        Status::NotFound,
        Status::InvalidType,
        Status::AddFailed,
        Status::SetFailed,
        Status::DeleteFailed,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Undecided => "UNDECIDED",
            Status::ArgNeeded => "ARG_NEEDED",
            Status::ParseError => "PARSE_ERROR",
            Status::NotFound => "NOTFOUND",
            Status::InvalidType => "INVALID_TYPE",
            Status::AddFailed => "ADD_FAILED",
            Status::SetFailed => "SET_FAILED",
            Status::DeleteFailed => "DELETE_FAILED",
        }
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    /// Accepts either the symbolic name (`NOTFOUND`) or the numeric code (`4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Status::ALL
            .iter()
            .copied()
            .find(|st| st.as_str().eq_ignore_ascii_case(s) || st.code().to_string() == s)
            .ok_or_else(|| format!("unknown status: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let codes: Vec<u8> = Status::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, (0..=8).collect::<Vec<u8>>());
    }

    #[test]
    fn parses_names_and_codes() {
        assert_eq!("NOTFOUND".parse::<Status>().unwrap(), Status::NotFound);
        assert_eq!("ok".parse::<Status>().unwrap(), Status::Ok);
        assert_eq!("7".parse::<Status>().unwrap(), Status::SetFailed);
        assert!("BOGUS".parse::<Status>().is_err());
    }

    #[test]
    fn display_uses_symbolic_name() {
        assert_eq!(Status::DeleteFailed.to_string(), "DELETE_FAILED");
    }
}
