use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::Failed => "FAILED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a command did: pass/fail, the exit code to hand back, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub code: i32,
    pub details: Vec<String>,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            code: 0,
            details: Vec::new(),
        }
    }

    pub fn from_code(code: i32) -> Self {
        Self {
            status: if code == 0 { Status::Success } else { Status::Failed },
            code,
            details: Vec::new(),
        }
    }

    pub fn failed(code: i32, detail: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            code: if code == 0 { 1 } else { code },
            details: vec![detail.into()],
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn print(&self) {
        for detail in &self.details {
            println!("{}", detail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_never_carries_zero_code() {
        let outcome = Outcome::failed(0, "boom");
        assert_eq!(outcome.code, 1);
        assert_eq!(outcome.status, Status::Failed);
        assert_eq!(Outcome::from_code(0).status.label(), "SUCCESS");
        assert_eq!(Outcome::from_code(24).status.to_string(), "FAILED");
    }
}
