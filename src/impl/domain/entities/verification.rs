use super::declaration::Declaration;

#[derive(Debug, Clone)]
pub struct Verification {
    pub declaration: Declaration,
    pub verify_url: String,
    /// Only paid declarations carry a valid vignette.
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based data line (header excluded).
    pub line: usize,
    pub plate: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedRow {
    pub line: usize,
    pub plate: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub skipped: Vec<SkippedRow>,
    pub failed: Vec<FailedRow>,
}
