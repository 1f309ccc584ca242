/// Read-only dialog showing the code returned by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeViewer {
    code: String,
}

impl CodeViewer {
    pub fn new(code: impl Into<String>) -> Self {
        CodeViewer { code: code.into() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}
