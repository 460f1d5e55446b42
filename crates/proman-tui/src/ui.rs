pub(crate) mod detail;
pub(crate) mod modal;
pub(crate) mod progress;
pub(crate) mod prompt;
pub(crate) mod repo_table;
pub(crate) mod text;
