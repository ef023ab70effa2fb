mod issue;

pub use issue::IssueRecord;
