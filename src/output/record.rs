use serde::{Deserialize, Serialize};

/// One content section of one page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageRecord {
    pub heading: String,
    pub text: String,
    /// Absent in files written without titles
    #[serde(rename = "title", default)]
    pub page_title: String,
}

impl PageRecord {
    pub fn new(
        heading: impl Into<String>,
        text: impl Into<String>,
        page_title: impl Into<String>,
    ) -> Self {
        Self {
            heading: heading.into(),
            text: text.into(),
            page_title: page_title.into(),
        }
    }

    /// Serializable view of this record, with or without its page title
    pub fn view(&self, include_title: bool) -> RecordView<'_> {
        RecordView {
            heading: &self.heading,
            text: &self.text,
            title: include_title.then_some(self.page_title.as_str()),
        }
    }
}

/// Borrowed wire shape `{heading, text, title?}`
#[derive(Debug, Serialize)]
pub struct RecordView<'a> {
    heading: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}
