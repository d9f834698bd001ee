//! Prompt Builder System
//!
//! Plain-text prompt construction for the study features.
//! The text-generation model gets no system role, so every prompt states its
//! role, the requested output labels, and the format in one block.

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Free text line(s)
    Text(String),
    /// `Label: value` line the model should mirror in its output
    Field { label: String, value: String },
    /// Numbered items
    Numbered(Vec<String>),
    /// Output format block introduced by a header line
    Format { header: String, lines: Vec<String> },
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text(content.to_string()));
        self
    }

    /// Add a `Label: value` line
    pub fn field(mut self, label: &str, value: &str) -> Self {
        self.sections.push(PromptSection::Field {
            label: label.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Add numbered items
    pub fn numbered(mut self, items: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Numbered(
            items.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add output format block
    pub fn format(mut self, header: &str, lines: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Format {
            header: header.to_string(),
            lines: lines.into_iter().map(String::from).collect(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();
        let mut previous_was_field = false;

        for section in self.sections {
            let is_field = matches!(section, PromptSection::Field { .. });
            if !prompt.is_empty() && !(is_field && previous_was_field) {
                prompt.push('\n');
            }

            match section {
                PromptSection::Text(content) => {
                    prompt.push_str(&content);
                    prompt.push('\n');
                }
                PromptSection::Field { label, value } => {
                    prompt.push_str(&format!("{}: {}\n", label, value));
                }
                PromptSection::Numbered(items) => {
                    for (i, item) in items.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, item));
                    }
                }
                PromptSection::Format { header, lines } => {
                    prompt.push_str(&header);
                    prompt.push('\n');
                    for line in lines {
                        prompt.push_str(&line);
                        prompt.push('\n');
                    }
                }
            }

            previous_was_field = is_field;
        }

        prompt.trim_end().to_string()
    }
}

/// Preset prompt templates for the study features
pub struct PromptTemplates;

impl PromptTemplates {
    /// Worksheet request with a fixed question count
    pub fn worksheet(subject: &str, grade: &str, topic: &str, question_count: usize) -> String {
        PromptBuilder::new()
            .text("Create an educational worksheet with the following structure:")
            .field("Title", &format!("{} Grade {} - {}", grade, subject, topic))
            .field("Instructions", "Brief instructions for completing the worksheet")
            .field(
                "Questions",
                &format!(
                    "Generate {} age-appropriate questions with answers about {}",
                    question_count, topic
                ),
            )
            .format(
                "Format each question as:",
                vec!["Question: [The question]", "Answer: [The answer]"],
            )
            .text("Make questions engaging and educational.")
            .build()
    }

    /// Video suggestion request
    pub fn videos(query: &str, count: usize, id_len: usize) -> String {
        PromptBuilder::new()
            .text(&format!(
                "Generate {} educational video suggestions about \"{}\" for students.",
                count, query
            ))
            .text("For each video, provide:")
            .numbered(vec![
                "An educational title",
                &format!("A unique video ID ({} random characters)", id_len),
                "A brief description of the content",
            ])
            .text("Format as a list of videos with Title, ID, and Description.")
            .build()
    }

    /// Educational assistant chat turn
    pub fn chat(message: &str) -> String {
        PromptBuilder::new()
            .text(
                "You are a helpful educational assistant. Provide a clear, informative, and engaging response to the following question or topic:",
            )
            .text(message.trim())
            .text("Keep the response focused, educational, and appropriate for students.")
            .build()
    }
}
