use console::style;

use crate::account::UserProfile;
use crate::study::{VideoResult, WorksheetContent};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", Self::error_line(message));
    }

    /// `✗ Error: <message>`, one line per message line
    pub fn error_line(message: &str) -> String {
        let mut lines = message.lines();
        let first = lines.next().unwrap_or_default();
        let mut out = format!("{} {} {}", style("✗").red(), style("Error:").red().bold(), first);
        for rest in lines {
            out.push_str("\n  ");
            out.push_str(rest);
        }
        out
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    pub fn field(&self, label: &str, value: &str) {
        println!("  {:<14} {}", style(format!("{}:", label)).dim(), value);
    }

    pub fn worksheet(&self, worksheet: &WorksheetContent) {
        self.header(&worksheet.title);
        println!("{}", style(&worksheet.instructions).italic());

        if worksheet.questions.is_empty() {
            println!();
            self.warning("The model returned no questions in the expected format.");
            return;
        }

        self.section("Questions");
        for (i, q) in worksheet.questions.iter().enumerate() {
            println!("{}. {}", i + 1, q.question);
        }

        self.section("Answer Key");
        for (i, q) in worksheet.questions.iter().enumerate() {
            println!("{}. {}", i + 1, style(&q.answer).green());
        }
    }

    pub fn videos(&self, query: &str, videos: &[VideoResult]) {
        self.header(&format!("Videos for \"{}\"", query));
        for video in videos {
            println!("\n{}", style(&video.title).bold());
            println!("  {}", video.description);
            println!("  {}", style(video.watch_url()).cyan());
        }
    }

    pub fn profile(&self, profile: &UserProfile) {
        self.section(&profile.name);
        self.field("Email", profile.email.as_str());
        self.field("Verified", if profile.verified { "yes" } else { "no" });

        match &profile.preferences {
            Some(prefs) => {
                self.field("Grade", &prefs.grade_level);
                self.field("Subjects", &prefs.subjects.join(", "));
                self.field("Style", &prefs.learning_style);
                self.field("Interests", &prefs.interests.join(", "));
            }
            None => self.field("Survey", "not completed"),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
