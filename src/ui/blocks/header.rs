use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// First lines of a run: what is deployed where
#[derive(Debug, Clone)]
pub struct RunHeader {
    title: String,
    items: Vec<(String, String)>,
}

impl RunHeader {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn add(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.items.push((label.into(), value.into()));
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let title = ColoredText::info(self.title.as_str())
            .bold()
            .render(supports_color);
        let mut out = format!(
            "{} {}\n",
            Icon::Deploy.colored(supports_color, supports_unicode),
            title
        );
        for (label, value) in &self.items {
            out.push_str(&format!("{}: {}\n", label, value));
        }
        out
    }
}

/// `[n/total] Title` line that opens a stage
pub fn stage_banner(number: usize, total: usize, title: &str, supports_color: bool) -> String {
    let counter = ColoredText::dim(format!("[{}/{}]", number, total)).render(supports_color);
    let title = ColoredText::info(title).bold().render(supports_color);
    format!("\n{} {}\n", counter, title)
}
