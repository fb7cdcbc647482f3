use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;
use crate::ui::widgets::panel::{Panel, PanelStyle};

/// Closing box of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySummary {
    pub uploaded: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl DeploySummary {
    fn outcome(&self) -> (&'static str, PanelStyle, Icon) {
        if self.errors > 0 {
            ("Deploy finished with errors", PanelStyle::Error, Icon::Error)
        } else if self.warnings > 0 {
            ("Deploy finished with warnings", PanelStyle::Warning, Icon::Warning)
        } else {
            ("Deploy complete", PanelStyle::Success, Icon::Success)
        }
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let (title, style, icon) = self.outcome();
        let title = match style {
            PanelStyle::Error => ColoredText::error(title),
            PanelStyle::Warning => ColoredText::warning(title),
            _ => ColoredText::success(title),
        }
        .bold()
        .render(supports_color);

        let header = format!("{} {}", icon.colored(supports_color, supports_unicode), title);
        let mut panel = Panel::with_title(header).style(style);
        panel.add_empty();
        panel.add_line(format!("{} files uploaded", self.uploaded));
        panel.add_line(format!("{} warnings", self.warnings));
        panel.add_line(format!("{} errors", self.errors));

        if self.errors > 0 {
            panel.add_empty();
            panel.add_line(format!(
                "{} {} fix the errors above, then re-run with --skip-build",
                Icon::Arrow.colored(supports_color, supports_unicode),
                ColoredText::dim("Next:").render(supports_color),
            ));
        }

        panel.render(supports_color, supports_unicode)
    }
}
