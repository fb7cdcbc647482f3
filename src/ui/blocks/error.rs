use sftp_deploy::DeployError;

use crate::ui::primitives::icon::Icon;
use crate::ui::widgets::panel::{Panel, PanelStyle};

/// Fatal error box, with the error's hint when it has one
#[derive(Debug, Clone)]
pub struct ErrorBlock {
    message: String,
    fix: Option<String>,
}

impl ErrorBlock {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fix: None,
        }
    }

    pub fn from_error(err: &anyhow::Error) -> Self {
        let block = Self::new(format!("{:#}", err));
        match err.downcast_ref::<DeployError>().and_then(DeployError::hint) {
            Some(hint) => block.with_fix(hint),
            None => block,
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let title = format!(
            "{} ERROR",
            Icon::Error.colored(supports_color, supports_unicode)
        );
        let mut panel = Panel::with_title(title).style(PanelStyle::Error);
        panel.add_empty();
        panel.add_line(self.message.clone());

        if let Some(fix) = &self.fix {
            panel.add_empty();
            panel.add_line(format!("FIX: {}", fix));
        }

        panel.render(supports_color, supports_unicode)
    }
}
