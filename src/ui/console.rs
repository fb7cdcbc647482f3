//! Console Event Sink
//!
//! Turns deploy events into the human-readable run log: a header, one
//! banner per stage, icon lines for progress, and a summary box.

use std::io::{self, Write};
use std::sync::Mutex;

use sftp_deploy::application::human_bytes;
use sftp_deploy::{DeployEvent, DeployEventSink};

use crate::ui::blocks::header::{stage_banner, RunHeader};
use crate::ui::blocks::summary::DeploySummary;
use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub struct ConsoleEventSink {
    ui: UiContext,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn stdout(ui: UiContext) -> Self {
        Self::with_writer(ui, io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(ui: UiContext, writer: W) -> Self {
        Self {
            ui,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn icon(&self, icon: Icon) -> String {
        icon.colored(self.ui.color, self.ui.unicode)
    }

    fn line(&self, icon: Icon, text: &str) -> String {
        format!("  {} {}\n", self.icon(icon), text)
    }

    fn render(&self, event: &DeployEvent) -> String {
        let color = self.ui.color;
        match event {
            DeployEvent::Started {
                destination,
                stage_count,
            } => {
                let mut header = RunHeader::new("sftp-deploy");
                header.add("Destination", destination.as_str());
                header.add("Stages", stage_count.to_string());
                header.render(color, self.ui.unicode)
            }
            DeployEvent::StageStarted {
                number,
                total,
                title,
            } => stage_banner(*number, *total, title, color),
            DeployEvent::StageSkipped { title, reason } => {
                let text = ColoredText::dim(format!("{} skipped ({})", title, reason));
                format!("{} {}\n", self.icon(Icon::Skipped), text.render(color))
            }
            DeployEvent::Log { level, message } => self.line(Icon::for_level(*level), message),
            DeployEvent::Countdown { remaining } => self.line(
                Icon::Waiting,
                &format!("{}s remaining", remaining.as_secs()),
            ),
            DeployEvent::DirectoryCreated { path } => {
                self.line(Icon::Arrow, &format!("created {}", path))
            }
            DeployEvent::FileUploaded { index, path, bytes } => {
                let size = ColoredText::dim(format!("({})", human_bytes(*bytes)));
                self.line(
                    Icon::Arrow,
                    &format!("{:>4} {} {}", index, path, size.render(color)),
                )
            }
            DeployEvent::TokenChecked { token, present } => {
                if *present {
                    self.line(Icon::Success, &format!("found {}", token))
                } else {
                    self.line(Icon::Error, &format!("missing {}", token))
                }
            }
            DeployEvent::Completed {
                uploaded,
                warnings,
                errors,
            } => {
                let summary = DeploySummary {
                    uploaded: *uploaded,
                    warnings: *warnings,
                    errors: *errors,
                };
                format!("\n{}", summary.render(color, self.ui.unicode))
            }
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let text = self.render(&event);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(text.as_bytes());
            let _ = writer.flush();
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.ui.verbose > 0
    }
}
