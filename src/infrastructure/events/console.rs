//! Console Event Sink
//!
//! Human-readable progress on stderr. Readiness waits render as a single
//! line that grows one dot per unsuccessful poll.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{DeployEvent, DeployEventSink};
use crate::ui::theme::Icons;
use crate::ui::{ColoredText, TerminalCapabilities};

struct ConsoleState {
    writer: Box<dyn Write + Send>,
    /// A wait line is open and has no trailing newline yet
    line_open: bool,
}

pub struct ConsoleEventSink {
    state: Mutex<ConsoleState>,
    caps: TerminalCapabilities,
    icons: Icons,
}

impl ConsoleEventSink {
    pub fn stderr(caps: TerminalCapabilities) -> Self {
        Self::with_writer(caps, io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(caps: TerminalCapabilities, writer: W) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                writer: Box::new(writer),
                line_open: false,
            }),
            caps,
            icons: Icons::new(caps.supports_unicode),
        }
    }

    fn paint(&self, text: ColoredText) -> String {
        text.render(self.caps.supports_color)
    }

    /// Lines for one event; `None` continues the open wait line.
    fn render(&self, event: DeployEvent) -> Rendered {
        let icons = &self.icons;
        match event {
            DeployEvent::Started {
                namespace,
                template_dir,
            } => Rendered::Lines(vec![self.paint(
                ColoredText::info(format!(
                    "{} Deploying {} into namespace '{}'",
                    icons.deploy,
                    template_dir.display(),
                    namespace
                ))
                .bold(),
            )]),
            DeployEvent::Warning { message } => Rendered::Lines(
                message
                    .lines()
                    .map(|line| self.paint(ColoredText::warning(format!("{} {}", icons.warning, line))))
                    .collect(),
            ),
            DeployEvent::CommandRetry {
                command,
                attempt,
                error,
            } => Rendered::Lines(vec![self.paint(ColoredText::warning(format!(
                "{} kubectl {} failed (retry {}), retrying in 5 seconds: {}",
                icons.warning, command, attempt, error
            )))]),
            DeployEvent::GroupSkipped { path } => Rendered::Lines(vec![self.paint(ColoredText::dim(
                format!("  skipping {} (not present)", path.display()),
            ))]),
            DeployEvent::Applied { path, output } => {
                let mut lines = vec![format!(
                    "{} applied {}",
                    self.paint(ColoredText::success(icons.success)),
                    path.display()
                )];
                lines.extend(
                    output
                        .lines()
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| self.paint(ColoredText::dim(format!("    {}", l)))),
                );
                Rendered::Lines(lines)
            }
            DeployEvent::WaitStarted {
                probe,
                namespace,
                name,
            } => Rendered::Open(format!(
                "{} waiting for {}({}, {}) ",
                self.paint(ColoredText::info(icons.progress)),
                probe,
                namespace,
                name
            )),
            DeployEvent::WaitTick => Rendered::Continue(".".to_string()),
            DeployEvent::WaitFinished { name, attempts } => Rendered::Close(format!(
                " {} {} ready after {} polls",
                self.paint(ColoredText::success(icons.success)),
                name,
                attempts
            )),
            DeployEvent::NoReadinessCheck { kind, name } => Rendered::Lines(vec![self.paint(
                ColoredText::dim(format!("  no readiness check for kind {} ({})", kind, name)),
            )]),
            DeployEvent::StorageWaiting { unbound } => {
                let mut lines = vec![self.paint(ColoredText::info(format!(
                    "{} waiting for PVCs to bind:",
                    icons.progress
                )))];
                lines.extend(unbound.iter().map(|row| format!("    {}", row)));
                Rendered::Lines(lines)
            }
            DeployEvent::RunningJobDetected { job, round } => {
                Rendered::Lines(vec![self.paint(ColoredText::warning(format!(
                    "{} running job detected: {} (round {}), retrying in 10 seconds",
                    icons.warning,
                    job,
                    round + 1
                )))])
            }
            DeployEvent::JobsDeleted { output } => Rendered::Lines(
                output
                    .lines()
                    .map(|l| format!("{} {}", icons.trash, l))
                    .collect(),
            ),
            DeployEvent::OrphansFound { kind, names } => Rendered::Lines(vec![format!(
                "{} would delete {}: {}",
                self.paint(ColoredText::warning(icons.arrow)),
                kind,
                names.join(", ")
            )]),
            DeployEvent::OrphanDeleting { kind, name } => Rendered::Lines(vec![format!(
                "{} deleting {} {}",
                self.paint(ColoredText::warning(icons.trash)),
                kind,
                name
            )]),
            DeployEvent::Completed {
                groups_applied,
                jobs_deleted,
                orphans_deleted,
            } => Rendered::Lines(vec![self.paint(
                ColoredText::success(format!(
                    "{} Deployed {} groups ({} jobs drained, {} orphans pruned)",
                    icons.success, groups_applied, jobs_deleted, orphans_deleted
                ))
                .bold(),
            )]),
        }
    }
}

enum Rendered {
    /// Complete lines; closes any open wait line first
    Lines(Vec<String>),
    /// Starts a wait line without a newline
    Open(String),
    /// Appends to the open wait line
    Continue(String),
    /// Finishes the open wait line
    Close(String),
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let rendered = self.render(event);
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let ConsoleState { writer, line_open } = &mut *state;

        let _ = match rendered {
            Rendered::Lines(lines) => {
                if std::mem::take(line_open) {
                    let _ = writeln!(writer);
                }
                lines.iter().try_for_each(|line| writeln!(writer, "{}", line))
            }
            Rendered::Open(text) => {
                if *line_open {
                    let _ = writeln!(writer);
                }
                *line_open = true;
                write!(writer, "{}", text)
            }
            Rendered::Continue(text) => write!(writer, "{}", text),
            Rendered::Close(text) => {
                let was_open = std::mem::take(line_open);
                if was_open {
                    writeln!(writer, "{}", text)
                } else {
                    writeln!(writer, "{}", text.trim_start())
                }
            }
        };
        let _ = writer.flush();
    }
}
