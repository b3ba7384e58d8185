use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{AnsiColor, Style};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    Ok,
    Failed,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Ok => Style::new().fg_color(Some(AnsiColor::Green.into())).bold(),
            Self::Failed => Style::new().fg_color(Some(AnsiColor::Red.into())).bold(),
        }
    }
}

pub fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}

pub fn render_status_line(style: OutputStyle, status: Status, message: &str) -> String {
    match style {
        OutputStyle::Plain => format!("[{}] {message}", status.label()),
        OutputStyle::Rich => {
            let color = status.style();
            format!("[{color}{}{color:#}] {message}", status.label())
        }
    }
}

pub struct InstallSpinner {
    bar: Option<ProgressBar>,
}

/// Spinner shown while the delegated installer runs. Plain mode stays
/// silent so piped output carries only result lines.
pub fn start_install_spinner(style: OutputStyle, label: &str) -> InstallSpinner {
    let bar = if style == OutputStyle::Rich {
        let bar = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg}") {
            bar.set_style(template);
        }
        bar.set_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };
    InstallSpinner { bar }
}

impl InstallSpinner {
    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
