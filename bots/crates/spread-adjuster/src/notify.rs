//! [`Notifier`] sinks for the controller's user-facing notices.

use std::{
    cell::RefCell,
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
};

use crate::{
    host::Notifier,
    logs::timestamp,
    LogColor,
};

/// Prints each notice to stdout, prefixed by a timestamp.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        crate::print_kv!(
            format!("[{}] notify", timestamp()),
            message,
            LogColor::Info,
            LogColor::Highlight
        );
    }
}

/// Appends each notice to a plain-text log file as `YYYY-mm-dd HH:MM:SS - message`.
///
/// Notices are fire-and-forget, so a failed write is reported on stderr and otherwise ignored.
#[derive(Debug, Clone)]
pub struct ScriptLogNotifier {
    path: PathBuf,
}

impl ScriptLogNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, message: &str) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "{now} - {message}")?;

        Ok(())
    }
}

impl Notifier for ScriptLogNotifier {
    fn notify(&self, message: &str) {
        if let Err(e) = self.append(message) {
            eprintln!(
                "{}",
                crate::fmt_kv!(
                    format!("Couldn't write to {}", self.path.display()),
                    e,
                    LogColor::Error
                )
            );
        }
    }
}

/// Forwards each notice to every inner sink.
#[derive(Default)]
pub struct TeeNotifier {
    sinks: Vec<Box<dyn Notifier>>,
}

impl TeeNotifier {
    pub fn with(mut self, sink: impl Notifier + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl Notifier for TeeNotifier {
    fn notify(&self, message: &str) {
        self.sinks.iter().for_each(|sink| sink.notify(message));
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn take(&self) -> Vec<String> {
        self.messages.take()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        rc::Rc,
    };

    use super::*;

    struct Shared(Rc<RecordingNotifier>);

    impl Notifier for Shared {
        fn notify(&self, message: &str) {
            self.0.notify(message);
        }
    }

    #[test]
    fn tee_forwards_to_every_sink() {
        let (a, b) = (Rc::new(RecordingNotifier::default()), Rc::new(RecordingNotifier::default()));
        let tee = TeeNotifier::default()
            .with(Shared(a.clone()))
            .with(Shared(b.clone()))
            .with(ConsoleNotifier);

        tee.notify("spreads widened");

        assert_eq!(a.messages(), vec!["spreads widened"]);
        assert_eq!(b.take(), vec!["spreads widened"]);
        assert!(b.messages().is_empty());
    }

    #[test]
    fn script_log_appends_lines() {
        let path = std::env::temp_dir().join(format!(
            "spread_adjuster_script_log_{}.log",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let sink = ScriptLogNotifier::new(&path);
        sink.notify("first");
        sink.notify("second");

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - first"));
        assert!(lines[1].ends_with(" - second"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn script_log_failure_is_swallowed() {
        let sink = ScriptLogNotifier::new("/nonexistent-dir/for/sure/script.log");
        sink.notify("dropped");
    }
}
