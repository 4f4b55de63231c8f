use log::{error, info, warn};

/// Where user-facing messages go while transcripts are being resolved
pub trait Reporter {
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
    fn success(&self, message: &str);
}

/// Prints messages to stderr and mirrors them into the log
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn warning(&self, message: &str) {
        warn!("{message}");
        eprintln!("\x1b[33mwarning:\x1b[0m {message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
        eprintln!("\x1b[31merror:\x1b[0m {message}");
    }

    fn success(&self, message: &str) {
        info!("{message}");
        eprintln!("\x1b[32m✅\x1b[0m {message}");
    }
}
