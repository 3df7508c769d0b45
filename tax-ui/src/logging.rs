//! Logging for the calculator front end.
//!
//! Log records go to stderr so that stdout carries only form output. A file
//! sink can be attached at any point after initialization, and both the
//! global level and the console sink can be changed at runtime.

use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use anyhow::Result;
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

/// Used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,tax_ui=info,tax_calculator=info";

/// `<local time> <LEVEL> <file:line> <fields>`
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
        if ansi {
            write!(writer, "\x1b[2m{timestamp}\x1b[0m ")?;
        } else {
            write!(writer, "{timestamp} ")?;
        }

        let color = match *meta.level() {
            Level::ERROR => "\x1b[1;31m",
            Level::WARN => "\x1b[1;33m",
            Level::INFO => "\x1b[1;32m",
            Level::DEBUG => "\x1b[1;34m",
            Level::TRACE => "\x1b[1;35m",
        };
        if ansi {
            write!(writer, "{color}{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{:>5} ", meta.level())?;
        }

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            let file = file.rsplit(['/', '\\']).next().unwrap_or(file);
            write!(writer, "{file}:{line} ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// A [`MakeWriter`] that can be pointed at a file after initialization.
/// While no file is set, writes are discarded.
#[derive(Clone, Default)]
struct FileSlot(Arc<Mutex<Option<File>>>);

impl FileSlot {
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, file: Option<File>) {
        *self.lock() = file;
    }
}

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.lock())
    }
}

type SetFilterFn = Box<dyn Fn(EnvFilter) -> Result<()> + Send + Sync>;

struct Handles {
    level: SetFilterFn,
    console: SetFilterFn,
    file: FileSlot,
}

static HANDLES: OnceLock<Handles> = OnceLock::new();

fn handles() -> Result<&'static Handles> {
    HANDLES
        .get()
        .ok_or_else(|| anyhow::anyhow!("logging not yet initialized"))
}

/// Parse a bare level ("warn", "debug", ...) or a full `EnvFilter`
/// directive such as `"info,tax_client=debug"`.
pub fn parse_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive)
        .map_err(|e| anyhow::anyhow!("invalid log level '{directive}': {e}"))
}

fn reloader<S>(handle: reload::Handle<EnvFilter, S>, what: &'static str) -> SetFilterFn
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |filter| {
        handle
            .reload(filter)
            .map_err(|e| anyhow::anyhow!("{what} reload failed: {e}"))
    })
}

/// Initialize logging. Call once at startup; later calls are no-ops.
///
/// - Console: stderr, colored when attached to a terminal.
/// - File: inactive until [`enable_file_logging`] is called.
/// - Level: [`DEFAULT_FILTER`], or `RUST_LOG` when set.
pub fn init_logging() {
    let file = FileSlot::default();

    let (console_gate, console_handle) = reload::Layer::new(EnvFilter::new("trace"));
    let initial = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let (level_filter, level_handle) = reload::Layer::new(initial);

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(console_gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(file.clone());

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = HANDLES.set(Handles {
            level: reloader(level_handle, "level"),
            console: reloader(console_handle, "console"),
            file,
        });
    }
}

/// Change the active log filter at runtime.
pub fn set_log_level(directive: &str) -> Result<()> {
    let filter = parse_filter(directive)?;
    (handles()?.level)(filter)
}

/// Show or hide console log output without affecting file logging.
pub fn set_console_enabled(enabled: bool) -> Result<()> {
    let filter = EnvFilter::new(if enabled { "trace" } else { "off" });
    (handles()?.console)(filter)
}

/// Start appending log output to `path`, replacing any open log file.
/// The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    handles()?.file.replace(Some(file));
    Ok(())
}

/// Close the current log file.
pub fn disable_file_logging() {
    if let Some(handles) = HANDLES.get() {
        handles.file.replace(None);
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn temp_log(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tax-ui-{}-{name}.log", std::process::id()))
    }

    #[test]
    fn parse_filter_accepts_levels_and_directives() {
        assert!(parse_filter("debug").is_ok());
        assert!(parse_filter("warn,tax_client=trace").is_ok());
    }

    #[test]
    fn default_filter_covers_library_and_binary() {
        let directives: Vec<&str> = DEFAULT_FILTER.split(',').collect();

        assert!(parse_filter(DEFAULT_FILTER).is_ok());
        assert!(directives.contains(&"tax_ui=info"));
        assert!(directives.contains(&"tax_calculator=info"));
    }

    #[test]
    fn parse_filter_rejects_garbage() {
        let err = parse_filter("tax_ui=loud").unwrap_err();

        assert!(err.to_string().starts_with("invalid log level 'tax_ui=loud'"));
    }

    #[test]
    fn empty_slot_discards_writes() {
        let slot = FileSlot::default();

        let written = slot.make_writer().write(b"dropped").unwrap();

        assert_eq!(written, 7);
    }

    #[test]
    fn filled_slot_appends_to_file() {
        let path = temp_log("slot");
        let _ = std::fs::remove_file(&path);
        let slot = FileSlot::default();
        slot.replace(Some(open_log_file(&path).unwrap()));

        slot.make_writer().write_all(b"first\n").unwrap();
        slot.make_writer().write_all(b"second\n").unwrap();
        slot.replace(None);

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "first\nsecond\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_log_file_reports_missing_directory() {
        let err = open_log_file(Path::new("/no/such/dir/app.log")).unwrap_err();

        assert!(err.to_string().contains("/no/such/dir/app.log"));
    }
}
