// File logging setup
//
// Every success and failure in the core is also recorded to an append-only
// log file as `YYYY-MM-DD HH:MM:SS LEVEL message` lines for post-hoc
// diagnosis. Called once by the embedding application; the core modules
// only ever emit tracing events.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::FmtSubscriber;

/// Default log file, relative to the process working directory.
pub const LOG_FILE: &str = "tubefetch.log";

/// Install the global subscriber writing leveled lines to `path`.
pub fn init_logging(path: &str, level: tracing::Level) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let subscriber = FmtSubscriber::builder()
        .with_ansi(false)
        .event_format(FileLineFormat::new())
        .with_writer(Arc::new(file))
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}

struct FileLineFormat {
    time_format: &'static [FormatItem<'static>],
}

impl FileLineFormat {
    fn new() -> Self {
        Self {
            time_format: format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        }
    }
}

impl<S, N> FormatEvent<S, N> for FileLineFormat
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
        let now = OffsetDateTime::now_utc();

        write!(
            &mut writer,
            "{} {:>5} ",
            now.format(self.time_format).map_err(|_| std::fmt::Error)?,
            event.metadata().level(),
        )?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
