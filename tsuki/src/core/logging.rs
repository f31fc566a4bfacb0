use std::fmt::Result as FmtResult;

use time::format_description::FormatItem;
use tracing::{Event, Subscriber};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling,
};
use tracing_subscriber::{
    fmt::{
        format::Writer,
        time::{FormatTime, UtcTime},
        FmtContext, FormatEvent, FormatFields, Layer,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer as _,
};
use tsuki_util::datetime::NAIVE_DATETIME_FORMAT;

const STDOUT_FILTER: &str = "tsuki=debug,tsuki_cache=debug,tsuki_client=debug,tsuki_psql=debug,sqlx=warn,info";
const FILE_FILTER: &str = "tsuki=trace,tsuki_cache=trace,tsuki_client=trace,tsuki_psql=trace,info";

/// Logs to stdout and into a daily rotating file in `./logs`.
///
/// The returned guard must be kept alive for the file writer to flush.
pub fn init() -> WorkerGuard {
    let stdout_filter = EnvFilter::new(STDOUT_FILTER);

    let stdout_layer = Layer::default()
        .event_format(EventFormat::<false>::default())
        .with_filter(stdout_filter);

    let file_appender = rolling::daily("./logs", "tsuki.log");
    let (file_writer, file_guard) = NonBlocking::new(file_appender);

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(FILE_FILTER));

    let file_layer = Layer::default()
        .event_format(EventFormat::<true>::default())
        .with_writer(file_writer)
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let default_panic_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let payload = panic_info.payload();

        let payload = if let Some(s) = payload.downcast_ref::<&str>() {
            Some(&**s)
        } else {
            payload.downcast_ref::<String>().map(String::as_str)
        };

        let location = panic_info.location().map(|l| l.to_string());

        error!(payload, location, "A panic occurred");

        default_panic_hook(panic_info);
    }));

    file_guard
}

struct EventFormat<const WITH_FILE: bool> {
    timer: UtcTime<&'static [FormatItem<'static>]>,
}

impl<const WITH_FILE: bool> Default for EventFormat<WITH_FILE> {
    fn default() -> Self {
        Self {
            timer: UtcTime::new(NAIVE_DATETIME_FORMAT),
        }
    }
}

impl<S, N, const WITH_FILE: bool> FormatEvent<S, N> for EventFormat<WITH_FILE>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> FmtResult {
        self.timer.format_time(&mut writer)?;
        let metadata = event.metadata();

        write!(writer, " {:>5} ", metadata.level())?;

        if WITH_FILE {
            match (metadata.file(), metadata.line()) {
                (Some(file), Some(line)) => write!(writer, "[{file}:{line}] ")?,
                (Some(file), None) => write!(writer, "[{file}:?] ")?,
                (None, Some(line)) => write!(writer, "[?:{line}] ")?,
                (None, None) => {}
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
