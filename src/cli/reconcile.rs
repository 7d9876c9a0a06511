use tracing::info;

use crate::cli::{InputArgs, OutputArgs};
use crate::error::Result;
use crate::filter::LogFilter;
use crate::importer::load_entries;
use crate::reconciler;
use crate::render;
use crate::settings::load_settings;

pub fn run(
    input: &InputArgs,
    output: &OutputArgs,
    stash: Option<&str>,
    account: Option<&str>,
    item: Option<&str>,
    regex: bool,
) -> Result<()> {
    let settings = load_settings();
    let filter = LogFilter::new(stash, account, item, regex)?;
    let entries = load_entries(&input.file, input.input_format.as_deref())?;

    let processed = reconciler::reconcile(&entries, input.window(&settings));
    let cancelled = entries.len() - processed.len();
    let shown = filter.apply(processed);
    info!(cancelled, shown = shown.len(), "reconciled changelog");

    let (format, tz) = output.resolve(&settings);
    println!("{}", render::log(&shown, format, tz)?.trim_end());
    Ok(())
}
