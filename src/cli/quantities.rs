use crate::cli::{InputArgs, OutputArgs};
use crate::error::Result;
use crate::importer::load_entries;
use crate::reconciler::{cancel_movements, running_quantities};
use crate::render;
use crate::settings::load_settings;

pub fn run(input: &InputArgs, output: &OutputArgs, stash: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let entries = load_entries(&input.file, input.input_format.as_deref())?;
    let unmatched = cancel_movements(&entries, input.window(&settings));

    let mut totals = running_quantities(&unmatched);
    if let Some(stash) = stash {
        totals.retain(|(name, _), _| name == stash);
    }

    let (format, _) = output.resolve(&settings);
    println!("{}", render::quantities(&totals, format)?.trim_end());
    Ok(())
}
