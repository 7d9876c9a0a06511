use crate::cli::{InputArgs, OutputArgs};
use crate::error::Result;
use crate::importer::load_entries;
use crate::reconciler::find_movements;
use crate::render;
use crate::settings::load_settings;

pub fn run(input: &InputArgs, output: &OutputArgs) -> Result<()> {
    let settings = load_settings();
    let entries = load_entries(&input.file, input.input_format.as_deref())?;
    let pairs = find_movements(&entries, input.window(&settings));

    let (format, tz) = output.resolve(&settings);
    println!("{}", render::movements(&pairs, format, tz)?.trim_end());
    Ok(())
}
