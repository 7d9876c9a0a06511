use crate::cli::InputArgs;
use crate::error::Result;
use crate::filter::stash_names;
use crate::importer::load_entries;
use crate::reconciler;
use crate::settings::load_settings;

pub fn run(input: &InputArgs) -> Result<()> {
    let settings = load_settings();
    let entries = load_entries(&input.file, input.input_format.as_deref())?;
    let processed = reconciler::reconcile(&entries, input.window(&settings));

    for name in stash_names(&processed) {
        println!("{name}");
    }
    Ok(())
}
