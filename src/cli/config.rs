use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, OutputFormat, Timezone};

pub fn run(
    window: Option<f64>,
    timezone: Option<Timezone>,
    output_format: Option<OutputFormat>,
) -> Result<()> {
    let mut settings = load_settings();

    if window.is_some() || timezone.is_some() || output_format.is_some() {
        if let Some(w) = window {
            settings.movement_window_minutes = w;
        }
        if let Some(tz) = timezone {
            settings.timezone = tz;
        }
        if let Some(f) = output_format {
            settings.output_format = f;
        }
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    let window_label = if settings.movement_window_minutes > 0.0 {
        format!("{} min", settings.movement_window_minutes)
    } else {
        "disabled".to_string()
    };
    println!("Movement window: {window_label}");
    println!("Timezone:        {}", format!("{:?}", settings.timezone).to_lowercase());
    println!("Output format:   {}", format!("{:?}", settings.output_format).to_lowercase());
    Ok(())
}
