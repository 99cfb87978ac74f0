use std::path::Path;

use anyhow::Result;
use polviz::{assets, field::PolarizationField, output, settings};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let settings = settings::load_config()?;
    println!("{}", settings);

    if let Some(logo) = assets::load_configured_logo(&settings) {
        tracing::info!("Loaded logo from {:?}", logo.path);
    }

    let field = PolarizationField::new(settings.sampling())?;
    let evaluation = field.evaluate(&settings.parameters())?;
    println!("{}", evaluation);

    let dir = Path::new(&settings.output_dir);
    let path = output::writeup(dir, evaluation.trajectory())?;
    tracing::info!("Trajectory written to {:?}", path);
    output::write_settings(dir, &settings)?;
    if settings.json {
        let path = output::write_json(dir, &evaluation, &settings.camera)?;
        tracing::info!("Result written to {:?}", path);
    }

    Ok(())
}
