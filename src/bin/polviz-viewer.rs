use macroquad::prelude::*;
use polviz::{settings, viewer};

fn window_conf() -> Conf {
    Conf {
        window_title: "Polarization Visualizer".to_owned(),
        window_width: 1400,
        window_height: 800,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = match settings::load_config() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("{:#}", err);
            std::process::exit(1);
        }
    };

    viewer::run(settings).await;
}
