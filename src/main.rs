use std::{path::Path, result};
use mri_display::{img::import::{self, Importer, TextGridImporter}, my_err::MyError, my_ui};

const PHANTOM_SIZE: usize = 256;

fn main() -> result::Result<(), MyError> {
    env_logger::init();

    let image = match std::env::args().nth(1) {
        Some(path) => TextGridImporter.import(Path::new(&path))?,
        None => {
            log::info!("no image given, showing a {}x{} phantom", PHANTOM_SIZE, PHANTOM_SIZE);
            import::phantom(PHANTOM_SIZE)?
        }
    };

    my_ui::create_app(image)?;

    Ok(())
}
