use std::{
    error::Error,
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use log::info;

/// A trait, necessary for every entity that will deliver rendered pages.
pub trait GridPublisher {
    fn publish(&mut self, rendered: &str) -> Result<(), Box<dyn Error>>;
}

/// Prints every rendering to stdout.
#[derive(Debug, Default)]
pub struct StdoutPublisher;

impl GridPublisher for StdoutPublisher {
    fn publish(&mut self, rendered: &str) -> Result<(), Box<dyn Error>> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Rewrites one file with the latest rendering.
#[derive(Debug)]
pub struct FilePublisher {
    pub path: PathBuf,
}

impl GridPublisher for FilePublisher {
    fn publish(&mut self, rendered: &str) -> Result<(), Box<dyn Error>> {
        let mut file = File::create(&self.path)?;
        file.write_all(rendered.as_bytes())?;
        info!(
            "Wrote {} bytes to {}",
            rendered.len(),
            std::path::absolute(&self.path)?.display()
        );
        Ok(())
    }
}
