use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, warn};

use super::artwork::ImageDimensions;

#[derive(Debug, Error)]
pub(crate) enum ArtworkLoadError {
    #[error("open image '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("decode image header '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug)]
pub(crate) struct LoadCompletion {
    pub(crate) index: usize,
    pub(crate) result: Result<ImageDimensions, ArtworkLoadError>,
}

/// Background image header reads, one thread per artwork.
///
/// Completions queue on a channel and are handed out by [`ArtworkLoader::drain`]
/// at tick boundaries. Dropping the loader cancels unreported work.
#[derive(Debug)]
pub(crate) struct ArtworkLoader {
    receiver: Receiver<LoadCompletion>,
    cancelled: Arc<AtomicBool>,
    pending: usize,
}

impl ArtworkLoader {
    pub(crate) fn spawn(requests: impl IntoIterator<Item = (usize, PathBuf)>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut pending = 0usize;

        for (index, path) in requests {
            match spawn_worker(index, path, sender.clone(), Arc::clone(&cancelled)) {
                Ok(()) => pending += 1,
                Err(error) => warn!(index, error = %error, "artwork_load_spawn_failed"),
            }
        }

        Self {
            receiver,
            cancelled,
            pending,
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending
    }

    /// Non-blocking; returns every completion that has arrived so far.
    pub(crate) fn drain(&mut self) -> Vec<LoadCompletion> {
        let mut completions = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(completion) => {
                    self.pending = self.pending.saturating_sub(1);
                    completions.push(completion);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Workers that never reported (panicked) are not coming back.
                    self.pending = 0;
                    break;
                }
            }
        }
        completions
    }
}

impl Drop for ArtworkLoader {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

fn spawn_worker(
    index: usize,
    path: PathBuf,
    sender: Sender<LoadCompletion>,
    cancelled: Arc<AtomicBool>,
) -> io::Result<()> {
    thread::Builder::new()
        .name(format!("artwork-load-{index}"))
        .spawn(move || {
            let result = read_dimensions(&path);
            if cancelled.load(Ordering::Acquire) {
                debug!(index, "artwork_load_cancelled");
                return;
            }
            // The receiver may already be gone during teardown.
            let _ = sender.send(LoadCompletion { index, result });
        })
        .map(|_| ())
}

/// Reads only the image header; pixel data is never decoded.
pub(crate) fn read_dimensions(path: &Path) -> Result<ImageDimensions, ArtworkLoadError> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|source| ArtworkLoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|source| ArtworkLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(ImageDimensions { width, height })
}
