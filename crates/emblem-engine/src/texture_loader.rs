use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use emblem_core::{EmblemError, Result, TextureData};
use log::{debug, warn};
use parking_lot::Mutex;

/// Upper bound on fetched image size; anything larger is rejected rather
/// than buffered.
const MAX_IMAGE_BYTES: u64 = 32 * 1024 * 1024;

/// Supplies raw image bytes for an opaque URL. Implemented over HTTP for
/// production and over an in-memory table for tests and demos.
pub trait TextureSource: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpTextureSource {
    agent: ureq::Agent,
}

impl HttpTextureSource {
    pub fn new() -> Self {
        Self {
            agent: ureq::agent(),
        }
    }
}

impl Default for HttpTextureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureSource for HttpTextureSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| EmblemError::TextureFetch(e.to_string()))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_IMAGE_BYTES)
            .read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// In-memory source keyed by URL.
#[derive(Default)]
pub struct MemoryTextureSource {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryTextureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: impl Into<String>, bytes: Vec<u8>) {
        self.entries.lock().insert(url.into(), bytes);
    }
}

impl TextureSource for MemoryTextureSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.entries
            .lock()
            .get(url)
            .cloned()
            .ok_or_else(|| EmblemError::TextureFetch(format!("no entry for '{url}'")))
    }
}

type TicketId = u64;
type ResultTable = Arc<Mutex<HashMap<TicketId, std::result::Result<TextureData, String>>>>;

/// Handle to one in-flight load. Cancelling flips the liveness flag; a
/// completion that lands after cancellation is dropped at the delivery
/// boundary instead of being applied.
#[derive(Clone, Debug)]
pub struct TextureTicket {
    id: TicketId,
    alive: Arc<AtomicBool>,
}

impl TextureTicket {
    pub fn cancel(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        !self.alive.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub enum LoadStatus {
    Pending,
    Ready(TextureData),
    Failed(String),
}

/// Asynchronously fetches and decodes decal images. The render loop stays
/// single-threaded: workers only write into the result table, and the engine
/// drains it once per frame.
pub struct TextureLoader {
    source: Arc<dyn TextureSource>,
    results: ResultTable,
    next_id: AtomicU64,
}

impl TextureLoader {
    pub fn new(source: Arc<dyn TextureSource>) -> Self {
        Self {
            source,
            results: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_http() -> Self {
        Self::new(Arc::new(HttpTextureSource::new()))
    }

    pub fn request(&self, url: &str) -> TextureTicket {
        let ticket = TextureTicket {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            alive: Arc::new(AtomicBool::new(true)),
        };

        let source = Arc::clone(&self.source);
        let results = Arc::clone(&self.results);
        let alive = Arc::clone(&ticket.alive);
        let id = ticket.id;
        let url = url.to_owned();

        thread::spawn(move || {
            let outcome = fetch_and_decode(source.as_ref(), &url);
            deliver(&results, &alive, id, &url, outcome);
        });

        ticket
    }

    /// Non-blocking; a terminal status is handed out exactly once.
    pub fn poll(&self, ticket: &TextureTicket) -> LoadStatus {
        if ticket.is_cancelled() {
            // drop anything that raced in before the cancel
            self.results.lock().remove(&ticket.id);
            return LoadStatus::Failed("cancelled".into());
        }
        match self.results.lock().remove(&ticket.id) {
            None => LoadStatus::Pending,
            Some(Ok(data)) => LoadStatus::Ready(data),
            Some(Err(reason)) => LoadStatus::Failed(reason),
        }
    }
}

fn fetch_and_decode(source: &dyn TextureSource, url: &str) -> Result<TextureData> {
    let bytes = source.fetch(url)?;
    decode(&bytes)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<TextureData> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| EmblemError::TextureDecode(e.to_string()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(TextureData::new(width, height, decoded.into_raw()))
}

/// Completion boundary: results for cancelled tickets are discarded here so
/// a late load can neither crash a torn-down component nor leak pixels.
fn deliver(
    results: &ResultTable,
    alive: &AtomicBool,
    id: TicketId,
    url: &str,
    outcome: Result<TextureData>,
) {
    if !alive.load(Ordering::Acquire) {
        debug!("discarding texture load for '{url}': requester gone");
        return;
    }
    match outcome {
        Ok(data) => {
            results.lock().insert(id, Ok(data));
        }
        Err(e) => {
            warn!("texture load for '{url}' failed: {e}");
            results.lock().insert(id, Err(e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tiny_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn poll_until_terminal(loader: &TextureLoader, ticket: &TextureTicket) -> LoadStatus {
        for _ in 0..200 {
            match loader.poll(ticket) {
                LoadStatus::Pending => thread::sleep(Duration::from_millis(5)),
                terminal => return terminal,
            }
        }
        panic!("texture load never completed");
    }

    #[test]
    fn loads_and_decodes_from_memory_source() {
        let source = MemoryTextureSource::new();
        source.insert("memory://logo.png", tiny_png());
        let loader = TextureLoader::new(Arc::new(source));

        let ticket = loader.request("memory://logo.png");
        match poll_until_terminal(&loader, &ticket) {
            LoadStatus::Ready(data) => {
                assert_eq!((data.width, data.height), (2, 2));
                assert_eq!(data.rgba.len(), 16);
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn missing_entry_fails_without_panicking() {
        let loader = TextureLoader::new(Arc::new(MemoryTextureSource::new()));
        let ticket = loader.request("memory://nope.png");
        assert!(matches!(
            poll_until_terminal(&loader, &ticket),
            LoadStatus::Failed(_)
        ));
    }

    #[test]
    fn garbage_bytes_fail_decode() {
        let source = MemoryTextureSource::new();
        source.insert("memory://junk.bin", vec![0, 1, 2, 3]);
        let loader = TextureLoader::new(Arc::new(source));
        let ticket = loader.request("memory://junk.bin");
        assert!(matches!(
            poll_until_terminal(&loader, &ticket),
            LoadStatus::Failed(_)
        ));
    }

    #[test]
    fn late_completion_for_cancelled_ticket_is_discarded() {
        let results: ResultTable = Arc::new(Mutex::new(HashMap::new()));
        let alive = AtomicBool::new(false);

        let data = decode(&tiny_png()).unwrap();
        deliver(&results, &alive, 7, "memory://late.png", Ok(data));

        assert!(results.lock().is_empty());
    }

    #[test]
    fn cancelled_ticket_polls_as_failed() {
        let source = MemoryTextureSource::new();
        source.insert("memory://logo.png", tiny_png());
        let loader = TextureLoader::new(Arc::new(source));

        let ticket = loader.request("memory://logo.png");
        ticket.cancel();
        assert!(matches!(loader.poll(&ticket), LoadStatus::Failed(_)));
    }
}
