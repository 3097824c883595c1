// Background image decoding.
//
// Decode + extract + tessellate run on tokio's blocking pool; finished
// terrains come back over a channel that the UI thread drains each frame.
// There is no cancellation: if two loads overlap, whichever finishes last
// is installed last and wins.
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};

use heightmap::{DecodeError, Terrain, load_terrain};
use tokio::runtime::{Builder, Runtime};
use tracing::{info, warn};

pub struct LoadOutcome {
    pub seq: u64,
    pub source: String,
    pub result: Result<Terrain, DecodeError>,
}

pub struct TerrainLoader {
    runtime: Runtime,
    ctx: egui::Context,
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
    next_seq: u64,
    pending: usize,
}

impl TerrainLoader {
    // `ctx` is woken when a load finishes
    pub fn new(ctx: egui::Context) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let (tx, rx) = channel();
        Ok(Self {
            runtime,
            ctx,
            tx,
            rx,
            next_seq: 0,
            pending: 0,
        })
    }

    pub fn on_image_selected(&mut self, name: String, bytes: Vec<u8>) -> u64 {
        self.spawn(name, move || load_terrain(&bytes))
    }

    pub fn open_path(&mut self, path: PathBuf) -> u64 {
        let name = path.display().to_string();
        self.spawn(name, move || {
            let bytes = std::fs::read(&path)?;
            load_terrain(&bytes)
        })
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    // Finished loads in completion order
    pub fn poll(&mut self) -> Vec<LoadOutcome> {
        let done: Vec<LoadOutcome> = self.rx.try_iter().collect();
        self.pending -= done.len();
        done
    }

    fn spawn<F>(&mut self, source: String, job: F) -> u64
    where
        F: FnOnce() -> Result<Terrain, DecodeError> + Send + 'static,
    {
        self.next_seq += 1;
        self.pending += 1;
        let seq = self.next_seq;
        if self.pending > 1 {
            warn!(seq, pending = self.pending, "load already in flight, last to finish wins");
        }
        info!(seq, %source, "decode submitted");

        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn_blocking(move || {
            let result = job();
            // the receiver only goes away when the app is closing
            let _ = tx.send(LoadOutcome {
                seq,
                source,
                result,
            });
            ctx.request_repaint();
        });
        seq
    }
}
