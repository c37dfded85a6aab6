use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Sender};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::meshing::NODES_PER_CELL;
use crate::num_vec::Vector2;




/**
 * A borrowed view of the state at the end of an iteration: the node
 * positions, the cell connectivity, and named scalar fields per cell and
 * per node. Fields stored in the field store are borrowed; fields derived
 * for export (e.g. velocity components) are owned.
 */
#[derive(Clone, Debug, Serialize)]
pub struct Frame<'a> {
    pub iteration: u64,
    pub time: f64,
    pub positions: &'a [Vector2],
    pub cells: &'a [[usize; NODES_PER_CELL]],
    pub cell_fields: BTreeMap<&'a str, Cow<'a, [f64]>>,
    pub node_fields: BTreeMap<&'a str, Cow<'a, [f64]>>,
}

/**
 * An owned frame, as sent to a background writer or read back from disk.
 * Serializes to the same layout as [`Frame`].
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    pub iteration: u64,
    pub time: f64,
    pub positions: Vec<Vector2>,
    pub cells: Vec<[usize; NODES_PER_CELL]>,
    pub cell_fields: BTreeMap<String, Vec<f64>>,
    pub node_fields: BTreeMap<String, Vec<f64>>,
}




// ============================================================================
impl<'a> Frame<'a> {
    pub fn to_data(&self) -> FrameData {
        FrameData {
            iteration: self.iteration,
            time: self.time,
            positions: self.positions.to_vec(),
            cells: self.cells.to_vec(),
            cell_fields: owned_fields(&self.cell_fields),
            node_fields: owned_fields(&self.node_fields),
        }
    }
}

impl FrameData {
    pub fn as_frame(&self) -> Frame<'_> {
        Frame {
            iteration: self.iteration,
            time: self.time,
            positions: &self.positions,
            cells: &self.cells,
            cell_fields: borrowed_fields(&self.cell_fields),
            node_fields: borrowed_fields(&self.node_fields),
        }
    }
}

fn owned_fields(fields: &BTreeMap<&str, Cow<'_, [f64]>>) -> BTreeMap<String, Vec<f64>> {
    fields.iter().map(|(k, v)| (k.to_string(), v.to_vec())).collect()
}

fn borrowed_fields(fields: &BTreeMap<String, Vec<f64>>) -> BTreeMap<&str, Cow<'_, [f64]>> {
    fields.iter().map(|(k, v)| (k.as_str(), Cow::Borrowed(v.as_slice()))).collect()
}




/**
 * Receives the state at the end of every exported iteration. An observer
 * must not retain the frame: its borrowed arrays are overwritten by the
 * next iteration.
 */
pub trait Observer {
    fn observe(&mut self, frame: &Frame) -> Result<(), Error>;
}

impl Observer for () {
    fn observe(&mut self, _: &Frame) -> Result<(), Error> {
        Ok(())
    }
}

impl<F> Observer for F
where
    F: FnMut(&Frame) -> Result<(), Error>,
{
    fn observe(&mut self, frame: &Frame) -> Result<(), Error> {
        self(frame)
    }
}




/**
 * Writes every frame it observes to its own CBOR file,
 * `<directory>/<prefix>.<iteration>.cbor` with the iteration zero-padded to
 * six digits.
 */
#[derive(Clone, Debug)]
pub struct CborWriter {
    directory: PathBuf,
    prefix: String,
}

impl CborWriter {
    pub fn new<P: Into<PathBuf>>(directory: P, prefix: &str) -> Result<Self, Error> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory, prefix: prefix.to_string() })
    }

    pub fn path_for(&self, iteration: u64) -> PathBuf {
        self.directory.join(format!("{}.{:06}.cbor", self.prefix, iteration))
    }
}

impl Observer for CborWriter {
    fn observe(&mut self, frame: &Frame) -> Result<(), Error> {
        let path = self.path_for(frame.iteration);
        let mut buffer = BufWriter::new(File::create(&path)?);
        ciborium::ser::into_writer(frame, &mut buffer).map_err(|e| Error::Output(format!("{}: {:?}", path.display(), e)))?;
        buffer.flush()?;
        debug!("write {}", path.display());
        Ok(())
    }
}

/**
 * Read a frame previously written by a [`CborWriter`].
 */
pub fn read_frame<P: AsRef<Path>>(path: P) -> Result<FrameData, Error> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    ciborium::de::from_reader(reader).map_err(|e| Error::Output(format!("{}: {:?}", path.display(), e)))
}




/// Frames a [`BackgroundWriter`] holds before the simulation has to wait.
pub const DEFAULT_QUEUE_DEPTH: usize = 4;

/**
 * Runs another observer on a dedicated thread. Each frame is copied into a
 * `FrameData` and sent over a bounded channel, so the writer never sees a
 * later iteration's state. When the queue is full, `observe` blocks until
 * the worker has taken a frame, which holds memory use to the queue depth.
 * Dropping the writer closes the channel and joins the thread.
 */
pub struct BackgroundWriter {
    sender: Option<Sender<FrameData>>,
    worker: Option<JoinHandle<Result<usize, Error>>>,
}

impl BackgroundWriter {
    pub fn spawn<O>(observer: O) -> Self
    where
        O: Observer + Send + 'static,
    {
        Self::with_queue_depth(observer, DEFAULT_QUEUE_DEPTH)
    }

    /**
     * Spawn with room for `depth` pending frames. A depth of zero makes
     * every `observe` wait for the worker to pick the frame up.
     */
    pub fn with_queue_depth<O>(mut observer: O, depth: usize) -> Self
    where
        O: Observer + Send + 'static,
    {
        let (sender, receiver) = bounded::<FrameData>(depth);

        let worker = thread::spawn(move || {
            let mut count = 0;

            for data in receiver {
                observer.observe(&data.as_frame())?;
                count += 1;
            }
            Ok(count)
        });

        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /**
     * Wait for every queued frame to be written. Returns the number of
     * frames the inner observer accepted, or its first error.
     */
    pub fn finish(mut self) -> Result<usize, Error> {
        self.close()
    }

    fn close(&mut self) -> Result<usize, Error> {
        self.sender.take();

        match self.worker.take() {
            Some(worker) => worker
                .join()
                .map_err(|_| Error::Output("background writer panicked".into()))?,
            None => Ok(0),
        }
    }
}

impl Observer for BackgroundWriter {
    fn observe(&mut self, frame: &Frame) -> Result<(), Error> {
        let sent = self
            .sender
            .as_ref()
            .map(|sender| sender.send(frame.to_data()).is_ok())
            .unwrap_or(false);

        if sent {
            Ok(())
        } else {
            warn!("frame {} dropped: background writer has stopped", frame.iteration);
            Err(Error::Output("background writer has stopped".into()))
        }
    }
}

impl Drop for BackgroundWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!("{}", e);
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use std::sync::{Arc, Mutex};

    fn sample() -> FrameData {
        let mut cell_fields = BTreeMap::new();
        cell_fields.insert("Density".to_string(), vec![1.0]);

        let mut node_fields = BTreeMap::new();
        node_fields.insert("VelocityX".to_string(), vec![0.0, 0.5, 0.5, 0.0]);

        FrameData {
            iteration: 7,
            time: 0.125,
            positions: vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(1.0, 1.0),
                Vector2::new(0.0, 1.0),
            ],
            cells: vec![[0, 1, 2, 3]],
            cell_fields,
            node_fields,
        }
    }

    #[test]
    fn borrowed_and_owned_frames_agree() {
        let data = sample();
        assert_eq!(data.as_frame().to_data(), data);
    }

    #[test]
    fn cbor_frames_can_be_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CborWriter::new(dir.path(), "sod").unwrap();
        let data = sample();

        writer.observe(&data.as_frame()).unwrap();

        let path = dir.path().join("sod.000007.cbor");
        assert_eq!(writer.path_for(7), path);
        assert_eq!(read_frame(&path).unwrap(), data);
    }

    #[test]
    fn background_writer_delivers_every_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = BackgroundWriter::spawn(CborWriter::new(dir.path(), "bg").unwrap());
        let mut data = sample();

        for iteration in 1..=3 {
            data.iteration = iteration;
            writer.observe(&data.as_frame()).unwrap();
        }
        assert_eq!(writer.finish().unwrap(), 3);

        for iteration in 1..=3 {
            let frame = read_frame(dir.path().join(format!("bg.{:06}.cbor", iteration))).unwrap();
            assert_eq!(frame.iteration, iteration);
        }
    }

    struct Gated {
        opened: crossbeam_channel::Receiver<()>,
        seen: Arc<Mutex<Vec<u64>>>,
    }

    impl Observer for Gated {
        fn observe(&mut self, frame: &Frame) -> Result<(), Error> {
            self.opened.recv().map_err(|_| Error::Output("gate closed".into()))?;
            self.seen.lock().unwrap().push(frame.iteration);
            Ok(())
        }
    }

    #[test]
    fn full_queue_holds_the_caller_back() {
        let (gate, opened) = bounded::<()>(0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut writer = BackgroundWriter::with_queue_depth(Gated { opened, seen: seen.clone() }, 1);
        let sender = writer.sender.clone().unwrap();
        let mut data = sample();

        data.iteration = 1;
        writer.observe(&data.as_frame()).unwrap();
        data.iteration = 2;
        writer.observe(&data.as_frame()).unwrap();

        // the worker holds frame 1 at the gate, frame 2 fills the queue
        while !sender.is_full() {
            thread::yield_now();
        }
        assert_eq!(sender.len(), 1);
        drop(sender);

        for _ in 0..2 {
            gate.send(()).unwrap();
        }
        assert_eq!(writer.finish().unwrap(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn background_writer_reports_the_inner_failure() {
        fn disk_full(_: &Frame) -> Result<(), Error> {
            Err(Error::Output("disk full".into()))
        }
        let mut writer = BackgroundWriter::spawn(disk_full);
        let data = sample();

        let _ = writer.observe(&data.as_frame());
        assert_eq!(writer.finish(), Err(Error::Output("disk full".into())));
    }
}
