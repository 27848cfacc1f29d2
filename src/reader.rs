//! Observation RINEX reader
use std::{
    fs::File,
    io::Read,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "parallel")]
use std::sync::atomic::AtomicUsize;

use log::debug;

use crate::{
    epoch::index::{block_range, epoch_index, EpochEntry},
    error::{Error, ParsingError},
    header::Header,
    observation::{v2, v3},
    table::{ObsRow, ObservationTable, TableSchema},
};

/// [Progress] is notified after each decoded epoch,
/// with the number of epochs decoded so far and the total.
pub trait Progress: Send + Sync {
    fn update(&self, decoded: usize, total: usize);
}

impl<F: Fn(usize, usize) + Send + Sync> Progress for F {
    fn update(&self, decoded: usize, total: usize) {
        self(decoded, total)
    }
}

/// [CancellationToken] interrupts a read in progress.
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }
    /// Requests cancellation. Reads stop before next epoch.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Record layout a reader is restricted to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Revision {
    /// RINEX 2.xx
    V2,
    /// RINEX 3.xx and 4.xx
    V3,
}

/// [ObsReader] reads an entire Observation RINEX into an [ObservationTable].
/// ```
/// use rnx2tab::prelude::*;
/// let table = ObsReader::new()
///     .with_index(&["epoch", "prn"])
///     .read_file("test_resources/OBS/V2/ajac0010.21o")
///     .unwrap();
/// assert!(table.len() > 0);
/// ```
#[derive(Clone, Default)]
pub struct ObsReader {
    index: Option<Vec<String>>,
    progress: Option<Arc<dyn Progress>>,
    cancellation: Option<CancellationToken>,
    revision: Option<Revision>,
    #[cfg(feature = "parallel")]
    parallel: bool,
}

impl std::fmt::Debug for ObsReader {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ObsReader")
            .field("index", &self.index)
            .field("progress", &self.progress.is_some())
            .field("cancellation", &self.cancellation)
            .field("revision", &self.revision)
            .finish()
    }
}

impl ObsReader {
    /// Builds a new [ObsReader] that accepts any supported revision
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies and returns [Self] that indexes the table with these columns
    pub fn with_index<S: AsRef<str>>(&self, keys: &[S]) -> Self {
        let mut s = self.clone();
        s.index = Some(keys.iter().map(|key| key.as_ref().to_string()).collect());
        s
    }

    /// Copies and returns [Self] that reports to this [Progress] observer
    pub fn with_progress(&self, progress: impl Progress + 'static) -> Self {
        let mut s = self.clone();
        s.progress = Some(Arc::new(progress));
        s
    }

    /// Copies and returns [Self] that may be interrupted with this token
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        let mut s = self.clone();
        s.cancellation = Some(token);
        s
    }

    /// Copies and returns [Self] restricted to this [Revision]
    pub fn with_revision(&self, revision: Revision) -> Self {
        let mut s = self.clone();
        s.revision = Some(revision);
        s
    }

    /// Copies and returns [Self] that decodes epochs on the rayon thread pool
    #[cfg(feature = "parallel")]
    #[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
    pub fn with_parallel(&self, parallel: bool) -> Self {
        let mut s = self.clone();
        s.parallel = parallel;
        s
    }

    /// Reads this local file
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<ObservationTable, Error> {
        let path = path.as_ref();
        debug!("reading {}", path.display());
        self.read(File::open(path)?)
    }

    /// Reads this gzip compressed local file
    #[cfg(feature = "flate2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
    pub fn read_gzip_file(&self, path: impl AsRef<Path>) -> Result<ObservationTable, Error> {
        let path = path.as_ref();
        debug!("reading {} (gzip)", path.display());
        self.read(GzDecoder::new(File::open(path)?))
    }

    /// Reads an entire Observation RINEX from any [Read]able source.
    /// Invalid UTF-8 sequences are replaced.
    pub fn read<R: Read>(&self, mut reader: R) -> Result<ObservationTable, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let lines = String::from_utf8_lossy(&bytes)
            .lines()
            .map(|line| line.to_string())
            .collect::<Vec<_>>();

        self.read_lines(&lines)
    }

    /// Decodes these lines, which must describe an entire file
    pub fn read_lines(&self, lines: &[String]) -> Result<ObservationTable, Error> {
        let header = Header::parse(lines)?;

        match self.revision {
            Some(Revision::V2) if header.version.is_modern() => {
                return Err(ParsingError::UnsupportedVersion(header.version).into());
            },
            Some(Revision::V3) if !header.version.is_modern() => {
                return Err(ParsingError::UnsupportedVersion(header.version).into());
            },
            _ => {},
        }

        let entries = epoch_index(lines, &header)?;
        let schema = TableSchema::from_catalog(&header.catalog);

        let blocks = self.decode_all(lines, &entries, &header, &schema)?;

        let rows = blocks.into_iter().flatten().collect::<Vec<_>>();

        debug!(
            "{} epochs, {} rows, {} observables",
            entries.len(),
            rows.len(),
            schema.width()
        );

        let mut table = ObservationTable::new(schema.observables, rows);

        if !header.version.is_modern() {
            table.sort_by_epoch_prn();
        }

        if let Some(keys) = &self.index {
            table.set_index(keys.as_slice())?;
        }

        Ok(table)
    }

    #[cfg(feature = "parallel")]
    fn decode_all(
        &self,
        lines: &[String],
        entries: &[EpochEntry],
        header: &Header,
        schema: &TableSchema,
    ) -> Result<Vec<Vec<ObsRow>>, Error> {
        if !self.parallel {
            return self.decode_sequential(lines, entries, header, schema);
        }

        let total = entries.len();
        let decoded = AtomicUsize::new(0);

        // indexed collection keeps the epoch order
        (0..total)
            .into_par_iter()
            .map(|nth| -> Result<Vec<ObsRow>, Error> {
                self.check_cancellation()?;
                let rows = decode_epoch(lines, entries, nth, header, schema)?;
                let done = decoded.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(progress) = &self.progress {
                    progress.update(done, total);
                }
                Ok(rows)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn decode_all(
        &self,
        lines: &[String],
        entries: &[EpochEntry],
        header: &Header,
        schema: &TableSchema,
    ) -> Result<Vec<Vec<ObsRow>>, Error> {
        self.decode_sequential(lines, entries, header, schema)
    }

    fn decode_sequential(
        &self,
        lines: &[String],
        entries: &[EpochEntry],
        header: &Header,
        schema: &TableSchema,
    ) -> Result<Vec<Vec<ObsRow>>, Error> {
        let total = entries.len();
        let mut blocks = Vec::with_capacity(total);

        for nth in 0..total {
            self.check_cancellation()?;
            blocks.push(decode_epoch(lines, entries, nth, header, schema)?);
            if let Some(progress) = &self.progress {
                progress.update(nth + 1, total);
            }
        }

        Ok(blocks)
    }

    fn check_cancellation(&self) -> Result<(), Error> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Decodes the nth epoch block. Events carry no observations.
fn decode_epoch(
    lines: &[String],
    entries: &[EpochEntry],
    nth: usize,
    header: &Header,
    schema: &TableSchema,
) -> Result<Vec<ObsRow>, ParsingError> {
    let entry = &entries[nth];

    if entry.flag.is_event() {
        debug!(
            "line {}: {} event ({} records)",
            entry.offset, entry.flag, entry.num_sat
        );
        return Ok(Vec::new());
    }

    let (start, end) = block_range(entries, nth, lines.len());

    if header.version.is_modern() {
        Ok(v3::decode_block(
            &lines[start + 1..end],
            entry.epoch,
            header,
            schema,
        ))
    } else {
        v2::decode_block(&lines[start..end], start, header, schema)
    }
}
