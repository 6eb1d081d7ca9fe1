use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use ark_ec::pairing::Pairing;
use crossbeam_channel::{bounded, Receiver, Sender};
use kzg_iop_primitives::{
    consts::SIZE_PREFIX_BYTES, errors::KzgError, helpers, srs::SRS, traits::PointBytes,
};
use tracing::{debug, instrument};

/// Number of G1 points the reader thread hands to a worker at once.
const POINTS_PER_CHUNK: usize = 1024;

/// Writes `srs` to `path` in the format of [`SRS::write_to`].
pub fn write_srs_file<E: Pairing>(path: impl AsRef<Path>, srs: &SRS<E>) -> Result<(), KzgError> {
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    srs.write_to(&mut writer)?;
    writer.flush().map_err(io_error)
}

/// Loads an SRS file written by [`write_srs_file`].
///
/// With `points_to_load = Some(n)` only the first `n` G1 powers are read.
/// The G1 points are decoded in parallel: one reader thread streams chunks of
/// compressed points over a bounded channel to one worker per CPU, and the
/// decoded chunks are put back in file order.
///
/// # Errors
/// * `GenericError` - more points requested than the file holds
/// * `SerializationError` - I/O failure or truncated file
/// * `NotOnCurveError` - a point fails decompression or subgroup checks
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_srs_file<E: Pairing>(
    path: impl AsRef<Path>,
    points_to_load: Option<usize>,
) -> Result<SRS<E>, KzgError> {
    let path = path.as_ref().to_path_buf();
    let mut file = BufReader::new(File::open(&path).map_err(io_error)?);
    let order = helpers::read_len_prefix(&mut file)?;
    let points_to_load = points_to_load.unwrap_or(order);
    if points_to_load > order {
        return Err(KzgError::GenericError(format!(
            "Number of points to load ({}) exceeds SRS order ({}).",
            points_to_load, order
        )));
    }
    debug!(order, points_to_load, "loading SRS file");

    let g1 = parallel_read_g1_points::<E>(path, points_to_load)?;

    let g1_size = E::G1Affine::compressed_len();
    let g2_offset = (SIZE_PREFIX_BYTES + order * g1_size) as u64;
    file.seek(SeekFrom::Start(g2_offset)).map_err(io_error)?;
    let g2 = [
        helpers::read_point_compressed(&mut file)?,
        helpers::read_point_compressed(&mut file)?,
    ];

    SRS::from_points(g1, g2)
}

type Chunk = (Vec<u8>, usize);

/// Reads `points_to_load` G1 points right after the size prefix of `path`.
fn parallel_read_g1_points<E: Pairing>(
    path: PathBuf,
    points_to_load: usize,
) -> Result<Vec<E::G1Affine>, KzgError> {
    let point_size = E::G1Affine::compressed_len();
    let (sender, receiver) = bounded::<Chunk>(1000);

    let reader_handle = std::thread::spawn(move || {
        read_file_chunks(&path, sender, point_size, points_to_load)
    });

    let num_workers = num_cpus::get();
    let workers: Vec<_> = (0..num_workers)
        .map(|_| {
            let receiver = receiver.clone();
            std::thread::spawn(move || process_chunks::<E>(receiver, point_size))
        })
        .collect();
    drop(receiver);

    match reader_handle.join() {
        Ok(result) => result.map_err(io_error)?,
        Err(_) => {
            return Err(KzgError::GenericError(
                "Reader thread panicked.".to_string(),
            ))
        },
    }

    let mut all_chunks = Vec::new();
    for worker in workers {
        let chunks = worker
            .join()
            .map_err(|_| KzgError::GenericError("Worker thread panicked.".to_string()))??;
        all_chunks.extend(chunks);
    }

    // Sort by file position to maintain order
    all_chunks.sort_by_key(|(_, position)| *position);
    let points: Vec<E::G1Affine> = all_chunks
        .into_iter()
        .flat_map(|(points, _)| points)
        .collect();

    if points.len() != points_to_load {
        return Err(KzgError::GenericError(format!(
            "Expected {} points, but got {}.",
            points_to_load,
            points.len()
        )));
    }
    Ok(points)
}

/// Decodes every chunk received until the channel closes.
fn process_chunks<E: Pairing>(
    receiver: Receiver<Chunk>,
    point_size: usize,
) -> Result<Vec<(Vec<E::G1Affine>, usize)>, KzgError> {
    receiver
        .iter()
        .map(|(bytes, position)| {
            let points = bytes
                .chunks(point_size)
                .map(E::G1Affine::read_point_from_bytes_native_compressed)
                .collect::<Result<Vec<_>, _>>()?;
            Ok((points, position))
        })
        .collect()
}

/// Streams `num_points` compressed points, [`POINTS_PER_CHUNK`] at a time,
/// tagged with their byte offset.
fn read_file_chunks(
    path: &Path,
    sender: Sender<Chunk>,
    point_size: usize,
    num_points: usize,
) -> io::Result<()> {
    let mut reader = BufReader::new(File::open(path)?);
    reader.seek(SeekFrom::Start(SIZE_PREFIX_BYTES as u64))?;

    let mut position = 0;
    let mut remaining = num_points;
    while remaining > 0 {
        let count = remaining.min(POINTS_PER_CHUNK);
        let mut buffer = vec![0u8; count * point_size];
        reader.read_exact(&mut buffer)?;
        if sender.send((buffer, position)).is_err() {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "all workers exited",
            ));
        }
        position += count * point_size;
        remaining -= count;
    }
    Ok(())
}

fn io_error(e: io::Error) -> KzgError {
    KzgError::SerializationError(e.to_string())
}
