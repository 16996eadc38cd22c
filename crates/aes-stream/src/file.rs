//! File-to-file encryption in bounded chunks.
//!
//! The output has no header: it is the raw ciphertext with padding on the final block. Every
//! chunk but the last is a full `chunk_size` and is processed without padding; the last one
//! carries the padding. The mode state spans all chunks, so the file result is identical to
//! encrypting the whole content in memory.
//!
//! A failure after the output was created removes it, so no partial result is left behind.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use aes_core::BLOCK_SIZE;
use log::{debug, info, warn};

use crate::codec::Codec;
use crate::error::{Error, Result};

/// Progress snapshot passed to callbacks after every chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Input bytes consumed so far.
    pub processed: u64,
    /// Total input size.
    pub total: u64,
}

impl Progress {
    /// Completion in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.processed as f64 / self.total as f64
    }
}

/// Summary of a finished file operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileReport {
    /// Bytes read from the input.
    pub bytes_in: u64,
    /// Bytes written to the output.
    pub bytes_out: u64,
    /// Number of chunks processed.
    pub chunks: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

impl Codec {
    /// Encrypts `input` into `output`.
    pub fn encrypt_file_to_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<FileReport> {
        self.encrypt_file_with_progress(input, output, |_| {})
    }

    /// Decrypts `input` into `output`.
    pub fn decrypt_file_to_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<FileReport> {
        self.decrypt_file_with_progress(input, output, |_| {})
    }

    /// Encrypts `input` into `output`, calling `on_progress` after every chunk.
    pub fn encrypt_file_with_progress(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        on_progress: impl FnMut(Progress),
    ) -> Result<FileReport> {
        self.process_file(Direction::Encrypt, input.as_ref(), output.as_ref(), on_progress)
    }

    /// Decrypts `input` into `output`, calling `on_progress` after every chunk.
    pub fn decrypt_file_with_progress(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        on_progress: impl FnMut(Progress),
    ) -> Result<FileReport> {
        self.process_file(Direction::Decrypt, input.as_ref(), output.as_ref(), on_progress)
    }

    fn process_file(
        &self,
        direction: Direction,
        input: &Path,
        output: &Path,
        mut on_progress: impl FnMut(Progress),
    ) -> Result<FileReport> {
        let open_input = |source| Error::OpenInput {
            path: input.to_path_buf(),
            source,
        };
        let reader = File::open(input).map_err(open_input)?;
        let total = reader.metadata().map_err(open_input)?.len();
        if total == 0 {
            return Err(Error::EmptyInput(input.to_path_buf()));
        }
        if direction == Direction::Decrypt && total % BLOCK_SIZE as u64 != 0 {
            return Err(Error::MalformedLength {
                context: "encrypted file",
                actual: total,
            });
        }

        if same_file(input, output) {
            return Err(Error::InvalidArgument("input and output are the same file"));
        }

        let writer = File::create(output).map_err(|source| Error::CreateOutput {
            path: output.to_path_buf(),
            source,
        })?;

        info!(
            "{:?} {} -> {} ({} bytes, mode {})",
            direction,
            input.display(),
            output.display(),
            total,
            self.config().mode.name()
        );

        let result = self.transform_chunks(
            direction,
            reader,
            BufWriter::new(writer),
            total,
            &mut on_progress,
        );
        match result {
            Ok(report) => {
                info!(
                    "{:?} finished: {} bytes in, {} bytes out, {} chunks",
                    direction, report.bytes_in, report.bytes_out, report.chunks
                );
                Ok(report)
            }
            Err(err) => {
                warn!("{:?} failed, removing {}: {}", direction, output.display(), err);
                if let Err(cleanup) = fs::remove_file(output) {
                    warn!("cannot remove {}: {}", output.display(), cleanup);
                }
                Err(err)
            }
        }
    }

    fn transform_chunks(
        &self,
        direction: Direction,
        mut reader: File,
        mut writer: BufWriter<File>,
        total: u64,
        on_progress: &mut impl FnMut(Progress),
    ) -> Result<FileReport> {
        let chunk_size = self.config().chunk_size as u64;
        let mut codec = self.padding();
        let mut report = FileReport::default();
        let mut buffer = Vec::with_capacity(chunk_size.min(total) as usize);
        let mut remaining = total;

        while remaining > 0 {
            let last = remaining <= chunk_size;
            let len = remaining.min(chunk_size);
            buffer.clear();
            (&mut reader).take(len).read_to_end(&mut buffer)?;
            if (buffer.len() as u64) < len {
                return Err(Error::Io(io::ErrorKind::UnexpectedEof.into()));
            }

            let out = match direction {
                Direction::Encrypt => codec.encrypt(&buffer, last)?,
                Direction::Decrypt => codec.decrypt(&buffer, last)?,
            };
            writer.write_all(&out)?;

            remaining -= len;
            report.bytes_in += len;
            report.bytes_out += out.len() as u64;
            report.chunks += 1;
            debug!(
                "chunk {}: {} bytes in, {} bytes out",
                report.chunks,
                len,
                out.len()
            );
            on_progress(Progress {
                processed: report.bytes_in,
                total,
            });
        }

        writer.flush()?;
        Ok(report)
    }
}

/// True when both paths resolve to the same existing file.
fn same_file(input: &Path, output: &Path) -> bool {
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    }
}
