//! Buffer and file encryption on top of [`aes_core`].
//!
//! Data is cut into 16-byte blocks, padded PKCS#7-style on the final block and run through a
//! mode of operation. The default mode is ECB, which matches the headerless file format this
//! crate reads and writes; CBC and CTR are available through [`CodecConfig::mode`].
//!
//! Padding removal is not authenticated. A damaged ciphertext can decrypt to a message of the
//! wrong length without any error being reported.
//!
//! ```
//! use aes_core::Aes128Key;
//! use aes_stream::Codec;
//!
//! let codec = Codec::new(&Aes128Key::from_text("correct horse"));
//! let sealed = codec.encrypt(b"attack at dawn", true).unwrap();
//! assert_eq!(sealed.len(), 16);
//! assert_eq!(codec.decrypt(&sealed, true).unwrap(), b"attack at dawn");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod codec;
mod config;
mod error;
mod file;
mod mode;
mod padding;
mod stream;

pub use crate::codec::Codec;
pub use crate::config::{CodecConfig, PaddingCheck, RemainderPolicy, DEFAULT_CHUNK_SIZE};
pub use crate::error::{Error, Result, Status};
pub use crate::file::{FileReport, Progress};
pub use crate::mode::{BlockMode, Cbc, Ctr, Ecb, Mode, ModeState};
pub use crate::padding::{pad, pad_len, unpadded_len, PaddingCodec};
pub use crate::stream::StreamCodec;
