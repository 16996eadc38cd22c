//! Command-line interface for AES-128 file encryption.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use aes_core::{decrypt_block, encrypt_block, expand_key, Aes128Key, Block};
use aes_stream::{
    Codec, CodecConfig, Error as StreamError, Mode, PaddingCheck, Progress, RemainderPolicy,
};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Exit code for failures that do not come from the codec.
const GENERIC_FAILURE: u8 = 0xff;

/// AES-128 file encryption CLI.
#[derive(Parser)]
#[command(name = "aesfile", version, author, about = "AES-128 file encryption")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file; the last block is padded.
    Enc {
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        codec: CodecArgs,
        /// Plaintext input.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Ciphertext output.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Decrypt a file produced by `enc` (length must be a multiple of 16 bytes).
    Dec {
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        codec: CodecArgs,
        /// Ciphertext input.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Plaintext output.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Print a random key (and IV) as hex.
    Keygen {
        /// Optional RNG seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Verify the cipher against published known-answer vectors.
    Check,
    /// Encrypt and decrypt random data in memory with a random key.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
        /// Plaintext length in bytes.
        #[arg(long, default_value_t = 37)]
        len: usize,
    },
}

#[derive(Args)]
struct KeyArgs {
    /// AES-128 key as 32 hex characters.
    #[arg(long, value_name = "HEX", required_unless_present = "key_text")]
    key_hex: Option<String>,
    /// Key text: zero-padded or truncated to 16 bytes.
    #[arg(long, value_name = "TEXT", conflicts_with = "key_hex")]
    key_text: Option<String>,
}

#[derive(Args)]
struct CodecArgs {
    /// Mode of operation.
    #[arg(long, value_enum, default_value_t = ModeArg::Ecb)]
    mode: ModeArg,
    /// IV (CBC) or initial counter block (CTR) as 32 hex characters.
    #[arg(long, value_name = "HEX")]
    iv: Option<String>,
    /// Bytes processed per chunk; a non-zero multiple of 16.
    #[arg(long, default_value_t = aes_stream::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
    /// Verify every padding byte on decryption.
    #[arg(long, default_value_t = false)]
    strict_padding: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Ecb,
    Cbc,
    Ctr,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<StreamError>()
                .map(|e| e.status().code())
                .unwrap_or(GENERIC_FAILURE);
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Enc {
            key,
            codec,
            input,
            output,
        } => cmd_enc(&key, &codec, &input, &output),
        Commands::Dec {
            key,
            codec,
            input,
            output,
        } => cmd_dec(&key, &codec, &input, &output),
        Commands::Keygen { seed } => cmd_keygen(seed),
        Commands::Check => cmd_check(),
        Commands::Demo { seed, len } => cmd_demo(seed, len),
    }
}

fn cmd_enc(key: &KeyArgs, args: &CodecArgs, input: &PathBuf, output: &PathBuf) -> Result<()> {
    let codec = build_codec(key, args)?;
    let report = codec
        .encrypt_file_with_progress(input, output, log_progress)
        .with_context(|| format!("encrypt {}", input.display()))?;
    println!(
        "encrypted {} bytes into {} bytes ({} chunks)",
        report.bytes_in, report.bytes_out, report.chunks
    );
    Ok(())
}

fn cmd_dec(key: &KeyArgs, args: &CodecArgs, input: &PathBuf, output: &PathBuf) -> Result<()> {
    let codec = build_codec(key, args)?;
    let report = codec
        .decrypt_file_with_progress(input, output, log_progress)
        .with_context(|| format!("decrypt {}", input.display()))?;
    println!(
        "decrypted {} bytes into {} bytes ({} chunks)",
        report.bytes_in, report.bytes_out, report.chunks
    );
    Ok(())
}

fn cmd_keygen(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);
    let mut iv = [0u8; 16];
    rng.fill_bytes(&mut iv);
    println!("key: {}", hex::encode(key));
    println!("iv:  {}", hex::encode(iv));
    Ok(())
}

fn cmd_check() -> Result<()> {
    const VECTORS: [(&str, &str, &str, &str); 2] = [
        (
            "FIPS-197 C.1",
            "000102030405060708090a0b0c0d0e0f",
            "00112233445566778899aabbccddeeff",
            "69c4e0d86a7b0430d8cdb78070b4c55a",
        ),
        (
            "SP 800-38A F.1.1",
            "2b7e151628aed2a6abf7158809cf4f3c",
            "6bc1bee22e409f96e93d7e117393172a",
            "3ad77bb40d7a3660a89ecaf32466ef97",
        ),
    ];

    for (name, key_hex, plain_hex, cipher_hex) in VECTORS {
        let round_keys = expand_key(&Aes128Key::from_hex(key_hex)?);
        let plaintext = parse_block_hex(plain_hex)?;
        let mut block = plaintext;
        encrypt_block(&mut block, &round_keys);
        if hex::encode(block) != cipher_hex {
            bail!("{name}: ciphertext mismatch (got {})", hex::encode(block));
        }
        decrypt_block(&mut block, &round_keys);
        if block != plaintext {
            bail!("{name}: decryption did not restore the plaintext");
        }
        println!("{name}: ok");
    }
    Ok(())
}

fn cmd_demo(seed: Option<u64>, len: usize) -> Result<()> {
    if len == 0 {
        bail!("demo length must be at least one byte");
    }
    let mut rng = seeded_rng(seed);
    let mut key_bytes = [0u8; 16];
    rng.fill_bytes(&mut key_bytes);
    let codec = Codec::new(&Aes128Key::from(key_bytes));

    let mut plaintext = vec![0u8; len];
    rng.fill_bytes(&mut plaintext);
    let ciphertext = codec.encrypt(&plaintext, true)?;
    let decrypted = codec.decrypt(&ciphertext, true)?;

    println!("demo key: {}", hex::encode(key_bytes));
    println!("plaintext: {}", hex::encode(&plaintext));
    println!("ciphertext: {}", hex::encode(&ciphertext));
    println!("decrypted: {}", hex::encode(&decrypted));
    if decrypted != plaintext {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn build_codec(key: &KeyArgs, args: &CodecArgs) -> Result<Codec> {
    let key = parse_key(key)?;
    let iv = args.iv.as_deref().map(parse_iv).transpose()?;
    let mode = match (args.mode, iv) {
        (ModeArg::Ecb, iv) => {
            if iv.is_some() {
                warn!("--iv is ignored in ECB mode");
            }
            Mode::Ecb
        }
        (ModeArg::Cbc, Some(iv)) => Mode::Cbc { iv },
        (ModeArg::Ctr, Some(nonce)) => Mode::Ctr { nonce },
        (ModeArg::Cbc | ModeArg::Ctr, None) => {
            let missing = StreamError::InvalidArgument("--iv is required for CBC and CTR modes");
            return Err(missing.into());
        }
    };
    let config = CodecConfig {
        chunk_size: args.chunk_size,
        mode,
        remainder: RemainderPolicy::Reject,
        padding: if args.strict_padding {
            PaddingCheck::Strict
        } else {
            PaddingCheck::Lenient
        },
    };
    Ok(Codec::with_config(&key, config)?)
}

fn parse_key(args: &KeyArgs) -> Result<Aes128Key> {
    match (&args.key_hex, &args.key_text) {
        (Some(hex_str), _) => Aes128Key::from_hex(hex_str)
            .map_err(StreamError::from)
            .context("decode key hex"),
        (None, Some(text)) => {
            if text.len() != 16 {
                warn!(
                    "key text is {} bytes; it is zero-padded or truncated to 16",
                    text.len()
                );
            }
            Ok(Aes128Key::from_text(text))
        }
        (None, None) => Err(StreamError::InvalidArgument(
            "either --key-hex or --key-text is required",
        )
        .into()),
    }
}

fn parse_block_hex(hex_str: &str) -> Result<Block> {
    let bytes = hex::decode(hex_str.trim()).context("decode hex block")?;
    let block: Block = bytes
        .as_slice()
        .try_into()
        .context("block must be 16 bytes (32 hex characters)")?;
    Ok(block)
}

fn parse_iv(hex_str: &str) -> Result<Block> {
    let bytes = hex::decode(hex_str.trim())
        .map_err(|_| StreamError::InvalidArgument("--iv is not valid hex"))?;
    let iv = bytes
        .as_slice()
        .try_into()
        .map_err(|_| StreamError::InvalidArgument("--iv must be 16 bytes (32 hex characters)"))?;
    Ok(iv)
}

fn log_progress(progress: Progress) {
    info!(
        "{} / {} bytes ({:.1}%)",
        progress.processed,
        progress.total,
        progress.fraction() * 100.0
    );
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
