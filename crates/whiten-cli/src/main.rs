//! Command-line interface for the whitening file cipher.

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use whiten_cipher::{FileSession, Mode, WhiteningCipher};
use whiten_core::KeyMaterial;

/// Whitening file cipher CLI.
#[derive(Parser)]
#[command(
    name = "whiten",
    version,
    author,
    about = "Password-keyed two-stage whitening file cipher"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fresh key material and write the password-masked key file.
    Keygen {
        /// Password protecting the key file.
        #[arg(long)]
        password: String,
        /// Output path for the 72-byte key file.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Encrypt a file with a stored key.
    Encrypt {
        /// Path to the key file.
        #[arg(long, value_name = "FILE")]
        key: PathBuf,
        /// Password the key file was saved with.
        #[arg(long)]
        password: String,
        /// Input file.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output file; defaults to transforming the input in place.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Decrypt a file with a stored key.
    Decrypt {
        /// Path to the key file.
        #[arg(long, value_name = "FILE")]
        key: PathBuf,
        /// Password the key file was saved with.
        #[arg(long)]
        password: String,
        /// Input file.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output file; defaults to transforming the input in place.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Round-trip a sample buffer with a throwaway key and print the stages.
    Demo {
        /// Password for the throwaway key.
        #[arg(long, default_value = "password")]
        password: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Keygen { password, out } => cmd_keygen(&password, &out),
        Commands::Encrypt {
            key,
            password,
            input,
            output,
        } => cmd_transform(&key, &password, &input, output, Mode::Encrypt),
        Commands::Decrypt {
            key,
            password,
            input,
            output,
        } => cmd_transform(&key, &password, &input, output, Mode::Decrypt),
        Commands::Demo { password } => cmd_demo(&password),
    }
}

fn cmd_keygen(password: &str, out: &PathBuf) -> Result<()> {
    let key = KeyMaterial::generate(password);
    let blob = key.serialize();
    fs::write(out, &blob).with_context(|| format!("write {}", out.display()))?;
    println!("wrote {}-byte key file to {}", blob.len(), out.display());
    Ok(())
}

fn cmd_transform(
    key_path: &PathBuf,
    password: &str,
    input: &PathBuf,
    output: Option<PathBuf>,
    mode: Mode,
) -> Result<()> {
    let key = load_key(key_path, password)?;
    let cipher = WhiteningCipher::new(key);
    let sink = output.unwrap_or_else(|| input.clone());
    let result = FileSession::new(input, &sink, mode)
        .run(&cipher)
        .with_context(|| format!("transform {}", input.display()))?;
    println!("wrote {} bytes to {}", result.len(), sink.display());
    Ok(())
}

fn cmd_demo(password: &str) -> Result<()> {
    let key = KeyMaterial::generate(password);
    let cipher = WhiteningCipher::new(key.clone());

    let plaintext = b"HELLO".to_vec();
    let ciphertext = cipher.transform(&plaintext, Mode::Encrypt)?;
    let decrypted = cipher.transform(&ciphertext, Mode::Decrypt)?;

    println!("key file:   {}", hex::encode(key.serialize()));
    println!("plaintext:  {}", hex::encode(&plaintext));
    println!("ciphertext: {}", hex::encode(&ciphertext));
    println!("decrypted:  {}", hex::encode(&decrypted));
    if decrypted != plaintext {
        bail!("demo round trip failed");
    }
    Ok(())
}

fn load_key(path: &PathBuf, password: &str) -> Result<KeyMaterial> {
    let blob = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let key = KeyMaterial::load(&blob, password)
        .with_context(|| format!("parse key file {}", path.display()))?;
    Ok(key)
}
