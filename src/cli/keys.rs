// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use rand::rngs::OsRng;
use rsa::{
    pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding},
    RsaPrivateKey,
};
use std::path::{Path, PathBuf};
use tracing::info;

pub const PRIVATE_KEY_FILE: &str = "private.pem";
pub const PUBLIC_KEY_FILE: &str = "public.pem";

const MIN_KEY_BITS: usize = 2048;

/// Arguments for generate-keypair command
#[derive(Args, Debug)]
pub struct GenerateKeypairArgs {
    /// Directory to write private.pem and public.pem into
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Encrypt the private key (PKCS#8/PBES2) with this passphrase
    #[arg(long, env = "PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// RSA modulus size
    #[arg(long, default_value_t = 2048)]
    pub bits: usize,

    /// Overwrite existing key files
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone)]
pub struct KeypairPaths {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

/// Generate a key pair and print where it was written
pub async fn generate_keypair(args: GenerateKeypairArgs) -> Result<()> {
    if args.bits < MIN_KEY_BITS {
        return Err(anyhow!(
            "Refusing to generate a {}-bit key; use at least {} bits",
            args.bits,
            MIN_KEY_BITS
        ));
    }

    println!("🔐 Generating {}-bit RSA key pair...", args.bits);
    let out_dir = args.out_dir.clone();
    let passphrase = args.passphrase.filter(|p| !p.is_empty());
    let bits = args.bits;
    let force = args.force;

    let paths = tokio::task::spawn_blocking(move || {
        write_keypair(&out_dir, passphrase.as_deref(), bits, force)
    })
    .await
    .context("Key generation task failed")??;

    println!("✅ Private key: {}", paths.private_key.display());
    println!("✅ Public key:  {}", paths.public_key.display());
    println!("\nUpload public.pem to the flow platform and set PRIVATE_KEY_PATH to private.pem");
    Ok(())
}

/// Generate and write `private.pem` and `public.pem` under `out_dir`
///
/// The private key is PKCS#8, encrypted when `passphrase` is set. The public
/// key is SPKI.
pub fn write_keypair(
    out_dir: &Path,
    passphrase: Option<&str>,
    bits: usize,
    force: bool,
) -> Result<KeypairPaths> {
    let paths = KeypairPaths {
        private_key: out_dir.join(PRIVATE_KEY_FILE),
        public_key: out_dir.join(PUBLIC_KEY_FILE),
    };
    if !force {
        for path in [&paths.private_key, &paths.public_key] {
            if path.exists() {
                return Err(anyhow!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                ));
            }
        }
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let private_key = RsaPrivateKey::new(&mut OsRng, bits)?;
    let private_pem = match passphrase {
        Some(passphrase) => private_key
            .to_pkcs8_encrypted_pem(&mut OsRng, passphrase.as_bytes(), LineEnding::LF)
            .map_err(|e| anyhow!("Failed to encrypt private key: {}", e))?,
        None => private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| anyhow!("Failed to encode private key: {}", e))?,
    };
    let public_pem = private_key
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| anyhow!("Failed to encode public key: {}", e))?;

    std::fs::write(&paths.private_key, private_pem.as_bytes())?;
    restrict_permissions(&paths.private_key)?;
    std::fs::write(&paths.public_key, public_pem)?;

    info!(
        "Wrote RSA key pair to {} (encrypted: {})",
        out_dir.display(),
        passphrase.is_some()
    );
    Ok(paths)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
