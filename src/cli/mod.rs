// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod keys;
pub mod simulate;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Flow Endpoint CLI
#[derive(Parser, Debug)]
#[command(name = "flow-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Operator tools for the encrypted flow endpoint", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an RSA key pair for the endpoint
    GenerateKeypair(keys::GenerateKeypairArgs),

    /// Compute the x-hub-signature-256 header for a request body
    Sign(simulate::SignArgs),

    /// Encrypt a request body the way the flow platform does
    Seal(simulate::SealArgs),

    /// Decrypt an encrypted_response with the session key and IV from `seal`
    Open(simulate::OpenArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::GenerateKeypair(args) => keys::generate_keypair(args).await,
        Commands::Sign(args) => simulate::sign(args).await,
        Commands::Seal(args) => simulate::seal(args).await,
        Commands::Open(args) => simulate::open(args).await,
    }
}
