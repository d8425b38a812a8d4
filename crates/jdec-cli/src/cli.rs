use clap::{Parser, Subcommand};
use jdec_core::DecoderOptions;

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Refuse images with more pixels than this
    #[arg(long = "max-pixels", value_name = "pixels")]
    pub max_pixels: Option<u64>,

    /// Fail on a missing or misplaced restart marker instead of resynchronizing
    #[arg(long = "strict-restart")]
    pub strict_restart: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    pub fn decoder_options(&self) -> DecoderOptions {
        let mut options = DecoderOptions::default().with_strict_restart(self.strict_restart);
        if let Some(max_pixels) = self.max_pixels {
            options = options.with_max_pixels(max_pixels);
        }
        options
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Decode(decode::DecodeArgs),
    Inspect(inspect::InspectArgs),
}
