use std::fmt::Write;
use std::path::PathBuf;

use clap::Args;
use jdec_core::{Decoder, DecoderOptions, HuffmanClass, Precision};

use super::read_input;
use crate::CliResult;

/// Shows the frame header and the tables of a JPEG file
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// JPEG image to inspect
    #[arg(short = 'i', long = "in", value_name = "jpeg file", required = true)]
    pub input: PathBuf,

    /// Also list the code assigned to every Huffman symbol
    #[arg(long)]
    pub codes: bool,
}

impl InspectArgs {
    pub fn run(self, options: DecoderOptions) -> CliResult<()> {
        let data = read_input(&self.input)?;
        let name = self
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string());

        print!("{}", report(&name, &data, options, self.codes)?);
        Ok(())
    }
}

/// Markdown report of everything up to the first scan.
fn report(name: &str, data: &[u8], options: DecoderOptions, codes: bool) -> CliResult<String> {
    let mut decoder = Decoder::with_options(data, options);
    let info = decoder.read_headers()?;

    let mut out = String::new();
    let _ = writeln!(out, "# `{name}`");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}x{}, {}-bit, {} (SOF{})",
        info.width,
        info.height,
        info.precision,
        info.description(),
        info.sof
    );
    for component in &info.components {
        let _ = writeln!(
            out,
            "- component {}: sampling {}x{}, quantization table {}",
            component.id, component.h_sampling, component.v_sampling, component.quant_table_id
        );
    }
    let _ = writeln!(out);

    for table in decoder.quantization_tables().iter() {
        let bits = match table.precision {
            Precision::Bits8 => 8,
            Precision::Bits16 => 16,
        };
        let _ = writeln!(out, "## Quantization table {} (precision: {bits}-bit)", table.id);
        out.push_str(&table.to_ascii_table());
        let _ = writeln!(out);
    }

    for table in decoder.huffman_tables().iter() {
        let class = match table.class {
            HuffmanClass::Dc => "DC",
            HuffmanClass::Ac => "AC",
        };
        let _ = writeln!(
            out,
            "## Huffman {class} table {} ({} symbols)",
            table.id,
            table.symbols().len()
        );
        if codes {
            // Skip the listing's own title line.
            for line in table.to_code_listing().lines().skip(1) {
                let _ = writeln!(out, "{line}");
            }
        }
        let _ = writeln!(out);
    }

    Ok(out)
}
