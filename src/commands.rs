//! Implementations of the `gsmooth` command line subcommands.

use std::path::PathBuf;

use crate::prelude::*;
use crate::reporting::{CommandOutput, Report};

/// Smooth a per-site TSV track with a masked running average, writing the
/// result as TSV with the missing marker at invalid sites.
pub fn gsmooth_smooth(
    trackfile: &PathBuf,
    seqlens: &PathBuf,
    window_size: usize,
    min_valid_fraction: f64,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, GSmoothError> {
    // get the genome info
    let genome = read_seqlens(seqlens)?;

    let series_map = read_series_tsv(trackfile, &genome)?;
    let smoothed = series_map.smooth(window_size, min_valid_fraction)?;

    let mut report = Report::new();
    for seqname in smoothed.names() {
        let series = smoothed
            .get(&seqname)
            .ok_or_else(|| GSmoothError::MissingSequence(seqname.clone()))?;
        let n_invalid = series.n_invalid();
        if n_invalid > 0 {
            report.add_entry(format!(
                "{}: {} of {} smoothed sites are below the valid-fraction threshold",
                seqname,
                n_invalid,
                series.len()
            ));
        }
    }

    write_smoothed_tsv(&smoothed, output, &SITE_TSV)?;
    Ok(CommandOutput::new((), report))
}

/// Generate a random dense site track for testing, with a given fraction of
/// sites carrying the missing marker.
#[cfg(feature = "dev-commands")]
pub fn gsmooth_random_series(
    seqlens: &PathBuf,
    masked_fraction: f64,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, GSmoothError> {
    use rand::{thread_rng, Rng};
    use std::io::Write;

    let genome = read_seqlens(seqlens)?;

    let output_stream = output.map_or(OutputFile::new_stdout(None), |file| {
        OutputFile::new(file, None)
    });
    let mut writer = output_stream.writer()?;

    let mut rng = thread_rng();
    for (seqname, length) in genome.iter() {
        for pos in 0..*length {
            if rng.gen::<f64>() < masked_fraction {
                writeln!(writer, "{}\t{}\t{}", seqname, pos, SITE_TSV.no_value_string)?;
            } else {
                writeln!(writer, "{}\t{}\t{}", seqname, pos, rng.gen::<f64>())?;
            }
        }
    }
    Ok(CommandOutput::new((), Report::new()))
}
