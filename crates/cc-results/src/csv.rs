use std::io::{self, Write};

use cc_sim::HistorySample;

pub const CSV_HEADER: &str =
    "time,error,p_term,i_term,d_term,throttle,speed,input_speed,perturbation_magnitude";

/// Write history samples as CSV, one row per tick.
pub fn write_history_csv<W: Write>(writer: &mut W, samples: &[HistorySample]) -> io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for s in samples {
        writeln!(
            writer,
            "{:.4},{:.6},{:.6},{:.6},{:.6},{:.6},{:.4},{:.4},{:.4}",
            s.time,
            s.error,
            s.p_term,
            s.i_term,
            s.d_term,
            s.throttle,
            s.speed,
            s.input_speed,
            s.perturbation_magnitude,
        )?;
    }
    Ok(())
}
