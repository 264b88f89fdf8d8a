use std::io::{self, Write};

/// Writes `text` as-is. A reader that hangs up early (`moneycoach dash | head`)
/// is not an error.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    emit(&mut io::stdout().lock(), text, false)
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    emit(&mut io::stdout().lock(), text, true)
}

fn emit(writer: &mut dyn Write, text: &str, newline: bool) -> io::Result<()> {
    let written = write_and_flush(writer, text, newline);
    match written {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn write_and_flush(writer: &mut dyn Write, text: &str, newline: bool) -> io::Result<()> {
    writer.write_all(text.as_bytes())?;
    if newline {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
