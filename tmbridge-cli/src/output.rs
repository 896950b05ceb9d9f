//! JSON output for command results.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `value` to `out` as pretty-printed JSON followed by a newline
pub fn write_json<T, W>(out: &mut W, value: &T) -> Result<()>
where
  T: Serialize + ?Sized,
  W: Write + ?Sized,
{
  serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
  writeln!(out).context("Failed to write output")?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_write_json_is_pretty_and_terminated() -> Result<()> {
    let mut out = Vec::new();
    write_json(&mut out, &serde_json::json!({ "key": "TP-1" }))?;
    assert_eq!(String::from_utf8(out)?, "{\n  \"key\": \"TP-1\"\n}\n");
    Ok(())
  }
}
