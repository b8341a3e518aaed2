use crate::model::{parse_date, parse_time, NewShift, Shift};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// Import de shifts: header `name,date,start_time,end_time` (`YYYY-MM-DD`, `HH:MM`)
pub fn import_shifts_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<NewShift>> {
    let path = path.as_ref();
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_shifts_csv(file)
}

pub fn read_shifts_csv<R: Read>(reader: R) -> anyhow::Result<Vec<NewShift>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = line + 2;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("row {row}: empty name");
        }
        let date = rec.get(1).context("missing date")?;
        let start = rec.get(2).context("missing start_time")?;
        let end = rec.get(3).context("missing end_time")?;
        out.push(NewShift::new(
            name,
            parse_date(date).with_context(|| format!("row {row}: invalid date {date:?}"))?,
            parse_time(start).with_context(|| format!("row {row}: invalid start_time {start:?}"))?,
            parse_time(end).with_context(|| format!("row {row}: invalid end_time {end:?}"))?,
        ));
    }
    Ok(out)
}

/// Export JSON des shifts (jolie mise en forme)
pub fn export_shifts_json<P: AsRef<Path>>(path: P, shifts: &[Shift]) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(shifts)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des shifts: header `id,name,date,start_time,end_time,is_published`
pub fn export_shifts_csv<P: AsRef<Path>>(path: P, shifts: &[Shift]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_shifts_csv(file, shifts)
}

pub fn write_shifts_csv<W: Write>(writer: W, shifts: &[Shift]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    w.write_record(["id", "name", "date", "start_time", "end_time", "is_published"])?;
    for s in shifts {
        let date = s.date.format("%Y-%m-%d").to_string();
        let start = s.start_time.format("%H:%M").to_string();
        let end = s.end_time.format("%H:%M").to_string();
        w.write_record([
            s.id.as_str(),
            s.name.as_str(),
            date.as_str(),
            start.as_str(),
            end.as_str(),
            if s.is_published { "true" } else { "false" },
        ])?;
    }
    w.flush()?;
    Ok(())
}
