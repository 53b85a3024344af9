//! CSV tables of sweep results

use std::{fs::File, io, path::Path};

use crate::sweep::SystemResult;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to open {1}")]
    Io(#[source] io::Error, String),
    #[error("failed to (de)serialize the CSV table")]
    Csv(#[from] csv::Error),
}
type Result<T> = std::result::Result<T, ExportError>;

/// Writes `rows` as CSV records, with a header line
pub fn write_csv<W: io::Write>(writer: W, rows: &[SystemResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes `rows` to the CSV file `path`
pub fn to_csv<P: AsRef<Path>>(path: P, rows: &[SystemResult]) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).map_err(|e| ExportError::Io(e, path.to_string_lossy().into_owned()))?;
    write_csv(file, rows)?;
    log::info!("{} row(s) written to {:?}", rows.len(), path);
    Ok(())
}

/// Reads sweep results from CSV records
pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<SystemResult>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Reads sweep results from the CSV file `path`
pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<SystemResult>> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|e| ExportError::Io(e, path.to_string_lossy().into_owned()))?;
    log::info!("Loading {:?}...", path);
    read_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn header_and_afocal_rows() -> std::result::Result<(), Box<dyn Error>> {
        let rows = vec![
            SystemResult {
                object_distance: 30.,
                image_distance: 150.,
                magnification: -5.,
                focal_length: Some(25.),
                angular_resolution_deg: 0.5,
                linear_resolution: 0.25,
            },
            SystemResult {
                object_distance: 40.,
                image_distance: 1.5,
                magnification: 0.125,
                focal_length: None,
                angular_resolution_deg: 0.5,
                linear_resolution: 0.5,
            },
        ];
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &rows)?;
        let table = String::from_utf8(buffer.clone())?;
        let mut lines = table.lines();
        assert_eq!(
            lines.next(),
            Some("Object Distance,Image Distance,Magnification,Focal Length,Angular Resolution (deg),Linear Resolution")
        );
        assert_eq!(lines.next(), Some("30.0,150.0,-5.0,25.0,0.5,0.25"));
        assert_eq!(lines.next(), Some("40.0,1.5,0.125,,0.5,0.5"));
        assert_eq!(read_csv(buffer.as_slice())?, rows);
        Ok(())
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            from_csv("does/not/exist.csv"),
            Err(ExportError::Io(_, _))
        ));
    }
}
