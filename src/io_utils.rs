use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{ProblemError, SolveResult};

/// Write `data` as pretty JSON to `path`.
pub fn save_json<T: Serialize>(data: &T, path: &Path) -> SolveResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read JSON from `path`.
pub fn load_json<T: for<'a> Deserialize<'a>>(path: &Path) -> SolveResult<T> {
    if !path.exists() {
        return Err(ProblemError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file not found: {}", path.display()),
        )));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let data = serde_json::from_reader(reader)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("prime_problems_io_{}.json", std::process::id()));
        let mut data = BTreeMap::new();
        data.insert("even_n".to_string(), 20u64);

        save_json(&data, &path).unwrap();
        let loaded: BTreeMap<String, u64> = load_json(&path).unwrap();
        assert_eq!(loaded, data);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result: SolveResult<BTreeMap<String, u64>> =
            load_json(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ProblemError::Io(_))));
    }
}
