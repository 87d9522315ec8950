//! Waypoint file output.
//!
//! One line per waypoint, `"{x}, {y}, {pen}\n"`, in emission order.

use super::Waypoint;
use crate::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write waypoints to any writer.
pub fn write_waypoints<W: Write>(mut out: W, waypoints: &[Waypoint]) -> io::Result<()> {
    for waypoint in waypoints {
        writeln!(out, "{}", waypoint)?;
    }
    out.flush()
}

/// Render waypoints as file text.
pub fn to_string(waypoints: &[Waypoint]) -> String {
    let mut text = String::with_capacity(waypoints.len() * 12);
    for waypoint in waypoints {
        text.push_str(&waypoint.to_string());
        text.push('\n');
    }
    text
}

/// Create (or truncate) a waypoint file and write all waypoints to it.
pub fn write_file<P: AsRef<Path>>(path: P, waypoints: &[Waypoint]) -> Result<()> {
    let file = File::create(path)?;
    write_waypoints(BufWriter::new(file), waypoints)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waypoint::PenState;

    fn sample() -> Vec<Waypoint> {
        vec![
            Waypoint::new(0, 0, PenState::Up),
            Waypoint::new(1, 0, PenState::Down),
            Waypoint::new(-3, 12, PenState::Up),
        ]
    }

    #[test]
    fn test_line_format() {
        assert_eq!(to_string(&sample()), "0, 0, 1\n1, 0, 0\n-3, 12, 1\n");
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buffer = Vec::new();
        write_waypoints(&mut buffer, &sample()).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), to_string(&sample()));
    }

    #[test]
    fn test_write_file() {
        let path = std::env::temp_dir().join(format!(
            "pixelpath_waypoints_{}.txt",
            std::process::id()
        ));
        write_file(&path, &sample()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(text.lines().nth(2), Some("-3, 12, 1"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(to_string(&[]), "");
        let mut buffer = Vec::new();
        write_waypoints(&mut buffer, &[]).unwrap();
        assert!(buffer.is_empty());
    }
}
